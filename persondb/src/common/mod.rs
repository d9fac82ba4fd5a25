//! Common types and utilities shared across the crate.
//!
//! This module provides the [Value] model used by documents and filters,
//! the [SortOrder] used by query options, and small concurrency helpers
//! built on `parking_lot`.

mod lock;
mod sort_order;
mod value;

pub use lock::LockHandle;
pub use sort_order::SortOrder;
pub use value::Value;

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// The reserved field holding a record's store-assigned identifier.
pub const DOC_ID: &str = "_id";

/// A shared, lock-protected value.
pub type Atomic<T> = Arc<RwLock<T>>;

#[inline]
pub fn atomic<T>(t: T) -> Atomic<T> {
    Arc::new(RwLock::new(t))
}

// Fast path: returns 0 on any error instead of double error handling
#[inline]
pub(crate) fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic() {
        let atomic_value = atomic(5);
        assert_eq!(*atomic_value.read(), 5);
    }

    #[test]
    fn test_current_time_millis() {
        let now = current_time_millis();
        assert!(now > 0);
    }
}
