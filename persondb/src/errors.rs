use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for record store operations.
///
/// Each kind describes a category of failure, enabling precise error
/// handling at call sites. No operation recovers from a failure locally;
/// errors propagate to the caller, which decides what to do with them.
///
/// # Examples
///
/// ```rust,ignore
/// use persondb::errors::{ErrorKind, StoreError, StoreResult};
///
/// fn example() -> StoreResult<()> {
///     Err(StoreError::new("record not found", ErrorKind::NotFoundError))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The store is unreachable, the connection string is malformed, or the
    /// store has already been closed.
    ConnectionError,
    /// A schema constraint was violated: a required field is missing, a
    /// unique field conflicts with an existing record, or a value is out of
    /// its declared range.
    ValidationError,
    /// A filter or identifier is malformed.
    QueryError,
    /// The referenced record is absent.
    NotFoundError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConnectionError => write!(f, "Connection error"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::QueryError => write!(f, "Query error"),
            ErrorKind::NotFoundError => write!(f, "Not found"),
        }
    }
}

/// Custom error type for record store operations.
///
/// `StoreError` encapsulates the error message, kind, and optional cause.
/// It supports error chaining and backtraces for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use persondb::errors::{ErrorKind, StoreError};
///
/// // Create a simple error
/// let err = StoreError::new("malformed record id", ErrorKind::QueryError);
///
/// // Create an error with a cause
/// let cause = StoreError::new("store is closed", ErrorKind::ConnectionError);
/// let err = StoreError::new_with_cause("insert failed", ErrorKind::ConnectionError, cause);
/// ```
#[derive(Clone)]
pub struct StoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<StoreError>>,
    backtrace: Atomic<Backtrace>,
}

impl StoreError {
    /// Creates a new `StoreError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `StoreError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for
    /// debugging.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: StoreError) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&StoreError> {
        self.cause.as_deref()
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for record store operations.
///
/// `StoreResult<T>` is shorthand for `Result<T, StoreError>`.
/// All fallible store operations return this type.
pub type StoreResult<T> = Result<T, StoreError>;

// From trait implementations for automatic error conversion
impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::new(&format!("IO error: {}", err), ErrorKind::ConnectionError)
    }
}

impl From<std::num::ParseIntError> for StoreError {
    fn from(err: std::num::ParseIntError) -> Self {
        StoreError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::QueryError,
        )
    }
}
