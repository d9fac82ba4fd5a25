use im::OrdMap;
use itertools::Itertools;

use crate::collection::RecordId;
use crate::common::{Value, DOC_ID};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use std::fmt::{Debug, Display};

/// Represents a stored record as a flat map of named fields.
///
/// A document is composed of key-value pairs where the key is always a
/// [String] and the value is a [Value]. Field iteration order follows the
/// key order.
///
/// The `_id` field is reserved: it holds the record's store-assigned
/// [RecordId] and cannot be set to anything else through [Document::put].
///
/// ## Lock-free design
///
/// The struct uses `im::OrdMap` (a persistent ordered map):
/// - O(1) cloning via internal Arc sharing
/// - mutations create new maps via structural sharing
/// - each mutated document is completely independent
#[derive(Clone, Eq, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    /// Checks if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of fields in this document.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Associates the specified [Value] with the specified key in this
    /// document. If the key already exists, its value is replaced.
    ///
    /// # Errors
    ///
    /// Returns a [ErrorKind::ValidationError] if:
    /// * the key is empty
    /// * the key is the reserved `_id` field and the value is not a record id
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.put("name", "Alice")?;
    /// doc.put("age", 30)?;
    /// assert_eq!(doc.size(), 2);
    /// ```
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> StoreResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty field names");
            return Err(StoreError::new(
                "document does not support empty field names",
                ErrorKind::ValidationError,
            ));
        }

        let value = value.into();
        if key == DOC_ID && !value.is_id() {
            log::error!("Record id is a store assigned field and cannot be set manually");
            return Err(StoreError::new(
                "record id is a store assigned field and cannot be set manually",
                ErrorKind::ValidationError,
            ));
        }

        self.data = self.data.update(key.to_string(), value);
        Ok(())
    }

    /// Returns the [Value] associated with the specified key, or
    /// [Value::Null] if this document contains no such field.
    pub fn get(&self, key: &str) -> Value {
        match self.data.get(key) {
            Some(value) => value.clone(),
            None => Value::Null,
        }
    }

    /// Checks whether the document contains the given field.
    pub fn has_field(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the [RecordId] of this document, if one has been assigned.
    pub fn id(&self) -> Option<RecordId> {
        match self.data.get(DOC_ID) {
            Some(Value::Id(id)) => Some(*id),
            _ => None,
        }
    }

    // the one sanctioned way to stamp a store-assigned id onto a record
    pub(crate) fn set_id(&mut self, id: RecordId) {
        self.data = self.data.update(DOC_ID.to_string(), Value::Id(id));
    }

    /// Removes a field from the document, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Returns the field names of this document in key order.
    pub fn fields(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Iterates over the fields of this document in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Returns a copy of this document with the given field updates applied.
    ///
    /// Every field of `updates` replaces the field of the same name in this
    /// document; fields not named in `updates` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns a [ErrorKind::ValidationError] if `updates` names the
    /// reserved `_id` field: record ids are immutable.
    pub fn merged_with(&self, updates: &Document) -> StoreResult<Document> {
        let mut merged = self.clone();
        for (key, value) in updates.iter() {
            if key == DOC_ID {
                log::error!("Record id is immutable and cannot be updated");
                return Err(StoreError::new(
                    "record id is immutable and cannot be updated",
                    ErrorKind::ValidationError,
                ));
            }
            merged.data = merged.data.update(key.clone(), value.clone());
        }
        Ok(merged)
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.data
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .join(", ")
        )
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

/// Creates a [Document] from field-value pairs.
///
/// Values go through [Value] conversions; bracketed values become arrays.
///
/// # Examples
///
/// ```ignore
/// let person = doc! {
///     name: "John Doe",
///     age: 25,
///     favorite_foods: ["Pizza", "Burger"]
/// };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };

    ($($key:ident : $value:tt),* $(,)?) => {
        {
            let mut doc = $crate::collection::Document::new();
            $(
                doc.put(stringify!($key), $crate::doc_value!($value))
                    .expect("failed to put value in document");
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the `doc!` macro.
/// Handles arrays and expressions.
#[macro_export]
macro_rules! doc_value {
    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
