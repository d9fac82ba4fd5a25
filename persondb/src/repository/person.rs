use crate::collection::{Document, RecordId};
use crate::common::Value;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::schema::Schema;

/// Field name of a person's name.
pub const NAME: &str = "name";
/// Field name of a person's age.
pub const AGE: &str = "age";
/// Field name of a person's favorite foods.
pub const FAVORITE_FOODS: &str = "favorite_foods";

/// The age range accepted for a person, inclusive.
pub const AGE_RANGE: (i64, i64) = (5, 150);

/// Returns the schema enforced on the people collection.
///
/// A person's name is required and unique; the age, when present, must lie
/// within [AGE_RANGE].
pub fn schema() -> Schema {
    Schema::new()
        .required(NAME)
        .unique(NAME)
        .bounded(AGE, AGE_RANGE.0, AGE_RANGE.1)
}

/// A person record.
///
/// The id is assigned by the store when the person is first inserted and is
/// immutable thereafter; a freshly built `Person` has no id. All other
/// fields are plain data:
///
/// ```rust,ignore
/// use persondb::repository::Person;
///
/// let john = Person::new("John Doe")
///     .with_age(25)
///     .with_favorite_foods(["Pizza", "Burger"]);
/// assert!(john.id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Person {
    id: Option<RecordId>,
    /// The person's name. Required and unique across the collection.
    pub name: String,
    /// The person's age, if known. Must lie within [AGE_RANGE].
    pub age: Option<i64>,
    /// The person's favorite foods, in order of preference. May be empty.
    pub favorite_foods: Vec<String>,
}

impl Person {
    /// Creates a new person with the given name, no age, and no favorite
    /// foods.
    pub fn new(name: impl Into<String>) -> Person {
        Person {
            id: None,
            name: name.into(),
            age: None,
            favorite_foods: Vec::new(),
        }
    }

    /// Sets the person's age.
    pub fn with_age(mut self, age: i64) -> Person {
        self.age = Some(age);
        self
    }

    /// Sets the person's favorite foods.
    pub fn with_favorite_foods<I, S>(mut self, foods: I) -> Person
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the store-assigned id, if this person has been persisted.
    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub(crate) fn to_document(&self) -> StoreResult<Document> {
        let mut document = Document::new();
        if let Some(id) = self.id {
            document.set_id(id);
        }
        document.put(NAME, self.name.as_str())?;
        if let Some(age) = self.age {
            document.put(AGE, age)?;
        }
        document.put(FAVORITE_FOODS, self.favorite_foods.clone())?;
        Ok(document)
    }

    pub(crate) fn from_document(document: &Document) -> StoreResult<Person> {
        let name = match document.get(NAME) {
            Value::String(name) => name,
            _ => {
                return Err(StoreError::new(
                    "person record is missing required field 'name'",
                    ErrorKind::ValidationError,
                ))
            }
        };

        let age = match document.get(AGE) {
            Value::Null => None,
            Value::I64(age) => Some(age),
            _ => {
                return Err(StoreError::new(
                    "person record field 'age' must be an integer",
                    ErrorKind::ValidationError,
                ))
            }
        };

        let favorite_foods = match document.get(FAVORITE_FOODS) {
            Value::Null => Vec::new(),
            Value::Array(values) => {
                let mut foods = Vec::with_capacity(values.len());
                for value in values {
                    match value {
                        Value::String(food) => foods.push(food),
                        _ => {
                            return Err(StoreError::new(
                                "person record field 'favorite_foods' must contain text values",
                                ErrorKind::ValidationError,
                            ))
                        }
                    }
                }
                foods
            }
            _ => {
                return Err(StoreError::new(
                    "person record field 'favorite_foods' must be an array",
                    ErrorKind::ValidationError,
                ))
            }
        };

        Ok(Person {
            id: document.id(),
            name,
            age,
            favorite_foods,
        })
    }
}
