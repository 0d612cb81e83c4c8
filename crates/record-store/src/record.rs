use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::RecordId;

/// The body of a record: a JSON object without its `id` key.
pub type Document = Map<String, Value>;

/// Name of the identifier field in the serialized form of a record.
pub const ID_FIELD: &str = "id";

/// A record as held by the store.
///
/// Serializes as a single flat JSON object with `id` alongside the
/// document's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,

    #[serde(flatten)]
    pub fields: Document,
}

impl StoredRecord {
    /// Creates a record, dropping any `id` key carried by the document.
    pub fn new(id: RecordId, mut fields: Document) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    /// Returns the value of a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the record as a single JSON object including `id`.
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        object.insert(ID_FIELD.to_string(), Value::from(self.id.as_u64()));
        object.extend(self.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Value::Object(object)
    }

    /// Returns true if the named field equals `expected` when compared as text.
    ///
    /// String fields compare by their content, everything else by its JSON
    /// rendering, so `?count=2` matches both `2` and `"2"`.
    pub fn field_matches(&self, field: &str, expected: &str) -> bool {
        if field == ID_FIELD {
            return self.id.to_string() == expected;
        }
        match self.fields.get(field) {
            Some(Value::String(s)) => s == expected,
            Some(other) => other.to_string() == expected,
            None => false,
        }
    }
}
