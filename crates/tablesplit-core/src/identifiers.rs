// Batch identifiers: the values that pin one batch out of a split
//
// A JSON object keyed by column name (or "hash_value" for hashed splits).
// Values may be scalars or, for date-part splits, a nested object keyed by
// part name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SplitError;

/// Key/value pairs selecting a single batch from a partitioned dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchIdentifiers(Map<String, Value>);

impl BatchIdentifiers {
    /// Empty identifier set, as used by whole-table splits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parse identifiers from a JSON object literal.
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Look up a required key, erroring with the missing column name.
    pub fn require(&self, column: &str) -> Result<&Value, SplitError> {
        self.0.get(column).ok_or_else(|| SplitError::MissingIdentifier {
            column: column.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for BatchIdentifiers {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Whether a JSON value counts as empty for identifier validation.
///
/// Mirrors the truthiness rules config authors expect: null, false, zero,
/// and empty strings/arrays/objects are all empty.
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
