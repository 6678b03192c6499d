//! # Query Module
//!
//! Parameterized Cypher as plain data.
//!
//! - A [`CypherQuery`] is query text plus a parameter map; building one never
//!   touches the network.
//! - Records coming back from the store are ordered JSON maps ([`Record`]);
//!   [`decode`] turns them into the typed results of [`crate::types`].
//! - Caller input is always bound as a parameter, never formatted into the
//!   text. The only interpolated values are validated integers (path depth).

use crate::primitives::MAX_RAW_QUERY_LENGTH;
use crate::types::WikiGraphError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One result row: column name → value, in `RETURN` order.
pub type Record = serde_json::Map<String, Value>;

/// Query parameters: name → value.
pub type Params = serde_json::Map<String, Value>;

/// A parameterized Cypher query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CypherQuery {
    /// Cypher text with `$name` placeholders.
    pub text: String,
    /// Values bound to the placeholders.
    #[serde(default)]
    pub params: Params,
}

impl CypherQuery {
    /// Create a query with no parameters.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Params::new(),
        }
    }

    /// Bind a parameter (builder style).
    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Wrap caller-supplied Cypher, checking only its size.
    ///
    /// Raw queries are the one escape hatch from the catalog; their text is
    /// passed through untouched.
    pub fn raw(text: impl Into<String>, params: Params) -> Result<Self, WikiGraphError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(WikiGraphError::Validation(
                "query must not be empty".to_string(),
            ));
        }
        if text.len() > MAX_RAW_QUERY_LENGTH {
            return Err(WikiGraphError::Validation(format!(
                "query exceeds {MAX_RAW_QUERY_LENGTH} bytes"
            )));
        }
        Ok(Self { text, params })
    }

    /// Value of a bound parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }
}

// =============================================================================
// RECORD DECODING
// =============================================================================

/// Decode one record into a typed result.
pub fn decode<T: DeserializeOwned>(record: Record) -> Result<T, WikiGraphError> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| WikiGraphError::Decode(e.to_string()))
}

/// Decode every record, failing on the first mismatch.
pub fn decode_all<T: DeserializeOwned>(records: Vec<Record>) -> Result<Vec<T>, WikiGraphError> {
    records.into_iter().map(decode).collect()
}

/// Decode the first record, if any.
pub fn decode_first<T: DeserializeOwned>(
    records: Vec<Record>,
) -> Result<Option<T>, WikiGraphError> {
    records.into_iter().next().map(decode).transpose()
}

/// Read an integer column, treating null or absent as zero.
pub fn int_column(record: &Record, column: &str) -> Result<i64, WikiGraphError> {
    match record.get(column) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => value.as_i64().ok_or_else(|| {
            WikiGraphError::Decode(format!("column '{column}' is not an integer: {value}"))
        }),
    }
}

// =============================================================================
// TESTS
// =============================================================================
