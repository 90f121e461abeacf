//! Pipeline parameter accumulation.

use crate::error::SelectError;
use serde_json::{Map, Value};

/// JSON object handed to the downstream pipeline. Merges are shallow and
/// right-biased: a later fragment overwrites keys it shares with earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: Map<String, Value>,
}

impl ParameterSet {
    /// Seed from a JSON object string such as `DEFAULT_PARAMS`.
    pub fn from_json(text: &str, context: &str) -> Result<Self, SelectError> {
        Ok(Self {
            values: parse_object(text, context)?,
        })
    }

    pub fn merge(&mut self, fragment: Map<String, Value>) {
        for (key, value) in fragment {
            self.values.insert(key, value);
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    pub fn to_pretty_json(&self) -> String {
        // Serializing an in-memory Map<String, Value> cannot fail.
        serde_json::to_string_pretty(&self.values).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Parse `text` as a JSON object; anything else is rejected.
pub fn parse_object(text: &str, context: &str) -> Result<Map<String, Value>, SelectError> {
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|source| SelectError::InvalidParams {
            context: context.to_string(),
            source,
        })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SelectError::ParamsNotObject {
            context: context.to_string(),
        }),
    }
}
