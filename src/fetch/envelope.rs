//! The `{status, code, message, items}` wrapper every endpoint answers with.

use crate::transport::error::TransportError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub items: Option<Value>,
}

impl ApiEnvelope {
    /// Reads the envelope of the response to `url`.
    ///
    /// # Errors
    ///
    /// [`TransportError::Envelope`] when the body is not an envelope object
    /// (a bare list, `null`, or fields of the wrong type).
    pub fn from_body(url: &str, body: Value) -> Result<Self, TransportError> {
        serde_json::from_value(body).map_err(|source| TransportError::Envelope {
            url: url.to_string(),
            source,
        })
    }

    /// The raw objects carried in `items`. Absent, `null` and empty items all
    /// yield an empty list; a lone object is treated as a one-element list.
    pub fn into_items(self) -> Vec<Value> {
        match self.items {
            Some(Value::Array(items)) => items.into_iter().filter(|i| !i.is_null()).collect(),
            Some(Value::Object(object)) => vec![Value::Object(object)],
            _ => Vec::new(),
        }
    }
}
