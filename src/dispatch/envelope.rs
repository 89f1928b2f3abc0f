//! Response envelope: `{code, msg?, data?}`

use serde::Serialize;
use serde_json::{Map, Value};

/// Code carried by every failure envelope
pub const ERROR_CODE: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    /// `{code: 0, data}`
    pub fn ok(data: impl Into<Value>) -> Self {
        Self {
            code: 0,
            msg: None,
            data: Some(data.into()),
        }
    }

    /// `{code: 0, msg}`
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            code: 0,
            msg: Some(msg.into()),
            data: None,
        }
    }

    /// `{code: 0, msg, data}`
    pub fn success(msg: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            code: 0,
            msg: Some(msg.into()),
            data: Some(data.into()),
        }
    }

    /// `{code: -1, msg}`
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            code: ERROR_CODE,
            msg: Some(msg.into()),
            data: None,
        }
    }

    pub fn into_value(self) -> Value {
        let mut map = Map::new();
        map.insert("code".to_string(), Value::from(self.code));
        if let Some(msg) = self.msg {
            map.insert("msg".to_string(), Value::String(msg));
        }
        if let Some(data) = self.data {
            map.insert("data".to_string(), data);
        }
        Value::Object(map)
    }
}

impl From<Envelope> for Value {
    fn from(envelope: Envelope) -> Self {
        envelope.into_value()
    }
}

/// Whether a handler result already has the envelope shape
pub fn is_envelope(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|o| o.get("code"))
        .is_some_and(|code| !code.is_null())
}

/// Pass envelopes through untouched, wrap anything else as `{code: 0, data}`
pub fn normalize(value: Value) -> Value {
    if is_envelope(&value) {
        value
    } else {
        Envelope::ok(value).into_value()
    }
}
