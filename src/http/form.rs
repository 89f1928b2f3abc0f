//! Request form fields
//!
//! Handlers read POST fields from here. Bodies are either
//! `application/x-www-form-urlencoded` or a flat JSON object.

use serde_json::Value;
use std::collections::HashMap;

/// Decoded body fields; a repeated key keeps its last value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    /// Decode a request body according to its content type
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, String> {
        if body.is_empty() {
            return Ok(Self::default());
        }

        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some("application/json") => Self::from_json(body),
            Some(m) if m.starts_with("multipart/") => {
                Err("multipart bodies are not supported".to_string())
            }
            _ => Ok(Self::from_urlencoded(body)),
        }
    }

    pub fn from_urlencoded(body: &[u8]) -> Self {
        Self {
            fields: form_urlencoded::parse(body).into_owned().collect(),
        }
    }

    /// Flatten a JSON object: scalars become their text form, arrays of
    /// scalars are joined with spaces, nulls are dropped
    pub fn from_json(body: &[u8]) -> Result<Self, String> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| format!("invalid JSON body: {e}"))?;
        let Value::Object(map) = value else {
            return Err("JSON body must be an object".to_string());
        };

        let fields = map
            .into_iter()
            .filter_map(|(key, value)| scalar_text(&value).map(|text| (key, text)))
            .collect();
        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(scalar_text)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencoded() {
        let form = FormData::parse(
            Some("application/x-www-form-urlencoded"),
            b"starttime=2024-05-01+09%3A00&content=read+a+book&content=write",
        )
        .unwrap();
        assert_eq!(form.get("starttime"), Some("2024-05-01 09:00"));
        assert_eq!(form.get("content"), Some("write"));
        assert_eq!(form.get("endtime"), None);
    }

    #[test]
    fn test_missing_content_type_is_urlencoded() {
        let form = FormData::parse(None, b"words=cat+dog").unwrap();
        assert_eq!(form.get("words"), Some("cat dog"));
    }

    #[test]
    fn test_json_object() {
        let form = FormData::parse(
            Some("application/json; charset=utf-8"),
            br#"{"words": ["cat", "cat", "dog"], "n": 3, "skip": null, "nested": {"a": 1}}"#,
        )
        .unwrap();
        assert_eq!(form.get("words"), Some("cat cat dog"));
        assert_eq!(form.get("n"), Some("3"));
        assert_eq!(form.get("skip"), None);
        assert_eq!(form.get("nested"), None);
    }

    #[test]
    fn test_rejected_bodies() {
        assert!(FormData::parse(Some("application/json"), b"[1, 2]").is_err());
        assert!(FormData::parse(Some("application/json"), b"{oops").is_err());
        assert!(FormData::parse(Some("multipart/form-data; boundary=x"), b"--x").is_err());
    }

    #[test]
    fn test_empty_body() {
        let form = FormData::parse(Some("application/json"), b"").unwrap();
        assert_eq!(form, FormData::default());
    }
}
