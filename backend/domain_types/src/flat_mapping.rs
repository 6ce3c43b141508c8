//! Normalized view over a parsed gateway response.

use std::collections::BTreeMap;

use common_utils::{errors::ParsingError, ext_traits::ValueExt, CustomResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Format the raw response body is expected to be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ContentTypeHint {
    Json,
    Xml,
    FormUrlEncoded,
    QueryString,
    /// Sniff the first significant byte.
    Auto,
}

impl ContentTypeHint {
    /// Hint from a `Content-Type` header value.
    pub fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("json") {
            Self::Json
        } else if content_type.contains("xml") {
            Self::Xml
        } else if content_type.contains("x-www-form-urlencoded") {
            Self::FormUrlEncoded
        } else {
            Self::Auto
        }
    }
}

/// Response fields with snake_case keys, nested as the gateway nested them.
///
/// A body that could not be parsed completely still yields a mapping; the
/// `parse_error` flag records that it is partial.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatMapping {
    pub fields: Map<String, Value>,
    pub parse_error: bool,
    pub raw: String,
}

impl FlatMapping {
    pub fn new(fields: Map<String, Value>, raw: impl Into<String>) -> Self {
        Self {
            fields,
            parse_error: false,
            raw: raw.into(),
        }
    }

    /// Mapping for a body that could not be parsed.
    pub fn unparsable(raw: impl Into<String>) -> Self {
        Self {
            fields: Map::new(),
            parse_error: true,
            raw: raw.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a dotted path such as `payment.last_event`. Numeric segments
    /// index into arrays.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.fields.get(first)?, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Scalar at `path` rendered as a string. Empty strings count as absent.
    pub fn get_str(&self, path: &str) -> Option<String> {
        self.get(path).and_then(scalar_to_string).filter(|s| !s.is_empty())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Every scalar keyed by its dotted path.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (key, value) in &self.fields {
            flatten_into(key.clone(), value, &mut out);
        }
        out
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Deserializes the fields into a typed gateway response.
    pub fn deserialize<T: DeserializeOwned>(
        &self,
        type_name: &'static str,
    ) -> CustomResult<T, ParsingError> {
        self.as_value().parse_value(type_name)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn flatten_into(prefix: String, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                flatten_into(format!("{prefix}.{key}"), inner, out);
            }
        }
        Value::Array(items) => {
            for (index, inner) in items.iter().enumerate() {
                flatten_into(format!("{prefix}.{index}"), inner, out);
            }
        }
        Value::Null => {}
        scalar => {
            if let Some(s) = scalar_to_string(scalar) {
                out.insert(prefix, s);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn mapping() -> FlatMapping {
        let Value::Object(fields) = json!({
            "status": "CAPTURED",
            "id": "abc123",
            "payment_method": {"result": "00", "card": {"avs_code": "Y"}},
            "events": [{"code": 1}, {"code": 2}],
            "amount": 1000,
            "note": ""
        }) else {
            unreachable!()
        };
        FlatMapping::new(fields, "{}")
    }

    #[test]
    fn dotted_paths_reach_nested_values() {
        let mapping = mapping();
        assert_eq!(mapping.get_str("payment_method.card.avs_code").as_deref(), Some("Y"));
        assert_eq!(mapping.get_str("events.1.code").as_deref(), Some("2"));
        assert_eq!(mapping.get_str("amount").as_deref(), Some("1000"));
        assert!(mapping.get_str("note").is_none());
        assert!(mapping.get("payment_method.missing").is_none());
    }

    #[test]
    fn flatten_uses_dotted_keys() {
        let flat = mapping().flatten();
        assert_eq!(flat.get("payment_method.result").map(String::as_str), Some("00"));
        assert_eq!(flat.get("events.0.code").map(String::as_str), Some("1"));
        assert_eq!(flat.get("id").map(String::as_str), Some("abc123"));
    }

    #[test]
    fn deserializes_typed_struct() {
        #[derive(Deserialize)]
        struct Typed {
            status: String,
            id: String,
        }
        let typed: Typed = mapping().deserialize("Typed").unwrap();
        assert_eq!(typed.status, "CAPTURED");
        assert_eq!(typed.id, "abc123");
    }

    #[test]
    fn content_type_hints() {
        assert_eq!(
            ContentTypeHint::from_content_type("application/json; charset=utf-8"),
            ContentTypeHint::Json
        );
        assert_eq!(ContentTypeHint::from_content_type("text/xml"), ContentTypeHint::Xml);
        assert_eq!(ContentTypeHint::from_content_type("text/html"), ContentTypeHint::Auto);
    }
}
