//! Turns raw gateway bodies into a [`FlatMapping`].
//!
//! Parsing never fails: a body that cannot be read completely yields
//! whatever was recovered with `parse_error` set. Keys are normalized to
//! snake_case so mappers never see a gateway's own naming.

use domain_types::flat_mapping::{ContentTypeHint, FlatMapping};
use heck::ToSnakeCase;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(raw: &[u8], hint: ContentTypeHint) -> FlatMapping {
        let body = strip_bom_and_convert_to_string(raw);
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return FlatMapping::new(Map::new(), body);
        }

        let hint = match hint {
            ContentTypeHint::Auto => sniff(trimmed),
            other => other,
        };

        match hint {
            ContentTypeHint::Json => parse_json(trimmed, &body),
            ContentTypeHint::Xml => parse_xml(trimmed, &body),
            ContentTypeHint::FormUrlEncoded | ContentTypeHint::QueryString => {
                parse_form(trimmed, &body)
            }
            ContentTypeHint::Auto => FlatMapping::unparsable(body.clone()),
        }
    }
}

pub fn strip_bom_and_convert_to_string(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw.strip_prefix(UTF8_BOM).unwrap_or(raw)).into_owned()
}

/// snake_case form of a gateway key, e.g. `paymentHandleToken` to `payment_handle_token`.
pub fn normalize_key(key: &str) -> String {
    let normalized = key.to_snake_case();
    if normalized.is_empty() {
        key.to_string()
    } else {
        normalized
    }
}

fn sniff(body: &str) -> ContentTypeHint {
    match body.as_bytes().first() {
        Some(b'{') | Some(b'[') => ContentTypeHint::Json,
        Some(b'<') => ContentTypeHint::Xml,
        _ if body.contains('=') => ContentTypeHint::QueryString,
        _ => ContentTypeHint::Auto,
    }
}

fn normalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_value).collect()),
        scalar => scalar,
    }
}

fn normalize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (normalize_key(&key), normalize_value(value)))
        .collect()
}

fn parse_json(trimmed: &str, body: &str) -> FlatMapping {
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => FlatMapping::new(normalize_map(map), body),
        Ok(Value::Array(items)) => {
            let mut fields = Map::new();
            fields.insert("items".to_string(), normalize_value(Value::Array(items)));
            FlatMapping::new(fields, body)
        }
        Ok(scalar) => {
            let mut fields = Map::new();
            fields.insert("value".to_string(), scalar);
            FlatMapping::new(fields, body)
        }
        Err(error) => {
            tracing::warn!(%error, "connector response is not valid json");
            FlatMapping::unparsable(body)
        }
    }
}

fn parse_form(trimmed: &str, body: &str) -> FlatMapping {
    let trimmed = trimmed.trim_start_matches('?');
    let mut fields = Map::new();
    let mut malformed = false;
    for pair in trimmed.split('&').filter(|pair| !pair.is_empty()) {
        if !pair.contains('=') {
            malformed = true;
            continue;
        }
        for (key, value) in url::form_urlencoded::parse(pair.as_bytes()) {
            insert_child(&mut fields, normalize_key(&key), Value::String(value.into_owned()));
        }
    }
    let mut mapping = FlatMapping::new(fields, body);
    mapping.parse_error = malformed || mapping.is_empty();
    mapping
}

struct XmlNode {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl XmlNode {
    fn start(element: &BytesStart<'_>) -> (Self, bool) {
        let name = normalize_key(&String::from_utf8_lossy(element.local_name().as_ref()));
        let mut children = Map::new();
        let mut malformed = false;
        for attribute in element.attributes() {
            match attribute {
                Ok(attribute) => {
                    if attribute.key.as_ref().starts_with(b"xmlns") {
                        continue;
                    }
                    let key = String::from_utf8_lossy(attribute.key.local_name().as_ref())
                        .into_owned();
                    match attribute.unescape_value() {
                        Ok(value) => {
                            children.insert(normalize_key(&key), Value::String(value.into_owned()));
                        }
                        Err(_) => malformed = true,
                    }
                }
                Err(_) => malformed = true,
            }
        }
        (
            Self {
                name,
                children,
                text: String::new(),
            },
            malformed,
        )
    }

    fn into_value(self) -> (String, Value) {
        let text = self.text.trim().to_string();
        let value = if self.children.is_empty() {
            Value::String(text)
        } else {
            let mut children = self.children;
            if !text.is_empty() {
                children.insert("value".to_string(), Value::String(text));
            }
            Value::Object(children)
        };
        (self.name, value)
    }
}

/// Inserts `value` under `key`, turning repeated keys into arrays.
fn insert_child(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(key, value);
        }
    }
}

fn close_node(stack: &mut Vec<XmlNode>, root: &mut Map<String, Value>) {
    if let Some(node) = stack.pop() {
        let (name, value) = node.into_value();
        match stack.last_mut() {
            Some(parent) => insert_child(&mut parent.children, name, value),
            None => insert_child(root, name, value),
        }
    }
}

fn parse_xml(trimmed: &str, body: &str) -> FlatMapping {
    let mut reader = quick_xml::Reader::from_str(trimmed);
    reader.trim_text(true);

    let mut root = Map::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut parse_error = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                let (node, malformed) = XmlNode::start(&element);
                parse_error |= malformed;
                stack.push(node);
            }
            Ok(Event::Empty(element)) => {
                let (node, malformed) = XmlNode::start(&element);
                parse_error |= malformed;
                stack.push(node);
                close_node(&mut stack, &mut root);
            }
            Ok(Event::End(_)) => close_node(&mut stack, &mut root),
            Ok(Event::Text(text)) => match text.unescape() {
                Ok(text) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&text);
                    }
                }
                Err(_) => parse_error = true,
            },
            Ok(Event::CData(data)) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(
                    %error,
                    position = reader.buffer_position(),
                    "connector response is not well formed xml"
                );
                parse_error = true;
                break;
            }
        }
    }

    if !stack.is_empty() {
        parse_error = true;
        while !stack.is_empty() {
            close_node(&mut stack, &mut root);
        }
    }

    let mut mapping = FlatMapping::new(root, body);
    mapping.parse_error = parse_error || mapping.is_empty();
    mapping
}
