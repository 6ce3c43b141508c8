use hyperswitch_masking::{Maskable, Secret};
use serde::{Deserialize, Serialize};

pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

fn default_request_headers() -> [(String, Maskable<String>); 1] {
    use http::header;

    [(
        header::USER_AGENT.to_string(),
        crate::consts::USER_AGENT.to_string().into(),
    )]
}

#[derive(Debug)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json(_) => "JsonRequestBody",
            Self::FormUrlEncoded(_) => "FormUrlEncodedRequestBody",
            Self::Xml(_) => "XmlRequestBody",
            Self::RawBytes(_) => "RawBytesRequestBody",
        })
    }
}

pub enum RequestContent {
    Json(Box<dyn hyperswitch_masking::ErasedMaskSerialize + Send>),
    FormUrlEncoded(Box<dyn hyperswitch_masking::ErasedMaskSerialize + Send>),
    Xml(Box<dyn hyperswitch_masking::ErasedMaskSerialize + Send>),
    /// Pre-rendered bodies, such as XML documents that need a prolog or doctype.
    RawBytes(Vec<u8>),
}

impl RequestContent {
    /// Serializes the body with secrets exposed, as it goes on the wire.
    pub fn get_inner_value(&self) -> Secret<String> {
        match self {
            Self::Json(i) => serde_json::to_string(&i).unwrap_or_default().into(),
            Self::FormUrlEncoded(i) => serde_urlencoded::to_string(i).unwrap_or_default().into(),
            Self::Xml(i) => quick_xml::se::to_string(&i).unwrap_or_default().into(),
            Self::RawBytes(bytes) => String::from_utf8_lossy(bytes).into_owned().into(),
        }
    }

    pub fn get_body_bytes(&self) -> Vec<u8> {
        use hyperswitch_masking::ExposeInterface;
        match self {
            Self::RawBytes(bytes) => bytes.clone(),
            Self::Json(_) | Self::FormUrlEncoded(_) | Self::Xml(_) => {
                self.get_inner_value().expose().into_bytes()
            }
        }
    }

    /// Serializes the body with every secret masked, for logging.
    pub fn get_masked_value(&self) -> serde_json::Value {
        match self {
            Self::Json(i) | Self::FormUrlEncoded(i) | Self::Xml(i) => (**i)
                .masked_serialize()
                .unwrap_or(serde_json::json!({ "error": "failed to mask serialize connector request"})),
            Self::RawBytes(bytes) => serde_json::json!({
                "request_type": "RAW_BYTES",
                "length": bytes.len(),
            }),
        }
    }
}

impl Request {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: String::from(url),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn get_headers_map(&self) -> std::collections::HashMap<String, String> {
        use hyperswitch_masking::PeekInterface;
        let mut map = std::collections::HashMap::new();
        for (k, v) in &self.headers {
            let val = match v {
                Maskable::Masked(s) => s.peek().to_string(),
                Maskable::Normal(s) => s.to_string(),
            };
            map.insert(k.clone(), val);
        }
        map
    }

    /// Headers with masked values replaced, for logging.
    pub fn get_masked_headers(&self) -> serde_json::Value {
        let masked_headers = self
            .headers
            .iter()
            .fold(serde_json::Map::new(), |mut acc, (k, v)| {
                let value = match v {
                    Maskable::Masked(_) => {
                        serde_json::Value::String("*** alloc::string::String ***".to_string())
                    }
                    Maskable::Normal(iv) => serde_json::Value::String(iv.to_owned()),
                };
                acc.insert(k.clone(), value);
                acc
            });
        serde_json::Value::Object(masked_headers)
    }

    pub fn set_body<T: Into<RequestContent>>(&mut self, body: T) {
        self.body.replace(body.into());
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::with_capacity(1024),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn attach_default_headers(mut self) -> Self {
        self.headers.extend(default_request_headers());
        self
    }

    pub fn header(mut self, header: &str, value: &str) -> Self {
        self.headers.insert((header.into(), value.to_string().into()));
        self
    }

    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn set_optional_body<T: Into<RequestContent>>(mut self, body: Option<T>) -> Self {
        body.map(|body| self.body.replace(body.into()));
        self
    }

    pub fn set_body<T: Into<RequestContent>>(mut self, body: T) -> Self {
        self.body.replace(body.into());
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use hyperswitch_masking::{ExposeInterface, Mask};

    use super::*;

    #[derive(Debug, Serialize)]
    struct Body {
        id: String,
        card: Secret<String>,
    }

    fn body() -> Body {
        Body {
            id: "order_1".to_string(),
            card: Secret::new("4111111111111111".to_string()),
        }
    }

    #[test]
    fn wire_body_exposes_secrets() {
        let content = RequestContent::Json(Box::new(body()));
        assert_eq!(
            content.get_inner_value().expose(),
            r#"{"id":"order_1","card":"4111111111111111"}"#
        );
        let form = RequestContent::FormUrlEncoded(Box::new(body()));
        assert_eq!(form.get_inner_value().expose(), "id=order_1&card=4111111111111111");
    }

    #[test]
    fn masked_body_hides_secrets() {
        let content = RequestContent::Json(Box::new(body()));
        let masked = content.get_masked_value().to_string();
        assert!(!masked.contains("4111111111111111"));
        assert!(masked.contains("order_1"));
    }

    #[test]
    fn builder_collects_headers_and_masks_them_for_logs() {
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url("https://example.test/pay")
            .attach_default_headers()
            .headers(vec![(
                "Authorization".to_string(),
                "Basic c2VjcmV0".to_string().into_masked(),
            )])
            .build();
        assert_eq!(request.method.to_string(), "POST");
        assert_eq!(
            request.get_headers_map().get("Authorization").map(String::as_str),
            Some("Basic c2VjcmV0")
        );
        assert!(!request.get_masked_headers().to_string().contains("c2VjcmV0"));
    }
}
