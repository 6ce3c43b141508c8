use serde::{Deserialize, Serialize};

#[derive(Clone, Deserialize, Serialize, Debug, Default, PartialEq)]
pub struct ConnectorParams {
    /// base url
    #[serde(default)]
    pub base_url: String,
}

impl ConnectorParams {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
#[serde(default)]
pub struct Connectors {
    pub forte: ConnectorParams,
    pub nmi: ConnectorParams,
    pub worldpayxml: ConnectorParams,
    pub paysafe: ConnectorParams,
    pub globalpay: ConnectorParams,
}

impl Connectors {
    /// Sandbox endpoints of every connector.
    pub fn sandbox() -> Self {
        Self {
            forte: ConnectorParams::new("https://sandbox.forte.net/api/v3"),
            nmi: ConnectorParams::new("https://secure.nmi.com"),
            worldpayxml: ConnectorParams::new("https://secure-test.worldpay.com/jsp/merchant/xml"),
            paysafe: ConnectorParams::new("https://api.test.paysafe.com/paymenthub"),
            globalpay: ConnectorParams::new("https://apis.sandbox.globalpay.com/ucp"),
        }
    }
}

impl Default for Connectors {
    fn default() -> Self {
        Self::sandbox()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Hash, Default)]
#[serde(default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    pub bypass_proxy_urls: Vec<String>,
}

impl Proxy {
    pub fn is_proxy_configured(&self) -> bool {
        self.http_url.is_some() || self.https_url.is_some()
    }

    pub fn should_bypass(&self, url: &str) -> bool {
        self.bypass_proxy_urls
            .iter()
            .any(|bypass| url.starts_with(bypass.as_str()))
    }
}
