//! The authorization handle returned by a successful payment call.
//!
//! A handle carries everything a later capture, refund or void needs. It
//! travels through the caller as an opaque string, so the encoding is
//! versioned: `v=1&id=...&secondary_id=...`. Keys a reader does not know are
//! skipped, and a string without the version marker is treated as a bare
//! gateway transaction id.

use common_enums::Currency;
use common_utils::MinorUnit;
use error_stack::ResultExt;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::errors::ConnectorError;

pub const HANDLE_VERSION: &str = "1";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationHandle {
    pub transaction_id: String,
    /// Second identifier some gateways need, such as an authorization code or order code.
    pub secondary_id: Option<String>,
    pub amount: Option<MinorUnit>,
    pub currency: Option<Currency>,
    /// The operation that produced the handle, e.g. `authorize` or `purchase`.
    pub kind: Option<String>,
}

impl AuthorizationHandle {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            ..Default::default()
        }
    }

    pub fn with_secondary_id(mut self, secondary_id: Option<String>) -> Self {
        self.secondary_id = secondary_id.filter(|id| !id.is_empty());
        self
    }

    pub fn with_amount(mut self, amount: MinorUnit, currency: Currency) -> Self {
        self.amount = Some(amount);
        self.currency = Some(currency);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("v", HANDLE_VERSION);
        serializer.append_pair("id", &self.transaction_id);
        if let Some(secondary_id) = &self.secondary_id {
            serializer.append_pair("secondary_id", secondary_id);
        }
        if let Some(amount) = self.amount {
            serializer.append_pair("amount", &amount.to_string());
        }
        if let Some(currency) = self.currency {
            serializer.append_pair("currency", &currency.to_string());
        }
        if let Some(kind) = &self.kind {
            serializer.append_pair("kind", kind);
        }
        serializer.finish()
    }

    pub fn decode(encoded: &str) -> error_stack::Result<Self, ConnectorError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(error_stack::report!(ConnectorError::InvalidAuthorizationHandle))
                .attach_printable("authorization handle is empty");
        }
        if !encoded.starts_with("v=") {
            return Ok(Self::new(encoded));
        }

        let mut handle = Self::default();
        let mut version = None;
        for (key, value) in form_urlencoded::parse(encoded.as_bytes()) {
            match key.as_ref() {
                "v" => version = Some(value.into_owned()),
                "id" => handle.transaction_id = value.into_owned(),
                "secondary_id" => handle.secondary_id = Some(value.into_owned()),
                "amount" => {
                    let amount = value.parse::<MinorUnit>().map_err(|_| {
                        error_stack::report!(ConnectorError::InvalidAuthorizationHandle)
                            .attach_printable(format!("invalid amount {value:?}"))
                    })?;
                    handle.amount = Some(amount);
                }
                "currency" => {
                    let currency = value.parse::<Currency>().map_err(|_| {
                        error_stack::report!(ConnectorError::InvalidAuthorizationHandle)
                            .attach_printable(format!("invalid currency {value:?}"))
                    })?;
                    handle.currency = Some(currency);
                }
                "kind" => handle.kind = Some(value.into_owned()),
                _ => {}
            }
        }

        if version.as_deref() != Some(HANDLE_VERSION) {
            return Err(error_stack::report!(ConnectorError::InvalidAuthorizationHandle))
                .attach_printable(format!("unsupported handle version {version:?}"));
        }
        if handle.transaction_id.is_empty() {
            return Err(error_stack::report!(ConnectorError::InvalidAuthorizationHandle))
                .attach_printable("authorization handle has no transaction id");
        }
        Ok(handle)
    }
}

impl std::str::FromStr for AuthorizationHandle {
    type Err = error_stack::Report<ConnectorError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
