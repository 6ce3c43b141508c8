use std::collections::BTreeMap;

use common_enums::Currency;
use common_utils::{
    date_time, generate_id_with_prefix, generate_nonce, pii::Email, SecretSerdeValue,
};
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::{missing_field_err, Error};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: Option<Secret<String>>,
    pub last_name: Option<Secret<String>>,
    pub address1: Option<Secret<String>>,
    pub address2: Option<Secret<String>>,
    pub city: Option<String>,
    pub state: Option<Secret<String>>,
    pub zip: Option<Secret<String>>,
    /// ISO 3166 alpha-2
    pub country: Option<String>,
    pub phone: Option<Secret<String>>,
}

impl Address {
    pub fn get_first_name(&self) -> Result<&Secret<String>, Error> {
        self.first_name
            .as_ref()
            .ok_or_else(missing_field_err("billing_address.first_name"))
    }

    pub fn get_last_name(&self) -> Result<&Secret<String>, Error> {
        self.last_name
            .as_ref()
            .ok_or_else(missing_field_err("billing_address.last_name"))
    }

    /// First and last name joined by a space, when at least one is present.
    pub fn get_full_name(&self) -> Option<Secret<String>> {
        use hyperswitch_masking::PeekInterface;
        let parts: Vec<&str> = [self.first_name.as_ref(), self.last_name.as_ref()]
            .into_iter()
            .flatten()
            .map(|part| part.peek().as_str())
            .filter(|part| !part.is_empty())
            .collect();
        (!parts.is_empty()).then(|| Secret::new(parts.join(" ")))
    }
}

/// Per-call options shared by every verb. Recognized keys are typed fields;
/// gateway specific extras go in `connector_fields`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaymentOptions {
    pub order_id: Option<String>,
    pub currency: Option<Currency>,
    pub email: Option<Email>,
    pub ip: Option<Secret<String, common_utils::pii::IpAddress>>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    pub description: Option<String>,
    pub customer_id: Option<String>,
    pub metadata: Option<SecretSerdeValue>,
    /// Gateway session token supplied by the caller.
    pub access_token: Option<Secret<String>>,
    #[serde(default)]
    pub connector_fields: BTreeMap<String, String>,
}

impl PaymentOptions {
    pub fn get_order_id(&self) -> Result<&String, Error> {
        self.order_id
            .as_ref()
            .ok_or_else(missing_field_err("order_id"))
    }

    pub fn get_billing_address(&self) -> Result<&Address, Error> {
        self.billing_address
            .as_ref()
            .ok_or_else(missing_field_err("billing_address"))
    }

    pub fn get_connector_field(&self, key: &'static str) -> Result<&String, Error> {
        self.connector_fields
            .get(key)
            .ok_or_else(missing_field_err(key))
    }

    pub fn get_optional_connector_field(&self, key: &str) -> Option<&String> {
        self.connector_fields.get(key)
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_billing_address(mut self, address: Address) -> Self {
        self.billing_address = Some(address);
        self
    }

    pub fn with_connector_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.connector_fields.insert(key.into(), value.into());
        self
    }
}

/// Values that vary between calls and must never be read from globals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    pub nonce: String,
    pub timestamp: OffsetDateTime,
    pub idempotency_key: String,
}

/// Source of a fresh `RequestContext` for each verb call.
pub trait ContextProvider: Send + Sync {
    fn new_context(&self) -> RequestContext;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemContextProvider;

impl ContextProvider for SystemContextProvider {
    fn new_context(&self) -> RequestContext {
        RequestContext {
            nonce: generate_nonce(),
            timestamp: date_time::now(),
            idempotency_key: generate_id_with_prefix("idem"),
        }
    }
}

/// Hands out the same context every time, for reproducible payloads.
#[derive(Debug, Clone)]
pub struct FixedContextProvider(pub RequestContext);

impl FixedContextProvider {
    pub fn new(nonce: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        let nonce = nonce.into();
        Self(RequestContext {
            idempotency_key: format!("idem_{nonce}"),
            nonce,
            timestamp,
        })
    }
}

impl ContextProvider for FixedContextProvider {
    fn new_context(&self) -> RequestContext {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_option_is_reported_by_name() {
        let options = PaymentOptions::default();
        let err = options.get_billing_address().err();
        assert!(matches!(
            err.as_ref().map(|e| e.current_context()),
            Some(crate::errors::ConnectorError::MissingRequiredField {
                field_name: "billing_address"
            })
        ));
    }

    #[test]
    fn connector_fields_are_looked_up() {
        let options = PaymentOptions::default().with_connector_field("merchant_ref", "m-1");
        assert_eq!(
            options.get_connector_field("merchant_ref").ok().map(String::as_str),
            Some("m-1")
        );
        assert!(options.get_connector_field("absent").is_err());
    }

    #[test]
    fn system_contexts_differ_and_fixed_contexts_repeat() {
        let system = SystemContextProvider;
        assert_ne!(system.new_context().nonce, system.new_context().nonce);

        let fixed = FixedContextProvider::new("n1", OffsetDateTime::UNIX_EPOCH);
        assert_eq!(fixed.new_context(), fixed.new_context());
        assert_eq!(fixed.new_context().timestamp, OffsetDateTime::UNIX_EPOCH);
    }

    #[test]
    fn full_name_joins_present_parts() {
        let address = Address {
            first_name: Some(Secret::new("Jane".to_string())),
            last_name: Some(Secret::new("Doe".to_string())),
            ..Default::default()
        };
        assert_eq!(
            address.get_full_name().map(|n| hyperswitch_masking::ExposeInterface::expose(n)),
            Some("Jane Doe".to_string())
        );
        assert!(Address::default().get_full_name().is_none());
    }
}
