//! Builders shared by the connector tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    str::FromStr,
};

use cards::CardNumber;
use common_enums::{CaptureMethod, Currency};
use common_utils::MinorUnit;
use domain_types::{
    authorization::AuthorizationHandle,
    connector_types::{
        PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData,
    },
    payment_method_data::{Card, PaymentInstrument},
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    flat_mapping::ContentTypeHint,
    router_request_types::{Address, ContextProvider, FixedContextProvider, PaymentOptions},
    router_response_types::GatewayResponse,
    types::Connectors,
};
use external_services::{execute_connector_processing_step, mock::MockTransport};
use hyperswitch_masking::{ExposeInterface, Secret};
use interfaces::{connector_integration_v2::ConnectorIntegrationV2, decode::ResponseParser};
use serde_json::Value;
use time::OffsetDateTime;

pub(crate) const NONCE: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f0";

pub(crate) fn secret(value: &str) -> Secret<String> {
    Secret::new(value.to_string())
}

pub(crate) fn card() -> Card {
    Card {
        card_number: CardNumber::from_str("4111111111111111").unwrap(),
        card_exp_month: secret("09"),
        card_exp_year: secret("2030"),
        card_cvc: Some(secret("123")),
        card_holder_name: Some(secret("Longbob Longsen")),
        card_network: None,
    }
}

pub(crate) fn billing_address() -> Address {
    Address {
        first_name: Some(secret("Jim")),
        last_name: Some(secret("Smith")),
        address1: Some(secret("456 My Street")),
        address2: Some(secret("Apt 1")),
        city: Some("Ottawa".to_string()),
        state: Some(secret("ON")),
        zip: Some(secret("K1C2N6")),
        country: Some("CA".to_string()),
        phone: Some(secret("(555)555-5555")),
    }
}

pub(crate) fn options() -> PaymentOptions {
    PaymentOptions {
        description: Some("Store Purchase".to_string()),
        ..PaymentOptions::default()
    }
    .with_order_id("X1")
    .with_billing_address(billing_address())
}

pub(crate) fn flow_data() -> PaymentFlowData {
    flow_data_with_nonce(NONCE)
}

pub(crate) fn flow_data_with_nonce(nonce: &str) -> PaymentFlowData {
    let context = FixedContextProvider::new(nonce, OffsetDateTime::UNIX_EPOCH).new_context();
    PaymentFlowData::new(Connectors::sandbox(), true, context)
}

pub(crate) fn router_data<F, Req>(auth: ConnectorAuthType, request: Req) -> RouterDataV2<F, Req> {
    RouterDataV2::new(flow_data(), auth, request)
}

pub(crate) fn authorize_data(
    amount: i64,
    currency: Currency,
    capture_method: CaptureMethod,
) -> PaymentsAuthorizeData {
    PaymentsAuthorizeData {
        amount: MinorUnit::new(amount),
        currency,
        payment_instrument: PaymentInstrument::Card(card()),
        capture_method,
        options: options(),
    }
}

pub(crate) fn capture_data(handle: AuthorizationHandle, amount: i64) -> PaymentsCaptureData {
    PaymentsCaptureData {
        amount: MinorUnit::new(amount),
        currency: handle.currency.unwrap_or(Currency::USD),
        authorization: handle,
        options: PaymentOptions::default(),
    }
}

pub(crate) fn refund_data(handle: AuthorizationHandle, amount: i64) -> RefundsData {
    RefundsData {
        amount: MinorUnit::new(amount),
        currency: handle.currency.unwrap_or(Currency::USD),
        authorization: handle,
        options: PaymentOptions::default(),
    }
}

pub(crate) fn void_data(handle: AuthorizationHandle) -> PaymentVoidData {
    PaymentVoidData {
        authorization: handle,
        options: PaymentOptions::default(),
    }
}

/// Runs one flow against canned replies and folds success and failure into
/// a single response.
pub(crate) fn run<F, Req, C>(
    connector: &C,
    transport: &MockTransport,
    router_data: &RouterDataV2<F, Req>,
) -> GatewayResponse
where
    C: ConnectorIntegrationV2<F, Req> + ?Sized,
{
    match execute_connector_processing_step(transport, connector, router_data) {
        Ok(Ok(response)) | Ok(Err(response)) => response,
        Err(error) => panic!("request could not be built: {error:?}"),
    }
}

/// The body a flow would send, read back into a tree whatever its encoding.
pub(crate) fn built_body<F, Req, Resp, C>(connector: &C, router_data: &RouterDataV2<F, Req>) -> Value
where
    C: ConnectorIntegrationV2<F, Req, Resp> + ?Sized,
{
    let request = connector
        .build_request_v2(router_data)
        .unwrap()
        .expect("flow builds a request");
    let body = request
        .body
        .expect("flow sends a body")
        .get_inner_value()
        .expose();
    let mapping = ResponseParser::parse(body.as_bytes(), ContentTypeHint::Auto);
    assert!(!mapping.parse_error, "unreadable body: {body}");
    mapping.as_value()
}

/// Leaves of `body` keyed by their dotted path.
pub(crate) fn leaves(body: &Value) -> BTreeMap<String, Value> {
    fn walk(prefix: String, value: &Value, out: &mut BTreeMap<String, Value>) {
        let join = |key: &str| {
            if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{prefix}.{key}")
            }
        };
        match value {
            Value::Object(map) => map.iter().for_each(|(key, inner)| walk(join(key), inner, out)),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .for_each(|(index, inner)| walk(join(&index.to_string()), inner, out)),
            leaf => {
                out.insert(prefix, leaf.clone());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(String::new(), body, &mut out);
    out
}

/// Paths of the null or blank values in `body`.
pub(crate) fn placeholder_paths(body: &Value) -> Vec<String> {
    leaves(body)
        .into_iter()
        .filter(|(_, value)| match value {
            Value::Null => true,
            Value::String(text) => text.trim().is_empty(),
            _ => false,
        })
        .map(|(path, _)| path)
        .collect()
}

pub(crate) fn assert_no_placeholders(body: &Value) {
    let placeholders = placeholder_paths(body);
    assert!(placeholders.is_empty(), "blank fields {placeholders:?} in {body}");
}

/// Paths whose values differ between two bodies, including paths only one has.
pub(crate) fn differing_paths(first: &Value, second: &Value) -> Vec<String> {
    let first = leaves(first);
    let second = leaves(second);
    let paths: BTreeSet<&String> = first
        .keys()
        .chain(second.keys())
        .filter(|path| first.get(*path) != second.get(*path))
        .collect();
    paths.into_iter().cloned().collect()
}
