#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

mod common;

use std::{collections::HashMap, sync::Arc};

use common::{card, client, options, secret};
use common_utils::MinorUnit;
use domain_types::payment_method_data::PaymentInstrument;
use external_services::{
    configs::Config,
    mock::{MockTransport, RecordedRequest},
};
use payment_service::{ConnectorAuthType, ConnectorEnum, PaymentClient};

const APPROVED: &str = "response=1&responsetext=SUCCESS&authcode=123456&transactionid=6891231&avsresponse=N&cvvresponse=M&orderid=X1&type=sale&response_code=100";

fn auth() -> ConnectorAuthType {
    ConnectorAuthType::HeaderKey {
        api_key: secret("6457Thfj624V5r7WUwc5v6a68Zsd6YEm"),
    }
}

fn form(request: &RecordedRequest) -> HashMap<String, String> {
    serde_urlencoded::from_str(request.body.as_deref().unwrap()).unwrap()
}

#[test]
fn purchase_is_a_single_sale() {
    let (client, transport) = client(ConnectorEnum::Nmi, auth());
    transport.respond(200, APPROVED);

    let response = client
        .purchase(MinorUnit::new(1000), &card(), &options())
        .unwrap();
    assert!(response.success, "{response:?}");
    assert_eq!(response.message, "SUCCESS");
    assert!(response.test);
    assert_eq!(
        response.authorization_handle().unwrap().transaction_id,
        "6891231"
    );

    let request = transport.last_request().unwrap();
    assert!(request.url.ends_with("/api/transact.php"));
    let form = form(&request);
    assert_eq!(form["type"], "sale");
    assert_eq!(form["amount"], "10.00");
    assert_eq!(form["security_key"], "6457Thfj624V5r7WUwc5v6a68Zsd6YEm");
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn verify_is_native() {
    let (client, transport) = client(ConnectorEnum::Nmi, auth());
    transport.respond(
        200,
        "response=1&responsetext=SUCCESS&authcode=&transactionid=6891240&avsresponse=Y&cvvresponse=M&type=validate&response_code=100",
    );

    let response = client.verify(&card(), &options()).unwrap();
    assert!(response.success, "{response:?}");
    assert_eq!(transport.request_count(), 1);

    let form = form(&transport.last_request().unwrap());
    assert_eq!(form["type"], "validate");
    assert!(!form.contains_key("amount"));
}

#[test]
fn stored_reference_can_be_charged_then_removed() {
    let (client, transport) = client(ConnectorEnum::Nmi, auth());
    transport
        .respond(
            200,
            "response=1&responsetext=Customer+Added&transactionid=&customer_vault_id=1238541097&response_code=100",
        )
        .respond(200, APPROVED)
        .respond(
            200,
            "response=1&responsetext=Customer+Deleted&transactionid=&response_code=100",
        );

    let stored = client.store(&card(), &options()).unwrap();
    assert!(stored.success, "{stored:?}");
    let reference = stored.authorization_handle().unwrap().transaction_id;
    assert_eq!(reference, "1238541097");

    let charged = client
        .purchase(
            MinorUnit::new(1000),
            &PaymentInstrument::StoredReference(secret(&reference)),
            &options(),
        )
        .unwrap();
    assert!(charged.success, "{charged:?}");

    let removed = client.unstore(&reference, &options()).unwrap();
    assert!(removed.success, "{removed:?}");

    let requests = transport.requests();
    assert_eq!(form(&requests[1])["customer_vault_id"], "1238541097");
    assert!(!form(&requests[1]).contains_key("ccnumber"));
    assert_eq!(form(&requests[2])["customer_vault"], "delete_customer");
}

#[test]
fn decline_carries_the_gateway_code() {
    let (client, transport) = client(ConnectorEnum::Nmi, auth());
    transport.respond(
        200,
        "response=2&responsetext=DECLINE&authcode=&transactionid=6891232&avsresponse=N&cvvresponse=N&orderid=X1&type=sale&response_code=200",
    );

    let response = client
        .purchase(MinorUnit::new(1000), &card(), &options())
        .unwrap();
    assert!(!response.success);
    assert_eq!(response.message, "DECLINE");
    assert_eq!(response.connector_error_code.as_deref(), Some("200"));
    assert!(response.authorization.is_none());
}

#[test]
fn blank_reference_is_rejected_before_sending() {
    let (client, transport) = client(ConnectorEnum::Nmi, auth());
    assert!(client.unstore("  ", &options()).is_err());
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn live_accounts_are_not_flagged_as_test() {
    let (client, transport) = client(ConnectorEnum::Nmi, auth());
    transport.respond(200, APPROVED);

    let response = client
        .with_test_mode(false)
        .purchase(MinorUnit::new(1000), &card(), &options())
        .unwrap();
    assert!(response.success);
    assert!(!response.test);
}

#[test]
fn configured_endpoint_replaces_the_sandbox() {
    let mut config = Config::default();
    config.connectors.nmi.base_url = "http://localhost:9000".to_string();
    let transport = Arc::new(MockTransport::new());
    transport.respond(200, APPROVED);

    let client = PaymentClient::from_config(&config, ConnectorEnum::Nmi, auth())
        .with_transport(transport.clone());
    let response = client
        .purchase(MinorUnit::new(1000), &card(), &options())
        .unwrap();
    assert!(response.success, "{response:?}");
    assert_eq!(
        transport.last_request().unwrap().url,
        "http://localhost:9000/api/transact.php"
    );
}
