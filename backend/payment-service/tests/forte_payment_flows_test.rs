#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

mod common;

use common::{card, client, options, secret};
use common_utils::MinorUnit;
use payment_service::{ConnectorAuthType, ConnectorEnum};
use serde_json::json;

fn auth() -> ConnectorAuthType {
    ConnectorAuthType::MultiAuthKey {
        api_key: secret("access_id"),
        key1: secret("300005"),
        api_secret: secret("secure_key"),
        key2: secret("loc_401000"),
    }
}

fn reply(action: &str, response_type: &str, description: &str) -> String {
    json!({
        "transaction_id": "trn_3b8d4e44",
        "location_id": "loc_401000",
        "action": action,
        "authorization_amount": 1.0,
        "authorization_code": "123456",
        "response": {
            "environment": "sandbox",
            "response_type": response_type,
            "response_code": if response_type == "A" { "A01" } else { "U19" },
            "response_desc": description,
            "authorization_code": "123456",
            "avs_result": "Y",
            "cvv_result": "M"
        }
    })
    .to_string()
}

#[test]
fn authorize_then_capture_with_the_returned_handle() {
    let (client, transport) = client(ConnectorEnum::Forte, auth());
    transport
        .respond(201, reply("authorize", "A", "TEST APPROVAL"))
        .respond(200, reply("capture", "A", "TEST APPROVAL"));

    let authorized = client
        .authorize(MinorUnit::new(1000), &card(), &options())
        .unwrap();
    assert!(authorized.success, "{authorized:?}");

    let authorization = authorized.authorization.clone().unwrap();
    let captured = client
        .capture(MinorUnit::new(1000), &authorization, &options())
        .unwrap();
    assert!(captured.success, "{captured:?}");

    let body = transport.last_request().unwrap().json_body().unwrap();
    assert_eq!(body["action"], "capture");
    assert_eq!(body["transaction_id"], "trn_3b8d4e44");
    assert_eq!(body["authorization_code"], "123456");
}

#[test]
fn verify_voids_the_nominal_authorization() {
    let (client, transport) = client(ConnectorEnum::Forte, auth());
    transport
        .respond(201, reply("authorize", "A", "TEST APPROVAL"))
        .respond(200, reply("void", "A", "TEST APPROVAL"));

    let response = client.verify(&card(), &options()).unwrap();
    assert!(response.success, "{response:?}");
    assert_eq!(response.message, "TEST APPROVAL");

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].json_body().unwrap()["authorization_amount"], 1.0);
    assert_eq!(requests[1].json_body().unwrap()["action"], "void");
}

#[test]
fn verify_keeps_the_authorization_payload_when_the_void_fails() {
    let (client, transport) = client(ConnectorEnum::Forte, auth());
    transport
        .respond(201, reply("authorize", "A", "TEST APPROVAL"))
        .respond(200, reply("void", "D", "VOID NOT ALLOWED"));

    let response = client.verify(&card(), &options()).unwrap();
    assert!(!response.success);
    assert_eq!(response.message, "TEST APPROVAL");
    assert_eq!(response.connector_error_code.as_deref(), Some("U19"));
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn declined_verification_never_voids() {
    let (client, transport) = client(ConnectorEnum::Forte, auth());
    transport.respond(201, reply("authorize", "D", "DECLINED"));

    let response = client.verify(&card(), &options()).unwrap();
    assert!(!response.success);
    assert_eq!(response.message, "DECLINED");
    assert_eq!(transport.request_count(), 1);
}
