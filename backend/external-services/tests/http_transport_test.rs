#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::{collections::HashMap, time::Duration};

use common_utils::request::{Method, RequestBuilder, RequestContent};
use domain_types::{errors::ApiClientError, types::Proxy};
use external_services::{configs::HttpClientConfig, HttpTransport, Transport};
use hyperswitch_masking::Mask;
use serde::Serialize;
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

#[derive(Serialize)]
struct Sale {
    amount: &'static str,
    security_key: hyperswitch_masking::Secret<String>,
}

#[tokio::test(flavor = "multi_thread")]
async fn form_post_reaches_the_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transact.php"))
        .and(body_string_contains("amount=10.00"))
        .and(body_string_contains("security_key=sk_live"))
        .and(header("x-merchant", "m1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("response=1&transactionid=9876"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/api/transact.php", server.uri());
    let result = tokio::task::spawn_blocking(move || {
        let transport = HttpTransport::default();
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&url)
            .attach_default_headers()
            .headers(vec![("X-Merchant".to_string(), "m1".to_string().into_masked())])
            .set_body(RequestContent::FormUrlEncoded(Box::new(Sale {
                amount: "10.00",
                security_key: hyperswitch_masking::Secret::new("sk_live".to_string()),
            })))
            .build();
        transport.send(request)
    })
    .await
    .expect("blocking task");

    let response = result.expect("sent").expect("2xx");
    assert_eq!(response.status_code, 200);
    assert_eq!(&response.response[..], b"response=1&transactionid=9876");
}

#[tokio::test(flavor = "multi_thread")]
async fn non_2xx_is_a_distinguished_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/payments/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("content-type", "application/json")
                .set_body_string(r#"{"error":{"message":"not found"}}"#),
        )
        .mount(&server)
        .await;

    let url = format!("{}/payments/missing", server.uri());
    let result = tokio::task::spawn_blocking(move || {
        HttpTransport::default().send(RequestBuilder::new().method(Method::Get).url(&url).build())
    })
    .await
    .expect("blocking task");

    let response = result.expect("sent").expect_err("non 2xx");
    assert_eq!(response.status_code, 404);
    assert_eq!(response.content_type(), Some("application/json"));
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_gateway_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let url = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let transport = HttpTransport::new(Proxy::default(), &HttpClientConfig { timeout: 1 });
        transport.send(RequestBuilder::new().method(Method::Post).url(&url).build())
    })
    .await
    .expect("blocking task");

    let error = result.expect_err("timed out");
    assert!(matches!(
        error.current_context(),
        ApiClientError::RequestTimeoutReceived
    ));
}

#[test]
fn invalid_url_is_rejected_before_sending() {
    let result = HttpTransport::default()
        .send(RequestBuilder::new().method(Method::Post).url("not a url").build());
    let error = result.expect_err("bad url");
    assert!(matches!(
        error.current_context(),
        ApiClientError::UrlEncodingFailed
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn not_modified_is_an_unexpected_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;

    let url = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        HttpTransport::default().send(RequestBuilder::new().method(Method::Get).url(&url).build())
    })
    .await
    .expect("blocking task");

    let error = result.expect_err("304 is neither success nor failure");
    assert!(matches!(
        error.current_context(),
        ApiClientError::UnexpectedState
    ));
}

#[test]
fn unserializable_json_body_is_not_sent() {
    // JSON objects only take string keys.
    let body: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
    let result = HttpTransport::default().send(
        RequestBuilder::new()
            .method(Method::Post)
            .url("http://127.0.0.1:9/payments")
            .set_body(RequestContent::Json(Box::new(body)))
            .build(),
    );
    let error = result.expect_err("body cannot be serialized");
    assert!(matches!(
        error.current_context(),
        ApiClientError::BodySerializationFailed
    ));
}
