#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use common_enums::{CaptureMethod, Currency};
use common_utils::{consts, request::RequestContent, CustomResult, MinorUnit};
use domain_types::{
    authorization::AuthorizationHandle,
    connector_flow::{Authorize, Void},
    connector_types::{PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData},
    errors::{ApiClientError, ConnectorError},
    flat_mapping::FlatMapping,
    payment_method_data::PaymentInstrument,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::{ContextProvider, PaymentOptions, SystemContextProvider},
    router_response_types::GatewayResponse,
    types::Connectors,
};
use external_services::{execute_connector_processing_step, mock::MockTransport};
use hyperswitch_masking::Secret;
use interfaces::{api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2};

struct Echo;

impl ConnectorCommon for Echo {
    fn id(&self) -> &'static str {
        "echo"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.nmi.base_url.as_ref()
    }
}

impl ConnectorIntegrationV2<Authorize, PaymentsAuthorizeData> for Echo {
    fn get_url(
        &self,
        req: &RouterDataV2<Authorize, PaymentsAuthorizeData>,
    ) -> CustomResult<String, ConnectorError> {
        Ok(format!(
            "{}/pay",
            self.base_url(&req.resource_common_data.connectors)
        ))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<Authorize, PaymentsAuthorizeData>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        let order_id = req.request.options.get_order_id()?;
        Ok(Some(RequestContent::Json(Box::new(serde_json::json!({
            "amount": req.request.amount,
            "order_id": order_id,
        })))))
    }

    fn handle_response_v2(
        &self,
        _req: &RouterDataV2<Authorize, PaymentsAuthorizeData>,
        mapping: FlatMapping,
        status_code: u16,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        if mapping.parse_error {
            return Err(ConnectorError::ResponseDeserializationFailed.into());
        }
        let success = mapping.get_str("status").as_deref() == Some("approved");
        Ok(GatewayResponse::builder(success, mapping.get_str("status").unwrap_or_default())
            .authorization(mapping.get_str("id").map(AuthorizationHandle::new))
            .status_code(status_code)
            .build())
    }
}

impl ConnectorIntegrationV2<Void, PaymentVoidData> for Echo {}

fn authorize_data(options: PaymentOptions) -> RouterDataV2<Authorize, PaymentsAuthorizeData> {
    RouterDataV2::new(
        PaymentFlowData::new(
            Connectors::default(),
            true,
            SystemContextProvider.new_context(),
        ),
        ConnectorAuthType::NoKey,
        PaymentsAuthorizeData {
            amount: MinorUnit::new(1000),
            currency: Currency::USD,
            payment_instrument: PaymentInstrument::Token(Secret::new("tok_1".to_string())),
            capture_method: CaptureMethod::Automatic,
            options,
        },
    )
}

fn options() -> PaymentOptions {
    PaymentOptions::default().with_order_id("X1")
}

#[test]
fn approved_response_maps_to_success() {
    let transport = MockTransport::new();
    transport.respond(200, r#"{"status":"approved","id":"abc123"}"#);

    let outcome = execute_connector_processing_step(&transport, &Echo, &authorize_data(options()))
        .expect("no validation error");
    let response = outcome.expect("transport succeeded");
    assert!(response.success);
    assert_eq!(
        response.authorization_handle().map(|handle| handle.transaction_id),
        Some("abc123".to_string())
    );

    let request = transport.last_request().expect("request sent");
    assert!(request.url.ends_with("/pay"));
    let body = request.json_body().expect("json body");
    assert_eq!(body["amount"], 1000);
    assert_eq!(body["order_id"], "X1");
}

#[test]
fn server_error_is_a_failed_response_not_an_error() {
    let transport = MockTransport::new();
    transport.respond(500, "<html>oops</html>");

    let outcome = execute_connector_processing_step(&transport, &Echo, &authorize_data(options()))
        .expect("no validation error");
    let response = outcome.expect_err("gateway failure");
    assert!(!response.success);
    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.connector_error_code.as_deref(),
        Some("internal_server_error")
    );
    assert!(response.test);
}

#[test]
fn client_error_keeps_gateway_message() {
    let transport = MockTransport::new();
    transport.respond(402, r#"{"message":"Card declined","code":"05"}"#);

    let outcome = execute_connector_processing_step(&transport, &Echo, &authorize_data(options()))
        .expect("no validation error");
    let response = outcome.expect_err("declined");
    assert_eq!(response.message, "Card declined");
    assert_eq!(response.connector_error_code.as_deref(), Some("05"));
}

#[test]
fn unreadable_body_is_a_failed_response() {
    let transport = MockTransport::new();
    transport.respond(200, r#"{"status": "appr"#);

    let outcome = execute_connector_processing_step(&transport, &Echo, &authorize_data(options()))
        .expect("no validation error");
    let response = outcome.expect_err("parse failure");
    assert!(!response.success);
    assert_eq!(response.message, consts::RESPONSE_PARSE_FAILED_MESSAGE);
}

#[test]
fn timeouts_become_failed_responses() {
    let transport = MockTransport::new();
    transport.fail(ApiClientError::RequestTimeoutReceived);

    let outcome = execute_connector_processing_step(&transport, &Echo, &authorize_data(options()))
        .expect("no validation error");
    let response = outcome.expect_err("timeout");
    assert_eq!(response.message, consts::REQUEST_TIMEOUT_MESSAGE);
    assert_eq!(response.status_code, 0);
}

#[test]
fn validation_errors_raise_before_any_request() {
    let transport = MockTransport::new();
    transport.respond(200, r#"{"status":"approved","id":"abc123"}"#);

    let error = execute_connector_processing_step(
        &transport,
        &Echo,
        &authorize_data(PaymentOptions::default()),
    )
    .expect_err("missing order id");
    assert!(matches!(
        error.current_context(),
        ConnectorError::MissingRequiredField {
            field_name: "order_id"
        }
    ));
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn unsupported_flow_raises_before_any_request() {
    let transport = MockTransport::new();
    let router_data = RouterDataV2::<Void, PaymentVoidData>::new(
        PaymentFlowData::new(
            Connectors::default(),
            true,
            SystemContextProvider.new_context(),
        ),
        ConnectorAuthType::NoKey,
        PaymentVoidData {
            authorization: AuthorizationHandle::new("abc123"),
            options: PaymentOptions::default(),
        },
    );

    let error = execute_connector_processing_step(&transport, &Echo, &router_data)
        .expect_err("void is not supported");
    assert!(matches!(
        error.current_context(),
        ConnectorError::FlowNotSupported { .. }
    ));
    assert_eq!(transport.request_count(), 0);
}
