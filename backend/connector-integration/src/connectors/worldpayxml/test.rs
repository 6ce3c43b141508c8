#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::expect_used)]
#[allow(clippy::panic)]
mod tests {
    use common_enums::{CaptureMethod, Currency};
    use common_utils::MinorUnit;
    use domain_types::{
        authorization::AuthorizationHandle,
        connector_flow::{Authorize, Capture, Refund, Store, Void},
        connector_types::{
            PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData, StoreData,
        },
        errors::ConnectorError,
        payment_method_data::PaymentInstrument,
        router_data::ConnectorAuthType,
        router_data_v2::RouterDataV2,
        router_response_types::StandardErrorCode,
    };
    use external_services::{execute_connector_processing_step, mock::MockTransport};

    use crate::{connectors::Worldpayxml, test_support::*};

    const AUTHORISED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE paymentService PUBLIC "-//WorldPay//DTD WorldPay PaymentService v1//EN" "http://dtd.worldpay.com/paymentService_v1.dtd">
<paymentService version="1.4" merchantCode="SPREEDLY">
  <reply>
    <orderStatus orderCode="X1">
      <payment>
        <paymentMethod>VISA-SSL</paymentMethod>
        <amount value="1000" currencyCode="GBP" exponent="2" debitCreditIndicator="credit"/>
        <lastEvent>AUTHORISED</lastEvent>
        <AuthorisationId id="622206"/>
        <CVCResultCode description="C: MATCHED"/>
        <AVSResultCode description="MATCHED"/>
        <balance accountType="IN_PROCESS_AUTHORISED">
          <amount value="1000" currencyCode="GBP" exponent="2" debitCreditIndicator="credit"/>
        </balance>
      </payment>
    </orderStatus>
  </reply>
</paymentService>"#;

    const REFUSED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<paymentService version="1.4" merchantCode="SPREEDLY">
  <reply>
    <orderStatus orderCode="X1">
      <payment>
        <paymentMethod>VISA-SSL</paymentMethod>
        <amount value="1000" currencyCode="GBP" exponent="2" debitCreditIndicator="credit"/>
        <lastEvent>REFUSED</lastEvent>
        <ISO8583ReturnCode code="5" description="REFUSED"/>
        <CVCResultCode description="UNKNOWN"/>
      </payment>
    </orderStatus>
  </reply>
</paymentService>"#;

    fn auth() -> ConnectorAuthType {
        ConnectorAuthType::SignatureKey {
            api_key: secret("SPREEDLYUSER"),
            key1: secret("SPREEDLY"),
            api_secret: secret("s3cr3t"),
        }
    }

    fn handle() -> AuthorizationHandle {
        AuthorizationHandle::new("X1")
            .with_secondary_id(Some("622206".to_string()))
            .with_amount(MinorUnit::new(1000), Currency::GBP)
    }

    fn modification_reply(ack: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<paymentService version="1.4" merchantCode="SPREEDLY">
  <reply>
    <ok>
      <{ack} orderCode="X1">
        <amount value="1000" currencyCode="GBP" exponent="2" debitCreditIndicator="credit"/>
      </{ack}>
    </ok>
  </reply>
</paymentService>"#
        )
    }

    pub mod authorize {
        use super::*;

        #[test]
        fn authorize_posts_order_document() {
            let transport = MockTransport::new();
            transport.respond_with_content_type(200, "text/xml", AUTHORISED);
            let router_data: RouterDataV2<Authorize, PaymentsAuthorizeData> =
                router_data(auth(), authorize_data(1000, Currency::GBP, CaptureMethod::Manual));

            let response = run(Worldpayxml::new(), &transport, &router_data);
            assert!(response.success, "{response:?}");
            assert_eq!(response.message, "AUTHORISED");

            let request = transport.last_request().unwrap();
            assert_eq!(
                request.url,
                "https://secure-test.worldpay.com/jsp/merchant/xml/paymentService.jsp"
            );
            assert_eq!(request.header("Content-Type"), Some("text/xml"));
            assert_eq!(
                request.header("Authorization"),
                Some("Basic U1BSRUVETFlVU0VSOnMzY3IzdA==")
            );

            let body = request.body.unwrap();
            assert!(body.starts_with("<?xml"));
            assert!(body.contains("<!DOCTYPE paymentService PUBLIC"));
            assert!(body.contains(r#"<paymentService version="1.4" merchantCode="SPREEDLY">"#));
            assert!(body.contains(r#"<order orderCode="X1">"#));
            assert!(body.contains("<description>Store Purchase</description>"));
            assert!(body.contains(r#"<amount value="1000" currencyCode="GBP" exponent="2"/>"#));
            assert!(body.contains("<CARD-SSL>"));
            assert!(body.contains("<cardNumber>4111111111111111</cardNumber>"));
            assert!(body.contains(r#"<date month="09" year="2030"/>"#));
            assert!(body.contains("<cardHolderName>Longbob Longsen</cardHolderName>"));
            assert!(body.contains("<postalCode>K1C2N6</postalCode>"));
        }

        #[test]
        fn authorised_reply_builds_handle_and_checks() {
            let transport = MockTransport::new();
            transport.respond_with_content_type(200, "text/xml", AUTHORISED);
            let router_data: RouterDataV2<Authorize, PaymentsAuthorizeData> =
                router_data(auth(), authorize_data(1000, Currency::GBP, CaptureMethod::Manual));

            let response = run(Worldpayxml::new(), &transport, &router_data);
            let handle = response.authorization_handle().unwrap();
            assert_eq!(handle.transaction_id, "X1");
            assert_eq!(handle.secondary_id.as_deref(), Some("622206"));
            assert_eq!(handle.amount, Some(MinorUnit::new(1000)));
            assert_eq!(handle.kind.as_deref(), Some("authorize"));
            assert_eq!(response.avs_result.code.as_deref(), Some("Y"));
            assert_eq!(response.cvv_result.code.as_deref(), Some("M"));
        }

        #[test]
        fn refused_reply_reports_return_code() {
            let transport = MockTransport::new();
            transport.respond_with_content_type(200, "text/xml", REFUSED);
            let router_data: RouterDataV2<Authorize, PaymentsAuthorizeData> =
                router_data(auth(), authorize_data(1000, Currency::GBP, CaptureMethod::Manual));

            let response = run(Worldpayxml::new(), &transport, &router_data);
            assert!(!response.success);
            assert!(response.authorization.is_none());
            assert_eq!(response.message, "REFUSED");
            assert_eq!(response.error_code, Some(StandardErrorCode::CardDeclined));
            assert_eq!(response.connector_error_code.as_deref(), Some("5"));
        }

        #[test]
        fn reply_error_node_is_a_failure() {
            let transport = MockTransport::new();
            transport.respond_with_content_type(
                200,
                "text/xml",
                r#"<paymentService version="1.4" merchantCode="SPREEDLY"><reply><error code="5"><![CDATA[Order has already been paid]]></error></reply></paymentService>"#,
            );
            let router_data: RouterDataV2<Authorize, PaymentsAuthorizeData> =
                router_data(auth(), authorize_data(1000, Currency::GBP, CaptureMethod::Manual));

            let response = run(Worldpayxml::new(), &transport, &router_data);
            assert!(!response.success);
            assert_eq!(response.message, "Order has already been paid");
            assert_eq!(response.connector_error_code.as_deref(), Some("5"));
        }

        #[test]
        fn order_id_is_required() {
            let transport = MockTransport::new();
            let mut data = authorize_data(1000, Currency::GBP, CaptureMethod::Manual);
            data.options.order_id = None;
            let router_data: RouterDataV2<Authorize, PaymentsAuthorizeData> =
                router_data(auth(), data);

            let error =
                execute_connector_processing_step(&transport, Worldpayxml::new(), &router_data)
                    .err()
                    .unwrap();
            assert_eq!(
                error.current_context(),
                &ConnectorError::MissingRequiredField {
                    field_name: "order_id"
                }
            );
            assert_eq!(transport.request_count(), 0);
        }

        #[test]
        fn unauthorized_reply_is_a_config_failure() {
            let transport = MockTransport::new();
            transport.respond_with_content_type(401, "text/html", "<html>Unauthorized</html>");
            let router_data: RouterDataV2<Authorize, PaymentsAuthorizeData> =
                router_data(auth(), authorize_data(1000, Currency::GBP, CaptureMethod::Manual));

            let response = run(Worldpayxml::new(), &transport, &router_data);
            assert!(!response.success);
            assert_eq!(response.status_code, 401);
            assert_eq!(response.error_code, Some(StandardErrorCode::ConfigError));
        }
    }

    pub mod modifications {
        use super::*;

        #[test]
        fn capture_sends_amount_and_reads_ack() {
            let transport = MockTransport::new();
            transport.respond_with_content_type(200, "text/xml", &modification_reply("captureReceived"));
            let router_data: RouterDataV2<Capture, PaymentsCaptureData> =
                router_data(auth(), capture_data(handle(), 1000));

            let response = run(Worldpayxml::new(), &transport, &router_data);
            assert!(response.success, "{response:?}");
            assert_eq!(response.message, "SUCCESS");
            assert_eq!(response.authorization_handle().unwrap().transaction_id, "X1");

            let body = transport.last_request().unwrap().body.unwrap();
            assert!(body.contains(r#"<orderModification orderCode="X1">"#));
            assert!(body.contains("<capture>"));
            assert!(body.contains(r#"<amount value="1000" currencyCode="GBP" exponent="2"/>"#));
        }

        #[test]
        fn void_sends_cancel() {
            let transport = MockTransport::new();
            transport.respond_with_content_type(200, "text/xml", &modification_reply("cancelReceived"));
            let router_data: RouterDataV2<Void, PaymentVoidData> =
                router_data(auth(), void_data(handle()));

            let response = run(Worldpayxml::new(), &transport, &router_data);
            assert!(response.success);

            let body = transport.last_request().unwrap().body.unwrap();
            assert!(body.contains("<cancel/>"));
            assert!(!body.contains("<amount"));
        }

        #[test]
        fn refund_without_ack_fails() {
            let transport = MockTransport::new();
            transport.respond_with_content_type(200, "text/xml", &modification_reply("captureReceived"));
            let router_data: RouterDataV2<Refund, RefundsData> =
                router_data(auth(), refund_data(handle(), 500));

            let response = run(Worldpayxml::new(), &transport, &router_data);
            assert!(!response.success);
            assert!(response.authorization.is_none());

            let body = transport.last_request().unwrap().body.unwrap();
            assert!(body.contains("<refund>"));
            assert!(body.contains(r#"value="500""#));
        }

        #[test]
        fn store_is_not_offered() {
            let transport = MockTransport::new();
            let router_data: RouterDataV2<Store, StoreData> = router_data(
                auth(),
                StoreData {
                    payment_instrument: PaymentInstrument::Card(card()),
                    options: options(),
                },
            );

            let error =
                execute_connector_processing_step(&transport, Worldpayxml::new(), &router_data)
                    .err()
                    .unwrap();
            assert!(matches!(
                error.current_context(),
                ConnectorError::FlowNotSupported { .. }
            ));
            assert_eq!(transport.request_count(), 0);
        }
    }

    pub mod bodies {
        use super::*;

        #[test]
        fn every_flow_body_is_filled_in() {
            let authorize: RouterDataV2<Authorize, PaymentsAuthorizeData> =
                router_data(auth(), authorize_data(1000, Currency::GBP, CaptureMethod::Manual));
            let capture: RouterDataV2<Capture, PaymentsCaptureData> =
                router_data(auth(), capture_data(handle(), 1000));
            let refund: RouterDataV2<Refund, RefundsData> =
                router_data(auth(), refund_data(handle(), 1000));
            let void: RouterDataV2<Void, PaymentVoidData> = router_data(auth(), void_data(handle()));

            assert_no_placeholders(&built_body(Worldpayxml::new(), &authorize));
            assert_no_placeholders(&built_body(Worldpayxml::new(), &capture));
            assert_no_placeholders(&built_body(Worldpayxml::new(), &refund));

            // `<cancel/>` carries no content of its own.
            let blanks = placeholder_paths(&built_body(Worldpayxml::new(), &void));
            assert_eq!(blanks.len(), 1, "{blanks:?}");
            assert!(
                blanks.first().is_some_and(|path| path.ends_with("cancel")),
                "{blanks:?}"
            );
        }
    }
}
