#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::expect_used)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use common_enums::{CaptureMethod, Currency};
    use common_utils::{consts, MinorUnit};
    use domain_types::{
        authorization::AuthorizationHandle,
        connector_flow::{Authorize, Capture, Store, Unstore, Verify, Void},
        connector_types::{
            PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, StoreData, UnstoreData,
            VerifyData,
        },
        errors::ConnectorError,
        payment_method_data::PaymentInstrument,
        router_data::ConnectorAuthType,
        router_data_v2::RouterDataV2,
        router_request_types::PaymentOptions,
        router_response_types::StandardErrorCode,
    };
    use external_services::{execute_connector_processing_step, mock::MockTransport};
    use hyperswitch_masking::Secret;

    use crate::{connectors::Nmi, test_support::*};

    const APPROVED: &str = "response=1&responsetext=SUCCESS&authcode=123456&transactionid=6891231&avsresponse=N&cvvresponse=M&orderid=X1&type=sale&response_code=100";

    fn auth() -> ConnectorAuthType {
        ConnectorAuthType::HeaderKey {
            api_key: secret("6457Thfj624V5r7WUwc5v6a68Zsd6YEm"),
        }
    }

    fn form(transport: &MockTransport) -> HashMap<String, String> {
        let body = transport.last_request().unwrap().body.unwrap();
        serde_urlencoded::from_str(&body).unwrap()
    }

    fn purchase(instrument: PaymentInstrument) -> RouterDataV2<Authorize, PaymentsAuthorizeData> {
        let mut data = authorize_data(1000, Currency::USD, CaptureMethod::Automatic);
        data.payment_instrument = instrument;
        router_data(auth(), data)
    }

    pub mod authorize {
        use super::*;

        #[test]
        fn purchase_posts_sale_form() {
            let transport = MockTransport::new();
            transport.respond(200, APPROVED);

            let response = run(Nmi::new(), &transport, &purchase(PaymentInstrument::Card(card())));
            assert!(response.success, "{response:?}");

            let request = transport.last_request().unwrap();
            assert_eq!(request.url, "https://secure.nmi.com/api/transact.php");
            assert_eq!(
                request.header("Content-Type"),
                Some("application/x-www-form-urlencoded")
            );

            let form = form(&transport);
            assert_eq!(form["security_key"], "6457Thfj624V5r7WUwc5v6a68Zsd6YEm");
            assert_eq!(form["type"], "sale");
            assert_eq!(form["amount"], "10.00");
            assert_eq!(form["currency"], "USD");
            assert_eq!(form["orderid"], "X1");
            assert_eq!(form["ccnumber"], "4111111111111111");
            assert_eq!(form["ccexp"], "0930");
            assert_eq!(form["cvv"], "123");
            assert_eq!(form["first_name"], "Jim");
            assert_eq!(form["last_name"], "Smith");
            assert_eq!(form["zip"], "K1C2N6");
            assert!(!form.contains_key("payment_token"));
        }

        #[test]
        fn authorize_only_posts_auth() {
            let transport = MockTransport::new();
            transport.respond(200, APPROVED);
            let router_data: RouterDataV2<Authorize, PaymentsAuthorizeData> =
                router_data(auth(), authorize_data(1000, Currency::USD, CaptureMethod::Manual));

            let response = run(Nmi::new(), &transport, &router_data);
            assert_eq!(form(&transport)["type"], "auth");

            let handle = response.authorization_handle().unwrap();
            assert_eq!(handle.transaction_id, "6891231");
            assert_eq!(handle.secondary_id.as_deref(), Some("123456"));
            assert_eq!(handle.amount, Some(MinorUnit::new(1000)));
            assert_eq!(handle.currency, Some(Currency::USD));
            assert_eq!(response.avs_result.code.as_deref(), Some("N"));
            assert_eq!(response.cvv_result.code.as_deref(), Some("M"));
            assert_eq!(response.params.get("authcode").map(String::as_str), Some("123456"));
        }

        #[test]
        fn token_and_vault_references_replace_card_fields() {
            let transport = MockTransport::new();
            transport.respond(200, APPROVED).respond(200, APPROVED);

            run(
                Nmi::new(),
                &transport,
                &purchase(PaymentInstrument::Token(Secret::new("tok_00ab".to_string()))),
            );
            let token_form = form(&transport);
            assert_eq!(token_form["payment_token"], "tok_00ab");
            assert!(!token_form.contains_key("ccnumber"));

            run(
                Nmi::new(),
                &transport,
                &purchase(PaymentInstrument::StoredReference(Secret::new(
                    "vault_42".to_string(),
                ))),
            );
            let vault_form = form(&transport);
            assert_eq!(vault_form["customer_vault_id"], "vault_42");
            assert!(!vault_form.contains_key("ccexp"));
        }

        #[test]
        fn metadata_becomes_merchant_defined_fields() {
            let transport = MockTransport::new();
            transport.respond(200, APPROVED);
            let mut data = authorize_data(1000, Currency::USD, CaptureMethod::Automatic);
            data.options.metadata = Some(Secret::new(serde_json::json!({"cart": "c_77"})));
            let router_data: RouterDataV2<Authorize, PaymentsAuthorizeData> =
                router_data(auth(), data);

            run(Nmi::new(), &transport, &router_data);
            assert_eq!(form(&transport)["merchant_defined_field_1"], "cart=c_77");
        }

        #[test]
        fn decline_maps_response_code() {
            let transport = MockTransport::new();
            transport.respond(
                200,
                "response=2&responsetext=DECLINE&authcode=&transactionid=6891232&avsresponse=&cvvresponse=&orderid=X1&type=sale&response_code=200",
            );

            let response = run(Nmi::new(), &transport, &purchase(PaymentInstrument::Card(card())));
            assert!(!response.success);
            assert!(response.authorization.is_none());
            assert_eq!(response.message, "DECLINE");
            assert_eq!(response.error_code, Some(StandardErrorCode::CardDeclined));
            assert_eq!(response.connector_error_code.as_deref(), Some("200"));
        }

        #[test]
        fn expired_card_code() {
            let transport = MockTransport::new();
            transport.respond(
                200,
                "response=3&responsetext=Expired+card&transactionid=&response_code=223",
            );

            let response = run(Nmi::new(), &transport, &purchase(PaymentInstrument::Card(card())));
            assert!(!response.success);
            assert_eq!(response.message, "Expired card");
            assert_eq!(response.error_code, Some(StandardErrorCode::ExpiredCard));
        }

        #[test]
        fn empty_body_is_never_success() {
            let transport = MockTransport::new();
            transport.respond(200, "");

            let response = run(Nmi::new(), &transport, &purchase(PaymentInstrument::Card(card())));
            assert!(!response.success);
            assert_eq!(response.message, consts::NO_ERROR_MESSAGE);
        }

        #[test]
        fn garbage_body_is_a_parse_failure() {
            let transport = MockTransport::new();
            transport.respond(200, "<<totally not a form>>");

            let response = run(Nmi::new(), &transport, &purchase(PaymentInstrument::Card(card())));
            assert!(!response.success);
            assert_eq!(response.message, consts::RESPONSE_PARSE_FAILED_MESSAGE);
        }

        #[test]
        fn unconfigured_endpoint_fails_before_sending() {
            let transport = MockTransport::new();
            let mut router_data = purchase(PaymentInstrument::Card(card()));
            router_data.resource_common_data.connectors.nmi.base_url = String::new();

            let error = execute_connector_processing_step(&transport, Nmi::new(), &router_data)
                .unwrap_err();
            assert_eq!(
                error.current_context(),
                &ConnectorError::FailedToObtainIntegrationUrl
            );
            assert_eq!(transport.request_count(), 0);
        }
    }

    pub mod follow_ups {
        use super::*;

        fn handle() -> AuthorizationHandle {
            AuthorizationHandle::new("6891231")
                .with_secondary_id(Some("123456".to_string()))
                .with_amount(MinorUnit::new(1000), Currency::USD)
        }

        #[test]
        fn capture_posts_transaction_id_and_amount() {
            let transport = MockTransport::new();
            transport.respond(
                200,
                "response=1&responsetext=SUCCESS&transactionid=6891231&type=capture&response_code=100",
            );
            let router_data: RouterDataV2<Capture, PaymentsCaptureData> =
                router_data(auth(), capture_data(handle(), 750));

            let response = run(Nmi::new(), &transport, &router_data);
            assert!(response.success);

            let form = form(&transport);
            assert_eq!(form["type"], "capture");
            assert_eq!(form["transactionid"], "6891231");
            assert_eq!(form["amount"], "7.50");
        }

        #[test]
        fn void_posts_transaction_id() {
            let transport = MockTransport::new();
            transport.respond(
                200,
                "response=1&responsetext=Transaction+Void+Successful&transactionid=6891231&type=void&response_code=100",
            );
            let mut data = void_data(handle());
            data.options = PaymentOptions::default().with_connector_field("void_reason", "fraud");
            let router_data: RouterDataV2<Void, PaymentVoidData> = router_data(auth(), data);

            let response = run(Nmi::new(), &transport, &router_data);
            assert!(response.success);
            assert_eq!(response.message, "Transaction Void Successful");

            let form = form(&transport);
            assert_eq!(form["type"], "void");
            assert_eq!(form["transactionid"], "6891231");
            assert_eq!(form["void_reason"], "fraud");
        }
    }

    pub mod vault {
        use super::*;

        #[test]
        fn verify_uses_validate_without_amount() {
            let transport = MockTransport::new();
            transport.respond(
                200,
                "response=1&responsetext=SUCCESS&authcode=&transactionid=6891240&avsresponse=Y&cvvresponse=M&type=validate&response_code=100",
            );
            let router_data: RouterDataV2<Verify, VerifyData> = router_data(
                auth(),
                VerifyData {
                    payment_instrument: PaymentInstrument::Card(card()),
                    currency: Currency::USD,
                    options: options(),
                },
            );

            let response = run(Nmi::new(), &transport, &router_data);
            assert!(response.success);
            assert_eq!(
                response.authorization_handle().unwrap().transaction_id,
                "6891240"
            );

            let form = form(&transport);
            assert_eq!(form["type"], "validate");
            assert!(!form.contains_key("amount"));
        }

        #[test]
        fn store_adds_customer_and_returns_vault_id() {
            let transport = MockTransport::new();
            transport.respond(
                200,
                "response=1&responsetext=Customer+Added&transactionid=&customer_vault_id=1238541097&response_code=100",
            );
            let router_data: RouterDataV2<Store, StoreData> = router_data(
                auth(),
                StoreData {
                    payment_instrument: PaymentInstrument::Card(card()),
                    options: options(),
                },
            );

            let response = run(Nmi::new(), &transport, &router_data);
            assert!(response.success);
            let handle = response.authorization_handle().unwrap();
            assert_eq!(handle.transaction_id, "1238541097");
            assert_eq!(handle.kind.as_deref(), Some("store"));

            let form = form(&transport);
            assert_eq!(form["customer_vault"], "add_customer");
            assert_eq!(form["ccnumber"], "4111111111111111");
            assert!(!form.contains_key("type"));
        }

        #[test]
        fn unstore_deletes_customer() {
            let transport = MockTransport::new();
            transport.respond(
                200,
                "response=1&responsetext=Customer+Deleted&transactionid=&response_code=100",
            );
            let router_data: RouterDataV2<Unstore, UnstoreData> = router_data(
                auth(),
                UnstoreData {
                    reference: secret("1238541097"),
                    options: PaymentOptions::default(),
                },
            );

            let response = run(Nmi::new(), &transport, &router_data);
            assert!(response.success);
            assert!(response.authorization.is_none());

            let form = form(&transport);
            assert_eq!(form["customer_vault"], "delete_customer");
            assert_eq!(form["customer_vault_id"], "1238541097");
        }
    }

    pub mod bodies {
        use domain_types::{connector_flow::Refund, connector_types::RefundsData};

        use super::*;

        fn handle() -> AuthorizationHandle {
            AuthorizationHandle::new("6891231").with_amount(MinorUnit::new(1000), Currency::USD)
        }

        #[test]
        fn every_flow_body_is_filled_in() {
            let capture: RouterDataV2<Capture, PaymentsCaptureData> =
                router_data(auth(), capture_data(handle(), 1000));
            let void: RouterDataV2<Void, PaymentVoidData> = router_data(auth(), void_data(handle()));
            let refund: RouterDataV2<Refund, RefundsData> =
                router_data(auth(), refund_data(handle(), 1000));
            let verify: RouterDataV2<Verify, VerifyData> = router_data(
                auth(),
                VerifyData {
                    payment_instrument: PaymentInstrument::Card(card()),
                    currency: Currency::USD,
                    options: options(),
                },
            );
            let store: RouterDataV2<Store, StoreData> = router_data(
                auth(),
                StoreData {
                    payment_instrument: PaymentInstrument::Card(card()),
                    options: options(),
                },
            );
            let unstore: RouterDataV2<Unstore, UnstoreData> = router_data(
                auth(),
                UnstoreData {
                    reference: secret("1238541097"),
                    options: PaymentOptions::default(),
                },
            );

            let sale = built_body(Nmi::new(), &purchase(PaymentInstrument::Card(card())));
            assert_no_placeholders(&sale);
            assert_eq!(sale["amount"], "10.00");
            assert_no_placeholders(&built_body(Nmi::new(), &capture));
            assert_no_placeholders(&built_body(Nmi::new(), &void));
            assert_no_placeholders(&built_body(Nmi::new(), &refund));
            assert_no_placeholders(&built_body(Nmi::new(), &verify));
            assert_no_placeholders(&built_body(Nmi::new(), &store));
            assert_no_placeholders(&built_body(Nmi::new(), &unstore));
        }
    }
}
