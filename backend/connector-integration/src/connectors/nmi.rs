pub mod transformers;

mod test;

use common_utils::{errors::CustomResult, types::StringMajorUnit};
use domain_types::{
    connector_flow::{
        Authorize, Capture, CreateAccessToken, PaymentMethodToken, Refund, Store, Unstore, Verify,
        Void,
    },
    connector_types::{
        AccessTokenRequestData, AccessTokenResponseData, PaymentMethodTokenizationData,
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData, StoreData,
        UnstoreData, VerifyData,
    },
    errors,
    flat_mapping::{ContentTypeHint, FlatMapping},
    router_data_v2::RouterDataV2,
    router_response_types::GatewayResponse,
    types::Connectors,
};
use hyperswitch_masking::Maskable;
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2, connector_types,
};
use transformers::{
    NmiCaptureRequest, NmiCaptureResponse, NmiErrorResponse, NmiPaymentsRequest,
    NmiPaymentsResponse, NmiRefundRequest, NmiRefundResponse, NmiStoreRequest, NmiStoreResponse,
    NmiUnstoreRequest, NmiUnstoreResponse, NmiValidateRequest, NmiValidateResponse,
    NmiVoidRequest, NmiVoidResponse,
};

use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
}

pub(crate) mod endpoints {
    pub(crate) const TRANSACT: &str = "/api/transact.php";
}

// ===== CONNECTOR SERVICE TRAIT IMPLEMENTATIONS =====
impl connector_types::ConnectorServiceTrait for Nmi {}
impl connector_types::PaymentAuthorizeV2 for Nmi {}
impl connector_types::PaymentCapture for Nmi {}
impl connector_types::PaymentVoidV2 for Nmi {}
impl connector_types::RefundV2 for Nmi {}
impl connector_types::PaymentTokenV2 for Nmi {}
impl connector_types::PaymentStoreV2 for Nmi {}
impl connector_types::PaymentUnstoreV2 for Nmi {}
impl connector_types::PaymentVerifyV2 for Nmi {}
impl connector_types::PaymentAccessToken for Nmi {}

impl connector_types::ValidationTrait for Nmi {
    fn verify_strategy(&self) -> connector_types::VerifyStrategy {
        connector_types::VerifyStrategy::Native
    }
}

// ===== NOT SUPPORTED FLOWS =====
impl ConnectorIntegrationV2<PaymentMethodToken, PaymentMethodTokenizationData> for Nmi {}
impl ConnectorIntegrationV2<CreateAccessToken, AccessTokenRequestData, AccessTokenResponseData>
    for Nmi
{
}

macros::create_all_prerequisites!(
    connector_name: Nmi,
    amount_converters: [
        amount_converter: StringMajorUnit
    ],
    member_functions: {
        pub fn build_headers<F, Req>(
            &self,
            _req: &RouterDataV2<F, Req>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            // The security key travels in the body.
            Ok(vec![(
                headers::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            )])
        }

        pub fn transact_url<F, Req>(&self, req: &RouterDataV2<F, Req>) -> String {
            format!(
                "{}{}",
                self.base_url(&req.resource_common_data.connectors),
                endpoints::TRANSACT
            )
        }
    }
);

// ===== AUTHORIZE FLOW =====
macros::macro_connector_implementation!(
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiPaymentsRequest),
    curl_response: NmiPaymentsResponse,
    flow_name: Authorize,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Authorize, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// ===== CAPTURE FLOW =====
macros::macro_connector_implementation!(
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiCaptureRequest),
    curl_response: NmiCaptureResponse,
    flow_name: Capture,
    flow_request: PaymentsCaptureData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Capture, PaymentsCaptureData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// ===== VOID FLOW =====
macros::macro_connector_implementation!(
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiVoidRequest),
    curl_response: NmiVoidResponse,
    flow_name: Void,
    flow_request: PaymentVoidData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Void, PaymentVoidData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// ===== REFUND FLOW =====
macros::macro_connector_implementation!(
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiRefundRequest),
    curl_response: NmiRefundResponse,
    flow_name: Refund,
    flow_request: RefundsData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Refund, RefundsData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// ===== VERIFY FLOW =====
macros::macro_connector_implementation!(
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiValidateRequest),
    curl_response: NmiValidateResponse,
    flow_name: Verify,
    flow_request: VerifyData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Verify, VerifyData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// ===== CUSTOMER VAULT FLOWS =====
macros::macro_connector_implementation!(
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiStoreRequest),
    curl_response: NmiStoreResponse,
    flow_name: Store,
    flow_request: StoreData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Store, StoreData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiUnstoreRequest),
    curl_response: NmiUnstoreResponse,
    flow_name: Unstore,
    flow_request: UnstoreData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Unstore, UnstoreData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// ===== CONNECTOR COMMON IMPLEMENTATION =====
impl ConnectorCommon for Nmi {
    fn id(&self) -> &'static str {
        "nmi"
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/x-www-form-urlencoded"
    }

    fn common_get_response_format(&self) -> ContentTypeHint {
        ContentTypeHint::QueryString
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.nmi.base_url.as_ref()
    }

    fn build_error_response(
        &self,
        mapping: &FlatMapping,
        status_code: u16,
    ) -> CustomResult<GatewayResponse, errors::ConnectorError> {
        let response: NmiErrorResponse = mapping
            .deserialize("NmiErrorResponse")
            .unwrap_or_default();
        let error_code = response
            .response_code
            .as_deref()
            .map(transformers::error_code_from_response_code);
        Ok(GatewayResponse::builder(
            false,
            utils::failure_message(self.id(), response.responsetext, status_code),
        )
        .params(mapping.flatten())
        .status_code(status_code)
        .error_code(error_code)
        .connector_error_code(response.response_code)
        .build())
    }
}
