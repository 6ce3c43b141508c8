pub mod transformers;


use common_utils::{consts, errors::CustomResult, types::FloatMajorUnit};
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
    flat_mapping::FlatMapping,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_response_types::{GatewayResponse, StandardErrorCode},
    types::Connectors,
};
use error_stack::ResultExt;
use hyperswitch_masking::{Mask, Maskable, PeekInterface};
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2, connector_types,
};
use transformers::{
    self as forte, ForteCancelRequest, ForteCancelResponse, ForteCaptureRequest,
    ForteCaptureResponse, ForteErrorResponse, FortePaymentsRequest, FortePaymentsResponse,
    ForteRefundRequest, ForteRefundResponse,
};

use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const AUTHORIZATION: &str = "Authorization";
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTH_ORG_ID: &str = "X-Forte-Auth-Organization-Id";
}

impl connector_types::ConnectorServiceTrait for Forte {}
impl connector_types::PaymentAuthorizeV2 for Forte {}
impl connector_types::PaymentCapture for Forte {}
impl connector_types::PaymentVoidV2 for Forte {}
impl connector_types::RefundV2 for Forte {}
impl connector_types::PaymentTokenV2 for Forte {}
impl connector_types::PaymentStoreV2 for Forte {}
impl connector_types::PaymentUnstoreV2 for Forte {}
impl connector_types::PaymentVerifyV2 for Forte {}
impl connector_types::PaymentAccessToken for Forte {}

// Verification runs as authorize then void.
impl connector_types::ValidationTrait for Forte {}

impl ConnectorIntegrationV2<PaymentMethodToken, PaymentMethodTokenizationData> for Forte {}
impl ConnectorIntegrationV2<Store, StoreData> for Forte {}
impl ConnectorIntegrationV2<Unstore, UnstoreData> for Forte {}
impl ConnectorIntegrationV2<Verify, VerifyData> for Forte {}
impl ConnectorIntegrationV2<CreateAccessToken, AccessTokenRequestData, AccessTokenResponseData>
    for Forte
{
}

macros::create_all_prerequisites!(
    connector_name: Forte,
    amount_converters: [
        amount_converter: FloatMajorUnit
    ],
    member_functions: {
        pub fn build_headers<F, Req>(
            &self,
            req: &RouterDataV2<F, Req>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            let content_type = ConnectorCommon::common_get_content_type(self);
            let mut common_headers = self.get_auth_header(&req.connector_auth_type)?;
            common_headers.push((
                headers::CONTENT_TYPE.to_string(),
                content_type.to_string().into(),
            ));
            Ok(common_headers)
        }

        pub fn transactions_url<F, Req>(
            &self,
            req: &RouterDataV2<F, Req>,
        ) -> CustomResult<String, errors::ConnectorError> {
            let auth = forte::ForteAuthType::try_from(&req.connector_auth_type)?;
            Ok(format!(
                "{}/organizations/{}/locations/{}/transactions",
                self.base_url(&req.resource_common_data.connectors),
                auth.organization_id.peek(),
                auth.location_id.peek()
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Forte,
    curl_request: Json(FortePaymentsRequest),
    curl_response: FortePaymentsResponse,
    flow_name: Authorize,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Authorize, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            self.transactions_url(req)
        }
    }
);

macros::macro_connector_implementation!(
    connector: Forte,
    curl_request: Json(ForteCaptureRequest),
    curl_response: ForteCaptureResponse,
    flow_name: Capture,
    flow_request: PaymentsCaptureData,
    http_method: Put,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Capture, PaymentsCaptureData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            self.transactions_url(req)
        }
    }
);

macros::macro_connector_implementation!(
    connector: Forte,
    curl_request: Json(ForteCancelRequest),
    curl_response: ForteCancelResponse,
    flow_name: Void,
    flow_request: PaymentVoidData,
    http_method: Put,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Void, PaymentVoidData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}/{}",
                self.transactions_url(req)?,
                req.request.authorization.transaction_id
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Forte,
    curl_request: Json(ForteRefundRequest),
    curl_response: ForteRefundResponse,
    flow_name: Refund,
    flow_request: RefundsData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Refund, RefundsData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            self.transactions_url(req)
        }
    }
);

impl ConnectorCommon for Forte {
    fn id(&self) -> &'static str {
        "forte"
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.forte.base_url.as_ref()
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = forte::ForteAuthType::try_from(auth_type)
            .change_context(errors::ConnectorError::FailedToObtainAuthType)?;
        Ok(vec![
            (
                headers::AUTHORIZATION.to_string(),
                utils::basic_auth_header(&auth.api_access_id, &auth.api_secret_key),
            ),
            (
                headers::AUTH_ORG_ID.to_string(),
                auth.organization_id.into_masked(),
            ),
        ])
    }

    fn build_error_response(
        &self,
        mapping: &FlatMapping,
        status_code: u16,
    ) -> CustomResult<GatewayResponse, errors::ConnectorError> {
        let response: ForteErrorResponse = mapping
            .deserialize("Forte ErrorResponse")
            .unwrap_or_default();
        let error_response = response.response.unwrap_or_default();

        let message = utils::failure_message(self.id(), error_response.response_desc, status_code);
        let code = error_response
            .response_code
            .unwrap_or_else(|| consts::NO_ERROR_CODE.to_string());
        let error_code = match error_response.response_type.as_deref() {
            Some("D") => StandardErrorCode::CardDeclined,
            _ => StandardErrorCode::ProcessingError,
        };
        Ok(GatewayResponse::builder(false, message)
            .params(mapping.flatten())
            .status_code(status_code)
            .connector_error_code(Some(code))
            .error_code(Some(error_code))
            .build())
    }
}
