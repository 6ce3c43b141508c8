pub mod transformers;


use common_utils::{errors::CustomResult, request::RequestContent, types::StringMinorUnit};
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
    router_data_v2::RouterDataV2,
    router_response_types::{GatewayResponse, StandardErrorCode},
    types::Connectors,
};
use error_stack::ResultExt;
use hyperswitch_masking::{Maskable, PeekInterface};
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2, connector_types,
};
use transformers::{
    self as globalpay, GlobalpayAccessTokenRequest, GlobalpayAccessTokenResponse,
    GlobalpayCaptureRequest, GlobalpayCaptureResponse, GlobalpayPaymentsRequest,
    GlobalpayPaymentsResponse, GlobalpayRefundRequest, GlobalpayRefundResponse,
    GlobalpayStoreRequest, GlobalpayStoreResponse, GlobalpayUnstoreResponse,
    GlobalpayVerifyRequest, GlobalpayVerifyResponse, GlobalpayVoidRequest, GlobalpayVoidResponse,
};

use super::macros;
use crate::{types::ResponseRouterData, utils};

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTHORIZATION: &str = "Authorization";
    pub(crate) const X_GP_VERSION: &str = "X-GP-Version";
    pub(crate) const X_GP_IDEMPOTENCY: &str = "X-GP-Idempotency";
}

const API_VERSION: &str = "2021-03-22";

impl connector_types::ConnectorServiceTrait for Globalpay {}
impl connector_types::PaymentAuthorizeV2 for Globalpay {}
impl connector_types::PaymentCapture for Globalpay {}
impl connector_types::PaymentVoidV2 for Globalpay {}
impl connector_types::RefundV2 for Globalpay {}
impl connector_types::PaymentTokenV2 for Globalpay {}
impl connector_types::PaymentStoreV2 for Globalpay {}
impl connector_types::PaymentUnstoreV2 for Globalpay {}
impl connector_types::PaymentVerifyV2 for Globalpay {}
impl connector_types::PaymentAccessToken for Globalpay {}

impl connector_types::ValidationTrait for Globalpay {
    fn should_do_access_token(&self) -> bool {
        true
    }

    fn verify_strategy(&self) -> connector_types::VerifyStrategy {
        connector_types::VerifyStrategy::Native
    }
}

impl ConnectorIntegrationV2<PaymentMethodToken, PaymentMethodTokenizationData> for Globalpay {}

macros::create_all_prerequisites!(
    connector_name: Globalpay,
    amount_converters: [
        amount_converter: StringMinorUnit
    ],
    member_functions: {
        /// Headers of every call made with an access token.
        pub fn build_headers<F, Req>(
            &self,
            req: &RouterDataV2<F, Req>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            let access_token = req
                .resource_common_data
                .get_access_token()
                .attach_printable("globalpay calls need an access token")?;
            Ok(vec![
                (
                    headers::CONTENT_TYPE.to_string(),
                    self.common_get_content_type().to_string().into(),
                ),
                (headers::X_GP_VERSION.to_string(), API_VERSION.to_string().into()),
                (
                    headers::AUTHORIZATION.to_string(),
                    utils::bearer_auth_header(access_token),
                ),
                (
                    headers::X_GP_IDEMPOTENCY.to_string(),
                    req.resource_common_data.context.idempotency_key.clone().into(),
                ),
            ])
        }

        pub fn transaction_url<F, Req>(
            &self,
            req: &RouterDataV2<F, Req>,
            transaction_id: &str,
            action: &str,
        ) -> String {
            format!(
                "{}/transactions/{}/{}",
                self.base_url(&req.resource_common_data.connectors),
                transaction_id,
                action
            )
        }
    }
);

impl ConnectorIntegrationV2<CreateAccessToken, AccessTokenRequestData, AccessTokenResponseData>
    for Globalpay
{
    fn get_headers(
        &self,
        _req: &RouterDataV2<CreateAccessToken, AccessTokenRequestData>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        Ok(vec![
            (
                headers::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            ),
            (headers::X_GP_VERSION.to_string(), API_VERSION.to_string().into()),
        ])
    }

    fn get_url(
        &self,
        req: &RouterDataV2<CreateAccessToken, AccessTokenRequestData>,
    ) -> CustomResult<String, errors::ConnectorError> {
        Ok(format!(
            "{}/accesstoken",
            self.base_url(&req.resource_common_data.connectors)
        ))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<CreateAccessToken, AccessTokenRequestData>,
    ) -> CustomResult<Option<RequestContent>, errors::ConnectorError> {
        let request = GlobalpayAccessTokenRequest::try_from(req)?;
        Ok(Some(RequestContent::Json(Box::new(request))))
    }

    fn handle_response_v2(
        &self,
        req: &RouterDataV2<CreateAccessToken, AccessTokenRequestData>,
        mapping: FlatMapping,
        status_code: u16,
    ) -> CustomResult<AccessTokenResponseData, errors::ConnectorError> {
        let response: GlobalpayAccessTokenResponse = mapping
            .deserialize("GlobalpayAccessTokenResponse")
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;

        tracing::debug!(
            token_type = ?response.type_,
            seconds_to_expire = ?response.seconds_to_expire,
            "globalpay issued an access token"
        );

        AccessTokenResponseData::try_from(ResponseRouterData {
            response,
            router_data: req,
            http_code: status_code,
            params: mapping.flatten(),
        })
    }
}

macros::macro_connector_implementation!(
    connector: Globalpay,
    curl_request: Json(GlobalpayPaymentsRequest),
    curl_response: GlobalpayPaymentsResponse,
    flow_name: Authorize,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Authorize, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}/transactions",
                self.base_url(&req.resource_common_data.connectors)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Globalpay,
    curl_request: Json(GlobalpayCaptureRequest),
    curl_response: GlobalpayCaptureResponse,
    flow_name: Capture,
    flow_request: PaymentsCaptureData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Capture, PaymentsCaptureData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transaction_url(req, &req.request.authorization.transaction_id, "capture"))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Globalpay,
    curl_request: Json(GlobalpayVoidRequest),
    curl_response: GlobalpayVoidResponse,
    flow_name: Void,
    flow_request: PaymentVoidData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Void, PaymentVoidData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transaction_url(req, &req.request.authorization.transaction_id, "reversal"))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Globalpay,
    curl_request: Json(GlobalpayRefundRequest),
    curl_response: GlobalpayRefundResponse,
    flow_name: Refund,
    flow_request: RefundsData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Refund, RefundsData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transaction_url(req, &req.request.authorization.transaction_id, "refund"))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Globalpay,
    curl_request: Json(GlobalpayVerifyRequest),
    curl_response: GlobalpayVerifyResponse,
    flow_name: Verify,
    flow_request: VerifyData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Verify, VerifyData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}/verifications",
                self.base_url(&req.resource_common_data.connectors)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Globalpay,
    curl_request: Json(GlobalpayStoreRequest),
    curl_response: GlobalpayStoreResponse,
    flow_name: Store,
    flow_request: StoreData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Store, StoreData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}/payment-methods",
                self.base_url(&req.resource_common_data.connectors)
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Globalpay,
    curl_response: GlobalpayUnstoreResponse,
    flow_name: Unstore,
    flow_request: UnstoreData,
    http_method: Delete,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Unstore, UnstoreData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}/payment-methods/{}",
                self.base_url(&req.resource_common_data.connectors),
                req.request.reference.peek()
            ))
        }
    }
);

impl ConnectorCommon for Globalpay {
    fn id(&self) -> &'static str {
        "globalpay"
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.globalpay.base_url.as_ref()
    }

    fn build_error_response(
        &self,
        mapping: &FlatMapping,
        status_code: u16,
    ) -> CustomResult<GatewayResponse, errors::ConnectorError> {
        let response: globalpay::GlobalpayErrorResponse = mapping
            .deserialize("GlobalpayErrorResponse")
            .unwrap_or_default();

        let error_code = match (status_code, response.error_code.as_deref()) {
            (401 | 403, _) | (_, Some("NOT_AUTHENTICATED")) | (_, Some("ACTION_NOT_AUTHORIZED")) => {
                StandardErrorCode::ConfigError
            }
            _ => StandardErrorCode::ProcessingError,
        };
        let code = response.detailed_error_code.or(response.error_code);
        Ok(GatewayResponse::builder(
            false,
            utils::failure_message(
                self.id(),
                response.detailed_error_description,
                status_code,
            ),
        )
        .params(mapping.flatten())
        .status_code(status_code)
        .error_code(Some(error_code))
        .connector_error_code(code)
        .build())
    }
}
