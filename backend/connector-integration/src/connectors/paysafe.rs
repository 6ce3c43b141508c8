pub mod requests;
pub mod responses;
pub mod transformers;


use common_utils::{consts, errors::CustomResult, types::MinorUnit};
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
    payment_method_data::PaymentInstrument,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_response_types::{GatewayResponse, StandardErrorCode},
    types::Connectors,
};
use error_stack::ResultExt;
use hyperswitch_masking::Maskable;
use interfaces::{
    api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2, connector_types,
};

use self::{
    requests::{
        PaysafeCaptureRequest, PaysafePaymentHandleRequest, PaysafePaymentsRequest,
        PaysafeRefundRequest, PaysafeVoidRequest,
    },
    responses::{
        PaysafeAuthorizeResponse, PaysafeCaptureResponse, PaysafeErrorResponse,
        PaysafePaymentMethodTokenResponse, PaysafeRefundResponse, PaysafeVoidResponse,
    },
    transformers as paysafe,
};
use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTHORIZATION: &str = "Authorization";
}

impl connector_types::ConnectorServiceTrait for Paysafe {}
impl connector_types::PaymentAuthorizeV2 for Paysafe {}
impl connector_types::PaymentCapture for Paysafe {}
impl connector_types::PaymentVoidV2 for Paysafe {}
impl connector_types::RefundV2 for Paysafe {}
impl connector_types::PaymentTokenV2 for Paysafe {}
impl connector_types::PaymentStoreV2 for Paysafe {}
impl connector_types::PaymentUnstoreV2 for Paysafe {}
impl connector_types::PaymentVerifyV2 for Paysafe {}
impl connector_types::PaymentAccessToken for Paysafe {}

impl connector_types::ValidationTrait for Paysafe {
    /// Raw cards become a single use payment handle before any payment call.
    fn should_do_payment_method_token(&self, instrument: &PaymentInstrument) -> bool {
        matches!(instrument, PaymentInstrument::Card(_))
    }
}

impl ConnectorIntegrationV2<Store, StoreData> for Paysafe {}
impl ConnectorIntegrationV2<Unstore, UnstoreData> for Paysafe {}
impl ConnectorIntegrationV2<Verify, VerifyData> for Paysafe {}
impl ConnectorIntegrationV2<CreateAccessToken, AccessTokenRequestData, AccessTokenResponseData>
    for Paysafe
{
}

macros::create_all_prerequisites!(
    connector_name: Paysafe,
    amount_converters: [
        amount_converter: MinorUnit
    ],
    member_functions: {
        pub fn build_headers<F, Req>(
            &self,
            req: &RouterDataV2<F, Req>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            let mut header = vec![(
                headers::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            )];
            let mut api_key = self.get_auth_header(&req.connector_auth_type)?;
            header.append(&mut api_key);
            Ok(header)
        }

        pub fn api_url<F, Req>(&self, req: &RouterDataV2<F, Req>, path: &str) -> String {
            format!(
                "{}/v1/{}",
                self.base_url(&req.resource_common_data.connectors),
                path
            )
        }
    }
);

macros::macro_connector_implementation!(
    connector: Paysafe,
    curl_request: Json(PaysafePaymentHandleRequest),
    curl_response: PaysafePaymentMethodTokenResponse,
    flow_name: PaymentMethodToken,
    flow_request: PaymentMethodTokenizationData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<PaymentMethodToken, PaymentMethodTokenizationData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.api_url(req, "paymenthandles"))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Paysafe,
    curl_request: Json(PaysafePaymentsRequest),
    curl_response: PaysafeAuthorizeResponse,
    flow_name: Authorize,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Authorize, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.api_url(req, "payments"))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Paysafe,
    curl_request: Json(PaysafeCaptureRequest),
    curl_response: PaysafeCaptureResponse,
    flow_name: Capture,
    flow_request: PaymentsCaptureData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Capture, PaymentsCaptureData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.api_url(
                req,
                &format!("payments/{}/settlements", req.request.authorization.transaction_id),
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Paysafe,
    curl_request: Json(PaysafeVoidRequest),
    curl_response: PaysafeVoidResponse,
    flow_name: Void,
    flow_request: PaymentVoidData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Void, PaymentVoidData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.api_url(
                req,
                &format!("payments/{}/voidauths", req.request.authorization.transaction_id),
            ))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Paysafe,
    curl_request: Json(PaysafeRefundRequest),
    curl_response: PaysafeRefundResponse,
    flow_name: Refund,
    flow_request: RefundsData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Refund, RefundsData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.api_url(
                req,
                &format!("settlements/{}/refunds", req.request.authorization.transaction_id),
            ))
        }
    }
);

impl ConnectorCommon for Paysafe {
    fn id(&self) -> &'static str {
        "paysafe"
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.paysafe.base_url.as_ref()
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = paysafe::PaysafeAuthType::try_from(auth_type)
            .change_context(errors::ConnectorError::FailedToObtainAuthType)?;
        Ok(vec![(
            headers::AUTHORIZATION.to_string(),
            utils::basic_auth_header(&auth.username, &auth.password),
        )])
    }

    fn build_error_response(
        &self,
        mapping: &FlatMapping,
        status_code: u16,
    ) -> CustomResult<GatewayResponse, errors::ConnectorError> {
        let response: PaysafeErrorResponse = mapping
            .deserialize("PaysafeErrorResponse")
            .unwrap_or_default();
        let error = response.error.unwrap_or_default();

        let field_error = error
            .field_errors
            .first()
            .and_then(|field_error| field_error.error.clone());
        let message = match (error.full_message(), field_error) {
            (Some(message), Some(field)) => Some(format!("{message} ({field})")),
            (message, field) => message.or(field),
        };
        let error_code = match status_code {
            401 | 403 => StandardErrorCode::ConfigError,
            _ => paysafe::error_code_from_code(error.code.as_deref()),
        };
        Ok(GatewayResponse::builder(
            false,
            utils::failure_message(self.id(), message, status_code),
        )
        .params(mapping.flatten())
        .status_code(status_code)
        .error_code(Some(error_code))
        .connector_error_code(Some(
            error
                .code
                .unwrap_or_else(|| consts::NO_ERROR_CODE.to_string()),
        ))
        .build())
    }
}
