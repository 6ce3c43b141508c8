pub mod requests;
pub mod responses;
pub mod transformers;

mod test;

use common_enums::Currency;
use common_utils::{errors::CustomResult, types::StringMinorUnit};
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
use serde::Serialize;

use self::{
    requests::{
        WorldpayxmlCaptureRequest, WorldpayxmlPaymentsRequest, WorldpayxmlRefundRequest,
        WorldpayxmlVoidRequest,
    },
    responses::{
        WorldpayxmlAuthorizeResponse, WorldpayxmlCaptureResponse, WorldpayxmlRefundResponse,
        WorldpayxmlVoidResponse,
    },
    transformers as worldpayxml,
};
use super::macros;
use crate::utils;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTHORIZATION: &str = "Authorization";
}

const CONTENT_TYPE_XML: &str = "text/xml";
const PAYMENT_SERVICE_PATH: &str = "/paymentService.jsp";
const PAYMENT_SERVICE_DOCTYPE: &str = r#"<!DOCTYPE paymentService PUBLIC "-//WorldPay//DTD WorldPay PaymentService v1//EN" "http://dtd.worldpay.com/paymentService_v1.dtd">"#;

impl connector_types::ConnectorServiceTrait for Worldpayxml {}
impl connector_types::PaymentAuthorizeV2 for Worldpayxml {}
impl connector_types::PaymentCapture for Worldpayxml {}
impl connector_types::PaymentVoidV2 for Worldpayxml {}
impl connector_types::RefundV2 for Worldpayxml {}
impl connector_types::PaymentTokenV2 for Worldpayxml {}
impl connector_types::PaymentStoreV2 for Worldpayxml {}
impl connector_types::PaymentUnstoreV2 for Worldpayxml {}
impl connector_types::PaymentVerifyV2 for Worldpayxml {}
impl connector_types::PaymentAccessToken for Worldpayxml {}

impl connector_types::ValidationTrait for Worldpayxml {
    fn purchase_strategy(&self) -> connector_types::PurchaseStrategy {
        connector_types::PurchaseStrategy::AuthorizeThenCapture
    }
}

impl ConnectorIntegrationV2<PaymentMethodToken, PaymentMethodTokenizationData> for Worldpayxml {}
impl ConnectorIntegrationV2<Store, StoreData> for Worldpayxml {}
impl ConnectorIntegrationV2<Unstore, UnstoreData> for Worldpayxml {}
impl ConnectorIntegrationV2<Verify, VerifyData> for Worldpayxml {}
impl ConnectorIntegrationV2<CreateAccessToken, AccessTokenRequestData, AccessTokenResponseData>
    for Worldpayxml
{
}

macros::create_all_prerequisites!(
    connector_name: Worldpayxml,
    amount_converters: [
        amount_converter: StringMinorUnit
    ],
    member_functions: {
        pub fn build_headers<F, Req>(
            &self,
            req: &RouterDataV2<F, Req>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            let mut headers = vec![(
                headers::CONTENT_TYPE.to_string(),
                CONTENT_TYPE_XML.to_string().into(),
            )];
            headers.extend(self.get_auth_header(&req.connector_auth_type)?);
            Ok(headers)
        }

        pub fn payment_service_url<F, Req>(&self, req: &RouterDataV2<F, Req>) -> String {
            format!(
                "{}{}",
                self.base_url(&req.resource_common_data.connectors),
                PAYMENT_SERVICE_PATH
            )
        }

        pub fn xml_document<T: Serialize>(
            &self,
            request: &T,
        ) -> CustomResult<String, errors::ConnectorError> {
            utils::serialize_to_xml_document("paymentService", PAYMENT_SERVICE_DOCTYPE, request)
        }
    }
);

macros::macro_connector_implementation!(
    connector: Worldpayxml,
    curl_request: Xml(WorldpayxmlPaymentsRequest),
    curl_response: WorldpayxmlAuthorizeResponse,
    flow_name: Authorize,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Authorize, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.payment_service_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Worldpayxml,
    curl_request: Xml(WorldpayxmlCaptureRequest),
    curl_response: WorldpayxmlCaptureResponse,
    flow_name: Capture,
    flow_request: PaymentsCaptureData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Capture, PaymentsCaptureData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.payment_service_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Worldpayxml,
    curl_request: Xml(WorldpayxmlVoidRequest),
    curl_response: WorldpayxmlVoidResponse,
    flow_name: Void,
    flow_request: PaymentVoidData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Void, PaymentVoidData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.payment_service_url(req))
        }
    }
);

macros::macro_connector_implementation!(
    connector: Worldpayxml,
    curl_request: Xml(WorldpayxmlRefundRequest),
    curl_response: WorldpayxmlRefundResponse,
    flow_name: Refund,
    flow_request: RefundsData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterDataV2<Refund, RefundsData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.payment_service_url(req))
        }
    }
);

impl ConnectorCommon for Worldpayxml {
    fn id(&self) -> &'static str {
        "worldpayxml"
    }

    fn common_get_content_type(&self) -> &'static str {
        CONTENT_TYPE_XML
    }

    fn common_get_response_format(&self) -> ContentTypeHint {
        ContentTypeHint::Xml
    }

    fn default_currency(&self) -> Currency {
        Currency::GBP
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.worldpayxml.base_url.as_ref()
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = worldpayxml::WorldpayxmlAuthType::try_from(auth_type)
            .change_context(errors::ConnectorError::FailedToObtainAuthType)?;
        Ok(vec![(
            headers::AUTHORIZATION.to_string(),
            utils::basic_auth_header(&auth.api_username, &auth.api_password),
        )])
    }

    fn build_error_response(
        &self,
        mapping: &FlatMapping,
        status_code: u16,
    ) -> CustomResult<GatewayResponse, errors::ConnectorError> {
        // Rejected credentials come back as an HTML page, not a paymentService reply.
        let error = mapping
            .deserialize::<responses::WorldpayxmlResponse>("WorldpayxmlResponse")
            .ok()
            .and_then(|response| response.payment_service.reply.error);
        let error_code = match status_code {
            401 | 403 => StandardErrorCode::ConfigError,
            _ => StandardErrorCode::ProcessingError,
        };
        Ok(GatewayResponse::builder(
            false,
            utils::failure_message(
                self.id(),
                error.as_ref().and_then(responses::WorldpayxmlError::message),
                status_code,
            ),
        )
        .params(mapping.flatten())
        .status_code(status_code)
        .error_code(Some(error_code))
        .connector_error_code(error.as_ref().and_then(responses::WorldpayxmlError::code))
        .build())
    }
}
