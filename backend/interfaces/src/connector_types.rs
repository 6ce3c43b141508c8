use domain_types::{
    connector_flow,
    connector_types::{
        AccessTokenRequestData, AccessTokenResponseData, PaymentMethodTokenizationData,
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData, StoreData,
        UnstoreData, VerifyData,
    },
    payment_method_data::PaymentInstrument,
    router_response_types::GatewayResponse,
};

use crate::{api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2};

pub trait ConnectorServiceTrait:
    ConnectorCommon
    + ValidationTrait
    + PaymentAuthorizeV2
    + PaymentCapture
    + PaymentVoidV2
    + RefundV2
    + PaymentTokenV2
    + PaymentStoreV2
    + PaymentUnstoreV2
    + PaymentVerifyV2
    + PaymentAccessToken
{
}

pub type BoxedConnector = Box<&'static (dyn ConnectorServiceTrait + Send + Sync)>;

/// How a connector performs a purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseStrategy {
    /// One authorize call with automatic capture.
    Native,
    /// Authorize, then capture the returned handle.
    AuthorizeThenCapture,
}

/// How a connector checks a card without charging it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyStrategy {
    /// The gateway has a dedicated verification call.
    Native,
    /// Authorize a nominal amount, then void it.
    AuthorizeThenVoid,
}

/// Decisions that shape the sequence of calls a verb makes.
pub trait ValidationTrait {
    fn should_do_access_token(&self) -> bool {
        false
    }

    fn should_do_payment_method_token(&self, _instrument: &PaymentInstrument) -> bool {
        false
    }

    fn purchase_strategy(&self) -> PurchaseStrategy {
        PurchaseStrategy::Native
    }

    fn verify_strategy(&self) -> VerifyStrategy {
        VerifyStrategy::AuthorizeThenVoid
    }

    /// Whether a failed response means the access token has to be refreshed.
    fn is_access_token_expired(&self, response: &GatewayResponse) -> bool {
        response.status_code == 401
    }
}

pub trait PaymentAuthorizeV2:
    ConnectorIntegrationV2<connector_flow::Authorize, PaymentsAuthorizeData>
{
}

pub trait PaymentCapture:
    ConnectorIntegrationV2<connector_flow::Capture, PaymentsCaptureData>
{
}

pub trait PaymentVoidV2: ConnectorIntegrationV2<connector_flow::Void, PaymentVoidData> {}

pub trait RefundV2: ConnectorIntegrationV2<connector_flow::Refund, RefundsData> {}

pub trait PaymentTokenV2:
    ConnectorIntegrationV2<connector_flow::PaymentMethodToken, PaymentMethodTokenizationData>
{
}

pub trait PaymentStoreV2: ConnectorIntegrationV2<connector_flow::Store, StoreData> {}

pub trait PaymentUnstoreV2: ConnectorIntegrationV2<connector_flow::Unstore, UnstoreData> {}

pub trait PaymentVerifyV2: ConnectorIntegrationV2<connector_flow::Verify, VerifyData> {}

pub trait PaymentAccessToken:
    ConnectorIntegrationV2<
    connector_flow::CreateAccessToken,
    AccessTokenRequestData,
    AccessTokenResponseData,
>
{
}
