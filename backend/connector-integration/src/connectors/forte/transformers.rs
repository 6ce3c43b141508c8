use cards::CardNumber;
use common_enums::{CardNetwork, Currency};
use common_utils::types::FloatMajorUnit;
use domain_types::{
    authorization::AuthorizationHandle,
    connector_flow::{Authorize, Capture, Refund, Void},
    connector_types::{PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData},
    errors::ConnectorError,
    payment_method_data::PaymentInstrument,
    router_data::ConnectorAuthType,
    router_response_types::{AvsResult, CvvResult, GatewayResponse, StandardErrorCode},
};
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use super::Forte;
use crate::{
    types::{ConnectorRouterData, ResponseRouterData},
    utils,
};

type Error = error_stack::Report<ConnectorError>;

const CAPTURE: &str = "capture";
const VOID: &str = "void";
const REVERSE: &str = "reverse";

// Auth Struct
pub struct ForteAuthType {
    pub(super) api_access_id: Secret<String>,
    pub(super) organization_id: Secret<String>,
    pub(super) location_id: Secret<String>,
    pub(super) api_secret_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for ForteAuthType {
    type Error = Error;
    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::MultiAuthKey {
                api_key,
                key1,
                api_secret,
                key2,
            } => Ok(Self {
                api_access_id: api_key.to_owned(),
                organization_id: with_prefix("org_", key1),
                location_id: with_prefix("loc_", key2),
                api_secret_key: api_secret.to_owned(),
            }),
            _ => Err(ConnectorError::FailedToObtainAuthType)?,
        }
    }
}

fn with_prefix(prefix: &str, id: &Secret<String>) -> Secret<String> {
    if id.peek().starts_with(prefix) {
        id.to_owned()
    } else {
        Secret::new(format!("{prefix}{}", id.peek()))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ForteAction {
    Sale,
    Authorize,
    Verify,
    Capture,
}

#[derive(Debug, Serialize)]
pub struct FortePaymentsRequest {
    action: ForteAction,
    authorization_amount: FloatMajorUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_number: Option<String>,
    billing_address: BillingAddress,
    card: Card,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BillingAddress {
    first_name: Secret<String>,
    last_name: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct Card {
    card_type: ForteCardType,
    name_on_card: Secret<String>,
    account_number: CardNumber,
    expire_month: Secret<String>,
    expire_year: Secret<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_verification_value: Option<Secret<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForteCardType {
    Visa,
    MasterCard,
    Amex,
    Discover,
    DinersClub,
    Jcb,
}

impl TryFrom<CardNetwork> for ForteCardType {
    type Error = Error;
    fn try_from(issuer: CardNetwork) -> Result<Self, Self::Error> {
        match issuer {
            CardNetwork::AmericanExpress => Ok(Self::Amex),
            CardNetwork::Mastercard => Ok(Self::MasterCard),
            CardNetwork::Discover => Ok(Self::Discover),
            CardNetwork::Visa => Ok(Self::Visa),
            CardNetwork::DinersClub => Ok(Self::DinersClub),
            CardNetwork::JCB => Ok(Self::Jcb),
            CardNetwork::Maestro | CardNetwork::UnionPay => Err(ConnectorError::NotImplemented(
                utils::get_unimplemented_payment_method_error_message("Forte"),
            )
            .into()),
        }
    }
}

fn ensure_usd(currency: Currency) -> Result<(), Error> {
    if currency != Currency::USD {
        return Err(ConnectorError::CurrencyNotSupported {
            message: currency.to_string(),
            connector: "Forte",
        }
        .into());
    }
    Ok(())
}

impl TryFrom<ConnectorRouterData<'_, Forte, Authorize, PaymentsAuthorizeData>>
    for FortePaymentsRequest
{
    type Error = Error;
    fn try_from(
        item: ConnectorRouterData<'_, Forte, Authorize, PaymentsAuthorizeData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        ensure_usd(request.currency)?;
        match &request.payment_instrument {
            PaymentInstrument::Card(ccard) => {
                let action = match request.is_auto_capture() {
                    true => ForteAction::Sale,
                    false => ForteAction::Authorize,
                };
                let card_type = ForteCardType::try_from(ccard.get_card_issuer()?)?;
                let address = request.options.get_billing_address()?;
                let first_name = address.get_first_name()?;
                let billing_address = BillingAddress {
                    first_name: first_name.clone(),
                    last_name: address.get_last_name().unwrap_or(first_name).clone(),
                };
                let name_on_card = match address.get_full_name() {
                    Some(name) => name,
                    None => ccard.get_cardholder_name()?,
                };
                let card = Card {
                    card_type,
                    name_on_card,
                    account_number: ccard.card_number.clone(),
                    expire_month: ccard.card_exp_month.clone(),
                    expire_year: ccard.get_expiry_year_4_digit(),
                    card_verification_value: ccard.card_cvc.clone(),
                };
                let authorization_amount = utils::convert_amount(
                    item.connector.amount_converter,
                    request.amount,
                    request.currency,
                )?;
                Ok(Self {
                    action,
                    authorization_amount,
                    order_number: request.options.order_id.clone(),
                    billing_address,
                    card,
                })
            }
            PaymentInstrument::Token(_) | PaymentInstrument::StoredReference(_) => {
                Err(ConnectorError::NotImplemented(
                    utils::get_unimplemented_payment_method_error_message("Forte"),
                ))?
            }
        }
    }
}

fn get_authorization_code(handle: &AuthorizationHandle) -> Result<String, Error> {
    handle
        .secondary_id
        .clone()
        .ok_or_else(utils::missing_field_err("authorization.secondary_id"))
}

// Capture
#[derive(Debug, Serialize)]
pub struct ForteCaptureRequest {
    action: String,
    transaction_id: String,
    authorization_code: String,
}

impl TryFrom<ConnectorRouterData<'_, Forte, Capture, PaymentsCaptureData>> for ForteCaptureRequest {
    type Error = Error;
    fn try_from(
        item: ConnectorRouterData<'_, Forte, Capture, PaymentsCaptureData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let handle = &request.authorization;
        if handle.amount.is_some_and(|authorized| authorized != request.amount) {
            return Err(ConnectorError::NotSupported {
                message: "Partial capture".to_string(),
                connector: "Forte",
            }
            .into());
        }
        Ok(Self {
            action: CAPTURE.to_string(),
            transaction_id: handle.transaction_id.clone(),
            authorization_code: get_authorization_code(handle)?,
        })
    }
}

// Void
#[derive(Debug, Serialize)]
pub struct ForteCancelRequest {
    action: String,
    authorization_code: String,
}

impl TryFrom<ConnectorRouterData<'_, Forte, Void, PaymentVoidData>> for ForteCancelRequest {
    type Error = Error;
    fn try_from(
        item: ConnectorRouterData<'_, Forte, Void, PaymentVoidData>,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            action: VOID.to_string(),
            authorization_code: get_authorization_code(&item.router_data.request.authorization)?,
        })
    }
}

// Refund
#[derive(Debug, Serialize)]
pub struct ForteRefundRequest {
    action: String,
    authorization_amount: FloatMajorUnit,
    original_transaction_id: String,
    authorization_code: String,
}

impl TryFrom<ConnectorRouterData<'_, Forte, Refund, RefundsData>> for ForteRefundRequest {
    type Error = Error;
    fn try_from(
        item: ConnectorRouterData<'_, Forte, Refund, RefundsData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        ensure_usd(request.currency)?;
        let authorization_amount =
            utils::convert_amount(item.connector.amount_converter, request.amount, request.currency)?;
        Ok(Self {
            action: REVERSE.to_string(),
            authorization_amount,
            original_transaction_id: request.authorization.transaction_id.clone(),
            authorization_code: get_authorization_code(&request.authorization)?,
        })
    }
}

// Responses
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ForteResponseCode {
    A01,
    A05,
    A06,
    U13,
    U14,
    U18,
    U20,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseStatus {
    pub environment: Option<String>,
    pub response_type: Option<String>,
    pub response_code: ForteResponseCode,
    pub response_desc: Option<String>,
    pub authorization_code: Option<String>,
    pub avs_result: Option<String>,
    pub cvv_result: Option<String>,
}

/// Body of every Forte transaction answer, whatever the action.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ForteTransactionResponse {
    pub transaction_id: Option<String>,
    pub original_transaction_id: Option<String>,
    pub location_id: Option<Secret<String>>,
    pub action: Option<String>,
    pub authorization_amount: Option<FloatMajorUnit>,
    pub authorization_code: Option<String>,
    pub entered_by: Option<String>,
    pub response: ResponseStatus,
}

pub type FortePaymentsResponse = ForteTransactionResponse;
pub type ForteCaptureResponse = ForteTransactionResponse;
pub type ForteCancelResponse = ForteTransactionResponse;
pub type ForteRefundResponse = ForteTransactionResponse;

impl ForteTransactionResponse {
    fn is_approved(&self) -> bool {
        self.response.response_code == ForteResponseCode::A01
    }

    fn authorization_code(&self) -> Option<String> {
        self.authorization_code
            .clone()
            .or_else(|| self.response.authorization_code.clone())
    }

    fn error_code(&self) -> Option<StandardErrorCode> {
        if self.is_approved() {
            return None;
        }
        match self.response.response_type.as_deref() {
            Some("D") => Some(StandardErrorCode::CardDeclined),
            _ => Some(StandardErrorCode::ProcessingError),
        }
    }

    /// `handle` is only attached to an approved transaction.
    fn into_gateway_response(
        self,
        handle: Option<AuthorizationHandle>,
        params: std::collections::BTreeMap<String, String>,
        http_code: u16,
    ) -> GatewayResponse {
        let success = self.is_approved() && handle.is_some();
        let message = utils::failure_message("forte", self.response.response_desc.clone(), http_code);
        let error_code = self.error_code();
        let connector_error_code = params
            .get("response.response_code")
            .cloned()
            .filter(|_| !success);
        GatewayResponse::builder(success, message)
            .params(params)
            .authorization(handle.filter(|_| success))
            .avs_result(AvsResult::from_code(self.response.avs_result.as_deref()))
            .cvv_result(CvvResult::from_code(self.response.cvv_result.as_deref()))
            .error_code(error_code)
            .connector_error_code(connector_error_code)
            .status_code(http_code)
            .build()
    }

    fn handle(&self) -> Option<AuthorizationHandle> {
        self.transaction_id
            .as_ref()
            .map(|id| AuthorizationHandle::new(id).with_secondary_id(self.authorization_code()))
    }
}

impl TryFrom<ResponseRouterData<'_, FortePaymentsResponse, Authorize, PaymentsAuthorizeData>>
    for GatewayResponse
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<'_, FortePaymentsResponse, Authorize, PaymentsAuthorizeData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let handle = item.response.handle().map(|handle| {
            handle
                .with_amount(request.amount, request.currency)
                .with_kind(request.handle_kind())
        });
        Ok(item
            .response
            .into_gateway_response(handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, ForteCaptureResponse, Capture, PaymentsCaptureData>>
    for GatewayResponse
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<'_, ForteCaptureResponse, Capture, PaymentsCaptureData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let handle = item.response.handle().map(|handle| {
            handle
                .with_amount(request.amount, request.currency)
                .with_kind(CAPTURE)
        });
        Ok(item
            .response
            .into_gateway_response(handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, ForteCancelResponse, Void, PaymentVoidData>>
    for GatewayResponse
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<'_, ForteCancelResponse, Void, PaymentVoidData>,
    ) -> Result<Self, Self::Error> {
        let original = &item.router_data.request.authorization;
        // A void answer echoes the voided transaction, so fall back to it.
        let handle = item
            .response
            .handle()
            .or_else(|| Some(original.clone()))
            .map(|handle| handle.with_kind(VOID));
        Ok(item
            .response
            .into_gateway_response(handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, ForteRefundResponse, Refund, RefundsData>>
    for GatewayResponse
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<'_, ForteRefundResponse, Refund, RefundsData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let handle = item.response.handle().map(|handle| {
            handle
                .with_amount(request.amount, request.currency)
                .with_kind("refund")
        });
        Ok(item
            .response
            .into_gateway_response(handle, item.params, item.http_code))
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorResponseStatus {
    pub environment: Option<String>,
    pub response_type: Option<String>,
    pub response_code: Option<String>,
    pub response_desc: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ForteErrorResponse {
    pub response: Option<ErrorResponseStatus>,
}
