use std::collections::BTreeMap;

use common_utils::types::MinorUnit;
use domain_types::{
    authorization::AuthorizationHandle,
    connector_flow::{Authorize, Capture, PaymentMethodToken, Refund, Void},
    connector_types::{
        PaymentFlowData, PaymentMethodTokenizationData, PaymentVoidData, PaymentsAuthorizeData,
        PaymentsCaptureData, RefundsData,
    },
    errors,
    payment_method_data::PaymentInstrument,
    router_data::ConnectorAuthType,
    router_request_types::{Address, PaymentOptions},
    router_response_types::{AvsResult, CvvResult, GatewayResponse, StandardErrorCode},
};
use hyperswitch_masking::Secret;

use super::{
    requests::{self, PaysafeAmountRequest},
    responses::{self, PaysafeStatus, PaysafeTransactionResponse},
    Paysafe,
};
use crate::{
    types::{ConnectorRouterData, ResponseRouterData},
    utils,
};

type ConnectorError = error_stack::Report<errors::ConnectorError>;

// Auth Type

#[derive(Debug, Clone)]
pub struct PaysafeAuthType {
    pub username: Secret<String>,
    pub password: Secret<String>,
    pub account_id: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for PaysafeAuthType {
    type Error = ConnectorError;
    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => Ok(Self {
                username: api_key.clone(),
                password: api_secret.clone(),
                account_id: key1.clone(),
            }),
            _ => Err(errors::ConnectorError::FailedToObtainAuthType.into()),
        }
    }
}

// Helper Functions

/// Paysafe wants a reference on every call; the order id when the caller
/// gave one, else the call's nonce.
fn merchant_ref_num(options: &PaymentOptions, flow_data: &PaymentFlowData) -> String {
    options
        .order_id
        .clone()
        .unwrap_or_else(|| flow_data.context.nonce.clone())
}

fn billing_details(address: &Address) -> requests::PaysafeBillingDetails {
    requests::PaysafeBillingDetails {
        nick_name: None,
        street: address.address1.clone(),
        street2: address.address2.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        zip: address.zip.clone(),
        country: address.country.clone(),
    }
}

fn not_supported(message: &str) -> ConnectorError {
    errors::ConnectorError::NotSupported {
        message: message.to_string(),
        connector: "paysafe",
    }
    .into()
}

// PaymentMethodToken flow transformers

impl TryFrom<ConnectorRouterData<'_, Paysafe, PaymentMethodToken, PaymentMethodTokenizationData>>
    for requests::PaysafePaymentHandleRequest
{
    type Error = ConnectorError;

    fn try_from(
        item: ConnectorRouterData<'_, Paysafe, PaymentMethodToken, PaymentMethodTokenizationData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let request = &router_data.request;
        let auth = PaysafeAuthType::try_from(&router_data.connector_auth_type)?;
        let card = match &request.payment_instrument {
            PaymentInstrument::Card(card) => card,
            PaymentInstrument::Token(_) | PaymentInstrument::StoredReference(_) => {
                return Err(not_supported("Tokenizing anything but a card"))
            }
        };
        let amount = request
            .amount
            .ok_or_else(utils::missing_field_err("amount"))?;

        Ok(Self {
            merchant_ref_num: merchant_ref_num(&request.options, &router_data.resource_common_data),
            amount: utils::convert_amount(item.connector.amount_converter, amount, request.currency)?,
            currency_code: request.currency,
            transaction_type: requests::TransactionType::Payment,
            payment_type: requests::PaysafePaymentType::Card,
            card: requests::PaysafeCard {
                card_num: card.card_number.clone(),
                card_expiry: requests::PaysafeCardExpiry {
                    month: card.card_exp_month.clone(),
                    year: card.get_expiry_year_4_digit(),
                },
                cvv: card.card_cvc.clone(),
                holder_name: card.get_cardholder_name().ok(),
            },
            account_id: auth.account_id,
            billing_details: request.options.billing_address.as_ref().map(billing_details),
            customer_ip: request.options.ip.clone(),
        })
    }
}

// Authorize flow transformers

impl TryFrom<ConnectorRouterData<'_, Paysafe, Authorize, PaymentsAuthorizeData>>
    for requests::PaysafePaymentsRequest
{
    type Error = ConnectorError;

    fn try_from(
        item: ConnectorRouterData<'_, Paysafe, Authorize, PaymentsAuthorizeData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let request = &router_data.request;
        let flow_data = &router_data.resource_common_data;
        let payment_handle_token = match &request.payment_instrument {
            PaymentInstrument::Token(token) => token.clone(),
            PaymentInstrument::Card(_) => flow_data.get_payment_method_token()?.clone(),
            PaymentInstrument::StoredReference(_) => {
                return Err(not_supported("Charging a stored reference"))
            }
        };

        Ok(Self {
            merchant_ref_num: merchant_ref_num(&request.options, flow_data),
            amount: utils::convert_amount(
                item.connector.amount_converter,
                request.amount,
                request.currency,
            )?,
            settle_with_auth: request.is_auto_capture(),
            payment_handle_token,
            currency_code: request.currency,
            customer_ip: request.options.ip.clone(),
            description: request.options.description.clone(),
        })
    }
}

fn amount_request(
    connector: &Paysafe,
    options: &PaymentOptions,
    flow_data: &PaymentFlowData,
    amount: MinorUnit,
    currency: common_enums::Currency,
) -> Result<PaysafeAmountRequest, ConnectorError> {
    Ok(PaysafeAmountRequest {
        merchant_ref_num: merchant_ref_num(options, flow_data),
        amount: utils::convert_amount(connector.amount_converter, amount, currency)?,
    })
}

// Capture flow transformers

impl TryFrom<ConnectorRouterData<'_, Paysafe, Capture, PaymentsCaptureData>>
    for requests::PaysafeCaptureRequest
{
    type Error = ConnectorError;

    fn try_from(
        item: ConnectorRouterData<'_, Paysafe, Capture, PaymentsCaptureData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        amount_request(
            item.connector,
            &request.options,
            &item.router_data.resource_common_data,
            request.amount,
            request.currency,
        )
    }
}

// Void flow transformers

impl TryFrom<ConnectorRouterData<'_, Paysafe, Void, PaymentVoidData>>
    for requests::PaysafeVoidRequest
{
    type Error = ConnectorError;

    fn try_from(
        item: ConnectorRouterData<'_, Paysafe, Void, PaymentVoidData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        amount_request(
            item.connector,
            &request.options,
            &item.router_data.resource_common_data,
            request.get_amount()?,
            request.get_currency()?,
        )
    }
}

// Refund flow transformers

impl TryFrom<ConnectorRouterData<'_, Paysafe, Refund, RefundsData>>
    for requests::PaysafeRefundRequest
{
    type Error = ConnectorError;

    fn try_from(
        item: ConnectorRouterData<'_, Paysafe, Refund, RefundsData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        amount_request(
            item.connector,
            &request.options,
            &item.router_data.resource_common_data,
            request.amount,
            request.currency,
        )
    }
}

// Response mapping

fn avs_code(avs_response: &str) -> &'static str {
    match avs_response {
        "MATCH" => "Y",
        "MATCH_ADDRESS_ONLY" => "A",
        "MATCH_ZIP_ONLY" => "Z",
        "NO_MATCH" => "N",
        _ => "U",
    }
}

fn cvv_code(cvv_verification: &str) -> &'static str {
    match cvv_verification {
        "MATCH" => "M",
        "NO_MATCH" => "N",
        "NOT_PROCESSED" => "P",
        _ => "U",
    }
}

pub(super) fn error_code_from_code(code: Option<&str>) -> StandardErrorCode {
    match code {
        Some("3009") | Some("3022") => StandardErrorCode::CardDeclined,
        Some("3006") => StandardErrorCode::ExpiredCard,
        Some("3005") => StandardErrorCode::IncorrectCvc,
        Some("3017") => StandardErrorCode::InvalidNumber,
        Some("3004") => StandardErrorCode::IncorrectZip,
        Some("5279") | Some("5270") => StandardErrorCode::ConfigError,
        _ => StandardErrorCode::ProcessingError,
    }
}

fn gateway_checks(
    gateway_response: Option<&responses::PaysafeGatewayResponse>,
) -> (AvsResult, CvvResult) {
    let avs = gateway_response
        .and_then(|gateway| gateway.avs_response.as_deref())
        .map(avs_code);
    let cvv = gateway_response
        .and_then(|gateway| gateway.cvv_verification.as_deref())
        .map(cvv_code);
    (AvsResult::from_code(avs), CvvResult::from_code(cvv))
}

fn into_gateway_response(
    success: bool,
    status: PaysafeStatus,
    error: Option<&responses::PaysafeError>,
    gateway_response: Option<&responses::PaysafeGatewayResponse>,
    handle: Option<AuthorizationHandle>,
    params: BTreeMap<String, String>,
    http_code: u16,
) -> GatewayResponse {
    let message = match error.and_then(responses::PaysafeError::full_message) {
        Some(message) => message,
        None if success => status.to_string(),
        None => utils::failure_message("paysafe", None, http_code),
    };
    let connector_error_code = error.and_then(|error| error.code.clone());
    let (avs_result, cvv_result) = gateway_checks(gateway_response);
    GatewayResponse::builder(success, message)
        .params(params)
        .authorization(handle.filter(|_| success))
        .avs_result(avs_result)
        .cvv_result(cvv_result)
        .error_code((!success).then(|| error_code_from_code(connector_error_code.as_deref())))
        .connector_error_code(connector_error_code.filter(|_| !success))
        .status_code(http_code)
        .build()
}

impl std::fmt::Display for PaysafeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = serde_json::to_value(self)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default();
        f.write_str(&status)
    }
}

impl PaysafeStatus {
    /// Statuses under which a payment, settlement or refund stands.
    fn is_accepted(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Pending | Self::Received | Self::Processing
        )
    }
}

impl PaysafeTransactionResponse {
    fn is_accepted(&self) -> bool {
        self.status.is_accepted() && self.error.is_none()
    }

    fn into_response(
        self,
        handle: Option<AuthorizationHandle>,
        params: BTreeMap<String, String>,
        http_code: u16,
    ) -> GatewayResponse {
        let success = self.is_accepted() && handle.is_some();
        into_gateway_response(
            success,
            self.status,
            self.error.as_ref(),
            self.gateway_response.as_ref(),
            handle,
            params,
            http_code,
        )
    }
}

impl
    TryFrom<
        ResponseRouterData<
            '_,
            responses::PaysafePaymentMethodTokenResponse,
            PaymentMethodToken,
            PaymentMethodTokenizationData,
        >,
    > for GatewayResponse
{
    type Error = ConnectorError;

    fn try_from(
        item: ResponseRouterData<
            '_,
            responses::PaysafePaymentMethodTokenResponse,
            PaymentMethodToken,
            PaymentMethodTokenizationData,
        >,
    ) -> Result<Self, Self::Error> {
        let response = item.response;
        let success = response.status == PaysafeStatus::Payable && response.error.is_none();
        let handle = response
            .payment_handle_token
            .clone()
            .map(|token| {
                AuthorizationHandle::new(token)
                    .with_secondary_id(response.id.clone())
                    .with_kind("payment_handle")
            });
        Ok(into_gateway_response(
            success && handle.is_some(),
            response.status,
            response.error.as_ref(),
            response.gateway_response.as_ref(),
            handle,
            item.params,
            item.http_code,
        ))
    }
}

impl TryFrom<ResponseRouterData<'_, responses::PaysafeAuthorizeResponse, Authorize, PaymentsAuthorizeData>>
    for GatewayResponse
{
    type Error = ConnectorError;

    fn try_from(
        item: ResponseRouterData<'_, responses::PaysafeAuthorizeResponse, Authorize, PaymentsAuthorizeData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let handle = item.response.id.clone().map(|id| {
            AuthorizationHandle::new(id)
                .with_secondary_id(
                    item.response
                        .gateway_response
                        .as_ref()
                        .and_then(|gateway| gateway.auth_code.clone()),
                )
                .with_amount(request.amount, request.currency)
                .with_kind(request.handle_kind())
        });
        Ok(item.response.into_response(handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, responses::PaysafeCaptureResponse, Capture, PaymentsCaptureData>>
    for GatewayResponse
{
    type Error = ConnectorError;

    fn try_from(
        item: ResponseRouterData<'_, responses::PaysafeCaptureResponse, Capture, PaymentsCaptureData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        // Refunds go against the settlement, voids against the payment.
        let handle = item.response.id.clone().map(|settlement_id| {
            AuthorizationHandle::new(settlement_id)
                .with_secondary_id(Some(request.authorization.transaction_id.clone()))
                .with_amount(request.amount, request.currency)
                .with_kind("capture")
        });
        Ok(item.response.into_response(handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, responses::PaysafeVoidResponse, Void, PaymentVoidData>>
    for GatewayResponse
{
    type Error = ConnectorError;

    fn try_from(
        item: ResponseRouterData<'_, responses::PaysafeVoidResponse, Void, PaymentVoidData>,
    ) -> Result<Self, Self::Error> {
        let authorization = &item.router_data.request.authorization;
        let handle = Some(
            AuthorizationHandle::new(
                item.response
                    .id
                    .clone()
                    .unwrap_or_else(|| authorization.transaction_id.clone()),
            )
            .with_secondary_id(Some(authorization.transaction_id.clone()))
            .with_kind("void"),
        );
        Ok(item.response.into_response(handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, responses::PaysafeRefundResponse, Refund, RefundsData>>
    for GatewayResponse
{
    type Error = ConnectorError;

    fn try_from(
        item: ResponseRouterData<'_, responses::PaysafeRefundResponse, Refund, RefundsData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let handle = item.response.id.clone().map(|refund_id| {
            AuthorizationHandle::new(refund_id)
                .with_secondary_id(Some(request.authorization.transaction_id.clone()))
                .with_amount(request.amount, request.currency)
                .with_kind("refund")
        });
        Ok(item.response.into_response(handle, item.params, item.http_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_checks_map_to_network_codes() {
        assert_eq!(avs_code("MATCH_ZIP_ONLY"), "Z");
        assert_eq!(avs_code("NOT_PROCESSED"), "U");
        assert_eq!(cvv_code("NOT_PROCESSED"), "P");
        assert_eq!(cvv_code("SOMETHING_ELSE"), "U");
    }

    #[test]
    fn statuses_render_as_sent() {
        assert_eq!(PaysafeStatus::Completed.to_string(), "COMPLETED");
        assert!(PaysafeStatus::Received.is_accepted());
        assert!(!PaysafeStatus::Failed.is_accepted());
    }

    #[test]
    fn error_codes() {
        assert_eq!(
            error_code_from_code(Some("3022")),
            StandardErrorCode::CardDeclined
        );
        assert_eq!(
            error_code_from_code(Some("3005")),
            StandardErrorCode::IncorrectCvc
        );
        assert_eq!(error_code_from_code(None), StandardErrorCode::ProcessingError);
    }
}
