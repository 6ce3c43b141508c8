use std::collections::BTreeMap;

use common_utils::{
    crypto::{self, Sha512},
    types::StringMinorUnit,
};
use domain_types::{
    authorization::AuthorizationHandle,
    connector_flow::{Authorize, Capture, CreateAccessToken, Refund, Store, Unstore, Verify, Void},
    connector_types::{
        AccessTokenRequestData, AccessTokenResponseData, PaymentFlowData, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, RefundsData, StoreData, UnstoreData,
        VerifyData,
    },
    errors,
    payment_method_data::{Card, PaymentInstrument},
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::PaymentOptions,
    router_response_types::{AvsResult, CvvResult, GatewayResponse, StandardErrorCode},
};
use error_stack::ResultExt;
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use super::Globalpay;
use crate::{
    types::{ConnectorRouterData, ResponseRouterData},
    utils,
};

type Error = error_stack::Report<errors::ConnectorError>;

const ACCOUNT_NAME: &str = "transaction_processing";
const TOKENIZATION_ACCOUNT_NAME: &str = "tokenization";
const DEFAULT_COUNTRY: &str = "US";

#[derive(Debug, Clone)]
pub struct GlobalpayAuthType {
    pub app_id: Secret<String>,
    pub app_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for GlobalpayAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self {
                app_id: api_key.to_owned(),
                app_key: key1.to_owned(),
            }),
            _ => Err(error_stack::report!(
                errors::ConnectorError::FailedToObtainAuthType
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalpayErrorResponse {
    pub error_code: Option<String>,
    pub detailed_error_code: Option<String>,
    pub detailed_error_description: Option<String>,
}

// ===== OAUTH / ACCESS TOKEN FLOW STRUCTURES =====

#[derive(Debug, Serialize)]
pub struct GlobalpayAccessTokenRequest {
    pub app_id: Secret<String>,
    pub nonce: String,
    pub secret: Secret<String>,
    pub grant_type: String,
}

impl TryFrom<&RouterDataV2<CreateAccessToken, AccessTokenRequestData>>
    for GlobalpayAccessTokenRequest
{
    type Error = Error;

    fn try_from(
        item: &RouterDataV2<CreateAccessToken, AccessTokenRequestData>,
    ) -> Result<Self, Self::Error> {
        let auth = GlobalpayAuthType::try_from(&item.connector_auth_type)?;
        let nonce = item.resource_common_data.context.nonce.clone();

        // secret = hex(SHA512(nonce + app_key))
        let secret = crypto::hex_digest(
            &Sha512,
            format!("{nonce}{}", auth.app_key.peek()).as_bytes(),
        )
        .change_context(errors::ConnectorError::RequestEncodingFailed)?;

        Ok(Self {
            app_id: auth.app_id,
            nonce,
            secret: Secret::new(secret),
            grant_type: if item.request.grant_type.is_empty() {
                "client_credentials".to_string()
            } else {
                item.request.grant_type.clone()
            },
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GlobalpayAccessTokenResponse {
    pub token: Secret<String>,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub seconds_to_expire: Option<i64>,
}

impl
    TryFrom<
        ResponseRouterData<
            '_,
            GlobalpayAccessTokenResponse,
            CreateAccessToken,
            AccessTokenRequestData,
        >,
    > for AccessTokenResponseData
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<
            '_,
            GlobalpayAccessTokenResponse,
            CreateAccessToken,
            AccessTokenRequestData,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            access_token: item.response.token,
            token_type: item.response.type_,
            expires_in: item.response.seconds_to_expire,
        })
    }
}

// ===== PAYMENT FLOW STRUCTURES =====

#[derive(Debug, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CaptureMode {
    Auto,
    Later,
}

#[derive(Debug, Serialize)]
pub struct GlobalpayPaymentsRequest {
    pub account_name: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub channel: String,
    pub amount: StringMinorUnit,
    pub currency: common_enums::Currency,
    pub reference: String,
    pub country: String,
    pub capture_mode: CaptureMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<Secret<String, common_utils::pii::IpAddress>>,
    pub payment_method: GlobalpayPaymentMethod,
}

#[derive(Debug, Serialize)]
pub struct GlobalpayPaymentMethod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Secret<String>>,
    pub entry_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<GlobalpayCard>,
    /// Stored payment method id, in place of card data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Secret<String>>,
}

#[derive(Debug, Serialize)]
pub struct GlobalpayCard {
    pub number: cards::CardNumber,
    pub expiry_month: Secret<String>,
    pub expiry_year: Secret<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<Secret<String>>,
    pub cvv_indicator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avs_address: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avs_postal_code: Option<Secret<String>>,
}

impl GlobalpayCard {
    fn new(card: &Card, options: &PaymentOptions) -> Result<Self, Error> {
        let billing = options.billing_address.as_ref();
        Ok(Self {
            number: card.card_number.clone(),
            expiry_month: card.card_exp_month.clone(),
            expiry_year: card.get_card_expiry_year_2_digit()?,
            cvv: card.card_cvc.clone(),
            cvv_indicator: if card.card_cvc.is_some() {
                "PRESENT".to_string()
            } else {
                "NOT_PRESENT".to_string()
            },
            avs_address: billing.and_then(|address| address.address1.clone()),
            avs_postal_code: billing.and_then(|address| address.zip.clone()),
        })
    }
}

impl GlobalpayPaymentMethod {
    fn new(instrument: &PaymentInstrument, options: &PaymentOptions) -> Result<Self, Error> {
        let (card, id, name) = match instrument {
            PaymentInstrument::Card(card) => (
                Some(GlobalpayCard::new(card, options)?),
                None,
                card.get_cardholder_name().ok(),
            ),
            PaymentInstrument::Token(id) | PaymentInstrument::StoredReference(id) => {
                (None, Some(id.clone()), None)
            }
        };
        Ok(Self {
            name,
            entry_mode: "ECOM".to_string(),
            card,
            id,
        })
    }
}

fn reference(options: &PaymentOptions, flow_data: &PaymentFlowData) -> String {
    options
        .order_id
        .clone()
        .unwrap_or_else(|| flow_data.context.nonce.clone())
}

fn country(options: &PaymentOptions) -> String {
    options
        .billing_address
        .as_ref()
        .and_then(|address| address.country.clone())
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_string())
}

impl TryFrom<ConnectorRouterData<'_, Globalpay, Authorize, PaymentsAuthorizeData>>
    for GlobalpayPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Globalpay, Authorize, PaymentsAuthorizeData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let request = &router_data.request;
        Ok(Self {
            account_name: ACCOUNT_NAME.to_string(),
            transaction_type: "SALE".to_string(),
            channel: "CNP".to_string(),
            amount: utils::convert_amount(
                item.connector.amount_converter,
                request.amount,
                request.currency,
            )?,
            currency: request.currency,
            reference: reference(&request.options, &router_data.resource_common_data),
            country: country(&request.options),
            capture_mode: if request.is_auto_capture() {
                CaptureMode::Auto
            } else {
                CaptureMode::Later
            },
            ip_address: request.options.ip.clone(),
            payment_method: GlobalpayPaymentMethod::new(
                &request.payment_instrument,
                &request.options,
            )?,
        })
    }
}

/// Capture and refund carry only the amount.
#[derive(Debug, Serialize)]
pub struct GlobalpayAmountRequest {
    pub amount: StringMinorUnit,
}

pub type GlobalpayCaptureRequest = GlobalpayAmountRequest;
pub type GlobalpayRefundRequest = GlobalpayAmountRequest;

impl TryFrom<ConnectorRouterData<'_, Globalpay, Capture, PaymentsCaptureData>>
    for GlobalpayCaptureRequest
{
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Globalpay, Capture, PaymentsCaptureData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        Ok(Self {
            amount: utils::convert_amount(
                item.connector.amount_converter,
                request.amount,
                request.currency,
            )?,
        })
    }
}

impl TryFrom<ConnectorRouterData<'_, Globalpay, Refund, RefundsData>> for GlobalpayRefundRequest {
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Globalpay, Refund, RefundsData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        Ok(Self {
            amount: utils::convert_amount(
                item.connector.amount_converter,
                request.amount,
                request.currency,
            )?,
        })
    }
}

// The reversal takes no body fields; an empty object releases the full amount.
#[derive(Debug, Serialize)]
pub struct GlobalpayVoidRequest {}

impl TryFrom<ConnectorRouterData<'_, Globalpay, Void, PaymentVoidData>> for GlobalpayVoidRequest {
    type Error = Error;

    fn try_from(
        _item: ConnectorRouterData<'_, Globalpay, Void, PaymentVoidData>,
    ) -> Result<Self, Self::Error> {
        Ok(Self {})
    }
}

#[derive(Debug, Serialize)]
pub struct GlobalpayVerifyRequest {
    pub account_name: String,
    pub channel: String,
    pub reference: String,
    pub currency: common_enums::Currency,
    pub country: String,
    pub payment_method: GlobalpayPaymentMethod,
}

impl TryFrom<ConnectorRouterData<'_, Globalpay, Verify, VerifyData>> for GlobalpayVerifyRequest {
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Globalpay, Verify, VerifyData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let request = &router_data.request;
        Ok(Self {
            account_name: ACCOUNT_NAME.to_string(),
            channel: "CNP".to_string(),
            reference: reference(&request.options, &router_data.resource_common_data),
            currency: request.currency,
            country: country(&request.options),
            payment_method: GlobalpayPaymentMethod::new(
                &request.payment_instrument,
                &request.options,
            )?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct GlobalpayStoreRequest {
    pub account_name: String,
    pub reference: String,
    pub usage_mode: String,
    pub card: GlobalpayStoredCard,
}

#[derive(Debug, Serialize)]
pub struct GlobalpayStoredCard {
    pub number: cards::CardNumber,
    pub expiry_month: Secret<String>,
    pub expiry_year: Secret<String>,
}

impl TryFrom<ConnectorRouterData<'_, Globalpay, Store, StoreData>> for GlobalpayStoreRequest {
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Globalpay, Store, StoreData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let request = &router_data.request;
        let card = match &request.payment_instrument {
            PaymentInstrument::Card(card) => card,
            PaymentInstrument::Token(_) | PaymentInstrument::StoredReference(_) => {
                return Err(errors::ConnectorError::NotSupported {
                    message: "Storing anything but a card".to_string(),
                    connector: "globalpay",
                }
                .into())
            }
        };
        Ok(Self {
            account_name: TOKENIZATION_ACCOUNT_NAME.to_string(),
            reference: reference(&request.options, &router_data.resource_common_data),
            usage_mode: "MULTIPLE".to_string(),
            card: GlobalpayStoredCard {
                number: card.card_number.clone(),
                expiry_month: card.card_exp_month.clone(),
                expiry_year: card.get_card_expiry_year_2_digit()?,
            },
        })
    }
}

// ===== RESPONSES =====

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalpayCardResponse {
    pub brand: Option<String>,
    pub masked_number_last4: Option<String>,
    pub authcode: Option<String>,
    pub brand_reference: Option<String>,
    pub cvv_result: Option<String>,
    pub avs_address_result: Option<String>,
    pub avs_postal_code_result: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalpayPaymentMethodResponse {
    pub result: Option<String>,
    pub message: Option<String>,
    pub card: Option<GlobalpayCardResponse>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalpayAction {
    pub id: Option<String>,
    pub result_code: Option<String>,
}

/// Transactions, verifications and stored payment methods share this shape.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalpayTransactionResponse {
    pub id: Option<String>,
    pub status: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub reference: Option<String>,
    pub action: Option<GlobalpayAction>,
    pub payment_method: Option<GlobalpayPaymentMethodResponse>,
    pub card: Option<GlobalpayCardResponse>,
}

pub type GlobalpayPaymentsResponse = GlobalpayTransactionResponse;
pub type GlobalpayCaptureResponse = GlobalpayTransactionResponse;
pub type GlobalpayVoidResponse = GlobalpayTransactionResponse;
pub type GlobalpayRefundResponse = GlobalpayTransactionResponse;
pub type GlobalpayVerifyResponse = GlobalpayTransactionResponse;
pub type GlobalpayStoreResponse = GlobalpayTransactionResponse;
pub type GlobalpayUnstoreResponse = GlobalpayTransactionResponse;

fn match_flag(result: Option<&str>) -> Option<&'static str> {
    result.map(|result| match result {
        "MATCHED" => "Y",
        "NOT_MATCHED" => "N",
        _ => "X",
    })
}

fn cvv_code(result: &str) -> &'static str {
    match result {
        "MATCHED" => "M",
        "NOT_MATCHED" => "N",
        "NOT_CHECKED" => "P",
        _ => "U",
    }
}

pub(super) fn error_code_from_result(result: Option<&str>) -> StandardErrorCode {
    match result {
        Some("14") => StandardErrorCode::InvalidNumber,
        Some("54") => StandardErrorCode::ExpiredCard,
        Some("04") | Some("07") | Some("41") | Some("43") => StandardErrorCode::PickupCard,
        Some("01") | Some("02") => StandardErrorCode::CallIssuer,
        Some("N7") => StandardErrorCode::IncorrectCvc,
        _ => StandardErrorCode::CardDeclined,
    }
}

impl GlobalpayTransactionResponse {
    fn card(&self) -> Option<&GlobalpayCardResponse> {
        self.payment_method
            .as_ref()
            .and_then(|method| method.card.as_ref())
            .or(self.card.as_ref())
    }

    fn has_status(&self, accepted: &[&str]) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| accepted.contains(&status))
    }

    fn into_response(
        self,
        success: bool,
        handle: Option<AuthorizationHandle>,
        params: BTreeMap<String, String>,
        http_code: u16,
    ) -> GatewayResponse {
        let method = self.payment_method.as_ref();
        let result = method.and_then(|method| method.result.clone());
        let message = method
            .and_then(|method| method.message.clone())
            .or_else(|| self.status.clone());
        let card = self.card();
        let avs_result = AvsResult::from_matches(
            match_flag(card.and_then(|card| card.avs_address_result.as_deref())),
            match_flag(card.and_then(|card| card.avs_postal_code_result.as_deref())),
        );
        let cvv_result = CvvResult::from_code(
            card.and_then(|card| card.cvv_result.as_deref())
                .map(cvv_code),
        );
        let network_transaction_id = card.and_then(|card| card.brand_reference.clone());

        GatewayResponse::builder(
            success,
            utils::failure_message("globalpay", message, http_code),
        )
        .params(params)
        .authorization(handle.filter(|_| success))
        .avs_result(avs_result)
        .cvv_result(cvv_result)
        .error_code((!success).then(|| error_code_from_result(result.as_deref())))
        .connector_error_code(result.filter(|_| !success))
        .network_transaction_id(network_transaction_id)
        .status_code(http_code)
        .build()
    }
}

impl TryFrom<ResponseRouterData<'_, GlobalpayPaymentsResponse, Authorize, PaymentsAuthorizeData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, GlobalpayPaymentsResponse, Authorize, PaymentsAuthorizeData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let expected = if request.is_auto_capture() {
            "CAPTURED"
        } else {
            "PREAUTHORIZED"
        };
        let success = item.response.has_status(&[expected]);
        let handle = item.response.id.clone().map(|id| {
            AuthorizationHandle::new(id)
                .with_secondary_id(item.response.card().and_then(|card| card.authcode.clone()))
                .with_amount(request.amount, request.currency)
                .with_kind(request.handle_kind())
        });
        Ok(item.response.into_response(
            success && handle.is_some(),
            handle,
            item.params,
            item.http_code,
        ))
    }
}

impl TryFrom<ResponseRouterData<'_, GlobalpayCaptureResponse, Capture, PaymentsCaptureData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, GlobalpayCaptureResponse, Capture, PaymentsCaptureData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let success = item.response.has_status(&["CAPTURED"]);
        let handle = Some(
            request
                .authorization
                .clone()
                .with_amount(request.amount, request.currency)
                .with_kind("capture"),
        );
        Ok(item
            .response
            .into_response(success, handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, GlobalpayVoidResponse, Void, PaymentVoidData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, GlobalpayVoidResponse, Void, PaymentVoidData>,
    ) -> Result<Self, Self::Error> {
        let success = item.response.has_status(&["REVERSED"]);
        let handle = Some(item.router_data.request.authorization.clone().with_kind("void"));
        Ok(item
            .response
            .into_response(success, handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, GlobalpayRefundResponse, Refund, RefundsData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, GlobalpayRefundResponse, Refund, RefundsData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        // A refund is its own transaction, reported as captured.
        let success = item.response.has_status(&["CAPTURED"]);
        let handle = item.response.id.clone().map(|id| {
            AuthorizationHandle::new(id)
                .with_secondary_id(Some(request.authorization.transaction_id.clone()))
                .with_amount(request.amount, request.currency)
                .with_kind("refund")
        });
        Ok(item.response.into_response(
            success && handle.is_some(),
            handle,
            item.params,
            item.http_code,
        ))
    }
}

impl TryFrom<ResponseRouterData<'_, GlobalpayVerifyResponse, Verify, VerifyData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, GlobalpayVerifyResponse, Verify, VerifyData>,
    ) -> Result<Self, Self::Error> {
        let success = item.response.has_status(&["VERIFIED"]);
        let handle = item
            .response
            .id
            .clone()
            .map(|id| AuthorizationHandle::new(id).with_kind("verify"));
        Ok(item.response.into_response(
            success && handle.is_some(),
            handle,
            item.params,
            item.http_code,
        ))
    }
}

impl TryFrom<ResponseRouterData<'_, GlobalpayStoreResponse, Store, StoreData>> for GatewayResponse {
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, GlobalpayStoreResponse, Store, StoreData>,
    ) -> Result<Self, Self::Error> {
        let success = item.response.has_status(&["ACTIVE"]);
        let handle = item
            .response
            .id
            .clone()
            .map(|id| AuthorizationHandle::new(id).with_kind("store"));
        Ok(item.response.into_response(
            success && handle.is_some(),
            handle,
            item.params,
            item.http_code,
        ))
    }
}

impl TryFrom<ResponseRouterData<'_, GlobalpayUnstoreResponse, Unstore, UnstoreData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, GlobalpayUnstoreResponse, Unstore, UnstoreData>,
    ) -> Result<Self, Self::Error> {
        let success = item.response.has_status(&["DELETED"]);
        Ok(item
            .response
            .into_response(success, None, item.params, item.http_code))
    }
}
