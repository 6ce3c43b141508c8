use std::collections::BTreeMap;

use common_enums::Currency;
use common_utils::{pii::Email, types::StringMajorUnit};
use domain_types::{
    authorization::AuthorizationHandle,
    connector_flow::{Authorize, Capture, Refund, Store, Unstore, Verify, Void},
    connector_types::{
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData, StoreData,
        UnstoreData, VerifyData,
    },
    errors,
    payment_method_data::PaymentInstrument,
    router_data::ConnectorAuthType,
    router_request_types::{Address, PaymentOptions},
    router_response_types::{AvsResult, CvvResult, GatewayResponse, StandardErrorCode},
};
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use super::Nmi;
use crate::{
    types::{ConnectorRouterData, ResponseRouterData},
    utils,
};

type Error = error_stack::Report<errors::ConnectorError>;

// ===== AUTHENTICATION =====

#[derive(Debug, Clone)]
pub struct NmiAuthType {
    pub api_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for NmiAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::HeaderKey { api_key } | ConnectorAuthType::BodyKey { api_key, .. } => {
                Ok(Self {
                    api_key: api_key.to_owned(),
                })
            }
            _ => Err(error_stack::report!(
                errors::ConnectorError::FailedToObtainAuthType
            )),
        }
    }
}

// ===== TRANSACTION TYPES =====

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Auth,
    Sale,
    Capture,
    Refund,
    Void,
    Validate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerVaultAction {
    AddCustomer,
    DeleteCustomer,
}

// ===== PAYMENT METHOD DATA =====

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NmiPaymentMethod {
    Card(Box<CardData>),
    Token(TokenData),
    Vault(VaultData),
}

#[derive(Debug, Serialize)]
pub struct CardData {
    ccnumber: cards::CardNumber,
    ccexp: Secret<String>, // MMYY format
    #[serde(skip_serializing_if = "Option::is_none")]
    cvv: Option<Secret<String>>,
}

#[derive(Debug, Serialize)]
pub struct TokenData {
    payment_token: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct VaultData {
    customer_vault_id: Secret<String>,
}

impl TryFrom<&PaymentInstrument> for NmiPaymentMethod {
    type Error = Error;

    fn try_from(instrument: &PaymentInstrument) -> Result<Self, Self::Error> {
        match instrument {
            PaymentInstrument::Card(card_data) => {
                let ccexp = card_data.get_card_expiry_month_year_2_digit_with_delimiter("")?;
                Ok(Self::Card(Box::new(CardData {
                    ccnumber: card_data.card_number.clone(),
                    ccexp,
                    cvv: card_data.card_cvc.clone(),
                })))
            }
            PaymentInstrument::Token(token) => Ok(Self::Token(TokenData {
                payment_token: token.clone(),
            })),
            PaymentInstrument::StoredReference(reference) => Ok(Self::Vault(VaultData {
                customer_vault_id: reference.clone(),
            })),
        }
    }
}

// ===== CUSTOMER DETAILS =====

#[derive(Debug, Default, Serialize)]
pub struct NmiBillingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address1: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address2: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zip: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<Email>,
}

impl NmiBillingDetails {
    fn new(instrument: &PaymentInstrument, options: &PaymentOptions) -> Self {
        let billing = options.billing_address.as_ref();
        let (first_name, last_name) = match instrument {
            PaymentInstrument::Card(card) => utils::get_name_parts(card, billing),
            PaymentInstrument::Token(_) | PaymentInstrument::StoredReference(_) => (
                billing.and_then(|address| address.first_name.clone()),
                billing.and_then(|address| address.last_name.clone()),
            ),
        };
        let address = billing.cloned().unwrap_or_else(Address::default);
        Self {
            first_name,
            last_name,
            address1: address.address1,
            address2: address.address2,
            city: address.city,
            state: address.state,
            zip: address.zip,
            country: address.country,
            phone: address.phone,
            email: options.email.clone(),
        }
    }
}

// ===== MERCHANT DEFINED FIELDS =====

#[derive(Debug, Default, Serialize)]
pub struct NmiMerchantDefinedField {
    #[serde(flatten)]
    inner: BTreeMap<String, Secret<String>>,
}

impl NmiMerchantDefinedField {
    pub fn new(metadata: &serde_json::Value) -> Self {
        let inner = metadata
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .enumerate()
                    .map(|(index, (key, value))| {
                        let value = match value {
                            serde_json::Value::String(text) => text.clone(),
                            other => other.to_string(),
                        };
                        (
                            format!("merchant_defined_field_{}", index + 1),
                            Secret::new(format!("{key}={value}")),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { inner }
    }
}

// ===== PAYMENT REQUEST =====

#[derive(Debug, Serialize)]
pub struct NmiPaymentsRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    amount: StringMajorUnit,
    currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    orderid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipaddress: Option<Secret<String, common_utils::pii::IpAddress>>,
    #[serde(flatten)]
    payment_method: NmiPaymentMethod,
    #[serde(flatten)]
    billing: NmiBillingDetails,
    #[serde(flatten)]
    merchant_defined_field: NmiMerchantDefinedField,
}

impl TryFrom<ConnectorRouterData<'_, Nmi, Authorize, PaymentsAuthorizeData>>
    for NmiPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Nmi, Authorize, PaymentsAuthorizeData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let request = &router_data.request;
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;

        let transaction_type = if request.is_auto_capture() {
            TransactionType::Sale
        } else {
            TransactionType::Auth
        };

        let amount = utils::convert_amount(
            item.connector.amount_converter,
            request.amount,
            request.currency,
        )?;

        Ok(Self {
            security_key: auth.api_key,
            transaction_type,
            amount,
            currency: request.currency,
            orderid: request.options.order_id.clone(),
            order_description: request.options.description.clone(),
            ipaddress: request.options.ip.clone(),
            payment_method: NmiPaymentMethod::try_from(&request.payment_instrument)?,
            billing: NmiBillingDetails::new(&request.payment_instrument, &request.options),
            merchant_defined_field: merchant_defined_fields(&request.options),
        })
    }
}

fn merchant_defined_fields(options: &PaymentOptions) -> NmiMerchantDefinedField {
    options
        .metadata
        .as_ref()
        .map(|metadata| NmiMerchantDefinedField::new(metadata.peek()))
        .unwrap_or_default()
}

// ===== VERIFY (VALIDATE) REQUEST =====

#[derive(Debug, Serialize)]
pub struct NmiValidateRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    orderid: Option<String>,
    #[serde(flatten)]
    payment_method: NmiPaymentMethod,
    #[serde(flatten)]
    billing: NmiBillingDetails,
}

impl TryFrom<ConnectorRouterData<'_, Nmi, Verify, VerifyData>> for NmiValidateRequest {
    type Error = Error;

    fn try_from(item: ConnectorRouterData<'_, Nmi, Verify, VerifyData>) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let request = &router_data.request;
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        Ok(Self {
            security_key: auth.api_key,
            transaction_type: TransactionType::Validate,
            currency: request.currency,
            orderid: request.options.order_id.clone(),
            payment_method: NmiPaymentMethod::try_from(&request.payment_instrument)?,
            billing: NmiBillingDetails::new(&request.payment_instrument, &request.options),
        })
    }
}

// ===== CAPTURE REQUEST =====

#[derive(Debug, Serialize)]
pub struct NmiCaptureRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    transactionid: String,
    amount: StringMajorUnit,
}

impl TryFrom<ConnectorRouterData<'_, Nmi, Capture, PaymentsCaptureData>> for NmiCaptureRequest {
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Nmi, Capture, PaymentsCaptureData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        let amount = utils::convert_amount(
            item.connector.amount_converter,
            router_data.request.amount,
            router_data.request.currency,
        )?;
        Ok(Self {
            security_key: auth.api_key,
            transaction_type: TransactionType::Capture,
            transactionid: router_data.request.authorization.transaction_id.clone(),
            amount,
        })
    }
}

// ===== VOID REQUEST =====

#[derive(Debug, Serialize)]
pub struct NmiVoidRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    transactionid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    void_reason: Option<String>,
}

impl TryFrom<ConnectorRouterData<'_, Nmi, Void, PaymentVoidData>> for NmiVoidRequest {
    type Error = Error;

    fn try_from(item: ConnectorRouterData<'_, Nmi, Void, PaymentVoidData>) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        Ok(Self {
            security_key: auth.api_key,
            transaction_type: TransactionType::Void,
            transactionid: router_data.request.authorization.transaction_id.clone(),
            void_reason: router_data
                .request
                .options
                .get_optional_connector_field("void_reason")
                .cloned(),
        })
    }
}

// ===== REFUND REQUEST =====

#[derive(Debug, Serialize)]
pub struct NmiRefundRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    transactionid: String,
    amount: StringMajorUnit,
}

impl TryFrom<ConnectorRouterData<'_, Nmi, Refund, RefundsData>> for NmiRefundRequest {
    type Error = Error;

    fn try_from(item: ConnectorRouterData<'_, Nmi, Refund, RefundsData>) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        let amount = utils::convert_amount(
            item.connector.amount_converter,
            router_data.request.amount,
            router_data.request.currency,
        )?;
        Ok(Self {
            security_key: auth.api_key,
            transaction_type: TransactionType::Refund,
            transactionid: router_data.request.authorization.transaction_id.clone(),
            amount,
        })
    }
}

// ===== CUSTOMER VAULT REQUESTS =====

#[derive(Debug, Serialize)]
pub struct NmiStoreRequest {
    security_key: Secret<String>,
    customer_vault: CustomerVaultAction,
    #[serde(flatten)]
    payment_method: NmiPaymentMethod,
    #[serde(flatten)]
    billing: NmiBillingDetails,
}

impl TryFrom<ConnectorRouterData<'_, Nmi, Store, StoreData>> for NmiStoreRequest {
    type Error = Error;

    fn try_from(item: ConnectorRouterData<'_, Nmi, Store, StoreData>) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let request = &router_data.request;
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        let payment_method = match &request.payment_instrument {
            PaymentInstrument::StoredReference(_) => Err(errors::ConnectorError::NotSupported {
                message: "Storing a stored reference".to_string(),
                connector: "Nmi",
            })?,
            instrument => NmiPaymentMethod::try_from(instrument)?,
        };
        Ok(Self {
            security_key: auth.api_key,
            customer_vault: CustomerVaultAction::AddCustomer,
            payment_method,
            billing: NmiBillingDetails::new(&request.payment_instrument, &request.options),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct NmiUnstoreRequest {
    security_key: Secret<String>,
    customer_vault: CustomerVaultAction,
    customer_vault_id: Secret<String>,
}

impl TryFrom<ConnectorRouterData<'_, Nmi, Unstore, UnstoreData>> for NmiUnstoreRequest {
    type Error = Error;

    fn try_from(item: ConnectorRouterData<'_, Nmi, Unstore, UnstoreData>) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let auth = NmiAuthType::try_from(&router_data.connector_auth_type)?;
        Ok(Self {
            security_key: auth.api_key,
            customer_vault: CustomerVaultAction::DeleteCustomer,
            customer_vault_id: router_data.request.reference.clone(),
        })
    }
}

// ===== RESPONSE =====

/// NMI answers every call with the same query string shape.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StandardResponse {
    pub response: Option<String>, // "1" = approved, "2" = declined, "3" = error
    pub responsetext: Option<String>,
    pub authcode: Option<String>,
    pub transactionid: Option<String>,
    pub avsresponse: Option<String>,
    pub cvvresponse: Option<String>,
    pub orderid: Option<String>,
    pub response_code: Option<String>,
    pub customer_vault_id: Option<String>,
}

pub type NmiPaymentsResponse = StandardResponse;
pub type NmiCaptureResponse = StandardResponse;
pub type NmiVoidResponse = StandardResponse;
pub type NmiRefundResponse = StandardResponse;
pub type NmiValidateResponse = StandardResponse;
pub type NmiStoreResponse = StandardResponse;
pub type NmiUnstoreResponse = StandardResponse;

pub(super) fn error_code_from_response_code(code: &str) -> StandardErrorCode {
    match code {
        "200" | "201" | "202" => StandardErrorCode::CardDeclined,
        "220" => StandardErrorCode::IncorrectNumber,
        "221" => StandardErrorCode::InvalidNumber,
        "223" => StandardErrorCode::ExpiredCard,
        "224" => StandardErrorCode::InvalidExpiryDate,
        "225" => StandardErrorCode::InvalidCvc,
        "250" => StandardErrorCode::PickupCard,
        "260" => StandardErrorCode::CallIssuer,
        _ => StandardErrorCode::ProcessingError,
    }
}

impl StandardResponse {
    fn is_approved(&self) -> bool {
        self.response.as_deref() == Some("1")
    }

    fn transaction_handle(&self) -> Option<AuthorizationHandle> {
        self.transactionid
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(|id| AuthorizationHandle::new(id).with_secondary_id(self.authcode.clone()))
    }

    fn into_gateway_response(
        self,
        success: bool,
        handle: Option<AuthorizationHandle>,
        params: BTreeMap<String, String>,
        http_code: u16,
    ) -> GatewayResponse {
        let message = utils::failure_message("nmi", self.responsetext.clone(), http_code);
        let error_code = self
            .response_code
            .as_deref()
            .filter(|_| !success)
            .map(error_code_from_response_code)
            .or_else(|| (!success).then_some(StandardErrorCode::ProcessingError));
        GatewayResponse::builder(success, message)
            .params(params)
            .authorization(handle.filter(|_| success))
            .avs_result(AvsResult::from_code(self.avsresponse.as_deref()))
            .cvv_result(CvvResult::from_code(self.cvvresponse.as_deref()))
            .error_code(error_code)
            .connector_error_code(self.response_code.filter(|_| !success))
            .status_code(http_code)
            .build()
    }
}

impl TryFrom<ResponseRouterData<'_, NmiPaymentsResponse, Authorize, PaymentsAuthorizeData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, NmiPaymentsResponse, Authorize, PaymentsAuthorizeData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let success = item.response.is_approved();
        let handle = item.response.transaction_handle().map(|handle| {
            handle
                .with_amount(request.amount, request.currency)
                .with_kind(request.handle_kind())
        });
        Ok(item
            .response
            .into_gateway_response(success && handle.is_some(), handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, NmiCaptureResponse, Capture, PaymentsCaptureData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, NmiCaptureResponse, Capture, PaymentsCaptureData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let success = item.response.is_approved();
        let handle = item
            .response
            .transaction_handle()
            .or_else(|| Some(request.authorization.clone()))
            .map(|handle| handle.with_amount(request.amount, request.currency).with_kind("capture"));
        Ok(item
            .response
            .into_gateway_response(success, handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, NmiVoidResponse, Void, PaymentVoidData>> for GatewayResponse {
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, NmiVoidResponse, Void, PaymentVoidData>,
    ) -> Result<Self, Self::Error> {
        let success = item.response.is_approved();
        let handle = item
            .response
            .transaction_handle()
            .or_else(|| Some(item.router_data.request.authorization.clone()))
            .map(|handle| handle.with_kind("void"));
        Ok(item
            .response
            .into_gateway_response(success, handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, NmiRefundResponse, Refund, RefundsData>> for GatewayResponse {
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, NmiRefundResponse, Refund, RefundsData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let success = item.response.is_approved();
        let handle = item.response.transaction_handle().map(|handle| {
            handle
                .with_amount(request.amount, request.currency)
                .with_kind("refund")
        });
        Ok(item
            .response
            .into_gateway_response(success && handle.is_some(), handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, NmiValidateResponse, Verify, VerifyData>> for GatewayResponse {
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, NmiValidateResponse, Verify, VerifyData>,
    ) -> Result<Self, Self::Error> {
        let success = item.response.is_approved();
        let handle = item
            .response
            .transaction_handle()
            .map(|handle| handle.with_kind("verify"));
        Ok(item
            .response
            .into_gateway_response(success && handle.is_some(), handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, NmiStoreResponse, Store, StoreData>> for GatewayResponse {
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, NmiStoreResponse, Store, StoreData>,
    ) -> Result<Self, Self::Error> {
        let success = item.response.is_approved();
        // The vault id is the reference later calls charge against.
        let handle = item
            .response
            .customer_vault_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(|id| AuthorizationHandle::new(id).with_kind("store"));
        Ok(item
            .response
            .into_gateway_response(success && handle.is_some(), handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, NmiUnstoreResponse, Unstore, UnstoreData>> for GatewayResponse {
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, NmiUnstoreResponse, Unstore, UnstoreData>,
    ) -> Result<Self, Self::Error> {
        let success = item.response.is_approved();
        Ok(item
            .response
            .into_gateway_response(success, None, item.params, item.http_code))
    }
}

// ===== ERROR RESPONSE =====

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NmiErrorResponse {
    pub response_code: Option<String>,
    pub responsetext: Option<String>,
}
