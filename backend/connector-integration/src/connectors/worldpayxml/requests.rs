use common_utils::types::StringMinorUnit;
use hyperswitch_masking::Secret;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename = "paymentService")]
pub struct WorldpayxmlPaymentsRequest {
    #[serde(rename = "@version")]
    pub version: String,
    #[serde(rename = "@merchantCode")]
    pub merchant_code: Secret<String>,
    pub submit: WorldpayxmlSubmit,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlSubmit {
    pub order: WorldpayxmlOrder,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlOrder {
    #[serde(rename = "@orderCode")]
    pub order_code: String,
    pub description: String,
    pub amount: WorldpayxmlAmount,
    #[serde(rename = "paymentDetails")]
    pub payment_details: WorldpayxmlPaymentDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper: Option<WorldpayxmlShopper>,
    #[serde(rename = "billingAddress", skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<WorldpayxmlBillingAddress>,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlAmount {
    #[serde(rename = "@value")]
    pub value: StringMinorUnit,
    #[serde(rename = "@currencyCode")]
    pub currency_code: common_enums::Currency,
    #[serde(rename = "@exponent")]
    pub exponent: u8,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlPaymentDetails {
    #[serde(rename = "$value")]
    pub payment_method: WorldpayxmlPaymentMethod,
}

#[derive(Debug, Serialize)]
pub enum WorldpayxmlPaymentMethod {
    #[serde(rename = "CARD-SSL")]
    CardSsl(WorldpayxmlCard),
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlCard {
    #[serde(rename = "cardNumber")]
    pub card_number: cards::CardNumber,
    #[serde(rename = "expiryDate")]
    pub expiry_date: WorldpayxmlExpiryDate,
    #[serde(rename = "cardHolderName")]
    pub card_holder_name: Secret<String>,
    #[serde(rename = "cvc", skip_serializing_if = "Option::is_none")]
    pub cvc: Option<Secret<String>>,
    #[serde(rename = "cardAddress", skip_serializing_if = "Option::is_none")]
    pub card_address: Option<WorldpayxmlBillingAddress>,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlExpiryDate {
    pub date: WorldpayxmlDate,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlDate {
    #[serde(rename = "@month")]
    pub month: Secret<String>,
    #[serde(rename = "@year")]
    pub year: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlShopper {
    #[serde(rename = "shopperEmailAddress")]
    pub shopper_email_address: common_utils::Email,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlBillingAddress {
    pub address: WorldpayxmlAddress,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlAddress {
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<Secret<String>>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<Secret<String>>,
    #[serde(rename = "address1", skip_serializing_if = "Option::is_none")]
    pub address1: Option<Secret<String>>,
    #[serde(rename = "address2", skip_serializing_if = "Option::is_none")]
    pub address2: Option<Secret<String>>,
    #[serde(rename = "postalCode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<Secret<String>>,
    #[serde(rename = "city", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "state", skip_serializing_if = "Option::is_none")]
    pub state: Option<Secret<String>>,
    #[serde(rename = "countryCode", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(rename = "telephoneNumber", skip_serializing_if = "Option::is_none")]
    pub telephone_number: Option<Secret<String>>,
}

/// Capture, cancel and refund all travel as an order modification.
#[derive(Debug, Serialize)]
#[serde(rename = "paymentService")]
pub struct WorldpayxmlModificationRequest {
    #[serde(rename = "@version")]
    pub version: String,
    #[serde(rename = "@merchantCode")]
    pub merchant_code: Secret<String>,
    pub modify: WorldpayxmlModify,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlModify {
    #[serde(rename = "orderModification")]
    pub order_modification: WorldpayxmlOrderModification,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlOrderModification {
    #[serde(rename = "@orderCode")]
    pub order_code: String,
    #[serde(rename = "$value")]
    pub modification: WorldpayxmlModification,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorldpayxmlModification {
    Capture(WorldpayxmlAmountHolder),
    Cancel(WorldpayxmlCancel),
    Refund(WorldpayxmlAmountHolder),
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlAmountHolder {
    pub amount: WorldpayxmlAmount,
}

#[derive(Debug, Serialize)]
pub struct WorldpayxmlCancel {
    // Empty struct - generates <cancel/> element
}

pub type WorldpayxmlCaptureRequest = WorldpayxmlModificationRequest;
pub type WorldpayxmlVoidRequest = WorldpayxmlModificationRequest;
pub type WorldpayxmlRefundRequest = WorldpayxmlModificationRequest;
