//! Paysafe replies after key normalization, so `paymentHandleToken` reads as
//! `payment_handle_token`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaysafeStatus {
    Initiated,
    Payable,
    Received,
    Pending,
    Processing,
    Completed,
    Failed,
    Expired,
    Cancelled,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaysafeGatewayResponse {
    pub auth_code: Option<String>,
    pub avs_response: Option<String>,
    pub cvv_verification: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaysafeError {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Vec<String>,
    pub field_errors: Vec<PaysafeFieldError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaysafeFieldError {
    pub field: Option<String>,
    pub error: Option<String>,
}

impl PaysafeError {
    /// The message, followed by the first detail when there is one.
    pub fn full_message(&self) -> Option<String> {
        match (&self.message, self.details.first()) {
            (Some(message), Some(detail)) => Some(format!("{message} {detail}")),
            (Some(message), None) => Some(message.clone()),
            (None, detail) => detail.cloned(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaysafePaymentHandleResponse {
    pub id: Option<String>,
    pub merchant_ref_num: Option<String>,
    pub payment_handle_token: Option<String>,
    pub status: PaysafeStatus,
    pub gateway_response: Option<PaysafeGatewayResponse>,
    pub error: Option<PaysafeError>,
}

/// Payments, settlements, refunds and void authorizations share one shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaysafeTransactionResponse {
    pub id: Option<String>,
    pub merchant_ref_num: Option<String>,
    pub amount: Option<i64>,
    pub available_to_settle: Option<i64>,
    pub currency_code: Option<String>,
    pub status: PaysafeStatus,
    pub settlement_id: Option<String>,
    pub gateway_reconciliation_id: Option<String>,
    pub gateway_response: Option<PaysafeGatewayResponse>,
    pub error: Option<PaysafeError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaysafeErrorResponse {
    pub error: Option<PaysafeError>,
}

pub type PaysafePaymentMethodTokenResponse = PaysafePaymentHandleResponse;
pub type PaysafeAuthorizeResponse = PaysafeTransactionResponse;
pub type PaysafeCaptureResponse = PaysafeTransactionResponse;
pub type PaysafeVoidResponse = PaysafeTransactionResponse;
pub type PaysafeRefundResponse = PaysafeTransactionResponse;
