//! Worldpay replies as read through the response parser: attributes and
//! child elements are both plain snake_case keys.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlResponse {
    pub payment_service: WorldpayxmlPaymentService,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlPaymentService {
    pub merchant_code: Option<String>,
    pub reply: WorldpayxmlReply,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlReply {
    pub order_status: Option<WorldpayxmlOrderStatus>,
    pub ok: Option<WorldpayxmlOk>,
    pub error: Option<WorldpayxmlError>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlOrderStatus {
    pub order_code: Option<String>,
    pub payment: Option<WorldpayxmlPayment>,
    pub error: Option<WorldpayxmlError>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlPayment {
    pub payment_method: Option<String>,
    pub amount: Option<WorldpayxmlAmountResponse>,
    pub last_event: Option<String>,
    pub authorisation_id: Option<WorldpayxmlAuthorisationId>,
    pub cvc_result_code: Option<WorldpayxmlResultCode>,
    pub avs_result_code: Option<WorldpayxmlResultCode>,
    #[serde(alias = "iso_8583_return_code")]
    pub iso8583_return_code: Option<WorldpayxmlIso8583ReturnCode>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlAmountResponse {
    pub value: Option<String>,
    pub currency_code: Option<String>,
    pub exponent: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlAuthorisationId {
    pub id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlResultCode {
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlIso8583ReturnCode {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// `<error code="5">text</error>`, or bare text when the code is absent.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum WorldpayxmlError {
    Coded {
        code: Option<String>,
        value: Option<String>,
    },
    Text(String),
}

impl WorldpayxmlError {
    pub fn code(&self) -> Option<String> {
        match self {
            Self::Coded { code, .. } => code.clone(),
            Self::Text(_) => None,
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            Self::Coded { value, .. } => value.clone(),
            Self::Text(text) => Some(text.clone()),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlOk {
    pub capture_received: Option<WorldpayxmlModificationReceived>,
    pub cancel_received: Option<WorldpayxmlModificationReceived>,
    pub refund_received: Option<WorldpayxmlModificationReceived>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldpayxmlModificationReceived {
    pub order_code: Option<String>,
    pub amount: Option<WorldpayxmlAmountResponse>,
}

pub type WorldpayxmlAuthorizeResponse = WorldpayxmlResponse;
pub type WorldpayxmlCaptureResponse = WorldpayxmlResponse;
pub type WorldpayxmlVoidResponse = WorldpayxmlResponse;
pub type WorldpayxmlRefundResponse = WorldpayxmlResponse;
