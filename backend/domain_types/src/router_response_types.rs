use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::authorization::AuthorizationHandle;

/// Raw HTTP exchange result handed back by a transport.
#[derive(Clone, Debug)]
pub struct Response {
    pub headers: Option<http::HeaderMap>,
    pub response: bytes::Bytes,
    pub status_code: u16,
}

impl Response {
    pub fn new(status_code: u16, body: impl Into<bytes::Bytes>) -> Self {
        Self {
            headers: None,
            response: body.into(),
            status_code,
        }
    }

    pub fn with_headers(mut self, headers: http::HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .as_ref()?
            .get(http::header::CONTENT_TYPE)?
            .to_str()
            .ok()
    }
}

/// Normalized error codes shared by every gateway.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StandardErrorCode {
    IncorrectNumber,
    InvalidNumber,
    InvalidExpiryDate,
    InvalidCvc,
    ExpiredCard,
    IncorrectCvc,
    IncorrectZip,
    IncorrectAddress,
    CardDeclined,
    ProcessingError,
    CallIssuer,
    PickupCard,
    ConfigError,
    UnsupportedFeature,
    InvalidAmount,
}

/// Address verification outcome, from the card network's standard code table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvsResult {
    pub code: Option<String>,
    pub message: Option<String>,
    pub street_match: Option<String>,
    pub postal_match: Option<String>,
}

impl AvsResult {
    pub fn from_code(code: Option<&str>) -> Self {
        let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
            return Self::default();
        };
        let code = code.to_ascii_uppercase();
        Self {
            message: avs_message(&code).map(str::to_string),
            street_match: avs_street_match(&code).map(str::to_string),
            postal_match: avs_postal_match(&code).map(str::to_string),
            code: Some(code),
        }
    }

    /// Result from separate street and postal match flags (`Y`, `N` or `X`).
    pub fn from_matches(street: Option<&str>, postal: Option<&str>) -> Self {
        let code = match (street, postal) {
            (Some("Y"), Some("Y")) => Some("Y"),
            (Some("Y"), Some("N")) => Some("A"),
            (Some("N"), Some("Y")) => Some("Z"),
            (Some("N"), Some("N")) => Some("N"),
            (None, None) => None,
            _ => Some("U"),
        };
        let mut result = Self::from_code(code);
        result.street_match = street.map(str::to_string);
        result.postal_match = postal.map(str::to_string);
        result
    }
}

fn avs_message(code: &str) -> Option<&'static str> {
    Some(match code {
        "A" => "Street address matches, but postal code does not match.",
        "B" => "Street address matches, but postal code not verified.",
        "C" => "Street address and postal code do not match.",
        "D" => "Street address and postal code match.",
        "E" => "AVS data is invalid or AVS is not allowed for this card type.",
        "F" => "Card member's name does not match, but billing postal code matches.",
        "G" => "Non-U.S. issuing bank does not support AVS.",
        "H" => "Card member's name does not match. Street address and postal code match.",
        "I" => "Address not verified.",
        "J" => "Card member's name, billing address, and postal code match.",
        "K" => "Card member's name matches but billing address and billing postal code do not match.",
        "L" => "Card member's name and billing postal code match, but billing address does not match.",
        "M" => "Street address and postal code match.",
        "N" => "Street address and postal code do not match.",
        "O" => "Card member's name and billing address match, but billing postal code does not match.",
        "P" => "Postal code matches, but street address not verified.",
        "Q" => "Card member's name, billing address, and postal code match.",
        "R" => "System unavailable.",
        "S" => "U.S.-issuing bank does not support AVS.",
        "T" => "Card member's name does not match, but street address matches.",
        "U" => "Address information unavailable.",
        "V" => "Card member's name, billing address, and billing postal code match.",
        "W" => "Street address does not match, but 9-digit postal code matches.",
        "X" => "Street address and 9-digit postal code match.",
        "Y" => "Street address and 5-digit postal code match.",
        "Z" => "Street address does not match, but 5-digit postal code matches.",
        _ => return None,
    })
}

fn avs_street_match(code: &str) -> Option<&'static str> {
    match code {
        "A" | "B" | "D" | "H" | "J" | "M" | "O" | "Q" | "T" | "V" | "X" | "Y" => Some("Y"),
        "C" | "K" | "L" | "N" | "P" | "W" | "Z" => Some("N"),
        "G" | "S" | "U" | "R" | "I" | "E" => Some("X"),
        _ => None,
    }
}

fn avs_postal_match(code: &str) -> Option<&'static str> {
    match code {
        "D" | "H" | "F" | "J" | "L" | "M" | "P" | "Q" | "V" | "W" | "X" | "Y" | "Z" => Some("Y"),
        "A" | "C" | "K" | "N" | "O" => Some("N"),
        "G" | "S" | "U" | "R" | "I" | "E" | "B" => Some("X"),
        _ => None,
    }
}

/// Card verification value outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvvResult {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl CvvResult {
    pub fn from_code(code: Option<&str>) -> Self {
        let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
            return Self::default();
        };
        let code = code.to_ascii_uppercase();
        let message = match code.as_str() {
            "D" => Some("CVV check flagged transaction as suspicious"),
            "I" => Some("CVV failed data validation check"),
            "M" => Some("CVV matches"),
            "N" => Some("CVV does not match"),
            "P" => Some("CVV not processed"),
            "S" => Some("CVV should have been present"),
            "U" => Some("CVV request unable to be processed by issuer"),
            "X" => Some("Issuer does not participate in CVV2 service"),
            _ => None,
        };
        Self {
            code: Some(code),
            message: message.map(str::to_string),
        }
    }
}

/// Outcome of a verb, whatever the gateway.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub success: bool,
    pub message: String,
    /// The parsed response flattened to dotted keys.
    pub params: BTreeMap<String, String>,
    /// Encoded `AuthorizationHandle`.
    pub authorization: Option<String>,
    pub avs_result: AvsResult,
    pub cvv_result: CvvResult,
    pub error_code: Option<StandardErrorCode>,
    /// The gateway's own decline or error code.
    pub connector_error_code: Option<String>,
    pub status_code: u16,
    pub test: bool,
    pub network_transaction_id: Option<String>,
}

impl GatewayResponse {
    pub fn builder(success: bool, message: impl Into<String>) -> GatewayResponseBuilder {
        GatewayResponseBuilder {
            response: Self {
                success,
                message: message.into(),
                status_code: 200,
                ..Default::default()
            },
        }
    }

    /// Failed response for an outcome that never produced usable gateway fields.
    pub fn failure(message: impl Into<String>, status_code: u16) -> Self {
        Self::builder(false, message).status_code(status_code).build()
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn authorization_handle(&self) -> Option<AuthorizationHandle> {
        self.authorization
            .as_deref()
            .and_then(|encoded| AuthorizationHandle::decode(encoded).ok())
    }
}

#[derive(Debug)]
pub struct GatewayResponseBuilder {
    response: GatewayResponse,
}

impl GatewayResponseBuilder {
    pub fn params(mut self, params: BTreeMap<String, String>) -> Self {
        self.response.params = params;
        self
    }

    pub fn authorization(mut self, handle: Option<AuthorizationHandle>) -> Self {
        self.response.authorization = handle.map(|handle| handle.encode());
        self
    }

    pub fn avs_result(mut self, avs_result: AvsResult) -> Self {
        self.response.avs_result = avs_result;
        self
    }

    pub fn cvv_result(mut self, cvv_result: CvvResult) -> Self {
        self.response.cvv_result = cvv_result;
        self
    }

    pub fn error_code(mut self, error_code: Option<StandardErrorCode>) -> Self {
        self.response.error_code = error_code;
        self
    }

    pub fn connector_error_code(mut self, code: Option<String>) -> Self {
        self.response.connector_error_code = code;
        self
    }

    pub fn status_code(mut self, status_code: u16) -> Self {
        self.response.status_code = status_code;
        self
    }

    pub fn test(mut self, test: bool) -> Self {
        self.response.test = test;
        self
    }

    pub fn network_transaction_id(mut self, id: Option<String>) -> Self {
        self.response.network_transaction_id = id;
        self
    }

    pub fn build(self) -> GatewayResponse {
        self.response
    }
}
