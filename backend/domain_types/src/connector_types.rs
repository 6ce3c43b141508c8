use common_enums::{CaptureMethod, Currency};
use common_utils::MinorUnit;
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{
    authorization::AuthorizationHandle,
    payment_method_data::{Card, PaymentInstrument},
    router_request_types::{PaymentOptions, RequestContext},
    types::Connectors,
    utils::Error,
};

// snake case for enum variants
#[derive(Clone, Copy, Debug, Display, EnumString, EnumIter, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConnectorEnum {
    Forte,
    Nmi,
    Worldpayxml,
    Paysafe,
    Globalpay,
}

/// Data shared by every flow of one verb call.
#[derive(Debug, Clone)]
pub struct PaymentFlowData {
    pub connectors: Connectors,
    pub test_mode: bool,
    pub context: RequestContext,
    pub access_token: Option<AccessTokenResponseData>,
    /// Single use token produced by an earlier tokenization step of the same call.
    pub payment_method_token: Option<Secret<String>>,
}

impl PaymentFlowData {
    pub fn new(connectors: Connectors, test_mode: bool, context: RequestContext) -> Self {
        Self {
            connectors,
            test_mode,
            context,
            access_token: None,
            payment_method_token: None,
        }
    }

    pub fn get_access_token(&self) -> Result<&Secret<String>, Error> {
        self.access_token
            .as_ref()
            .map(|token| &token.access_token)
            .ok_or_else(crate::utils::missing_field_err("access_token"))
    }

    pub fn get_payment_method_token(&self) -> Result<&Secret<String>, Error> {
        self.payment_method_token
            .as_ref()
            .ok_or_else(crate::utils::missing_field_err("payment_method_token"))
    }
}

#[derive(Debug, Clone)]
pub struct PaymentsAuthorizeData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub payment_instrument: PaymentInstrument,
    pub capture_method: CaptureMethod,
    pub options: PaymentOptions,
}

impl PaymentsAuthorizeData {
    pub fn is_auto_capture(&self) -> bool {
        self.capture_method == CaptureMethod::Automatic
    }

    pub fn get_card(&self) -> Result<&Card, Error> {
        self.payment_instrument.get_card()
    }

    /// Kind recorded in the authorization handle.
    pub fn handle_kind(&self) -> &'static str {
        if self.is_auto_capture() {
            "purchase"
        } else {
            "authorize"
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentsCaptureData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub authorization: AuthorizationHandle,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct PaymentVoidData {
    pub authorization: AuthorizationHandle,
    pub options: PaymentOptions,
}

impl PaymentVoidData {
    /// Amount to release: the handle's amount, if it recorded one.
    pub fn get_amount(&self) -> Result<MinorUnit, Error> {
        self.authorization
            .amount
            .ok_or_else(crate::utils::missing_field_err("authorization.amount"))
    }

    pub fn get_currency(&self) -> Result<Currency, Error> {
        self.authorization
            .currency
            .ok_or_else(crate::utils::missing_field_err("authorization.currency"))
    }
}

#[derive(Debug, Clone)]
pub struct RefundsData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub authorization: AuthorizationHandle,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct PaymentMethodTokenizationData {
    pub payment_instrument: PaymentInstrument,
    pub amount: Option<MinorUnit>,
    pub currency: Currency,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct StoreData {
    pub payment_instrument: PaymentInstrument,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct UnstoreData {
    pub reference: Secret<String>,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct VerifyData {
    pub payment_instrument: PaymentInstrument,
    pub currency: Currency,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone, Default)]
pub struct AccessTokenRequestData {
    pub grant_type: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccessTokenResponseData {
    pub access_token: Secret<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
}
