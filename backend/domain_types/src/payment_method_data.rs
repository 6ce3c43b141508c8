use cards::{CardExpirationMonth, CardExpirationYear, CardNumber};
use common_enums::{CardNetwork, PaymentMethodType};
use common_utils::ValidationError;
use error_stack::ResultExt;
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    errors,
    utils::{get_card_issuer, missing_field_err, Error},
};

/// What the customer pays with. The shape is fixed when the request is built
/// and does not change for the rest of the call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PaymentInstrument {
    Card(Card),
    /// Opaque token issued by the gateway, e.g. a tokenized card.
    Token(Secret<String>),
    /// Reference to a customer profile stored at the gateway.
    StoredReference(Secret<String>),
}

impl PaymentInstrument {
    pub fn get_payment_method_type(&self) -> PaymentMethodType {
        match self {
            Self::Card(_) => PaymentMethodType::Card,
            Self::Token(_) => PaymentMethodType::Token,
            Self::StoredReference(_) => PaymentMethodType::StoredReference,
        }
    }

    pub fn get_card(&self) -> Result<&Card, Error> {
        match self {
            Self::Card(card) => Ok(card),
            Self::Token(_) | Self::StoredReference(_) => Err(missing_field_err("payment_instrument.card")()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub card_number: CardNumber,
    /// Two digits, zero padded.
    pub card_exp_month: Secret<String>,
    /// Four digits.
    pub card_exp_year: Secret<String>,
    pub card_cvc: Option<Secret<String>>,
    pub card_holder_name: Option<Secret<String>>,
    pub card_network: Option<CardNetwork>,
}

impl Card {
    /// Builds a card, validating the expiry and widening a two digit year.
    pub fn new(
        card_number: CardNumber,
        exp_month: u8,
        exp_year: u16,
        card_cvc: Option<Secret<String>>,
        card_holder_name: Option<Secret<String>>,
    ) -> common_utils::CustomResult<Self, ValidationError> {
        let month = CardExpirationMonth::try_from(exp_month)?;
        let year = CardExpirationYear::try_from(exp_year)?;
        let card_network = get_card_issuer(&card_number.get_card_no()).ok();
        Ok(Self {
            card_number,
            card_exp_month: Secret::new(month.two_digits()),
            card_exp_year: Secret::new(year.four_digits()),
            card_cvc,
            card_holder_name,
            card_network,
        })
    }

    pub fn get_card_issuer(&self) -> Result<CardNetwork, Error> {
        match self.card_network {
            Some(network) => Ok(network),
            None => get_card_issuer(&self.card_number.get_card_no()),
        }
    }

    pub fn get_expiry_year_4_digit(&self) -> Secret<String> {
        let year = self.card_exp_year.peek();
        if year.len() == 2 {
            Secret::new(format!("20{year}"))
        } else {
            Secret::new(year.clone())
        }
    }

    pub fn get_card_expiry_year_2_digit(&self) -> Result<Secret<String>, Error> {
        let year = self.card_exp_year.peek();
        year.get(year.len().saturating_sub(2)..)
            .filter(|digits| digits.len() == 2)
            .map(|digits| Secret::new(digits.to_string()))
            .ok_or_else(|| {
                errors::ConnectorError::InvalidDataFormat {
                    field_name: "card_exp_year",
                }
                .into()
            })
    }

    /// `MMYY`, optionally with a delimiter between month and year.
    pub fn get_card_expiry_month_year_2_digit_with_delimiter(
        &self,
        delimiter: &str,
    ) -> Result<Secret<String>, Error> {
        let year = self.get_card_expiry_year_2_digit()?;
        Ok(Secret::new(format!(
            "{}{}{}",
            self.card_exp_month.peek(),
            delimiter,
            year.peek()
        )))
    }

    pub fn get_expiry_month_as_u8(&self) -> Result<Secret<u8>, Error> {
        self.card_exp_month
            .peek()
            .parse::<u8>()
            .change_context(errors::ConnectorError::InvalidDataFormat {
                field_name: "card_exp_month",
            })
            .map(Secret::new)
    }

    pub fn get_cardholder_name(&self) -> Result<Secret<String>, Error> {
        self.card_holder_name
            .clone()
            .filter(|name| !name.peek().trim().is_empty())
            .ok_or_else(missing_field_err("payment_instrument.card.card_holder_name"))
    }

    /// Every word of the holder name but the last.
    pub fn get_first_name(&self) -> Option<Secret<String>> {
        let (first, _) = split_name(self.card_holder_name.as_ref()?.peek());
        first.map(Secret::new)
    }

    /// Last word of the holder name.
    pub fn get_last_name(&self) -> Option<Secret<String>> {
        let (_, last) = split_name(self.card_holder_name.as_ref()?.peek());
        last.map(Secret::new)
    }
}

fn split_name(full_name: &str) -> (Option<String>, Option<String>) {
    let mut parts: Vec<&str> = full_name.split_whitespace().collect();
    let last = parts.pop().map(str::to_string);
    let first = (!parts.is_empty()).then(|| parts.join(" "));
    match (first, last) {
        (None, Some(only)) => (Some(only), None),
        other => other,
    }
}
