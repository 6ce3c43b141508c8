use std::sync::LazyLock;

use common_enums::{CardNetwork, Currency};
use common_utils::{AmountConvertor, MinorUnit};
use error_stack::ResultExt;
use regex::Regex;

use crate::errors;

pub type Error = error_stack::Report<errors::ConnectorError>;

pub fn missing_field_err(
    message: &'static str,
) -> Box<dyn Fn() -> error_stack::Report<errors::ConnectorError> + 'static> {
    Box::new(move || {
        errors::ConnectorError::MissingRequiredField {
            field_name: message,
        }
        .into()
    })
}

pub fn convert_amount<T>(
    amount_convertor: &dyn AmountConvertor<Output = T>,
    amount: MinorUnit,
    currency: Currency,
) -> Result<T, Error> {
    amount_convertor
        .convert(amount, currency)
        .change_context(errors::ConnectorError::AmountConversionFailed)
        .attach_printable_lazy(|| format!("amount {amount} in {currency}"))
}

/// Infers the card network from the card number prefix.
#[track_caller]
pub fn get_card_issuer(card_number: &str) -> Result<CardNetwork, Error> {
    for (network, regex) in CARD_REGEX.iter() {
        let regex = regex
            .as_ref()
            .map_err(Clone::clone)
            .change_context(errors::ConnectorError::RequestEncodingFailed)?;
        if regex.is_match(card_number) {
            return Ok(*network);
        }
    }
    Err(error_stack::Report::new(
        errors::ConnectorError::NotImplemented("Card Type".into()),
    ))
}

/// Checked in order: Discover before UnionPay, whose ranges overlap.
static CARD_REGEX: LazyLock<Vec<(CardNetwork, Result<Regex, regex::Error>)>> =
    LazyLock::new(|| {
        vec![
            (
                CardNetwork::Mastercard,
                Regex::new(r"^(5[1-5][0-9]{14}|2(2[2-9][1-9]|[3-6][0-9]{2}|7[01][0-9]|720)[0-9]{12})$"),
            ),
            (CardNetwork::AmericanExpress, Regex::new(r"^3[47][0-9]{13}$")),
            (CardNetwork::Visa, Regex::new(r"^4[0-9]{12}(?:[0-9]{3}){0,2}$")),
            (
                CardNetwork::Discover,
                Regex::new(r"^(65[4-9][0-9]{13}|64[4-9][0-9]{13}|6011[0-9]{12}|(622(?:12[6-9]|1[3-9][0-9]|[2-8][0-9][0-9]|9[01][0-9]|92[0-5])[0-9]{10}))$"),
            ),
            (
                CardNetwork::Maestro,
                Regex::new(r"^(5018|5020|5038|5893|6304|6759|6761|6762|6763)[0-9]{8,15}$"),
            ),
            (
                CardNetwork::DinersClub,
                Regex::new(r"^3(?:0[0-5]|[68][0-9])[0-9]{11}$"),
            ),
            (
                CardNetwork::JCB,
                Regex::new(r"^(3(?:088|096|112|158|337|5(?:2[89]|[3-8][0-9]))\d{12})$"),
            ),
            (CardNetwork::UnionPay, Regex::new(r"^62[0-9]{14,17}$")),
        ]
    });
