/// ISO 4217 currency codes accepted by the connectors.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[allow(clippy::upper_case_acronyms)]
pub enum Currency {
    AED,
    AUD,
    BHD,
    BRL,
    CAD,
    CHF,
    CLP,
    CNY,
    CZK,
    DKK,
    EUR,
    GBP,
    HKD,
    HUF,
    IDR,
    ILS,
    INR,
    JOD,
    JPY,
    KRW,
    KWD,
    MXN,
    MYR,
    NOK,
    NZD,
    OMR,
    PHP,
    PLN,
    SAR,
    SEK,
    SGD,
    THB,
    TND,
    TRY,
    TWD,
    UGX,
    #[default]
    USD,
    VND,
    XAF,
    XOF,
    ZAR,
}

impl Currency {
    pub fn iso_4217(self) -> &'static str {
        match self {
            Self::AED => "784",
            Self::AUD => "036",
            Self::BHD => "048",
            Self::BRL => "986",
            Self::CAD => "124",
            Self::CHF => "756",
            Self::CLP => "152",
            Self::CNY => "156",
            Self::CZK => "203",
            Self::DKK => "208",
            Self::EUR => "978",
            Self::GBP => "826",
            Self::HKD => "344",
            Self::HUF => "348",
            Self::IDR => "360",
            Self::ILS => "376",
            Self::INR => "356",
            Self::JOD => "400",
            Self::JPY => "392",
            Self::KRW => "410",
            Self::KWD => "414",
            Self::MXN => "484",
            Self::MYR => "458",
            Self::NOK => "578",
            Self::NZD => "554",
            Self::OMR => "512",
            Self::PHP => "608",
            Self::PLN => "985",
            Self::SAR => "682",
            Self::SEK => "752",
            Self::SGD => "702",
            Self::THB => "764",
            Self::TND => "788",
            Self::TRY => "949",
            Self::TWD => "901",
            Self::UGX => "800",
            Self::USD => "840",
            Self::VND => "704",
            Self::XAF => "950",
            Self::XOF => "952",
            Self::ZAR => "710",
        }
    }

    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::CLP | Self::JPY | Self::KRW | Self::UGX | Self::VND | Self::XAF | Self::XOF
        )
    }

    pub fn is_three_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::BHD | Self::JOD | Self::KWD | Self::OMR | Self::TND
        )
    }

    pub fn number_of_digits_after_decimal_point(self) -> u8 {
        if self.is_zero_decimal_currency() {
            0
        } else if self.is_three_decimal_currency() {
            3
        } else {
            2
        }
    }
}

/// Card brands recognised from the card number prefix.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
pub enum CardNetwork {
    #[serde(alias = "VISA")]
    Visa,
    #[serde(alias = "MASTERCARD")]
    Mastercard,
    #[serde(alias = "AMERICANEXPRESS")]
    #[serde(alias = "AMEX")]
    AmericanExpress,
    #[serde(alias = "DISCOVER")]
    Discover,
    #[serde(alias = "DINERSCLUB")]
    DinersClub,
    JCB,
    #[serde(alias = "MAESTRO")]
    Maestro,
    #[serde(alias = "UNIONPAY")]
    UnionPay,
}

/// Specifies how the payment is captured.
/// - `automatic`: funds are captured in the same call as the authorization (a purchase).
/// - `manual`: funds are only held; a later capture call settles them.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaptureMethod {
    #[default]
    Automatic,
    Manual,
}

/// Shape of the instrument a request is paid with.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethodType {
    Card,
    Token,
    StoredReference,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn currency_exponents() {
        assert_eq!(Currency::USD.number_of_digits_after_decimal_point(), 2);
        assert_eq!(Currency::JPY.number_of_digits_after_decimal_point(), 0);
        assert_eq!(Currency::KWD.number_of_digits_after_decimal_point(), 3);
    }

    #[test]
    fn currency_string_forms() {
        assert_eq!(Currency::from_str("EUR"), Ok(Currency::EUR));
        assert_eq!(Currency::GBP.to_string(), "GBP");
        assert_eq!(Currency::USD.iso_4217(), "840");
        assert_eq!(
            serde_json::to_string(&Currency::CAD).ok().as_deref(),
            Some("\"CAD\"")
        );
    }

    #[test]
    fn capture_method_is_snake_case() {
        assert_eq!(CaptureMethod::Manual.to_string(), "manual");
        assert_eq!(CaptureMethod::default(), CaptureMethod::Automatic);
    }
}
