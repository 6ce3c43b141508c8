pub mod validate;

use std::ops::Deref;

use common_utils::{date_time, errors};
use error_stack::report;
use hyperswitch_masking::{PeekInterface, StrongSecret};
use serde::{de, Deserialize, Serialize};

pub use crate::validate::{CCValError, CardNumber, CardNumberStrategy};

/// Expiry month, 1 through 12.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CardExpirationMonth(StrongSecret<u8>);

impl CardExpirationMonth {
    pub fn two_digits(&self) -> String {
        format!("{:02}", self.peek())
    }
}

impl TryFrom<u8> for CardExpirationMonth {
    type Error = error_stack::Report<errors::ValidationError>;
    fn try_from(month: u8) -> Result<Self, Self::Error> {
        if (1..=12).contains(&month) {
            Ok(Self(StrongSecret::new(month)))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration month".to_string()
            }))
        }
    }
}

impl<'de> Deserialize<'de> for CardExpirationMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let month = u8::deserialize(deserializer)?;
        month.try_into().map_err(de::Error::custom)
    }
}

impl Deref for CardExpirationMonth {
    type Target = StrongSecret<u8>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Expiry year, accepted as two or four digits and stored as four.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CardExpirationYear(StrongSecret<u16>);

impl CardExpirationYear {
    pub fn four_digits(&self) -> String {
        self.peek().to_string()
    }

    pub fn two_digits(&self) -> String {
        format!("{:02}", self.peek() % 100)
    }
}

impl TryFrom<u16> for CardExpirationYear {
    type Error = error_stack::Report<errors::ValidationError>;
    fn try_from(year: u16) -> Result<Self, Self::Error> {
        let year = if year < 100 { 2000 + year } else { year };
        let current_year = u16::try_from(date_time::now().year()).unwrap_or(u16::MAX);
        // Allow a year of slack in both directions for cards issued around a new year.
        if year.saturating_add(1) >= current_year && year <= current_year.saturating_add(50) {
            Ok(Self(StrongSecret::new(year)))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration year".to_string()
            }))
        }
    }
}

impl<'de> Deserialize<'de> for CardExpirationYear {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let year = u16::deserialize(deserializer)?;
        year.try_into().map_err(de::Error::custom)
    }
}

impl Deref for CardExpirationYear {
    type Target = StrongSecret<u16>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn month_bounds() {
        assert_eq!(CardExpirationMonth::try_from(3).unwrap().two_digits(), "03");
        assert!(CardExpirationMonth::try_from(0).is_err());
        assert!(CardExpirationMonth::try_from(13).is_err());
    }

    #[test]
    fn two_digit_year_is_widened() {
        let next_year = u16::try_from(date_time::now().year() + 1).unwrap();
        let year = CardExpirationYear::try_from(next_year % 100).unwrap();
        assert_eq!(year.four_digits(), next_year.to_string());
        assert_eq!(year.two_digits(), format!("{:02}", next_year % 100));
        assert!(CardExpirationYear::try_from(1999).is_err());
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        assert!(CardExpirationYear::try_from(u16::MAX).is_err());
        assert!(serde_json::from_str::<CardExpirationYear>("65535").is_err());
    }
}
