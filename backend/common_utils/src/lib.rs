//! Common utilities for the payment gateway connectors

pub mod consts;
pub mod crypto;
pub mod errors;
pub mod ext_traits;
pub mod pii;
pub mod request;
pub mod types;

pub use errors::{CustomResult, ParsingError, ValidationError};
pub use pii::{Email, SecretSerdeValue};
pub use request::{Method, Request, RequestContent};
pub use types::{
    AmountConvertor, FloatMajorUnit, FloatMajorUnitForConnector, MinorUnit,
    MinorUnitForConnector, StringMajorUnit, StringMajorUnitForConnector, StringMinorUnit,
    StringMinorUnitForConnector,
};

/// Generates a random nonce suitable for signed connector requests.
pub fn generate_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Generates an idempotency key with the given prefix.
pub fn generate_id_with_prefix(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}

pub mod date_time {
    use time::OffsetDateTime;

    /// Current UTC time
    pub fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
