//! Errors and error specific types for universal use

/// Custom Result
/// A custom datatype that wraps the error variant <E> into a report, allowing
/// error_stack::Report<E> specific extendability
///
/// Effectively, equivalent to `Result<T, error_stack::Report<E>>`
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Parsing Errors
#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    ///Failed to parse struct
    #[error("Failed to parse struct: {0}")]
    StructParseFailure(&'static str),
    /// Failed to parse email
    #[error("Failed to parse email")]
    EmailParsingError,
    /// Failed to convert i64 to decimal
    #[error("Failed to convert i64 to a decimal")]
    I64ToDecimalConversionFailure,
    /// Failed to convert float to decimal
    #[error("Failed to convert float to a decimal")]
    FloatToDecimalConversionFailure,
    /// Failed to convert decimal to i64
    #[error("Failed to convert decimal to i64")]
    DecimalToI64ConversionFailure,
    /// Failed to convert string to decimal
    #[error("Failed to convert string to decimal: {error}")]
    StringToDecimalConversionFailure { error: String },
}

/// Validation errors.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided input is missing a required field.
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: String },

    /// An incorrect value was provided for the field specified by `field_name`.
    #[error("Incorrect value provided for field: {field_name}")]
    IncorrectValueProvided { field_name: &'static str },

    /// An invalid input was provided.
    #[error("{message}")]
    InvalidValue { message: String },
}

/// Cryptographic algorithm errors
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The cryptographic algorithm was unable to encode the message
    #[error("Failed to encode given message")]
    EncodingFailed,
    /// The cryptographic algorithm was unable to sign the message
    #[error("Failed to sign message")]
    MessageSigningFailed,
    /// The provided key was not valid for the algorithm
    #[error("Invalid key provided")]
    InvalidKey,
}
