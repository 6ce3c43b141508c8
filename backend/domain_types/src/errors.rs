#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConnectorError {
    #[error("Error while obtaining URL for the integration")]
    FailedToObtainIntegrationUrl,
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Request encoding failed : {0}")]
    RequestEncodingFailedWithReason(String),
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Failed to handle connector response")]
    ResponseHandlingFailed,
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Invalid data format for field: {field_name}")]
    InvalidDataFormat { field_name: &'static str },
    #[error("Failed to obtain authentication type")]
    FailedToObtainAuthType,
    #[error("This step has not been implemented for: {0}")]
    NotImplemented(String),
    #[error("{message} is not supported by {connector}")]
    NotSupported {
        message: String,
        connector: &'static str,
    },
    #[error("{flow} flow not supported by {connector} connector")]
    FlowNotSupported { flow: String, connector: String },
    #[error("Missing connector transaction ID")]
    MissingConnectorTransactionID,
    #[error("Authorization handle could not be decoded")]
    InvalidAuthorizationHandle,
    #[error("Failed to convert amount to the connector's unit")]
    AmountConversionFailed,
    #[error("{message} is not supported by {connector}")]
    CurrencyNotSupported {
        message: String,
        connector: &'static str,
    },
}

impl ConnectorError {
    /// Errors raised while shaping a request, before anything is sent.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::FailedToObtainIntegrationUrl
                | Self::MissingRequiredField { .. }
                | Self::InvalidDataFormat { .. }
                | Self::FailedToObtainAuthType
                | Self::NotSupported { .. }
                | Self::FlowNotSupported { .. }
                | Self::MissingConnectorTransactionID
                | Self::InvalidAuthorizationHandle
                | Self::AmountConversionFailed
                | Self::CurrencyNotSupported { .. }
        )
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ApiClientError {
    #[error("Failed to url encode the request")]
    UrlEncodingFailed,
    #[error("Header map construction failed")]
    HeaderMapConstructionFailed,
    #[error("Failed to construct API client")]
    ClientConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Failed to send request to connector {0}")]
    RequestNotSent(String),
    #[error("Server responded with Request Timeout")]
    RequestTimeoutReceived,
    #[error("Failed to decode response")]
    ResponseDecodingFailed,
    #[error("Unexpected state reached/Invariants conflicted")]
    UnexpectedState,
    #[error("Failed to serialize the request body")]
    BodySerializationFailed,
}

impl ApiClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestTimeoutReceived)
    }
}
