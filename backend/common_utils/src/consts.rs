use base64::engine::{general_purpose, GeneralPurpose};

/// Message used when a connector response carries no error message.
pub const NO_ERROR_MESSAGE: &str = "No error message";

/// Code used when a connector response carries no error code.
pub const NO_ERROR_CODE: &str = "No error code";

/// Message used when a connector answers with a 5xx status.
pub const CONNECTOR_UNAVAILABLE_MESSAGE: &str = "Connector is unavailable";

/// Message used when the connector could not be reached at all.
pub const REQUEST_NOT_SENT_MESSAGE: &str = "Request could not be sent to the connector";

/// Message used when the request timed out.
pub const REQUEST_TIMEOUT_MESSAGE: &str = "Connector request timed out";

/// Message used when the connector response could not be understood.
pub const RESPONSE_PARSE_FAILED_MESSAGE: &str = "Unable to parse the connector response";

pub const BASE64_ENGINE: GeneralPurpose = general_purpose::STANDARD;

/// Default request timeout in seconds
pub const REQUEST_TIME_OUT: u64 = 30;

pub const USER_AGENT: &str = "payment-gateway-connectors";

/// Minor amount used by authorize then void verification.
pub const VERIFY_AMOUNT_MINOR: i64 = 100;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
