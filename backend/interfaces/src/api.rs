use common_enums::Currency;
use common_utils::{consts, CustomResult};
use domain_types::{
    errors::ConnectorError,
    flat_mapping::{ContentTypeHint, FlatMapping},
    router_data::ConnectorAuthType,
    router_response_types::{GatewayResponse, StandardErrorCode},
    types::Connectors,
};
use hyperswitch_masking::Maskable;

/// Behaviour shared by every flow of one gateway.
pub trait ConnectorCommon {
    /// Name of the connector (in lowercase).
    fn id(&self) -> &'static str;

    /// HTTP header used for authorization.
    fn get_auth_header(
        &self,
        _auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(Vec::new())
    }

    /// HTTP `Content-Type` to be used for POST requests.
    /// Defaults to `application/json`.
    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    /// Format the gateway answers in.
    fn common_get_response_format(&self) -> ContentTypeHint {
        ContentTypeHint::Json
    }

    /// Currency used when the caller does not name one.
    fn default_currency(&self) -> Currency {
        Currency::USD
    }

    /// The base URL for interacting with the connector's API.
    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str;

    /// Common error response for a connector if it is same in all cases.
    ///
    /// The default looks for the usual message and code keys before giving up
    /// with `NO_ERROR_MESSAGE`.
    fn build_error_response(
        &self,
        mapping: &FlatMapping,
        status_code: u16,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let message = first_present(mapping, ERROR_MESSAGE_PATHS);
        let code = first_present(mapping, ERROR_CODE_PATHS);
        let message = message.unwrap_or_else(|| fallback_error_message(self.id(), status_code));
        Ok(GatewayResponse::builder(false, message)
            .params(mapping.flatten())
            .status_code(status_code)
            .connector_error_code(code)
            .error_code(Some(StandardErrorCode::ProcessingError))
            .build())
    }
}

const ERROR_MESSAGE_PATHS: &[&str] = &[
    "message",
    "error.message",
    "error_message",
    "errors.0.message",
    "detail",
];

const ERROR_CODE_PATHS: &[&str] = &["code", "error.code", "error_code", "errors.0.code"];

fn first_present(mapping: &FlatMapping, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| mapping.get_str(path))
}

/// Message for a response that carries none: the HTTP reason phrase if there
/// is one, otherwise `NO_ERROR_MESSAGE`.
pub fn fallback_error_message(connector: &str, status_code: u16) -> String {
    match http::StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .filter(|_| status_code >= 300)
    {
        Some(reason) => reason.to_string(),
        None => {
            tracing::warn!(
                connector,
                status_code,
                "connector response carried no error message"
            );
            consts::NO_ERROR_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Dummy;

    impl ConnectorCommon for Dummy {
        fn id(&self) -> &'static str {
            "dummy"
        }

        fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
            connectors.nmi.base_url.as_ref()
        }
    }

    fn mapping(value: serde_json::Value) -> FlatMapping {
        match value {
            serde_json::Value::Object(fields) => FlatMapping::new(fields, ""),
            _ => FlatMapping::default(),
        }
    }

    #[test]
    fn error_response_uses_connector_message() {
        let response = Dummy
            .build_error_response(
                &mapping(json!({"error": {"message": "Card expired", "code": "E12"}})),
                402,
            )
            .ok();
        let response = response.unwrap_or_default();
        assert!(!response.success);
        assert_eq!(response.message, "Card expired");
        assert_eq!(response.connector_error_code.as_deref(), Some("E12"));
        assert_eq!(response.status_code, 402);
    }

    #[test]
    fn error_response_falls_back_to_reason_then_constant() {
        let response = Dummy
            .build_error_response(&FlatMapping::default(), 404)
            .ok()
            .unwrap_or_default();
        assert_eq!(response.message, "Not Found");

        assert_eq!(fallback_error_message("dummy", 200), consts::NO_ERROR_MESSAGE);
        assert_eq!(fallback_error_message("dummy", 299), consts::NO_ERROR_MESSAGE);
    }
}
