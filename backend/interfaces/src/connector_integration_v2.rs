//! Per-flow integration contract of a connector.

use common_utils::{
    consts,
    request::{Method, Request, RequestBuilder, RequestContent},
    CustomResult,
};
use domain_types::{
    errors::ConnectorError,
    flat_mapping::{ContentTypeHint, FlatMapping},
    router_data_v2::RouterDataV2,
    router_response_types::{GatewayResponse, StandardErrorCode},
};
use error_stack::ResultExt;
use hyperswitch_masking::Maskable;

use crate::api::ConnectorCommon;

/// Short name of a flow marker type, e.g. `Authorize`.
pub fn flow_name<Flow>() -> String {
    let full = std::any::type_name::<Flow>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}

/// How one gateway turns a flow's data into a request and the response back
/// into `Resp`.
///
/// A connector that does not override `get_url` for a flow rejects that flow
/// with `FlowNotSupported` before anything is sent.
pub trait ConnectorIntegrationV2<Flow, Req, Resp = GatewayResponse>:
    ConnectorCommon + Sync
{
    fn get_headers(
        &self,
        _req: &RouterDataV2<Flow, Req>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(vec![])
    }

    fn get_content_type(&self) -> &'static str {
        self.common_get_content_type()
    }

    fn get_http_method(&self) -> Method {
        Method::Post
    }

    fn get_url(&self, _req: &RouterDataV2<Flow, Req>) -> CustomResult<String, ConnectorError> {
        Err(ConnectorError::FlowNotSupported {
            flow: flow_name::<Flow>(),
            connector: self.id().to_string(),
        }
        .into())
    }

    fn get_request_body(
        &self,
        _req: &RouterDataV2<Flow, Req>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        Ok(None)
    }

    fn get_response_format(&self) -> ContentTypeHint {
        self.common_get_response_format()
    }

    /// Fails with `FailedToObtainIntegrationUrl` when the endpoint does not
    /// resolve to an absolute URL, e.g. an unconfigured base url.
    fn build_request_v2(
        &self,
        req: &RouterDataV2<Flow, Req>,
    ) -> CustomResult<Option<Request>, ConnectorError> {
        let url = self.get_url(req)?;
        url::Url::parse(&url)
            .change_context(ConnectorError::FailedToObtainIntegrationUrl)
            .attach_printable_lazy(|| format!("{} endpoint {url:?}", self.id()))?;
        Ok(Some(
            RequestBuilder::new()
                .method(self.get_http_method())
                .url(&url)
                .attach_default_headers()
                .headers(self.get_headers(req)?)
                .set_optional_body(self.get_request_body(req)?)
                .build(),
        ))
    }

    /// Maps a successfully transported response to the flow's result.
    fn handle_response_v2(
        &self,
        _req: &RouterDataV2<Flow, Req>,
        _mapping: FlatMapping,
        _status_code: u16,
    ) -> CustomResult<Resp, ConnectorError> {
        Err(ConnectorError::NotImplemented(format!(
            "{} response handling for {}",
            flow_name::<Flow>(),
            self.id()
        ))
        .into())
    }

    /// Maps a 4xx response.
    fn get_error_response_v2(
        &self,
        mapping: FlatMapping,
        status_code: u16,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        self.build_error_response(&mapping, status_code)
    }

    /// Maps a 5xx response.
    fn get_5xx_error_response(
        &self,
        mapping: FlatMapping,
        status_code: u16,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let error_code = match status_code {
            500 => "internal_server_error",
            501 => "not_implemented",
            502 => "bad_gateway",
            503 => "service_unavailable",
            504 => "gateway_timeout",
            505 => "http_version_not_supported",
            506 => "variant_also_negotiates",
            507 => "insufficient_storage",
            508 => "loop_detected",
            510 => "not_extended",
            511 => "network_authentication_required",
            _ => "unknown_error",
        };
        let message = mapping
            .get_str("message")
            .or_else(|| mapping.get_str("error.message"))
            .unwrap_or_else(|| consts::CONNECTOR_UNAVAILABLE_MESSAGE.to_string());
        Ok(GatewayResponse::builder(false, message)
            .params(mapping.flatten())
            .status_code(status_code)
            .connector_error_code(Some(error_code.to_string()))
            .error_code(Some(StandardErrorCode::ProcessingError))
            .build())
    }
}

#[cfg(test)]
mod tests {
    use domain_types::connector_flow::{Authorize, Store};

    use super::*;

    #[test]
    fn flow_names_are_short() {
        assert_eq!(flow_name::<Authorize>(), "Authorize");
        assert_eq!(flow_name::<Store>(), "Store");
    }
}
