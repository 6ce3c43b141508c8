use std::{str::FromStr, time::Duration};

use common_utils::{
    consts,
    request::{Headers, Method, Request, RequestContent},
    CustomResult,
};
use domain_types::{
    errors::{ApiClientError, ConnectorError},
    flat_mapping::{ContentTypeHint, FlatMapping},
    router_data_v2::RouterDataV2,
    router_response_types::{GatewayResponse, Response},
    types::Proxy,
};
use error_stack::{report, ResultExt};
use interfaces::{connector_integration_v2::ConnectorIntegrationV2, decode::ResponseParser};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::field::Empty;

use crate::{configs::HttpClientConfig, shared_metrics as metrics};

/// One synchronous HTTP exchange.
///
/// `Ok(Ok(_))` is a 2xx (or 302) answer, `Ok(Err(_))` any other status the
/// gateway answered with, and `Err` a request that never got an answer.
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> CustomResult<Result<Response, Response>, ApiClientError>;
}

/// [`Transport`] backed by a blocking reqwest client.
///
/// Clients are built on first use, one for proxied and one for direct
/// traffic, and reused afterwards.
#[derive(Debug)]
pub struct HttpTransport {
    proxy: Proxy,
    timeout: Duration,
    non_proxied_client: OnceCell<Client>,
    proxied_client: OnceCell<Client>,
}

impl HttpTransport {
    pub fn new(proxy: Proxy, http_client: &HttpClientConfig) -> Self {
        Self {
            proxy,
            timeout: Duration::from_secs(http_client.timeout),
            non_proxied_client: OnceCell::new(),
            proxied_client: OnceCell::new(),
        }
    }

    fn get_client(&self, should_bypass_proxy: bool) -> CustomResult<&Client, ApiClientError> {
        let cell = if should_bypass_proxy || !self.proxy.is_proxy_configured() {
            &self.non_proxied_client
        } else {
            &self.proxied_client
        };
        cell.get_or_try_init(|| {
            self.get_client_builder(should_bypass_proxy)?
                .build()
                .change_context(ApiClientError::ClientConstructionFailed)
                .inspect_err(|err| {
                    error_log(
                        "ERROR",
                        &json!(format!("Failed to construct base client. Error: {:?}", err)),
                    );
                })
        })
    }

    fn get_client_builder(
        &self,
        should_bypass_proxy: bool,
    ) -> CustomResult<reqwest::blocking::ClientBuilder, ApiClientError> {
        let mut client_builder = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(self.timeout)
            .pool_idle_timeout(Duration::from_secs(
                self.proxy.idle_pool_connection_timeout.unwrap_or_default(),
            ));

        if should_bypass_proxy {
            return Ok(client_builder);
        }

        if let Some(url) = self.proxy.https_url.as_ref() {
            client_builder = client_builder.proxy(
                reqwest::Proxy::https(url)
                    .change_context(ApiClientError::InvalidProxyConfiguration)
                    .attach_printable("HTTPS proxy configuration error")?,
            );
        }

        if let Some(url) = self.proxy.http_url.as_ref() {
            client_builder = client_builder.proxy(
                reqwest::Proxy::http(url)
                    .change_context(ApiClientError::InvalidProxyConfiguration)
                    .attach_printable("HTTP proxy configuration error")?,
            );
        }

        Ok(client_builder)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(Proxy::default(), &HttpClientConfig::default())
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> CustomResult<Result<Response, Response>, ApiClientError> {
        call_connector_api(self, request)
    }
}

pub fn call_connector_api(
    transport: &HttpTransport,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;
    let should_bypass_proxy = transport.proxy.should_bypass(url.as_str());
    let client = transport.get_client(should_bypass_proxy)?;
    let headers = request.headers.construct_header_map()?;

    let builder = client
        .request(request.method.to_reqwest_method(), url)
        .headers(headers);
    let builder = match request.body {
        Some(RequestContent::Json(payload)) => builder.json(&payload),
        Some(RequestContent::FormUrlEncoded(payload)) => builder.form(&payload),
        Some(body @ RequestContent::Xml(_)) => builder.body(body.get_body_bytes()),
        Some(RequestContent::RawBytes(bytes)) => builder.body(bytes),
        None => builder,
    };

    let response = builder.send().map_err(|error| {
        let api_error = if error.is_timeout() {
            ApiClientError::RequestTimeoutReceived
        } else if error.is_builder() {
            // The url is parsed above, so a builder error is the body.
            ApiClientError::BodySerializationFailed
        } else {
            ApiClientError::RequestNotSent(error.to_string())
        };
        info_log(
            "REQUEST_FAILURE",
            &json!("Unable to send request to connector."),
        );
        report!(api_error)
    })?;

    handle_response(response)
}

fn handle_response(
    response: reqwest::blocking::Response,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let status_code = response.status().as_u16();
    let headers = response.headers().to_owned();
    let into_response = |response: reqwest::blocking::Response| {
        response
            .bytes()
            .change_context(ApiClientError::ResponseDecodingFailed)
            .map(|body| Response::new(status_code, body).with_headers(headers))
    };
    match status_code {
        200..=299 | 302 => Ok(Ok(into_response(response)?)),
        400..=599 => Ok(Err(into_response(response)?)),
        _ => {
            info_log(
                "UNEXPECTED_RESPONSE",
                &json!("Unexpected response from server."),
            );
            Err(report!(ApiClientError::UnexpectedState)
                .attach_printable(format!("unexpected status code {status_code}")))
        }
    }
}

/// Runs one Request, Transport, Parse, Map cycle of a flow.
///
/// Errors raised while building the request come back as `Err` before
/// anything is sent. Everything that happens after the request left (a
/// transport failure, a non-2xx status, a body the mapper cannot read)
/// becomes `Ok(Err(response))` with `success == false`.
#[tracing::instrument(
    name = "execute_connector_processing_step",
    skip_all,
    fields(
        connector = connector.id(),
        flow = %interfaces::connector_integration_v2::flow_name::<F>(),
        request.headers = Empty,
        request.body = Empty,
        request.url = Empty,
        request.method = Empty,
        response.status_code = Empty,
        response.error_message = Empty,
        message_ = "Golden Log Line (outgoing)",
        latency = Empty,
    )
)]
pub fn execute_connector_processing_step<F, Req, Resp, C>(
    transport: &dyn Transport,
    connector: &C,
    router_data: &RouterDataV2<F, Req>,
) -> CustomResult<Result<Resp, GatewayResponse>, ConnectorError>
where
    C: ConnectorIntegrationV2<F, Req, Resp> + ?Sized,
{
    let start = std::time::Instant::now();
    let connector_name = connector.id();
    let flow = interfaces::connector_integration_v2::flow_name::<F>();
    let test_mode = router_data.resource_common_data.test_mode;

    let request = connector
        .build_request_v2(router_data)?
        .ok_or(ConnectorError::RequestEncodingFailedWithReason(format!(
            "{flow} produced no request"
        )))?;

    let masked_headers = request.get_masked_headers();
    let masked_body = request
        .body
        .as_ref()
        .map(RequestContent::get_masked_value)
        .unwrap_or(Value::Null);
    let method = request.method;
    let span = tracing::Span::current();
    span.record("request.headers", tracing::field::display(&masked_headers));
    span.record("request.body", tracing::field::display(&masked_body));
    span.record("request.url", tracing::field::display(&request.url));
    span.record("request.method", tracing::field::display(method));
    tracing::info!(request = %masked_body, "request of connector");

    metrics::EXTERNAL_SERVICE_TOTAL_API_CALLS
        .with_label_values(&[&method.to_string(), connector_name, &flow])
        .inc();

    let transport_start = std::time::Instant::now();
    let response = transport.send(request);
    metrics::EXTERNAL_SERVICE_API_CALLS_LATENCY
        .with_label_values(&[&method.to_string(), connector_name, &flow])
        .observe(transport_start.elapsed().as_secs_f64());

    let result = match response {
        Ok(Ok(body)) => {
            span.record("response.status_code", body.status_code);
            let mapping = ResponseParser::parse(&body.response, response_format(connector, &body));
            tracing::info!(
                response = %mapping.as_value(),
                parse_error = mapping.parse_error,
                "response from connector"
            );
            map_success_response(connector, router_data, mapping, body.status_code)?
        }
        Ok(Err(body)) => {
            metrics::EXTERNAL_SERVICE_API_CALLS_ERRORS
                .with_label_values(&[
                    &method.to_string(),
                    connector_name,
                    &flow,
                    body.status_code.to_string().as_str(),
                ])
                .inc();
            span.record("response.status_code", body.status_code);
            let mapping = ResponseParser::parse(&body.response, response_format(connector, &body));
            tracing::info!(response = %mapping.as_value(), "error response from connector");
            let mut error = match body.status_code {
                500..=599 => connector.get_5xx_error_response(mapping, body.status_code)?,
                _ => connector.get_error_response_v2(mapping, body.status_code)?,
            };
            error.test = test_mode;
            Err(error)
        }
        Err(err) => {
            metrics::EXTERNAL_SERVICE_API_CALLS_ERRORS
                .with_label_values(&[&method.to_string(), connector_name, &flow, "network"])
                .inc();
            error_log(
                "NETWORK_ERROR",
                &json!(format!(
                    "Failed getting response from connector. Error: {:?}",
                    err
                )),
            );
            let message = if err.current_context().is_timeout() {
                consts::REQUEST_TIMEOUT_MESSAGE
            } else {
                consts::REQUEST_NOT_SENT_MESSAGE
            };
            let mut error = GatewayResponse::failure(message, 0);
            error.test = test_mode;
            Err(error)
        }
    };

    if let Err(error) = &result {
        span.record("response.error_message", tracing::field::display(&error.message));
    }
    span.record("latency", start.elapsed().as_millis() as u64);
    tracing::info!(tag = %Tag::OutgoingApi, log_type = "api", "Outgoing Request completed");
    Ok(result)
}

fn response_format<F, Req, Resp, C>(connector: &C, body: &Response) -> ContentTypeHint
where
    C: ConnectorIntegrationV2<F, Req, Resp> + ?Sized,
{
    match connector.get_response_format() {
        ContentTypeHint::Auto => body
            .content_type()
            .map(ContentTypeHint::from_content_type)
            .unwrap_or(ContentTypeHint::Auto),
        format => format,
    }
}

/// A mapper that cannot read the body yields a failed response rather than
/// an error; any other mapper error is passed on.
fn map_success_response<F, Req, Resp, C>(
    connector: &C,
    router_data: &RouterDataV2<F, Req>,
    mapping: FlatMapping,
    status_code: u16,
) -> CustomResult<Result<Resp, GatewayResponse>, ConnectorError>
where
    C: ConnectorIntegrationV2<F, Req, Resp> + ?Sized,
{
    let params = mapping.flatten();
    match connector.handle_response_v2(router_data, mapping, status_code) {
        Ok(response) => Ok(Ok(response)),
        Err(err)
            if matches!(
                err.current_context(),
                ConnectorError::ResponseDeserializationFailed
                    | ConnectorError::ResponseHandlingFailed
            ) =>
        {
            warn_log(
                "RESPONSE_PARSE_FAILURE",
                &json!(format!("{:?}", err)),
            );
            Ok(Err(GatewayResponse::builder(
                false,
                consts::RESPONSE_PARSE_FAILED_MESSAGE,
            )
            .params(params)
            .status_code(status_code)
            .test(router_data.resource_common_data.test_mode)
            .build()))
        }
        Err(err) => Err(err),
    }
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let header_value = header_value.into_inner();
                let header_value = HeaderValue::from_str(&header_value)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

trait MethodExt {
    fn to_reqwest_method(self) -> reqwest::Method;
}

impl MethodExt for Method {
    fn to_reqwest_method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, strum::Display, strum::EnumString)]
pub enum Tag {
    /// General.
    #[default]
    General,
    /// Call initiated to connector.
    InitiatedToConnector,
    /// Api Outgoing Request
    OutgoingApi,
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}

#[inline]
pub fn error_log(action: &str, message: &Value) {
    tracing::error!(tags = %action, json_value= %message);
}

#[inline]
pub fn warn_log(action: &str, message: &Value) {
    tracing::warn!(tags = %action, json_value= %message);
}
