//! In-memory [`Transport`] for tests and dry runs.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, MutexGuard, PoisonError},
};

use common_utils::{
    request::{Method, Request},
    CustomResult,
};
use domain_types::{errors::ApiClientError, router_response_types::Response};
use error_stack::report;
use hyperswitch_masking::ExposeInterface;

use crate::service::Transport;

type Reply = CustomResult<Result<Response, Response>, ApiClientError>;

/// A request as the transport received it, with secrets exposed.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Answers requests from a queue of canned replies, in order, and records
/// every request it sees. An empty queue answers as an unreachable host.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply with the given status; 2xx and 302 count as success.
    pub fn respond(&self, status_code: u16, body: impl Into<String>) -> &Self {
        let response = Response::new(status_code, body.into());
        let reply = if matches!(status_code, 200..=299 | 302) {
            Ok(Ok(response))
        } else {
            Ok(Err(response))
        };
        lock(&self.replies).push_back(reply);
        self
    }

    pub fn respond_with_content_type(
        &self,
        status_code: u16,
        content_type: &'static str,
        body: impl Into<String>,
    ) -> &Self {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static(content_type),
        );
        let response = Response::new(status_code, body.into()).with_headers(headers);
        let reply = if matches!(status_code, 200..=299 | 302) {
            Ok(Ok(response))
        } else {
            Ok(Err(response))
        };
        lock(&self.replies).push_back(reply);
        self
    }

    /// Queues a failure to reach the gateway.
    pub fn fail(&self, error: ApiClientError) -> &Self {
        lock(&self.replies).push_back(Err(report!(error)));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: Request) -> CustomResult<Result<Response, Response>, ApiClientError> {
        let recorded = RecordedRequest {
            method: request.method,
            headers: request.get_headers_map(),
            body: request
                .body
                .as_ref()
                .map(|body| body.get_inner_value().expose()),
            url: request.url,
        };
        tracing::debug!(url = %recorded.url, method = %recorded.method, "mock transport received request");
        lock(&self.requests).push(recorded);

        lock(&self.replies).pop_front().unwrap_or_else(|| {
            Err(report!(ApiClientError::RequestNotSent(
                "no reply queued".to_string()
            )))
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use common_utils::request::RequestBuilder;

    use super::*;

    #[test]
    fn replays_in_order_and_records_requests() {
        let transport = MockTransport::new();
        transport.respond(200, r#"{"id":"1"}"#).respond(503, "down");

        let request = || {
            RequestBuilder::new()
                .method(Method::Post)
                .url("https://gateway.test/pay")
                .header("X-Test", "yes")
                .build()
        };
        let first = transport.send(request());
        assert!(matches!(first, Ok(Ok(ref response)) if response.status_code == 200));
        let second = transport.send(request());
        assert!(matches!(second, Ok(Err(ref response)) if response.status_code == 503));
        assert!(transport.send(request()).is_err());

        assert_eq!(transport.request_count(), 3);
        let recorded = transport.last_request();
        assert_eq!(
            recorded.as_ref().and_then(|request| request.header("x-test")),
            Some("yes")
        );
    }
}
