//! Chains the dependent calls of one verb.
//!
//! Each step sees the response of the step before it. The first failed step
//! ends the chain: later steps are skipped, nothing is retried and nothing
//! is rolled back.

use common_utils::{consts, CustomResult};
use domain_types::{errors::ConnectorError, router_response_types::GatewayResponse};

/// Which step's response stands for the whole chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponsePolicy {
    /// The first step's outcome is what the caller asked about, as with
    /// verification by authorize then void.
    UseFirstResponse,
    /// The last executed step wins.
    #[default]
    LastResponse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposerState {
    /// Index of the next step to run.
    Pending(usize),
    Success,
    /// Index of the step that failed.
    Failed(usize),
}

#[derive(Debug)]
pub struct MultiResponse {
    policy: ResponsePolicy,
    responses: Vec<GatewayResponse>,
    state: ComposerState,
}

impl MultiResponse {
    pub fn new(policy: ResponsePolicy) -> Self {
        Self {
            policy,
            responses: Vec::new(),
            state: ComposerState::Pending(0),
        }
    }

    pub fn use_first_response() -> Self {
        Self::new(ResponsePolicy::UseFirstResponse)
    }

    /// Runs `step` unless an earlier step failed.
    ///
    /// An `Err` from the step is returned as is and leaves the state
    /// untouched.
    pub fn process<S>(&mut self, step: S) -> CustomResult<&mut Self, ConnectorError>
    where
        S: FnOnce(Option<&GatewayResponse>) -> CustomResult<GatewayResponse, ConnectorError>,
    {
        let ComposerState::Pending(index) = self.state else {
            tracing::debug!(state = ?self.state, "skipping step of a finished chain");
            return Ok(self);
        };

        let response = step(self.responses.last())?;
        self.state = if response.success {
            ComposerState::Pending(index + 1)
        } else {
            tracing::info!(step = index, message = %response.message, "multi step chain failed");
            ComposerState::Failed(index)
        };
        self.responses.push(response);
        Ok(self)
    }

    pub fn state(&self) -> ComposerState {
        match self.state {
            ComposerState::Pending(index) if index > 0 => ComposerState::Success,
            state => state,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state() == ComposerState::Success
    }

    pub fn responses(&self) -> &[GatewayResponse] {
        &self.responses
    }

    /// The response that stands for the chain under the configured policy.
    ///
    /// With [`ResponsePolicy::UseFirstResponse`] and a failure after the
    /// first step, the result is the first step's payload marked as failed,
    /// carrying the failing step's error codes.
    pub fn into_response(self) -> GatewayResponse {
        let state = self.state();
        let mut responses = self.responses.into_iter();
        let Some(first) = responses.next() else {
            return GatewayResponse::failure(consts::NO_ERROR_MESSAGE, 0);
        };
        let last = responses.last();

        match (self.policy, last) {
            (_, None) => first,
            (ResponsePolicy::LastResponse, Some(last)) => last,
            (ResponsePolicy::UseFirstResponse, Some(last)) => match state {
                ComposerState::Failed(_) => GatewayResponse {
                    success: false,
                    error_code: last.error_code,
                    connector_error_code: last.connector_error_code,
                    status_code: last.status_code,
                    ..first
                },
                _ => first,
            },
        }
    }
}

impl Default for MultiResponse {
    fn default() -> Self {
        Self::new(ResponsePolicy::default())
    }
}
