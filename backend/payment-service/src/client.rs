use std::sync::Arc;

use common_enums::Currency;
use common_utils::CustomResult;
use connector_integration::types::ConnectorData;
use domain_types::{
    connector_flow::CreateAccessToken,
    connector_types::{AccessTokenRequestData, AccessTokenResponseData, ConnectorEnum, PaymentFlowData},
    errors::ConnectorError,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_request_types::{ContextProvider, PaymentOptions, SystemContextProvider},
    router_response_types::GatewayResponse,
    types::Connectors,
};
use external_services::{configs::Config, execute_connector_processing_step, HttpTransport, Transport};
use interfaces::{
    api::ConnectorCommon,
    connector_integration_v2::ConnectorIntegrationV2,
    connector_types::{ConnectorServiceTrait, ValidationTrait},
};

/// Every connector, seen through the verbs it implements.
pub(crate) type Connector = dyn ConnectorServiceTrait + Send + Sync;

/// Entry point of the gateway verbs for one merchant account on one gateway.
///
/// The client holds no per-call state. Each verb draws a fresh
/// [`RequestContext`](domain_types::router_request_types::RequestContext)
/// from its context provider and runs its calls in sequence on the calling
/// thread.
#[derive(Clone)]
pub struct PaymentClient {
    pub(crate) connector_data: ConnectorData,
    pub(crate) auth: ConnectorAuthType,
    pub(crate) connectors: Connectors,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) context_provider: Arc<dyn ContextProvider>,
    pub(crate) test_mode: bool,
}

impl PaymentClient {
    /// Client against the sandbox endpoints over a default HTTP transport.
    pub fn new(connector: ConnectorEnum, auth: ConnectorAuthType) -> Self {
        Self {
            connector_data: ConnectorData::get_connector_by_name(&connector),
            auth,
            connectors: Connectors::default(),
            transport: Arc::new(HttpTransport::default()),
            context_provider: Arc::new(SystemContextProvider),
            test_mode: true,
        }
    }

    /// Client wired from the application configuration: endpoints, proxy and
    /// timeout.
    pub fn from_config(config: &Config, connector: ConnectorEnum, auth: ConnectorAuthType) -> Self {
        Self::new(connector, auth)
            .with_connectors(config.connectors.clone())
            .with_transport(Arc::new(HttpTransport::new(
                config.proxy.clone(),
                &config.http_client,
            )))
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_context_provider(mut self, context_provider: Arc<dyn ContextProvider>) -> Self {
        self.context_provider = context_provider;
        self
    }

    pub fn with_connectors(mut self, connectors: Connectors) -> Self {
        self.connectors = connectors;
        self
    }

    /// Marks every response as coming from a test account or not.
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn connector_name(&self) -> ConnectorEnum {
        self.connector_data.connector_name
    }

    pub(crate) fn connector(&self) -> &'static Connector {
        *self.connector_data.connector
    }

    /// The caller's currency, or the gateway's default when none is given.
    pub(crate) fn currency(&self, options: &PaymentOptions) -> Currency {
        options
            .currency
            .unwrap_or_else(|| self.connector().default_currency())
    }

    /// Opens the call state of one verb.
    ///
    /// Gateways that work with bearer tokens get one here, either the token
    /// the caller supplied in the options or a fresh one. A refused token
    /// request ends the verb with that failure.
    pub(crate) fn begin(
        &self,
        options: &PaymentOptions,
    ) -> CustomResult<Result<PaymentFlowData, GatewayResponse>, ConnectorError> {
        let mut flow_data = PaymentFlowData::new(
            self.connectors.clone(),
            self.test_mode,
            self.context_provider.new_context(),
        );
        if !self.connector().should_do_access_token() {
            return Ok(Ok(flow_data));
        }

        match options.access_token.clone() {
            Some(access_token) => {
                tracing::debug!("using the access token supplied by the caller");
                flow_data.access_token = Some(AccessTokenResponseData {
                    access_token,
                    ..Default::default()
                });
            }
            None => match self.fetch_access_token(&flow_data)? {
                Ok(access_token) => flow_data.access_token = Some(access_token),
                Err(failure) => return Ok(Err(failure)),
            },
        }
        Ok(Ok(flow_data))
    }

    fn fetch_access_token(
        &self,
        flow_data: &PaymentFlowData,
    ) -> CustomResult<Result<AccessTokenResponseData, GatewayResponse>, ConnectorError> {
        let router_data = RouterDataV2::<CreateAccessToken, AccessTokenRequestData>::new(
            flow_data.clone(),
            self.auth.clone(),
            AccessTokenRequestData::default(),
        );
        let outcome = execute_connector_processing_step(
            self.transport.as_ref(),
            self.connector(),
            &router_data,
        )?;
        match &outcome {
            Ok(access_token) => tracing::info!(
                connector = self.connector().id(),
                expires_in = ?access_token.expires_in,
                "access token created"
            ),
            Err(failure) => tracing::warn!(
                connector = self.connector().id(),
                message = %failure.message,
                "access token creation failed"
            ),
        }
        Ok(outcome.map_err(|mut failure| {
            failure.test = flow_data.test_mode;
            failure
        }))
    }

    /// Runs one flow and folds a failed exchange into the response.
    ///
    /// When the gateway reports an expired access token the token is
    /// replaced and the flow re-run, once.
    pub(crate) fn execute<F, Req>(
        &self,
        flow_data: &mut PaymentFlowData,
        request: Req,
    ) -> CustomResult<GatewayResponse, ConnectorError>
    where
        Req: Clone,
        Connector: ConnectorIntegrationV2<F, Req>,
    {
        let response = self.execute_once(flow_data, request.clone())?;
        let connector = self.connector();
        if response.success
            || !connector.should_do_access_token()
            || !connector.is_access_token_expired(&response)
        {
            return Ok(response);
        }

        tracing::info!(
            connector = connector.id(),
            "access token rejected, requesting a new one"
        );
        // The token request signs its nonce, so it gets a context of its own.
        let mut token_flow_data = flow_data.clone();
        token_flow_data.context = self.context_provider.new_context();
        match self.fetch_access_token(&token_flow_data)? {
            Ok(access_token) => flow_data.access_token = Some(access_token),
            Err(failure) => return Ok(failure),
        }
        self.execute_once(flow_data, request)
    }

    fn execute_once<F, Req>(
        &self,
        flow_data: &PaymentFlowData,
        request: Req,
    ) -> CustomResult<GatewayResponse, ConnectorError>
    where
        Connector: ConnectorIntegrationV2<F, Req>,
    {
        let router_data = RouterDataV2::<F, Req>::new(flow_data.clone(), self.auth.clone(), request);
        let outcome: Result<GatewayResponse, GatewayResponse> = execute_connector_processing_step(
            self.transport.as_ref(),
            self.connector(),
            &router_data,
        )?;
        let mut response = outcome.unwrap_or_else(|failure| failure);
        response.test = flow_data.test_mode;
        Ok(response)
    }
}

impl std::fmt::Debug for PaymentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentClient")
            .field("connector", &self.connector_data.connector_name)
            .field("test_mode", &self.test_mode)
            .finish()
    }
}
