use std::marker::PhantomData;

use crate::{connector_types::PaymentFlowData, router_data::ConnectorAuthType};

/// Everything one flow needs to build a request: flow specific data plus the
/// per-call context and credentials.
#[derive(Debug, Clone)]
pub struct RouterDataV2<Flow, FlowSpecificRequest> {
    pub flow: PhantomData<Flow>,
    pub resource_common_data: PaymentFlowData,
    pub connector_auth_type: ConnectorAuthType,
    /// Contains flow-specific data required to construct a request and send it to the connector.
    pub request: FlowSpecificRequest,
}

impl<Flow, FlowSpecificRequest> RouterDataV2<Flow, FlowSpecificRequest> {
    pub fn new(
        resource_common_data: PaymentFlowData,
        connector_auth_type: ConnectorAuthType,
        request: FlowSpecificRequest,
    ) -> Self {
        Self {
            flow: PhantomData,
            resource_common_data,
            connector_auth_type,
            request,
        }
    }
}
