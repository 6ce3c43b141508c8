use std::collections::BTreeMap;

use domain_types::{connector_types::ConnectorEnum, router_data_v2::RouterDataV2};
use interfaces::connector_types::BoxedConnector;

use crate::connectors;

#[derive(Clone)]
pub struct ConnectorData {
    pub connector: BoxedConnector,
    pub connector_name: ConnectorEnum,
}

impl ConnectorData {
    pub fn get_connector_by_name(connector_name: &ConnectorEnum) -> Self {
        let connector = Self::convert_connector(*connector_name);
        Self {
            connector,
            connector_name: *connector_name,
        }
    }

    fn convert_connector(connector_name: ConnectorEnum) -> BoxedConnector {
        match connector_name {
            ConnectorEnum::Forte => Box::new(connectors::Forte::new()),
            ConnectorEnum::Nmi => Box::new(connectors::Nmi::new()),
            ConnectorEnum::Worldpayxml => Box::new(connectors::Worldpayxml::new()),
            ConnectorEnum::Paysafe => Box::new(connectors::Paysafe::new()),
            ConnectorEnum::Globalpay => Box::new(connectors::Globalpay::new()),
        }
    }
}

impl std::fmt::Debug for ConnectorData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorData")
            .field("connector_name", &self.connector_name)
            .finish()
    }
}

/// Input of a request builder: the connector, for its amount convertor, and
/// the flow's router data.
pub struct ConnectorRouterData<'a, C, F, Req> {
    pub connector: &'a C,
    pub router_data: &'a RouterDataV2<F, Req>,
}

impl<'a, C, F, Req> ConnectorRouterData<'a, C, F, Req> {
    pub fn new(connector: &'a C, router_data: &'a RouterDataV2<F, Req>) -> Self {
        Self {
            connector,
            router_data,
        }
    }
}

/// Input of a result mapper: the typed gateway response next to the data
/// the request was built from.
pub struct ResponseRouterData<'a, Response, F, Req> {
    pub response: Response,
    pub router_data: &'a RouterDataV2<F, Req>,
    pub http_code: u16,
    /// The parsed response flattened to dotted keys.
    pub params: BTreeMap<String, String>,
}
