//! Gateway verbs on top of the connectors.
//!
//! A [`PaymentClient`] picks the connector from the registry and runs each
//! verb as a short chain of connector calls: an access token first where the
//! gateway wants one, a tokenization before the charge where the gateway only
//! charges its own tokens, and a capture or void after an authorization where
//! the gateway has no single call for the verb.

mod client;
mod verbs;

pub use client::PaymentClient;
pub use domain_types::{
    connector_types::ConnectorEnum, payment_method_data::PaymentInstrument,
    router_data::ConnectorAuthType, router_request_types::PaymentOptions,
    router_response_types::GatewayResponse,
};
