#![allow(dead_code)]

use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use cards::CardNumber;
use domain_types::{
    payment_method_data::Card,
    router_request_types::{Address, ContextProvider, FixedContextProvider, RequestContext},
};
use external_services::mock::MockTransport;
use hyperswitch_masking::Secret;
use payment_service::{ConnectorAuthType, ConnectorEnum, PaymentClient, PaymentInstrument, PaymentOptions};
use time::OffsetDateTime;

pub const NONCE: &str = "5b1e8f0c2d7a4e93b6c1f0a9d8e7c6b5";

pub fn secret(value: &str) -> Secret<String> {
    Secret::new(value.to_string())
}

/// Client over a fresh mock transport, with a fixed nonce and timestamp.
pub fn client(
    connector: ConnectorEnum,
    auth: ConnectorAuthType,
) -> (PaymentClient, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let client = PaymentClient::new(connector, auth)
        .with_transport(transport.clone())
        .with_context_provider(Arc::new(FixedContextProvider::new(
            NONCE,
            OffsetDateTime::UNIX_EPOCH,
        )));
    (client, transport)
}

/// Numbers its contexts `nonce_0`, `nonce_1`, ... in the order they are drawn.
#[derive(Debug, Default)]
pub struct CountingContextProvider(AtomicUsize);

impl ContextProvider for CountingContextProvider {
    fn new_context(&self) -> RequestContext {
        let drawn = self.0.fetch_add(1, Ordering::SeqCst);
        FixedContextProvider::new(format!("nonce_{drawn}"), OffsetDateTime::UNIX_EPOCH).0
    }
}

pub fn card() -> PaymentInstrument {
    PaymentInstrument::Card(Card {
        card_number: CardNumber::from_str("4111111111111111").unwrap(),
        card_exp_month: secret("09"),
        card_exp_year: secret("2030"),
        card_cvc: Some(secret("123")),
        card_holder_name: Some(secret("Longbob Longsen")),
        card_network: None,
    })
}

pub fn options() -> PaymentOptions {
    PaymentOptions {
        description: Some("Store Purchase".to_string()),
        ..PaymentOptions::default()
    }
    .with_order_id("X1")
    .with_billing_address(Address {
        first_name: Some(secret("Jim")),
        last_name: Some(secret("Smith")),
        address1: Some(secret("456 My Street")),
        address2: Some(secret("Apt 1")),
        city: Some("Ottawa".to_string()),
        state: Some(secret("ON")),
        zip: Some(secret("K1C2N6")),
        country: Some("CA".to_string()),
        phone: Some(secret("(555)555-5555")),
    })
}
