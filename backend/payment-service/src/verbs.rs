//! The gateway verbs.
//!
//! Every verb returns `Err` only for problems found before anything is sent:
//! a missing option, an unreadable authorization handle, a flow the gateway
//! does not offer. Anything that happens on the wire comes back as a
//! [`GatewayResponse`] with `success == false`.

use common_enums::{CaptureMethod, Currency};
use common_utils::{consts, CustomResult, MinorUnit};
use domain_types::{
    authorization::AuthorizationHandle,
    connector_types::{
        PaymentFlowData, PaymentMethodTokenizationData, PaymentVoidData, PaymentsAuthorizeData,
        PaymentsCaptureData, RefundsData, StoreData, UnstoreData, VerifyData,
    },
    errors::ConnectorError,
    payment_method_data::PaymentInstrument,
    router_request_types::PaymentOptions,
    router_response_types::GatewayResponse,
};
use error_stack::{report, ResultExt};
use external_services::MultiResponse;
use hyperswitch_masking::Secret;
use interfaces::{
    api::ConnectorCommon,
    connector_types::{PurchaseStrategy, ValidationTrait, VerifyStrategy},
};

use crate::client::PaymentClient;

/// Unwraps the call state of a verb, or returns the failure that ended it.
macro_rules! begin_or_return {
    ($client:expr, $options:expr) => {
        match $client.begin($options)? {
            Ok(flow_data) => flow_data,
            Err(failure) => return Ok(failure),
        }
    };
}

fn decode_handle(authorization: &str) -> CustomResult<AuthorizationHandle, ConnectorError> {
    AuthorizationHandle::decode(authorization)
        .attach_printable("authorization handle passed to a follow up verb")
}

fn handle_of(previous: Option<&GatewayResponse>) -> CustomResult<AuthorizationHandle, ConnectorError> {
    previous
        .and_then(GatewayResponse::authorization_handle)
        .ok_or_else(|| report!(ConnectorError::MissingConnectorTransactionID))
        .attach_printable("previous step succeeded without an authorization handle")
}

impl PaymentClient {
    /// Charges `amount` in one go: a native sale where the gateway has one,
    /// otherwise an authorization followed by its capture.
    #[tracing::instrument(skip_all, fields(connector = %self.connector_name(), verb = "purchase"))]
    pub fn purchase(
        &self,
        amount: MinorUnit,
        instrument: &PaymentInstrument,
        options: &PaymentOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let mut flow_data = begin_or_return!(self, options);
        let currency = self.currency(options);

        match self.connector().purchase_strategy() {
            PurchaseStrategy::Native => self.charge(
                &mut flow_data,
                amount,
                currency,
                instrument,
                options,
                CaptureMethod::Automatic,
            ),
            PurchaseStrategy::AuthorizeThenCapture => {
                let mut multi = MultiResponse::default();
                multi
                    .process(|_| {
                        self.charge(
                            &mut flow_data,
                            amount,
                            currency,
                            instrument,
                            options,
                            CaptureMethod::Manual,
                        )
                    })?
                    .process(|previous| {
                        let authorization = handle_of(previous)?;
                        self.execute(
                            &mut flow_data,
                            PaymentsCaptureData {
                                amount,
                                currency,
                                authorization,
                                options: options.clone(),
                            },
                        )
                    })?;
                Ok(multi.into_response())
            }
        }
    }

    #[tracing::instrument(skip_all, fields(connector = %self.connector_name(), verb = "authorize"))]
    pub fn authorize(
        &self,
        amount: MinorUnit,
        instrument: &PaymentInstrument,
        options: &PaymentOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let mut flow_data = begin_or_return!(self, options);
        let currency = self.currency(options);
        self.charge(
            &mut flow_data,
            amount,
            currency,
            instrument,
            options,
            CaptureMethod::Manual,
        )
    }

    #[tracing::instrument(skip_all, fields(connector = %self.connector_name(), verb = "capture"))]
    pub fn capture(
        &self,
        amount: MinorUnit,
        authorization: &str,
        options: &PaymentOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let authorization = decode_handle(authorization)?;
        let currency = authorization
            .currency
            .unwrap_or_else(|| self.currency(options));
        let mut flow_data = begin_or_return!(self, options);
        self.execute(
            &mut flow_data,
            PaymentsCaptureData {
                amount,
                currency,
                authorization,
                options: options.clone(),
            },
        )
    }

    #[tracing::instrument(skip_all, fields(connector = %self.connector_name(), verb = "refund"))]
    pub fn refund(
        &self,
        amount: MinorUnit,
        authorization: &str,
        options: &PaymentOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let authorization = decode_handle(authorization)?;
        let currency = authorization
            .currency
            .unwrap_or_else(|| self.currency(options));
        let mut flow_data = begin_or_return!(self, options);
        self.execute(
            &mut flow_data,
            RefundsData {
                amount,
                currency,
                authorization,
                options: options.clone(),
            },
        )
    }

    #[tracing::instrument(skip_all, fields(connector = %self.connector_name(), verb = "void"))]
    pub fn void(
        &self,
        authorization: &str,
        options: &PaymentOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let authorization = decode_handle(authorization)?;
        let mut flow_data = begin_or_return!(self, options);
        self.execute(
            &mut flow_data,
            PaymentVoidData {
                authorization,
                options: options.clone(),
            },
        )
    }

    /// Keeps the instrument on file at the gateway. The returned handle's
    /// transaction id is the stored reference.
    #[tracing::instrument(skip_all, fields(connector = %self.connector_name(), verb = "store"))]
    pub fn store(
        &self,
        instrument: &PaymentInstrument,
        options: &PaymentOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let mut flow_data = begin_or_return!(self, options);
        self.execute(
            &mut flow_data,
            StoreData {
                payment_instrument: instrument.clone(),
                options: options.clone(),
            },
        )
    }

    #[tracing::instrument(skip_all, fields(connector = %self.connector_name(), verb = "unstore"))]
    pub fn unstore(
        &self,
        reference: &str,
        options: &PaymentOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(report!(ConnectorError::MissingRequiredField {
                field_name: "reference"
            }));
        }
        let mut flow_data = begin_or_return!(self, options);
        self.execute(
            &mut flow_data,
            UnstoreData {
                reference: Secret::new(reference.to_string()),
                options: options.clone(),
            },
        )
    }

    /// Checks the instrument without charging it.
    ///
    /// Gateways without a verification call authorize a nominal amount and
    /// void it; the authorization's response is the one reported.
    #[tracing::instrument(skip_all, fields(connector = %self.connector_name(), verb = "verify"))]
    pub fn verify(
        &self,
        instrument: &PaymentInstrument,
        options: &PaymentOptions,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let mut flow_data = begin_or_return!(self, options);
        let currency = self.currency(options);

        match self.connector().verify_strategy() {
            VerifyStrategy::Native => self.execute(
                &mut flow_data,
                VerifyData {
                    payment_instrument: instrument.clone(),
                    currency,
                    options: options.clone(),
                },
            ),
            VerifyStrategy::AuthorizeThenVoid => {
                let mut multi = MultiResponse::use_first_response();
                multi
                    .process(|_| {
                        self.charge(
                            &mut flow_data,
                            MinorUnit::new(consts::VERIFY_AMOUNT_MINOR),
                            currency,
                            instrument,
                            options,
                            CaptureMethod::Manual,
                        )
                    })?
                    .process(|previous| {
                        let authorization = handle_of(previous)?;
                        self.execute(
                            &mut flow_data,
                            PaymentVoidData {
                                authorization,
                                options: options.clone(),
                            },
                        )
                    })?;
                Ok(multi.into_response())
            }
        }
    }

    /// One authorization, preceded by tokenization of the instrument when
    /// the gateway only charges its own payment tokens.
    fn charge(
        &self,
        flow_data: &mut PaymentFlowData,
        amount: MinorUnit,
        currency: Currency,
        instrument: &PaymentInstrument,
        options: &PaymentOptions,
        capture_method: CaptureMethod,
    ) -> CustomResult<GatewayResponse, ConnectorError> {
        let authorize = PaymentsAuthorizeData {
            amount,
            currency,
            payment_instrument: instrument.clone(),
            capture_method,
            options: options.clone(),
        };
        if !self.connector().should_do_payment_method_token(instrument) {
            return self.execute(flow_data, authorize);
        }

        let mut multi = MultiResponse::default();
        multi
            .process(|_| {
                self.execute(
                    flow_data,
                    PaymentMethodTokenizationData {
                        payment_instrument: instrument.clone(),
                        amount: Some(amount),
                        currency,
                        options: options.clone(),
                    },
                )
            })?
            .process(|previous| {
                let token = handle_of(previous)?;
                tracing::debug!(
                    connector = self.connector().id(),
                    "charging the tokenized instrument"
                );
                flow_data.payment_method_token = Some(Secret::new(token.transaction_id));
                self.execute(flow_data, authorize)
            })?;
        Ok(multi.into_response())
    }
}
