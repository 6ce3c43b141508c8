use std::collections::BTreeMap;

use common_enums::Currency;
use common_utils::{types::StringMinorUnit, MinorUnit};
use domain_types::{
    authorization::AuthorizationHandle,
    connector_flow::{Authorize, Capture, Refund, Void},
    connector_types::{PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, RefundsData},
    errors,
    payment_method_data::{Card, PaymentInstrument},
    router_data::ConnectorAuthType,
    router_request_types::{Address, PaymentOptions},
    router_response_types::{AvsResult, CvvResult, GatewayResponse, StandardErrorCode},
};
use hyperswitch_masking::Secret;

use super::{
    requests::{self, WorldpayxmlModification},
    responses::{self, WorldpayxmlResponse},
    Worldpayxml,
};
use crate::{
    types::{ConnectorRouterData, ResponseRouterData},
    utils,
};

type Error = error_stack::Report<errors::ConnectorError>;

const API_VERSION: &str = "1.4";
const DEFAULT_PAYMENT_DESCRIPTION: &str = "Purchase";

#[derive(Debug, Clone)]
pub struct WorldpayxmlAuthType {
    pub api_username: Secret<String>,
    pub api_password: Secret<String>,
    pub merchant_code: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for WorldpayxmlAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => Ok(Self {
                api_username: api_key.to_owned(),
                api_password: api_secret.to_owned(),
                merchant_code: key1.to_owned(),
            }),
            _ => Err(errors::ConnectorError::FailedToObtainAuthType.into()),
        }
    }
}

fn amount(
    connector: &Worldpayxml,
    minor: MinorUnit,
    currency: Currency,
) -> Result<requests::WorldpayxmlAmount, Error> {
    let value: StringMinorUnit = utils::convert_amount(connector.amount_converter, minor, currency)?;
    Ok(requests::WorldpayxmlAmount {
        value,
        currency_code: currency,
        exponent: currency.number_of_digits_after_decimal_point(),
    })
}

fn address(address: &Address) -> requests::WorldpayxmlBillingAddress {
    requests::WorldpayxmlBillingAddress {
        address: requests::WorldpayxmlAddress {
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            address1: address.address1.clone(),
            address2: address.address2.clone(),
            postal_code: address.zip.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            country_code: address.country.clone(),
            telephone_number: address.phone.clone(),
        },
    }
}

fn card_holder_name(card: &Card, options: &PaymentOptions) -> Result<Secret<String>, Error> {
    match card.get_cardholder_name() {
        Ok(name) => Ok(name),
        Err(missing) => options
            .billing_address
            .as_ref()
            .and_then(Address::get_full_name)
            .ok_or(missing),
    }
}

fn payment_method(
    instrument: &PaymentInstrument,
    options: &PaymentOptions,
) -> Result<requests::WorldpayxmlPaymentMethod, Error> {
    match instrument {
        PaymentInstrument::Card(card) => Ok(requests::WorldpayxmlPaymentMethod::CardSsl(
            requests::WorldpayxmlCard {
                card_number: card.card_number.clone(),
                expiry_date: requests::WorldpayxmlExpiryDate {
                    date: requests::WorldpayxmlDate {
                        month: card.card_exp_month.clone(),
                        year: card.get_expiry_year_4_digit(),
                    },
                },
                card_holder_name: card_holder_name(card, options)?,
                cvc: card.card_cvc.clone(),
                card_address: options.billing_address.as_ref().map(address),
            },
        )),
        PaymentInstrument::Token(_) | PaymentInstrument::StoredReference(_) => {
            Err(errors::ConnectorError::NotSupported {
                message: "Selected payment method".to_string(),
                connector: "worldpayxml",
            }
            .into())
        }
    }
}

// Authorize flow transformers
impl TryFrom<ConnectorRouterData<'_, Worldpayxml, Authorize, PaymentsAuthorizeData>>
    for requests::WorldpayxmlPaymentsRequest
{
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Worldpayxml, Authorize, PaymentsAuthorizeData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let request = &router_data.request;
        let auth = WorldpayxmlAuthType::try_from(&router_data.connector_auth_type)?;
        let order_code = request.options.get_order_id()?.clone();

        Ok(Self {
            version: API_VERSION.to_string(),
            merchant_code: auth.merchant_code,
            submit: requests::WorldpayxmlSubmit {
                order: requests::WorldpayxmlOrder {
                    order_code,
                    description: request
                        .options
                        .description
                        .clone()
                        .unwrap_or_else(|| DEFAULT_PAYMENT_DESCRIPTION.to_string()),
                    amount: amount(item.connector, request.amount, request.currency)?,
                    payment_details: requests::WorldpayxmlPaymentDetails {
                        payment_method: payment_method(
                            &request.payment_instrument,
                            &request.options,
                        )?,
                    },
                    shopper: request.options.email.clone().map(|email| {
                        requests::WorldpayxmlShopper {
                            shopper_email_address: email,
                        }
                    }),
                    billing_address: request.options.billing_address.as_ref().map(address),
                },
            },
        })
    }
}

fn modification_request(
    router_data_auth: &ConnectorAuthType,
    order_code: &str,
    modification: WorldpayxmlModification,
) -> Result<requests::WorldpayxmlModificationRequest, Error> {
    let auth = WorldpayxmlAuthType::try_from(router_data_auth)?;
    Ok(requests::WorldpayxmlModificationRequest {
        version: API_VERSION.to_string(),
        merchant_code: auth.merchant_code,
        modify: requests::WorldpayxmlModify {
            order_modification: requests::WorldpayxmlOrderModification {
                order_code: order_code.to_string(),
                modification,
            },
        },
    })
}

// Capture flow transformers
impl TryFrom<ConnectorRouterData<'_, Worldpayxml, Capture, PaymentsCaptureData>>
    for requests::WorldpayxmlCaptureRequest
{
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Worldpayxml, Capture, PaymentsCaptureData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        modification_request(
            &item.router_data.connector_auth_type,
            &request.authorization.transaction_id,
            WorldpayxmlModification::Capture(requests::WorldpayxmlAmountHolder {
                amount: amount(item.connector, request.amount, request.currency)?,
            }),
        )
    }
}

// Void flow transformers
impl TryFrom<ConnectorRouterData<'_, Worldpayxml, Void, PaymentVoidData>>
    for requests::WorldpayxmlVoidRequest
{
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Worldpayxml, Void, PaymentVoidData>,
    ) -> Result<Self, Self::Error> {
        modification_request(
            &item.router_data.connector_auth_type,
            &item.router_data.request.authorization.transaction_id,
            WorldpayxmlModification::Cancel(requests::WorldpayxmlCancel {}),
        )
    }
}

// Refund flow transformers
impl TryFrom<ConnectorRouterData<'_, Worldpayxml, Refund, RefundsData>>
    for requests::WorldpayxmlRefundRequest
{
    type Error = Error;

    fn try_from(
        item: ConnectorRouterData<'_, Worldpayxml, Refund, RefundsData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        modification_request(
            &item.router_data.connector_auth_type,
            &request.authorization.transaction_id,
            WorldpayxmlModification::Refund(requests::WorldpayxmlAmountHolder {
                amount: amount(item.connector, request.amount, request.currency)?,
            }),
        )
    }
}

// Response mapping

fn avs_code(description: &str) -> Option<&'static str> {
    match description.trim().to_ascii_uppercase().as_str() {
        "MATCHED" => Some("Y"),
        "POSTCODE MATCHED; ADDRESS NOT MATCHED" => Some("Z"),
        "POSTCODE NOT MATCHED; ADDRESS MATCHED" => Some("A"),
        "POSTCODE MATCHED; ADDRESS NOT CHECKED" => Some("P"),
        "POSTCODE NOT CHECKED; ADDRESS MATCHED" => Some("B"),
        "FAILED" | "NOT MATCHED" => Some("N"),
        "NOT SUPPLIED BY SHOPPER" | "NOT CHECKED BY ACQUIRER" | "NOT SENT TO ACQUIRER" => {
            Some("U")
        }
        _ => None,
    }
}

fn cvc_code(description: &str) -> Option<&'static str> {
    match description.trim().to_ascii_uppercase().as_str() {
        "C: MATCHED" | "MATCHED" => Some("M"),
        "FAILED" | "NOT MATCHED" => Some("N"),
        "NOT SENT TO ACQUIRER" | "NOT CHECKED BY ACQUIRER" => Some("P"),
        "NOT SUPPLIED BY SHOPPER" => Some("S"),
        "UNKNOWN" => Some("U"),
        _ => None,
    }
}

fn error_code_from_return_code(code: Option<&str>) -> StandardErrorCode {
    match code {
        Some("33") | Some("54") => StandardErrorCode::ExpiredCard,
        Some("14") => StandardErrorCode::InvalidNumber,
        Some("4") | Some("7") | Some("41") | Some("43") => StandardErrorCode::PickupCard,
        Some("1") | Some("2") => StandardErrorCode::CallIssuer,
        _ => StandardErrorCode::CardDeclined,
    }
}

struct Outcome {
    success: bool,
    message: Option<String>,
    connector_error_code: Option<String>,
    error_code: Option<StandardErrorCode>,
}

impl WorldpayxmlResponse {
    fn reply(&self) -> &responses::WorldpayxmlReply {
        &self.payment_service.reply
    }

    fn payment(&self) -> Option<&responses::WorldpayxmlPayment> {
        self.reply()
            .order_status
            .as_ref()
            .and_then(|status| status.payment.as_ref())
    }

    fn error(&self) -> Option<&responses::WorldpayxmlError> {
        self.reply().error.as_ref().or_else(|| {
            self.reply()
                .order_status
                .as_ref()
                .and_then(|status| status.error.as_ref())
        })
    }

    fn order_code(&self) -> Option<String> {
        self.reply()
            .order_status
            .as_ref()
            .and_then(|status| status.order_code.clone())
    }

    fn authorisation_id(&self) -> Option<String> {
        self.payment()
            .and_then(|payment| payment.authorisation_id.as_ref())
            .and_then(|id| id.id.clone())
    }

    fn avs_result(&self) -> AvsResult {
        let code = self
            .payment()
            .and_then(|payment| payment.avs_result_code.as_ref())
            .and_then(|result| result.description.as_deref())
            .and_then(avs_code);
        AvsResult::from_code(code)
    }

    fn cvv_result(&self) -> CvvResult {
        let code = self
            .payment()
            .and_then(|payment| payment.cvc_result_code.as_ref())
            .and_then(|result| result.description.as_deref())
            .and_then(cvc_code);
        CvvResult::from_code(code)
    }

    fn failure(&self) -> Outcome {
        if let Some(error) = self.error() {
            return Outcome {
                success: false,
                message: error.message(),
                connector_error_code: error.code(),
                error_code: Some(StandardErrorCode::ProcessingError),
            };
        }
        let payment = self.payment();
        let return_code = payment.and_then(|payment| payment.iso8583_return_code.as_ref());
        Outcome {
            success: false,
            message: return_code
                .and_then(|code| code.description.clone())
                .or_else(|| payment.and_then(|payment| payment.last_event.clone())),
            connector_error_code: return_code.and_then(|code| code.code.clone()),
            error_code: Some(error_code_from_return_code(
                return_code.and_then(|code| code.code.as_deref()),
            )),
        }
    }

    /// Order status replies succeed on an authorised or captured payment.
    fn payment_outcome(&self) -> Outcome {
        let last_event = self.payment().and_then(|payment| payment.last_event.clone());
        match last_event.as_deref() {
            Some("AUTHORISED") | Some("CAPTURED") if self.error().is_none() => Outcome {
                success: true,
                message: last_event,
                connector_error_code: None,
                error_code: None,
            },
            _ => self.failure(),
        }
    }

    /// Modification replies succeed on the matching `ok` acknowledgement.
    fn modification_outcome(
        &self,
        received: Option<&responses::WorldpayxmlModificationReceived>,
    ) -> Outcome {
        match received {
            Some(_) if self.error().is_none() => Outcome {
                success: true,
                message: Some("SUCCESS".to_string()),
                connector_error_code: None,
                error_code: None,
            },
            _ => self.failure(),
        }
    }

    fn into_gateway_response(
        self,
        outcome: Outcome,
        handle: Option<AuthorizationHandle>,
        params: BTreeMap<String, String>,
        http_code: u16,
    ) -> GatewayResponse {
        let success = outcome.success && handle.is_some();
        GatewayResponse::builder(
            success,
            utils::failure_message("worldpayxml", outcome.message, http_code),
        )
        .params(params)
        .authorization(handle.filter(|_| success))
        .avs_result(self.avs_result())
        .cvv_result(self.cvv_result())
        .error_code(outcome.error_code.filter(|_| !success))
        .connector_error_code(outcome.connector_error_code.filter(|_| !success))
        .status_code(http_code)
        .build()
    }
}

impl TryFrom<ResponseRouterData<'_, responses::WorldpayxmlAuthorizeResponse, Authorize, PaymentsAuthorizeData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, responses::WorldpayxmlAuthorizeResponse, Authorize, PaymentsAuthorizeData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let outcome = item.response.payment_outcome();
        let handle = item
            .response
            .order_code()
            .or_else(|| request.options.order_id.clone())
            .map(|order_code| {
                AuthorizationHandle::new(order_code)
                    .with_secondary_id(item.response.authorisation_id())
                    .with_amount(request.amount, request.currency)
                    .with_kind(request.handle_kind())
            });
        Ok(item
            .response
            .into_gateway_response(outcome, handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, responses::WorldpayxmlCaptureResponse, Capture, PaymentsCaptureData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, responses::WorldpayxmlCaptureResponse, Capture, PaymentsCaptureData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let received = item
            .response
            .reply()
            .ok
            .as_ref()
            .and_then(|ok| ok.capture_received.as_ref());
        let outcome = item.response.modification_outcome(received);
        let handle = Some(
            request
                .authorization
                .clone()
                .with_amount(request.amount, request.currency)
                .with_kind("capture"),
        );
        Ok(item
            .response
            .into_gateway_response(outcome, handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, responses::WorldpayxmlVoidResponse, Void, PaymentVoidData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, responses::WorldpayxmlVoidResponse, Void, PaymentVoidData>,
    ) -> Result<Self, Self::Error> {
        let received = item
            .response
            .reply()
            .ok
            .as_ref()
            .and_then(|ok| ok.cancel_received.as_ref());
        let outcome = item.response.modification_outcome(received);
        let handle = Some(item.router_data.request.authorization.clone().with_kind("void"));
        Ok(item
            .response
            .into_gateway_response(outcome, handle, item.params, item.http_code))
    }
}

impl TryFrom<ResponseRouterData<'_, responses::WorldpayxmlRefundResponse, Refund, RefundsData>>
    for GatewayResponse
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<'_, responses::WorldpayxmlRefundResponse, Refund, RefundsData>,
    ) -> Result<Self, Self::Error> {
        let request = &item.router_data.request;
        let received = item
            .response
            .reply()
            .ok
            .as_ref()
            .and_then(|ok| ok.refund_received.as_ref());
        let outcome = item.response.modification_outcome(received);
        let handle = Some(
            request
                .authorization
                .clone()
                .with_amount(request.amount, request.currency)
                .with_kind("refund"),
        );
        Ok(item
            .response
            .into_gateway_response(outcome, handle, item.params, item.http_code))
    }
}
