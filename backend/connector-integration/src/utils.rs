use base64::Engine;
use common_utils::consts::BASE64_ENGINE;
use domain_types::{
    errors,
    payment_method_data::Card,
    router_request_types::Address,
};
use error_stack::{Report, ResultExt};
use hyperswitch_masking::{Mask, Maskable, PeekInterface, Secret};
use serde::Serialize;

pub use domain_types::utils::{convert_amount, missing_field_err};

type Error = Report<errors::ConnectorError>;

pub const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub(crate) fn get_unimplemented_payment_method_error_message(connector: &str) -> String {
    format!("Selected payment method through {connector}")
}

/// `Basic` authorization header value for a user and password pair.
pub fn basic_auth_header(user: &Secret<String>, password: &Secret<String>) -> Maskable<String> {
    let encoded = BASE64_ENGINE.encode(format!("{}:{}", user.peek(), password.peek()));
    format!("Basic {encoded}").into_masked()
}

pub fn bearer_auth_header(token: &Secret<String>) -> Maskable<String> {
    format!("Bearer {}", token.peek()).into_masked()
}

/// Serializes `data` under `root_name`, preceded by the XML prolog and a
/// `<!DOCTYPE>` line.
pub fn serialize_to_xml_document<T: Serialize>(
    root_name: &str,
    doctype: &str,
    data: &T,
) -> Result<String, Error> {
    let xml_content = quick_xml::se::to_string_with_root(root_name, data)
        .change_context(errors::ConnectorError::RequestEncodingFailed)
        .attach_printable("Failed to serialize XML document")?;

    Ok(format!("{XML_PROLOG}\n{doctype}\n{xml_content}"))
}

/// First and last name for a card payment: the billing address names when
/// given, otherwise the card holder name split on its last word.
pub fn get_name_parts(
    card: &Card,
    billing: Option<&Address>,
) -> (Option<Secret<String>>, Option<Secret<String>>) {
    let first = billing
        .and_then(|address| address.first_name.clone())
        .filter(|name| !name.peek().trim().is_empty());
    match first {
        Some(first) => (
            Some(first),
            billing.and_then(|address| address.last_name.clone()),
        ),
        None => (card.get_first_name(), card.get_last_name()),
    }
}

/// Message of a failed gateway answer: the gateway's own text, then the HTTP
/// reason phrase, then `NO_ERROR_MESSAGE`.
pub fn failure_message(connector: &str, message: Option<String>, status_code: u16) -> String {
    message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| interfaces::api::fallback_error_message(connector, status_code))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use cards::CardNumber;
    use common_utils::consts;
    use hyperswitch_masking::ExposeInterface;

    use super::*;

    fn card(holder: &str) -> Card {
        Card {
            card_number: CardNumber::from_str("4111111111111111").unwrap_or_else(|_| {
                unreachable!("test card number is valid")
            }),
            card_exp_month: Secret::new("09".to_string()),
            card_exp_year: Secret::new("2031".to_string()),
            card_cvc: None,
            card_holder_name: Some(Secret::new(holder.to_string())),
            card_network: None,
        }
    }

    #[test]
    fn basic_auth_is_base64_of_pair() {
        let header = basic_auth_header(
            &Secret::new("user".to_string()),
            &Secret::new("pass".to_string()),
        );
        assert_eq!(header.into_inner(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn names_prefer_billing_address() {
        let billing = Address {
            first_name: Some(Secret::new("Ada".to_string())),
            last_name: Some(Secret::new("Lovelace".to_string())),
            ..Default::default()
        };
        let (first, last) = get_name_parts(&card("John Smith"), Some(&billing));
        assert_eq!(first.map(ExposeInterface::expose).as_deref(), Some("Ada"));
        assert_eq!(last.map(ExposeInterface::expose).as_deref(), Some("Lovelace"));

        let (first, last) = get_name_parts(&card("John Q Smith"), None);
        assert_eq!(first.map(ExposeInterface::expose).as_deref(), Some("John Q"));
        assert_eq!(last.map(ExposeInterface::expose).as_deref(), Some("Smith"));
    }

    #[test]
    fn xml_document_carries_prolog_and_doctype() {
        #[derive(Serialize)]
        struct Ping {
            #[serde(rename = "@version")]
            version: &'static str,
        }
        let document =
            serialize_to_xml_document("ping", "<!DOCTYPE ping>", &Ping { version: "1.4" });
        let document = document.unwrap_or_default();
        assert!(document.starts_with(XML_PROLOG));
        assert!(document.contains("<!DOCTYPE ping>"));
        assert!(document.ends_with(r#"<ping version="1.4"/>"#));
    }

    #[test]
    fn failure_message_falls_back() {
        assert_eq!(failure_message("nmi", Some("Declined".into()), 200), "Declined");
        assert_eq!(failure_message("nmi", Some(" ".into()), 404), "Not Found");
        assert_eq!(failure_message("nmi", None, 200), consts::NO_ERROR_MESSAGE);
    }
}
