//! Glue between a connector's typed payloads and `ConnectorIntegrationV2`.
//!
//! `create_all_prerequisites!` declares the connector struct with its amount
//! convertors and helper methods. `macro_connector_implementation!` then
//! wires one flow: request body through `TryFrom<ConnectorRouterData>`,
//! response through `TryFrom<ResponseRouterData>` into a `GatewayResponse`.

macro_rules! create_all_prerequisites {
    (
        connector_name: $connector: ident,
        amount_converters: [
            $($converter_name: ident : $amount_unit: ident),* $(,)?
        ],
        member_functions: {
            $($member_function: item)*
        } $(,)?
    ) => {
        paste::paste! {
            #[derive(Clone)]
            pub struct $connector {
                $(
                    pub(crate) $converter_name: &'static (dyn common_utils::types::AmountConvertor<
                        Output = common_utils::types::$amount_unit,
                    > + Sync),
                )*
            }

            impl $connector {
                pub const fn new() -> &'static Self {
                    &Self {
                        $($converter_name: &common_utils::types::[<$amount_unit ForConnector>],)*
                    }
                }

                $($member_function)*
            }
        }
    };
}

macro_rules! expand_fn_get_request_body {
    ($connector: ident, Json, $request_body: ty, $flow_name: ident, $flow_request: ty) => {
        fn get_request_body(
            &self,
            req: &domain_types::router_data_v2::RouterDataV2<$flow_name, $flow_request>,
        ) -> common_utils::CustomResult<
            Option<common_utils::request::RequestContent>,
            domain_types::errors::ConnectorError,
        > {
            let connector_req =
                <$request_body>::try_from($crate::types::ConnectorRouterData::new(self, req))?;
            Ok(Some(common_utils::request::RequestContent::Json(Box::new(
                connector_req,
            ))))
        }
    };
    ($connector: ident, FormUrlEncoded, $request_body: ty, $flow_name: ident, $flow_request: ty) => {
        fn get_request_body(
            &self,
            req: &domain_types::router_data_v2::RouterDataV2<$flow_name, $flow_request>,
        ) -> common_utils::CustomResult<
            Option<common_utils::request::RequestContent>,
            domain_types::errors::ConnectorError,
        > {
            let connector_req =
                <$request_body>::try_from($crate::types::ConnectorRouterData::new(self, req))?;
            Ok(Some(common_utils::request::RequestContent::FormUrlEncoded(
                Box::new(connector_req),
            )))
        }
    };
    // Rendered by the connector's own `xml_document`, which adds the prolog
    // and any doctype.
    ($connector: ident, Xml, $request_body: ty, $flow_name: ident, $flow_request: ty) => {
        fn get_request_body(
            &self,
            req: &domain_types::router_data_v2::RouterDataV2<$flow_name, $flow_request>,
        ) -> common_utils::CustomResult<
            Option<common_utils::request::RequestContent>,
            domain_types::errors::ConnectorError,
        > {
            let connector_req =
                <$request_body>::try_from($crate::types::ConnectorRouterData::new(self, req))?;
            let document = self.xml_document(&connector_req)?;
            Ok(Some(common_utils::request::RequestContent::RawBytes(
                document.into_bytes(),
            )))
        }
    };
}

macro_rules! expand_fn_handle_response {
    ($connector: ident, $response_body: ty, $flow_name: ident, $flow_request: ty) => {
        fn handle_response_v2(
            &self,
            req: &domain_types::router_data_v2::RouterDataV2<$flow_name, $flow_request>,
            mapping: domain_types::flat_mapping::FlatMapping,
            status_code: u16,
        ) -> common_utils::CustomResult<
            domain_types::router_response_types::GatewayResponse,
            domain_types::errors::ConnectorError,
        > {
            if mapping.parse_error && mapping.is_empty() {
                return Err(error_stack::report!(
                    domain_types::errors::ConnectorError::ResponseDeserializationFailed
                )
                .attach_printable(mapping.raw));
            }
            let response: $response_body = error_stack::ResultExt::change_context(
                mapping.deserialize(stringify!($response_body)),
                domain_types::errors::ConnectorError::ResponseDeserializationFailed,
            )?;
            let params = mapping.flatten();
            error_stack::ResultExt::change_context(
                domain_types::router_response_types::GatewayResponse::try_from(
                    $crate::types::ResponseRouterData {
                        response,
                        router_data: req,
                        http_code: status_code,
                        params,
                    },
                ),
                domain_types::errors::ConnectorError::ResponseHandlingFailed,
            )
        }
    };
}

macro_rules! macro_connector_implementation {
    (
        connector: $connector: ident,
        $(curl_request: $content_type: ident($request_body: ty),)?
        curl_response: $response_body: ty,
        flow_name: $flow_name: ident,
        flow_request: $flow_request: ty,
        http_method: $http_method: ident,
        other_functions: {
            $($function_def: item)*
        } $(,)?
    ) => {
        impl interfaces::connector_integration_v2::ConnectorIntegrationV2<$flow_name, $flow_request>
            for $connector
        {
            fn get_http_method(&self) -> common_utils::request::Method {
                common_utils::request::Method::$http_method
            }

            fn get_headers(
                &self,
                req: &domain_types::router_data_v2::RouterDataV2<$flow_name, $flow_request>,
            ) -> common_utils::CustomResult<
                Vec<(String, hyperswitch_masking::Maskable<String>)>,
                domain_types::errors::ConnectorError,
            > {
                self.build_headers(req)
            }

            $(
                $crate::connectors::macros::expand_fn_get_request_body!(
                    $connector,
                    $content_type,
                    $request_body,
                    $flow_name,
                    $flow_request
                );
            )?

            $crate::connectors::macros::expand_fn_handle_response!(
                $connector,
                $response_body,
                $flow_name,
                $flow_request
            );

            $($function_def)*
        }
    };
}

pub(crate) use create_all_prerequisites;
pub(crate) use expand_fn_get_request_body;
pub(crate) use expand_fn_handle_response;
pub(crate) use macro_connector_implementation;
