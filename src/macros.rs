/// Declares a response schema. Every listed field tolerates being absent, and
/// fields the backend adds later end up in `extra` instead of failing the decode.
macro_rules! create_api_schema {
    (
        $(#[$meta:meta])*
        $schema:ident;
        values: {
            $(
                $(#[$field_meta:meta])*
                $resp_field:ident : $resp_type:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $schema {
            $(
                $(#[$field_meta])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $resp_field: $resp_type,
            )*
            #[serde(flatten)]
            pub extra: serde_json::Map<String, serde_json::Value>,
        }
    };
}

/// Generates a `GET <endpoint>?id=<id>` method on `ApiClient`.
macro_rules! define_lookup_endpoint {
    (
        $(#[$meta:meta])*
        fn $fn_name:ident(id) -> $response_type:ty;
        endpoint: $endpoint:expr;
    ) => {
        impl $crate::client::ApiClient {
            $(#[$meta])*
            pub async fn $fn_name(
                &self,
                id: impl Into<$crate::model::ResourceId>,
            ) -> $crate::client::ApiResult<$response_type> {
                let id = id.into();
                self.get($endpoint, Some(&[("id", id.to_string())])).await
            }
        }
    };
}

/// Generates `delete_<resource>(id, ds_id)` which sends
/// `DELETE /<resource>` with body `{"id": .., "ds_id": ..}`.
macro_rules! define_scoped_delete {
    (
        $(#[$meta:meta])*
        $resource:ident
    ) => {
        paste::paste! {
            impl $crate::client::ApiClient {
                $(#[$meta])*
                pub async fn [<delete_ $resource>](
                    &self,
                    id: impl Into<$crate::model::ResourceId>,
                    ds_id: impl Into<$crate::model::ResourceId>,
                ) -> $crate::client::ApiResult<()> {
                    let body = $crate::model::ResourceRef {
                        id: id.into(),
                        ds_id: ds_id.into(),
                    };
                    self.send_json_status(
                        reqwest::Method::DELETE,
                        concat!("/", stringify!($resource)),
                        &body,
                    )
                    .await
                }
            }
        }
    };
}
