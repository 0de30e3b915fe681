//! Restate SDK serde bridge macros.
//!
//! Bridges `serde::{Serialize, Deserialize}` to Restate's own serialization
//! traits for workflow request/response types, without needing the `Json<>`
//! wrapper on every handler signature. Grounded on
//! `rootsignal-scout::workflows::impl_restate_serde!`.

#[macro_export]
macro_rules! impl_restate_serde {
    ($type:ty) => {
        impl restate_sdk::serde::Serialize for $type {
            type Error = serde_json::Error;

            fn serialize(&self) -> Result<bytes::Bytes, Self::Error> {
                serde_json::to_vec(self).map(bytes::Bytes::from)
            }
        }

        impl restate_sdk::serde::Deserialize for $type {
            type Error = serde_json::Error;

            fn deserialize(bytes: &mut bytes::Bytes) -> Result<Self, Self::Error> {
                serde_json::from_slice(bytes)
            }
        }

        impl restate_sdk::serde::WithContentType for $type {
            fn content_type() -> &'static str {
                "application/json"
            }
        }
    };
}
