pub mod config;
pub mod error;
#[macro_use]
pub mod restate_serde;
pub mod types;

pub use config::Config;
pub use error::TerascoutError;
pub use types::*;
