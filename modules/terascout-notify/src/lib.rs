//! Pluggable outbound email backend.
//!
//! Mirrors the scout supervisor's `NotifyBackend` shape: a small trait with
//! one concrete HTTP-API backend and a no-op backend for tests.

mod error;
mod http_email;
mod noop;

pub use error::NotifyError;
pub use http_email::HttpEmailSender;
pub use noop::NoopEmailSender;

use async_trait::async_trait;

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, from: &str, to: &str, subject: &str, html: &str) -> Result<(), NotifyError>;
}
