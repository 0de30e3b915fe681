//! HTTP fetching and HTML-to-text extraction for scout source pages.
//!
//! The wider pipeline treats this as a narrow contract: `fetch(url) -> text`.
//! Everything else (change analysis, dedup, storage) is indifferent to how
//! the text was obtained.

mod error;
mod extract;
mod http;

pub use error::FetchError;

use async_trait::async_trait;

/// Maximum extracted visible text returned to a caller, per spec.md §6.4.
pub const MAX_EXTRACTED_BYTES: usize = 10 * 1024;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return extracted plain text, capped at
    /// `MAX_EXTRACTED_BYTES`.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub use http::HttpFetcher;
