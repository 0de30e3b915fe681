use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::FetchError;
use crate::extract::html_to_text;
use crate::Fetcher;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; TerascoutBot/1.0; +https://terascout.example/bot)";
const MAX_RETRY_AFTER_SECS: u64 = 60;
const MAX_EXTRA_ATTEMPTS: u32 = 3;

/// Plain `reqwest`-backed fetcher. Follows redirects, retries HTTP 429
/// responses honoring `Retry-After` up to `MAX_RETRY_AFTER_SECS`, and
/// extracts visible text via Readability.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            let resp = self.client.get(url).send().await?;
            let status = resp.status();

            if status.as_u16() == 429 && attempt < MAX_EXTRA_ATTEMPTS {
                let wait = retry_after_secs(resp.headers()).min(MAX_RETRY_AFTER_SECS);
                warn!(url, attempt, wait_secs = wait, "fetch rate limited, retrying");
                tokio::time::sleep(Duration::from_secs(wait)).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                });
            }

            let bytes = resp.bytes().await?;
            return Ok(html_to_text(&bytes, Some(url)));
        }
    }
}

fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_falls_back_to_five_seconds() {
        let headers = reqwest::header::HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), 5);
    }

    #[test]
    fn retry_after_parses_header_value() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::RETRY_AFTER,
            reqwest::header::HeaderValue::from_static("30"),
        );
        assert_eq!(retry_after_secs(&headers), 30);
    }
}
