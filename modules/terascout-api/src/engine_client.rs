//! Typed client for dispatching and cancelling `ScoutEngineWorkflow` runs via
//! the Restate HTTP ingress.
//!
//! Grounded on `rootsignal-api::restate_client::RestateClient`: the Restate
//! Rust SDK doesn't ship an ingress client, so this wraps `reqwest` with one
//! method per control-plane action this API needs.

use reqwest::Client;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EngineClientError {
    #[error("Restate ingress error (HTTP {status}): {body}")]
    Ingress { status: u16, body: String },

    #[error("Restate unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
}

/// Thin client over the Restate HTTP ingress for the one workflow this
/// control plane drives: `ScoutEngineWorkflow`, keyed by `scoutId`.
#[derive(Clone)]
pub struct EngineClient {
    http: Client,
    ingress_url: String,
}

impl EngineClient {
    pub fn new(ingress_url: String) -> Self {
        Self {
            http: Client::new(),
            ingress_url,
        }
    }

    /// Spawn the engine workflow for a newly created scout.
    pub async fn spawn(&self, scout_id: Uuid) -> Result<(), EngineClientError> {
        let url = format!("{}/ScoutEngineWorkflow/{scout_id}/run", self.ingress_url);
        info!(url = url.as_str(), "Dispatching scout engine via Restate");

        let body = serde_json::json!({ "scoutId": scout_id });
        let resp = self.http.post(&url).json(&body).send().await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(EngineClientError::Ingress { status, body })
        }
    }

    /// Terminate the engine workflow bound to `scoutId`. A no-op (success)
    /// if no such workflow is running, per spec.md §4.3's idempotent delete.
    pub async fn cancel(&self, scout_id: Uuid) -> Result<(), EngineClientError> {
        let url = format!(
            "{}/restate/workflow/ScoutEngineWorkflow/{scout_id}/cancel",
            self.ingress_url
        );
        info!(url = url.as_str(), "Cancelling scout engine via Restate");

        let resp = self.http.delete(&url).send().await?;

        if resp.status().is_success() || resp.status().as_u16() == 404 {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(EngineClientError::Ingress { status, body })
        }
    }
}
