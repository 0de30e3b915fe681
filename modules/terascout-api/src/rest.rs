//! Control-plane handlers: create, inspect, and delete scouts.
//!
//! Shape follows the teacher's `rest::submit::api_submit`: validation
//! failures are `(StatusCode::BAD_REQUEST, Json(json!({"error": ...})))`,
//! internal failures are a bare `500`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use terascout_common::{Scout, Source, SourceStrategy};

use crate::AppState;

#[derive(Deserialize)]
pub struct CreateScoutRequest {
    query: String,
    email: String,
    #[serde(rename = "expiresAt")]
    expires_at: Option<DateTime<Utc>>,
}

fn bad_request(msg: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": msg })),
    )
        .into_response()
}

/// `POST /api/scouts` — validate, synthesize the source, write config, spawn
/// the engine. Grounded on spec.md §4.3's "Create scout" operation.
pub async fn create_scout(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateScoutRequest>,
) -> impl IntoResponse {
    let query = body.query.trim();
    if query.is_empty() {
        return bad_request("query must not be empty");
    }
    if !body.email.contains('@') {
        return bad_request("email must contain '@'");
    }

    let now = Utc::now();
    let default_expiry = now + chrono::Duration::hours(state.config.default_lifetime_hours as i64);
    let max_expiry = now + chrono::Duration::hours(state.config.max_lifetime_hours as i64);

    let expires_at = match body.expires_at {
        Some(requested) => {
            if requested <= now {
                return bad_request("expiresAt must be in the future");
            }
            if requested > max_expiry {
                return bad_request("expiresAt exceeds the maximum scout lifetime");
            }
            requested
        }
        None => default_expiry,
    };

    // Query extraction + time-window classification, run once at creation
    // (spec.md §4.2 tail). The derived window only informs URL construction
    // here; the cycle loop itself never re-runs discovery.
    let discovery = terascout_engine::discover_source(&state.claude, query).await;
    let source = Source {
        url: format!(
            "https://news.google.com/search?q={}&hl=en-US",
            urlencoding_query(&discovery.phrase)
        ),
        label: discovery.phrase.clone(),
        strategy: SourceStrategy::HtmlDiff,
    };

    let scout_id = Uuid::new_v4();
    let scout = Scout {
        scout_id,
        query: query.to_string(),
        email: body.email.trim().to_string(),
        source,
        created_at: now,
        expires_at,
    };

    if let Err(e) = state.store.put_config(&scout).await {
        warn!(error = %e, %scout_id, "failed to persist scout config");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    if let Err(e) = state.engine.spawn(scout_id).await {
        warn!(error = %e, %scout_id, "failed to dispatch scout engine");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    info!(%scout_id, "scout created");
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "scoutId": scout_id })),
    )
        .into_response()
}

/// `GET /api/scouts/<id>` — `404` if the scout config is unknown.
pub async fn get_scout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let config = match state.store.get_config(id).await {
        Ok(scout) => scout,
        Err(terascout_store::StoreError::NotFound) => {
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(e) => {
            warn!(error = %e, scout_id = %id, "failed to load scout config");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let events = state.store.list_events(id).await.unwrap_or_default();

    Json(serde_json::json!({
        "config": config,
        "events": events,
    }))
    .into_response()
}

/// `DELETE /api/scouts/<id>` — idempotent: terminate the engine (no-op if
/// absent), wipe the store, always return `200 {ok: true, scoutId}`.
pub async fn delete_scout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = state.engine.cancel(id).await {
        warn!(error = %e, scout_id = %id, "failed to cancel scout engine (continuing with wipe)");
    }
    if let Err(e) = state.store.wipe(id).await {
        warn!(error = %e, scout_id = %id, "failed to wipe scout store");
    }

    Json(serde_json::json!({ "ok": true, "scoutId": id })).into_response()
}

fn urlencoding_query(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    for b in phrase.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => out.push(b as char),
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencoding_query_replaces_spaces_with_plus() {
        assert_eq!(urlencoding_query("gpu drops"), "gpu+drops");
    }

    #[test]
    fn urlencoding_query_percent_encodes_special_chars() {
        assert_eq!(urlencoding_query("a&b"), "a%26b");
    }
}
