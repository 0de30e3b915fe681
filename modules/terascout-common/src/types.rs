use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The only supported polling strategy today; kept as an enum so the
/// persisted schema does not need to change if a second strategy arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStrategy {
    HtmlDiff,
}

/// The single polling target for a scout, materialized at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub label: String,
    pub strategy: SourceStrategy,
}

/// One user request — immutable after creation except for expiration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scout {
    pub scout_id: Uuid,
    pub query: String,
    pub email: String,
    pub source: Source,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Latest per-source snapshot. A snapshot with an empty `content_hash`
/// marks the baseline cycle and must never produce an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub content_hash: String,
    pub text: String,
    pub checked_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn is_baseline(snapshot: Option<&Snapshot>) -> bool {
        match snapshot {
            None => true,
            Some(s) => s.content_hash.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One detected meaningful transition. Append-only; `event_id` is a
/// content-derived idempotency key (see `hash_event_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub source_url: String,
    pub source_label: String,
    pub tldr: String,
    pub summary: String,
    pub highlights: Vec<String>,
    pub articles: Vec<Article>,
    pub is_breaking: bool,
    pub detected_at: DateTime<Utc>,
    pub notified: bool,
}

/// Today's (UTC) outbound-email counter for a scout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailCounter {
    pub date_key: String,
    pub count: u32,
}

/// SHA-256 hex of `sourceUrl | oldHash | newHash` — bit-exact per spec.md §8.
pub fn hash_event_id(source_url: &str, old_hash: &str, new_hash: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(source_url.as_bytes());
    hasher.update(b"|");
    hasher.update(old_hash.as_bytes());
    hasher.update(b"|");
    hasher.update(new_hash.as_bytes());
    hex::encode(hasher.finalize())
}

/// SHA-256 hex of extracted page text, used as `Snapshot::content_hash`.
pub fn hash_content(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_event_id_is_deterministic() {
        let a = hash_event_id("https://example.com", "H1", "H2");
        let b = hash_event_id("https://example.com", "H1", "H2");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_event_id_distinguishes_field_boundaries() {
        // "a|b" + "c" must not collide with "a" + "b|c" across the pipe separator.
        let a = hash_event_id("a|b", "c", "d");
        let b = hash_event_id("a", "b|c", "d");
        assert_ne!(a, b);
    }

    #[test]
    fn baseline_is_true_when_snapshot_absent() {
        assert!(Snapshot::is_baseline(None));
    }

    #[test]
    fn baseline_is_true_when_hash_empty() {
        let snap = Snapshot {
            content_hash: String::new(),
            text: String::new(),
            checked_at: Utc::now(),
        };
        assert!(Snapshot::is_baseline(Some(&snap)));
    }

    #[test]
    fn baseline_is_false_once_hash_populated() {
        let snap = Snapshot {
            content_hash: "deadbeef".to_string(),
            text: "A".to_string(),
            checked_at: Utc::now(),
        };
        assert!(!Snapshot::is_baseline(Some(&snap)));
    }

    #[test]
    fn hash_content_changes_with_input() {
        assert_ne!(hash_content("A"), hash_content("B"));
        assert_eq!(hash_content("A"), hash_content("A"));
    }
}
