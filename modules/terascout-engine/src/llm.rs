//! Model-call integration points. Every call here treats its model's
//! output as untrusted free text per spec.md §9: the raw response is
//! scanned for the first balanced `{...}` object, parsed leniently, and
//! any failure falls back to the documented safe default instead of
//! propagating an error.
//!
//! Grounded on `ai_client::util`'s existing defensive-text helpers
//! (`truncate_to_char_boundary`, `strip_code_blocks`); this module adds
//! the one function those helpers were missing, `extract_json_object`.

use ai_client::{util, Claude};
use serde::Deserialize;

/// Scans `text` for the first balanced `{...}` substring (tracking brace
/// depth, ignoring braces inside string literals) and parses it as JSON.
/// Returns `None` on any failure — callers treat `None` as the documented
/// safe default.
pub fn extract_json_object(text: &str) -> Option<serde_json::Value> {
    let text = util::strip_code_blocks(text);
    let bytes = text.as_bytes();

    let start = bytes.iter().position(|&b| b == b'{')?;

    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    let mut end = None;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(i + 1);
                    break;
                }
            }
            _ => {}
        }
    }

    let end = end?;
    serde_json::from_str(&text[start..end]).ok()
}

/// Result of the change-analysis call comparing prior and current page text.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisVerdict {
    #[serde(rename = "isEvent")]
    pub is_event: bool,
    #[serde(default)]
    pub tldr: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, rename = "isBreaking")]
    pub is_breaking: bool,
}

impl AnalysisVerdict {
    /// The documented safe default on any parse failure per spec.md §9.
    pub fn not_an_event() -> Self {
        Self {
            is_event: false,
            tldr: String::new(),
            summary: String::new(),
            highlights: Vec::new(),
            is_breaking: false,
        }
    }
}

/// Result of the semantic-dedup call against recent event summaries.
#[derive(Debug, Clone, Deserialize)]
pub struct DedupVerdict {
    #[serde(rename = "isDuplicate")]
    pub is_duplicate: bool,
}

impl DedupVerdict {
    /// Dedup call failure prefers false-positive notifications over silent
    /// drops, per spec.md §4.2 tie-breaks.
    pub fn not_duplicate() -> Self {
        Self { is_duplicate: false }
    }
}

/// Result of source discovery (query extraction + time-window classification)
/// run once at scout creation.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDiscovery {
    pub phrase: String,
    #[serde(default = "default_window")]
    pub window: String,
}

fn default_window() -> String {
    "7d".to_string()
}

impl SourceDiscovery {
    /// Fallback on model failure: the raw (truncated) query, 7-day window,
    /// per spec.md §4.2.
    pub fn fallback(raw_query: &str) -> Self {
        Self {
            phrase: util::truncate_to_char_boundary(raw_query, 80).to_string(),
            window: "7d".to_string(),
        }
    }
}

const ANALYSIS_SYSTEM_PROMPT: &str = "You are a change-detection analyst. Compare the previous and \
current page text for the given query and decide whether substantively new, query-relevant content \
has appeared. Respond with a single JSON object only: \
{\"isEvent\": bool, \"tldr\": string (<=15 words), \"summary\": string (2-4 sentences), \
\"highlights\": array of 0-5 short strings, \"isBreaking\": bool}.";

const DEDUP_SYSTEM_PROMPT: &str = "You compare a candidate story summary against a list of recent \
summaries and decide whether it restates one of them rather than describing new content. Respond \
with a single JSON object only: {\"isDuplicate\": bool}.";

const DISCOVERY_SYSTEM_PROMPT: &str = "Extract a 2-7 word search phrase capturing the core subject \
of the user's query, and classify its time sensitivity into one of \"1d\", \"7d\", \"30d\", \"none\". \
Respond with a single JSON object only: {\"phrase\": string, \"window\": \"1d\"|\"7d\"|\"30d\"|\"none\"}.";

/// Query extraction + time-window classification, run once at creation.
pub async fn discover_source(claude: &Claude, raw_query: &str) -> SourceDiscovery {
    match claude.chat_completion(DISCOVERY_SYSTEM_PROMPT, raw_query).await {
        Ok(text) => extract_json_object(&text)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_else(|| SourceDiscovery::fallback(raw_query)),
        Err(_) => SourceDiscovery::fallback(raw_query),
    }
}

/// Change analysis between the prior and current snapshot text.
pub async fn analyze_change(
    claude: &Claude,
    query: &str,
    prev_text: &str,
    current_text: &str,
) -> AnalysisVerdict {
    let prompt = format!(
        "Query: {query}\n\n--- PREVIOUS TEXT ---\n{prev_text}\n\n--- CURRENT TEXT ---\n{current_text}"
    );
    match claude.chat_completion(ANALYSIS_SYSTEM_PROMPT, prompt).await {
        Ok(text) => extract_json_object(&text)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_else(AnalysisVerdict::not_an_event),
        Err(_) => AnalysisVerdict::not_an_event(),
    }
}

/// Semantic dedup against the last `dedupeLookback` event summaries.
pub async fn check_duplicate(claude: &Claude, candidate_summary: &str, recent_summaries: &[String]) -> DedupVerdict {
    let prompt = format!(
        "Candidate summary: {candidate_summary}\n\nRecent summaries:\n{}",
        recent_summaries.join("\n")
    );
    match claude.chat_completion(DEDUP_SYSTEM_PROMPT, prompt).await {
        Ok(text) => extract_json_object(&text)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_else(DedupVerdict::not_duplicate),
        Err(_) => DedupVerdict::not_duplicate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_object() {
        let v = extract_json_object(r#"{"isEvent": true}"#).unwrap();
        assert_eq!(v["isEvent"], serde_json::json!(true));
    }

    #[test]
    fn extracts_object_embedded_in_prose() {
        let text = "Sure, here is the analysis:\n{\"isEvent\": false}\nLet me know if you need more.";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["isEvent"], serde_json::json!(false));
    }

    #[test]
    fn extracts_from_fenced_code_block() {
        let text = "```json\n{\"isDuplicate\": true}\n```";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["isDuplicate"], serde_json::json!(true));
    }

    #[test]
    fn ignores_braces_inside_string_values() {
        let text = r#"{"summary": "a { weird } value", "isEvent": true}"#;
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["isEvent"], serde_json::json!(true));
    }

    #[test]
    fn handles_escaped_quotes_inside_strings() {
        let text = r#"{"summary": "she said \"hi\"", "isEvent": false}"#;
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["isEvent"], serde_json::json!(false));
    }

    #[test]
    fn returns_none_for_unbalanced_braces() {
        assert!(extract_json_object("{\"isEvent\": true").is_none());
    }

    #[test]
    fn returns_none_for_no_object_at_all() {
        assert!(extract_json_object("no json here").is_none());
    }

    #[test]
    fn returns_none_for_malformed_json_inside_braces() {
        assert!(extract_json_object("{not: valid, json}").is_none());
    }

    #[test]
    fn analysis_verdict_safe_default_is_not_an_event() {
        let v = AnalysisVerdict::not_an_event();
        assert!(!v.is_event);
    }

    #[test]
    fn dedup_verdict_safe_default_is_not_duplicate() {
        let v = DedupVerdict::not_duplicate();
        assert!(!v.is_duplicate);
    }

    #[test]
    fn source_discovery_fallback_truncates_and_defaults_to_seven_days() {
        let long_query = "x".repeat(200);
        let fallback = SourceDiscovery::fallback(&long_query);
        assert!(fallback.phrase.len() <= 80);
        assert_eq!(fallback.window, "7d");
    }
}
