//! The cycle loop — one Restate workflow invocation per scout.
//!
//! Each side-effecting call is wrapped in `ctx.run(..)`, mirroring the
//! teacher's `ScrapeWorkflowImpl`/`NewsScanWorkflowImpl`: on replay after a
//! restart, Restate's journal returns the already-recorded outcome of a
//! call instead of re-running it, so sent emails are never re-sent and
//! already-written snapshots are never re-fetched. Durable sleep
//! (`ctx.sleep`) resumes the remaining duration across a crash rather than
//! starting over, satisfying spec.md §5's suspension-point contract.
//!
//! Pure, non-side-effecting computations (expiration comparison, event-id
//! hashing) are left un-wrapped: there is nothing to memoize because they
//! are already deterministic given their (journaled) inputs.

use std::sync::Arc;
use std::time::Duration;

use restate_sdk::prelude::*;
use tracing::info;

use terascout_common::{hash_content, hash_event_id, Event, Snapshot};

use crate::decision::{is_expired, should_email};
use crate::deps::EngineDeps;
use crate::llm;
use crate::retry::{email_retry_policy, fetch_retry_policy};
use crate::types::{EmptyRequest, ScoutRunRequest, ScoutRunResult, StopReason};

#[restate_sdk::workflow]
#[name = "ScoutEngineWorkflow"]
pub trait ScoutEngineWorkflow {
    async fn run(req: ScoutRunRequest) -> Result<ScoutRunResult, HandlerError>;
    #[shared]
    async fn get_status(req: EmptyRequest) -> Result<String, HandlerError>;
}

pub struct ScoutEngineWorkflowImpl {
    deps: Arc<EngineDeps>,
}

impl ScoutEngineWorkflowImpl {
    pub fn with_deps(deps: Arc<EngineDeps>) -> Self {
        Self { deps }
    }
}

impl ScoutEngineWorkflow for ScoutEngineWorkflowImpl {
    async fn run(
        &self,
        ctx: WorkflowContext<'_>,
        req: ScoutRunRequest,
    ) -> Result<ScoutRunResult, HandlerError> {
        let scout_id = req.scout_id;
        let deps = self.deps.clone();

        for cycle in 0..deps.config.max_cycles {
            ctx.set("status", format!("cycle {cycle}: loading config"));

            // "load-config-<c>": read config and capture the decision-time
            // clock together so the expiration check stays deterministic
            // across a replay.
            let (scout, now) = {
                let deps = deps.clone();
                ctx.run(|| async move {
                    let scout = deps
                        .store
                        .get_config(scout_id)
                        .await
                        .map_err(|e| -> HandlerError { TerminalError::new(e.to_string()).into() })?;
                    Ok((scout, chrono::Utc::now()))
                })
                .await?
            };

            if is_expired(now, scout.expires_at) {
                info!(%scout_id, cycle, "scout expired, stopping engine");
                return Ok(ScoutRunResult {
                    cycles_completed: cycle,
                    stop_reason: StopReason::Expired,
                });
            }

            // "email-count-<c>": today's outbound counter.
            let email_count = {
                let deps = deps.clone();
                ctx.run(|| async move {
                    deps.store
                        .get_email_count(scout_id)
                        .await
                        .map(|c| c.count)
                        .map_err(|e| -> HandlerError { TerminalError::new(e.to_string()).into() })
                })
                .await?
            };
            let can_email = should_email(email_count, deps.config.max_emails_per_scout_per_day);

            // Exactly one source per scout in this spec (§3); the loop
            // shape mirrors the pseudocode's "for each source" for fidelity
            // with multi-source reimplementations.
            for source in std::iter::once(&scout.source) {
                ctx.set("status", format!("cycle {cycle}: fetching {}", source.label));

                // "fetch-<c>-<label>": permanent failure skips this source,
                // leaving the prior snapshot untouched.
                let fetched_text = {
                    let fetcher = deps.fetcher.clone();
                    let url = source.url.clone();
                    let result = ctx
                        .run(|| async move {
                            fetcher
                                .fetch(&url)
                                .await
                                .map_err(|e| -> HandlerError { TerminalError::new(e.to_string()).into() })
                        })
                        .retry_policy(fetch_retry_policy())
                        .await;
                    match result {
                        Ok(text) => text,
                        Err(e) => {
                            info!(%scout_id, cycle, label = %source.label, error = %e, "fetch failed, skipping source");
                            continue;
                        }
                    }
                };

                let new_hash = hash_content(&fetched_text);

                // "snapshot-<c>-<label>": prior snapshot, before overwrite.
                let prev: Option<Snapshot> = {
                    let deps = deps.clone();
                    ctx.run(|| async move {
                        deps.store
                            .get_snapshot(scout_id)
                            .await
                            .map_err(|e| -> HandlerError { TerminalError::new(e.to_string()).into() })
                    })
                    .await?
                };
                let is_baseline = Snapshot::is_baseline(prev.as_ref());

                // "save-snapshot-<c>-<label>"
                {
                    let deps = deps.clone();
                    let text = fetched_text.clone();
                    let hash = new_hash.clone();
                    let max_len = deps.config.max_snapshot_text_length;
                    ctx.run(|| async move {
                        deps.store
                            .put_snapshot(scout_id, &hash, &text, max_len)
                            .await
                            .map_err(|e| -> HandlerError { TerminalError::new(e.to_string()).into() })
                    })
                    .await?;
                }

                if is_baseline {
                    info!(%scout_id, cycle, label = %source.label, "baseline cycle, no event possible");
                    continue;
                }

                let prev_text = prev.as_ref().map(|s| s.text.clone()).unwrap_or_default();
                let prev_hash = prev.as_ref().map(|s| s.content_hash.clone()).unwrap_or_default();

                // "analyze-<c>-<label>": the analyzer is always invoked even
                // on equal hashes per spec.md §4.2's fast-path note.
                let analysis = {
                    let claude = deps.claude.clone();
                    let query = scout.query.clone();
                    let prev_text = ai_client::util::truncate_to_char_boundary(&prev_text, deps.config.max_ai_text_length).to_string();
                    let current_text = ai_client::util::truncate_to_char_boundary(&fetched_text, deps.config.max_ai_text_length).to_string();
                    ctx.run(|| async move {
                        Ok(llm::analyze_change(&claude, &query, &prev_text, &current_text).await)
                    })
                    .await?
                };

                if !analysis.is_event {
                    continue;
                }

                // "dedupe-<c>-<label>": compare against the last K summaries.
                let duplicate = {
                    let deps = deps.clone();
                    let claude = deps.claude.clone();
                    let summary = analysis.summary.clone();
                    let lookback = deps.config.dedupe_lookback;
                    ctx.run(|| async move {
                        let recent = deps
                            .store
                            .recent_events(scout_id, lookback)
                            .await
                            .map_err(|e| -> HandlerError { TerminalError::new(e.to_string()).into() })?;
                        let summaries: Vec<String> = recent.into_iter().map(|e| e.summary).collect();
                        Ok(llm::check_duplicate(&claude, &summary, &summaries).await.is_duplicate)
                    })
                    .await?
                };

                if duplicate {
                    continue;
                }

                // "hash-event-<c>-<label>": pure, not checkpointed separately.
                let event_id = hash_event_id(&source.url, &prev_hash, &new_hash);

                let event = Event {
                    event_id,
                    source_url: source.url.clone(),
                    source_label: source.label.clone(),
                    tldr: analysis.tldr.clone(),
                    summary: analysis.summary.clone(),
                    highlights: analysis.highlights.clone(),
                    articles: Vec::new(),
                    is_breaking: analysis.is_breaking,
                    detected_at: now,
                    notified: false,
                };

                // "record-event-<c>-<label>": idempotent insert.
                let inserted = {
                    let deps = deps.clone();
                    let event = event.clone();
                    ctx.run(|| async move {
                        deps.store
                            .record_event(scout_id, &event)
                            .await
                            .map_err(|e| -> HandlerError { TerminalError::new(e.to_string()).into() })
                    })
                    .await?
                };

                if inserted && can_email {
                    // "email-<c>-<label>": send + increment co-located in one
                    // step so send-without-count is never observable across
                    // a restart (spec.md §4.2 tie-breaks).
                    let deps2 = deps.clone();
                    let event2 = event.clone();
                    let scout2 = scout.clone();
                    ctx.run(|| async move {
                        let subject = format!("[Terascout] {}", event2.tldr);
                        let html = format!(
                            "<p>{}</p><p>{}</p>",
                            event2.summary,
                            event2.highlights.join("</p><p>")
                        );
                        deps2
                            .email_sender
                            .send("terascout@example.com", &scout2.email, &subject, &html)
                            .await
                            .map_err(|e| -> HandlerError { TerminalError::new(e.to_string()).into() })?;
                        deps2
                            .store
                            .increment_email_count(scout_id)
                            .await
                            .map_err(|e| -> HandlerError { TerminalError::new(e.to_string()).into() })?;
                        deps2
                            .store
                            .mark_notified(scout_id, &event2.event_id)
                            .await
                            .map_err(|e| -> HandlerError { TerminalError::new(e.to_string()).into() })?;
                        Ok(())
                    })
                    .retry_policy(email_retry_policy())
                    .await?;
                }
            }

            // "wait-<c>": durable sleep, crash-safe across the remaining
            // duration per spec.md §5.
            ctx.set("status", format!("cycle {cycle}: sleeping"));
            ctx.sleep(Duration::from_secs(deps.config.poll_interval_secs)).await?;
        }

        Ok(ScoutRunResult {
            cycles_completed: deps.config.max_cycles,
            stop_reason: StopReason::CycleCapReached,
        })
    }

    async fn get_status(
        &self,
        ctx: SharedWorkflowContext<'_>,
        _req: EmptyRequest,
    ) -> Result<String, HandlerError> {
        Ok(ctx
            .get::<String>("status")
            .await?
            .unwrap_or_else(|| "pending".to_string()))
    }
}
