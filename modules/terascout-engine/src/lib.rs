//! Scout Engine — the durable per-scout polling loop.
//!
//! One Restate workflow invocation per scout, keyed by `scoutId`. Grounded
//! on `rootsignal-scout::workflows`: deps built once per process and cloned
//! into each invocation, side-effectful work wrapped in `ctx.run(..)` so a
//! restart replays already-completed steps from the journal instead of
//! re-running them.

mod decision;
mod deps;
mod llm;
mod retry;
mod types;
mod workflow;

pub use decision::{is_expired, should_email};
pub use deps::EngineDeps;
pub use llm::{discover_source, extract_json_object, AnalysisVerdict, DedupVerdict, SourceDiscovery};
pub use retry::{email_retry_policy, fetch_retry_policy};
pub use types::{EmptyRequest, ScoutRunRequest, ScoutRunResult};
pub use workflow::{ScoutEngineWorkflow, ScoutEngineWorkflowImpl};

terascout_common::impl_restate_serde!(ScoutRunRequest);
terascout_common::impl_restate_serde!(ScoutRunResult);
terascout_common::impl_restate_serde!(EmptyRequest);
