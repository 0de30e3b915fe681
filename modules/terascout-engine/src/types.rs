use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to start (or resume) a scout's engine invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutRunRequest {
    pub scout_id: Uuid,
}

/// Why the engine's `run` handler returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Expired,
    CycleCapReached,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutRunResult {
    pub cycles_completed: u32,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmptyRequest {}
