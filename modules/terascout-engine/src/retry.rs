//! Named retry-policy constructors, one per step shape used by the cycle
//! loop. Grounded on the teacher's `workflows::phase_retry_policy()`
//! convention: centralize each retry shape in one reviewable place instead
//! of repeating policy literals at every call site.

use std::time::Duration;

use restate_sdk::prelude::RetryPolicy;

/// Fetch steps: ≤2 extra attempts, 5s apart, linear — spec.md §5.
pub fn fetch_retry_policy() -> RetryPolicy {
    RetryPolicy::fixed_delay(Duration::from_secs(5), Some(2))
}

/// Email steps: ≤3 attempts, exponential from 10s — spec.md §5.
pub fn email_retry_policy() -> RetryPolicy {
    RetryPolicy::exponential(Duration::from_secs(10), 2.0, Some(3), None)
}
