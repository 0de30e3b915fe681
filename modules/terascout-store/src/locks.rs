//! Per-scout single-writer discipline.
//!
//! Generalizes the control plane's global scout-lock acquire/release into a
//! registry of per-`scoutId` locks, so the engine and the control plane's
//! create/delete paths serialize against each other without serializing
//! across unrelated scouts.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct ScoutLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl ScoutLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `scout_id`, creating its entry on first use.
    /// The returned guard serializes all callers holding the same scout_id.
    pub async fn acquire(&self, scout_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry: MutexGuard<'_, _> = self.inner.lock().await;
            registry.entry(scout_id).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn distinct_scouts_do_not_block_each_other() {
        let locks = ScoutLocks::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let guard_a = locks.acquire(a).await;
        // Acquiring a different scout's lock must not deadlock even while
        // the first guard is held.
        let guard_b = locks.acquire(b).await;
        drop(guard_a);
        drop(guard_b);
    }

    #[tokio::test]
    async fn same_scout_lock_is_reentrant_after_drop() {
        let locks = ScoutLocks::new();
        let id = Uuid::new_v4();

        let guard = locks.acquire(id).await;
        drop(guard);
        // Must be acquirable again once released.
        let _guard2 = locks.acquire(id).await;
    }
}
