use std::sync::Arc;

use ai_client::Claude;
use sqlx::PgPool;
use terascout_common::Config;
use terascout_fetch::Fetcher;
use terascout_notify::EmailSender;
use terascout_store::{ScoutLocks, ScoutStore};
use typed_builder::TypedBuilder;

/// Shared dependency container for the scout engine workflow. Mirrors the
/// teacher's `ScoutDeps`: long-lived, cloneable resources built once per
/// process and handed to each workflow invocation.
#[derive(Clone, TypedBuilder)]
pub struct EngineDeps {
    pub store: ScoutStore,
    pub locks: ScoutLocks,
    pub claude: Claude,
    pub fetcher: Arc<dyn Fetcher>,
    pub email_sender: Arc<dyn EmailSender>,
    pub config: Config,
}

impl EngineDeps {
    pub fn from_config(
        pool: PgPool,
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        email_sender: Arc<dyn EmailSender>,
    ) -> anyhow::Result<Self> {
        let claude = Claude::new(config.anthropic_api_key.clone(), "claude-sonnet-4-20250514");
        Ok(Self::builder()
            .store(ScoutStore::new(pool))
            .locks(ScoutLocks::new())
            .claude(claude)
            .fetcher(fetcher)
            .email_sender(email_sender)
            .config(config)
            .build())
    }
}
