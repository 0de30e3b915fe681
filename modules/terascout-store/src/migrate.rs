use sqlx::PgPool;

use crate::error::StoreError;

/// Idempotent schema setup, run once at process start. Tolerates an
/// existing persisted schema that predates any of the enrichment columns —
/// `ALTER TABLE ... ADD COLUMN IF NOT EXISTS` leaves already-populated
/// deployments untouched.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scout_config (
            scout_id    UUID PRIMARY KEY,
            query       TEXT NOT NULL,
            email       TEXT NOT NULL,
            source_url  TEXT NOT NULL,
            source_label TEXT NOT NULL,
            strategy    TEXT NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL,
            expires_at  TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scout_snapshot (
            scout_id    UUID PRIMARY KEY REFERENCES scout_config(scout_id),
            content_hash TEXT NOT NULL DEFAULT '',
            snapshot_text TEXT NOT NULL DEFAULT '',
            checked_at  TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scout_event (
            scout_id    UUID NOT NULL REFERENCES scout_config(scout_id),
            event_id    TEXT NOT NULL,
            source_url  TEXT NOT NULL,
            source_label TEXT NOT NULL,
            tldr        TEXT NOT NULL DEFAULT '',
            summary     TEXT NOT NULL DEFAULT '',
            highlights  JSONB NOT NULL DEFAULT '[]',
            articles    JSONB NOT NULL DEFAULT '[]',
            is_breaking BOOLEAN NOT NULL DEFAULT false,
            detected_at TIMESTAMPTZ NOT NULL,
            notified    BOOLEAN NOT NULL DEFAULT false,
            PRIMARY KEY (scout_id, event_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scout_email_counter (
            scout_id    UUID NOT NULL REFERENCES scout_config(scout_id),
            date_key    TEXT NOT NULL,
            count       INT NOT NULL DEFAULT 0,
            PRIMARY KEY (scout_id, date_key)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Enrichment columns (tldr, highlights, articles, is_breaking) and
    // expires_at ship with the initial CREATE TABLE above, but an existing
    // deployment that predates them is brought up to date here.
    for (table, column, ddl) in [
        ("scout_event", "tldr", "TEXT NOT NULL DEFAULT ''"),
        ("scout_event", "highlights", "JSONB NOT NULL DEFAULT '[]'"),
        ("scout_event", "articles", "JSONB NOT NULL DEFAULT '[]'"),
        ("scout_event", "is_breaking", "BOOLEAN NOT NULL DEFAULT false"),
        ("scout_config", "expires_at", "TIMESTAMPTZ"),
    ] {
        let stmt = format!("ALTER TABLE {table} ADD COLUMN IF NOT EXISTS {column} {ddl}");
        sqlx::query(&stmt).execute(pool).await?;
    }

    Ok(())
}
