use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use terascout_common::{Article, EmailCounter, Event, Scout, Snapshot, Source, SourceStrategy};
use uuid::Uuid;

use crate::error::StoreError;

/// Owner of all persistent per-scout state. Every query below is scoped by
/// `scout_id`; callers serialize concurrent access via `ScoutLocks`.
#[derive(Clone)]
pub struct ScoutStore {
    pool: PgPool,
}

impl ScoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Overwrites config and installs the single source row. Upsert — no
    /// partially-initialized scout is ever observable.
    pub async fn put_config(&self, scout: &Scout) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO scout_config (scout_id, query, email, source_url, source_label, strategy, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (scout_id) DO UPDATE SET
                query = EXCLUDED.query,
                email = EXCLUDED.email,
                source_url = EXCLUDED.source_url,
                source_label = EXCLUDED.source_label,
                strategy = EXCLUDED.strategy,
                created_at = EXCLUDED.created_at,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(scout.scout_id)
        .bind(&scout.query)
        .bind(&scout.email)
        .bind(&scout.source.url)
        .bind(&scout.source.label)
        .bind(strategy_str(scout.source.strategy))
        .bind(scout.created_at)
        .bind(scout.expires_at)
        .execute(&self.pool)
        .await?;

        // A fresh scout starts with an absent snapshot; seed the row anyway
        // so later reads never need to distinguish "no row" from "no prior
        // snapshot" — both are represented by an empty content_hash.
        sqlx::query(
            r#"
            INSERT INTO scout_snapshot (scout_id, content_hash, snapshot_text, checked_at)
            VALUES ($1, '', '', NULL)
            ON CONFLICT (scout_id) DO NOTHING
            "#,
        )
        .bind(scout.scout_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_config(&self, scout_id: Uuid) -> Result<Scout, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT scout_id, query, email, source_url, source_label, strategy, created_at, expires_at
            FROM scout_config WHERE scout_id = $1
            "#,
        )
        .bind(scout_id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or(StoreError::NotFound)?;

        Ok(Scout {
            scout_id: row.try_get("scout_id")?,
            query: row.try_get("query")?,
            email: row.try_get("email")?,
            source: Source {
                url: row.try_get("source_url")?,
                label: row.try_get("source_label")?,
                strategy: strategy_from_str(&row.try_get::<String, _>("strategy")?),
            },
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }

    pub async fn get_snapshot(&self, scout_id: Uuid) -> Result<Option<Snapshot>, StoreError> {
        let row = sqlx::query(
            "SELECT content_hash, snapshot_text, checked_at FROM scout_snapshot WHERE scout_id = $1",
        )
        .bind(scout_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };
        let checked_at: Option<DateTime<Utc>> = row.try_get("checked_at")?;
        let Some(checked_at) = checked_at else { return Ok(None) };

        Ok(Some(Snapshot {
            content_hash: row.try_get("content_hash")?,
            text: row.try_get("snapshot_text")?,
            checked_at,
        }))
    }

    /// Overwrites the snapshot, sets `checked_at = now`, truncates `text`
    /// to `max_text_len`.
    pub async fn put_snapshot(
        &self,
        scout_id: Uuid,
        content_hash: &str,
        text: &str,
        max_text_len: usize,
    ) -> Result<(), StoreError> {
        let truncated = truncate_to_char_boundary(text, max_text_len);

        sqlx::query(
            r#"
            INSERT INTO scout_snapshot (scout_id, content_hash, snapshot_text, checked_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (scout_id) DO UPDATE SET
                content_hash = EXCLUDED.content_hash,
                snapshot_text = EXCLUDED.snapshot_text,
                checked_at = EXCLUDED.checked_at
            "#,
        )
        .bind(scout_id)
        .bind(content_hash)
        .bind(truncated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts iff `event_id` is new for this scout. Returns whether the
    /// insert happened — collisions are a silent no-op per spec.md §3.
    pub async fn record_event(&self, scout_id: Uuid, event: &Event) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO scout_event
                (scout_id, event_id, source_url, source_label, tldr, summary, highlights, articles, is_breaking, detected_at, notified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (scout_id, event_id) DO NOTHING
            "#,
        )
        .bind(scout_id)
        .bind(&event.event_id)
        .bind(&event.source_url)
        .bind(&event.source_label)
        .bind(&event.tldr)
        .bind(&event.summary)
        .bind(serde_json::to_value(&event.highlights).unwrap_or_default())
        .bind(serde_json::to_value(&event.articles).unwrap_or_default())
        .bind(event.is_breaking)
        .bind(event.detected_at)
        .bind(event.notified)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Marks an already-recorded event as notified (sent successfully).
    pub async fn mark_notified(&self, scout_id: Uuid, event_id: &str) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE scout_event SET notified = true WHERE scout_id = $1 AND event_id = $2",
        )
        .bind(scout_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Events in descending `detected_at` order.
    pub async fn list_events(&self, scout_id: Uuid) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT event_id, source_url, source_label, tldr, summary, highlights, articles, is_breaking, detected_at, notified
            FROM scout_event WHERE scout_id = $1
            ORDER BY detected_at DESC
            "#,
        )
        .bind(scout_id)
        .fetch_all(&self.pool)
        .await?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let highlights: serde_json::Value = row.try_get("highlights")?;
            let articles: serde_json::Value = row.try_get("articles")?;
            events.push(Event {
                event_id: row.try_get("event_id")?,
                source_url: row.try_get("source_url")?,
                source_label: row.try_get("source_label")?,
                tldr: row.try_get("tldr")?,
                summary: row.try_get("summary")?,
                highlights: serde_json::from_value(highlights).unwrap_or_default(),
                articles: serde_json::from_value::<Vec<Article>>(articles).unwrap_or_default(),
                is_breaking: row.try_get("is_breaking")?,
                detected_at: row.try_get("detected_at")?,
                notified: row.try_get("notified")?,
            });
        }
        Ok(events)
    }

    /// Recent events for the dedup window, most recent first, capped at
    /// `limit`.
    pub async fn recent_events(&self, scout_id: Uuid, limit: usize) -> Result<Vec<Event>, StoreError> {
        let mut events = self.list_events(scout_id).await?;
        events.truncate(limit);
        Ok(events)
    }

    /// Today's (UTC) counter, default `count = 0` if no row exists yet.
    pub async fn get_email_count(&self, scout_id: Uuid) -> Result<EmailCounter, StoreError> {
        let today = today_key();
        let row = sqlx::query("SELECT count FROM scout_email_counter WHERE scout_id = $1 AND date_key = $2")
            .bind(scout_id)
            .bind(&today)
            .fetch_optional(&self.pool)
            .await?;

        let count = match row {
            Some(row) => row.try_get::<i32, _>("count")? as u32,
            None => 0,
        };

        Ok(EmailCounter { date_key: today, count })
    }

    /// Atomically upserts today's row (count += 1) and deletes all other
    /// date rows for this scout, in the same transaction. Returns the new
    /// count.
    pub async fn increment_email_count(&self, scout_id: Uuid) -> Result<u32, StoreError> {
        let today = today_key();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM scout_email_counter WHERE scout_id = $1 AND date_key <> $2")
            .bind(scout_id)
            .bind(&today)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            r#"
            INSERT INTO scout_email_counter (scout_id, date_key, count)
            VALUES ($1, $2, 1)
            ON CONFLICT (scout_id, date_key) DO UPDATE SET count = scout_email_counter.count + 1
            RETURNING count
            "#,
        )
        .bind(scout_id)
        .bind(&today)
        .fetch_one(&mut *tx)
        .await?;

        let count: i32 = row.try_get("count")?;
        tx.commit().await?;

        Ok(count as u32)
    }

    /// Deletes all rows across all tables for this scout.
    pub async fn wipe(&self, scout_id: Uuid) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM scout_email_counter WHERE scout_id = $1")
            .bind(scout_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM scout_event WHERE scout_id = $1")
            .bind(scout_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM scout_snapshot WHERE scout_id = $1")
            .bind(scout_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM scout_config WHERE scout_id = $1")
            .bind(scout_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

fn strategy_str(strategy: SourceStrategy) -> &'static str {
    match strategy {
        SourceStrategy::HtmlDiff => "html_diff",
    }
}

fn strategy_from_str(s: &str) -> SourceStrategy {
    match s {
        _ => SourceStrategy::HtmlDiff,
    }
}

fn today_key() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "Hello 世界";
        let truncated = truncate_to_char_boundary(text, 8);
        assert!(truncated.len() <= 8);
        assert!(text.starts_with(truncated));
    }

    #[test]
    fn strategy_round_trips_through_its_string_form() {
        assert_eq!(strategy_str(SourceStrategy::HtmlDiff), "html_diff");
        assert!(matches!(strategy_from_str("html_diff"), SourceStrategy::HtmlDiff));
    }

    #[test]
    fn today_key_matches_iso_date_shape() {
        let key = today_key();
        assert_eq!(key.len(), 10);
        assert_eq!(key.chars().nth(4), Some('-'));
        assert_eq!(key.chars().nth(7), Some('-'));
    }
}
