//! Postgres rate-limit store.
//!
//! The grant runs as a single transaction holding a row-level exclusive
//! lock (`SELECT … FOR UPDATE`) for the `(api, caller)` row, so two workers
//! that race on the same bucket serialize instead of both reading the old
//! counter. A read-then-write across transactions would overrun the
//! upstream quota.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::SlotLimiter;
use crate::window::RateLimitWindow;

#[derive(Debug, FromRow)]
struct RateLimitRow {
    window_start: DateTime<Utc>,
    calls_made: i32,
    max_calls: i32,
    window_secs: i32,
}

/// Slot limiter backed by the shared Postgres database.
#[derive(Clone)]
pub struct PgSlotLimiter {
    pool: PgPool,
}

impl PgSlotLimiter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create or reconfigure a bucket row. Used by operational tooling and
    /// tests; production rows are seeded by the migrations.
    pub async fn ensure_bucket(
        &self,
        api: &str,
        caller: &str,
        max_calls: i32,
        window_secs: i32,
    ) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO rate_limits (api, caller, window_start, calls_made, max_calls, window_secs)
            VALUES ($1, $2, now(), 0, $3, $4)
            ON CONFLICT (api, caller)
            DO UPDATE SET max_calls = $3, window_secs = $4
            ",
        )
        .bind(api)
        .bind(caller)
        .bind(max_calls)
        .bind(window_secs)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SlotLimiter for PgSlotLimiter {
    async fn acquire_slots(&self, api: &str, caller: &str, requested: u32) -> StoreResult<u32> {
        if requested == 0 {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, RateLimitRow>(
            r"
            SELECT window_start, calls_made, max_calls, window_secs
            FROM rate_limits
            WHERE api = $1 AND caller = $2
            FOR UPDATE
            ",
        )
        .bind(api)
        .bind(caller)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            debug!(api, caller, "No rate-limit bucket configured, granting 0");
            return Ok(0);
        };

        let mut window = RateLimitWindow {
            window_start: row.window_start,
            calls_made: row.calls_made,
            max_calls: row.max_calls,
            window_secs: row.window_secs,
        };
        let grant = window.grant(requested, Utc::now());

        if grant.granted > 0 || grant.reset {
            sqlx::query(
                r"
                UPDATE rate_limits
                SET window_start = $3, calls_made = $4
                WHERE api = $1 AND caller = $2
                ",
            )
            .bind(api)
            .bind(caller)
            .bind(window.window_start)
            .bind(window.calls_made)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(
            api,
            caller,
            requested,
            granted = grant.granted,
            calls_made = window.calls_made,
            max_calls = window.max_calls,
            "Acquired rate-limit slots"
        );

        Ok(grant.granted)
    }
}
