//! Points ledger and leaderboard.

use progression_core::{rank_standings, validate_award, LeaderboardEntry, PointEvent};
use sqlx::PgConnection;
use uuid::Uuid;

use super::Database;
use crate::error::Result;
use crate::models::*;

impl Database {
    // === Points Repository ===

    /// Award points to a user and return the new total
    pub async fn award_points(&self, user_id: Uuid, event: PointEvent, amount: i64) -> Result<i64> {
        let mut tx = self.pool.begin().await?;
        let total = award_in(&mut tx, user_id, event, amount).await?;
        tx.commit().await?;
        Ok(total)
    }

    /// Get a user's points account, if they have earned anything yet
    pub async fn get_points_account(&self, user_id: Uuid) -> Result<Option<PointsAccount>> {
        let account = sqlx::query_as::<_, PointsAccount>(
            r#"
            SELECT user_id, points, created_at, updated_at
            FROM points_accounts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Current total, 0 when no account exists
    pub async fn get_points_total(&self, user_id: Uuid) -> Result<i64> {
        Ok(self
            .get_points_account(user_id)
            .await?
            .map(|a| a.points)
            .unwrap_or(0))
    }

    /// Most recent ledger entries for a user
    pub async fn get_recent_point_events(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<PointEventRecord>> {
        let events = sqlx::query_as::<_, PointEventRecord>(
            r#"
            SELECT id, user_id, reason, amount, created_at
            FROM point_events
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    // === Leaderboard ===

    /// Top `limit` point holders, ranked from 1
    pub async fn get_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>> {
        let rows = sqlx::query_as::<_, StandingRow>(
            r#"
            SELECT pa.user_id, u.display_name, pa.points, pa.created_at
            FROM points_accounts pa
            JOIN users u ON u.id = pa.user_id
            ORDER BY pa.points DESC, pa.created_at ASC, pa.user_id ASC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let standings = rows.iter().map(StandingRow::to_standing).collect();
        Ok(rank_standings(standings, limit))
    }
}

/// Record an award and add it to the running total on the caller's connection.
///
/// The total is bumped with a single `points = points + amount` upsert, creating the
/// account on first award, so concurrent awards to one user never lose an increment.
pub(crate) async fn award_in(
    conn: &mut PgConnection,
    user_id: Uuid,
    event: PointEvent,
    amount: i64,
) -> Result<i64> {
    let amount = validate_award(amount)?;

    sqlx::query(
        r#"
        INSERT INTO point_events (id, user_id, reason, amount)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(event.as_str())
    .bind(amount)
    .execute(&mut *conn)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO points_accounts (user_id, points)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET
            points = points_accounts.points + EXCLUDED.points,
            updated_at = NOW()
        RETURNING points
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .fetch_one(&mut *conn)
    .await?;

    tracing::debug!("Awarded {} points to {} for {}", amount, user_id, event.as_str());

    Ok(total)
}
