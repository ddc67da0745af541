//! Points and leaderboard endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use progression_core::clamp_limit;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

const RECENT_EVENTS: i64 = 20;

/// GET /api/points/me
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<PointsSummaryResponse>> {
    let points = state.db.get_points_total(auth.user_id).await?;
    let recent_events = state
        .db
        .get_recent_point_events(auth.user_id, RECENT_EVENTS)
        .await?;

    Ok(Json(PointsSummaryResponse {
        points,
        recent_events,
    }))
}

/// GET /api/leaderboard?limit=N
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let limit = clamp_limit(query.limit, state.config.leaderboard_default_limit);
    let entries = state.db.get_leaderboard(limit).await?;
    Ok(Json(LeaderboardResponse { entries }))
}
