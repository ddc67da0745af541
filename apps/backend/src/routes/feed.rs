//! Feed endpoints. Each write awards points to the acting or beneficiary user.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::required_text;
use crate::AppState;

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<PostResponse>> {
    let body = required_text(&payload.body, "body")?;
    let award = state.config.points.amount_for(PointEvent::PostCreated);
    let (post, total_points) = state.db.create_post(auth.user_id, &body, award).await?;

    Ok(Json(PostResponse { post, total_points }))
}

/// POST /api/posts/:post_id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Json<CommentResponse>> {
    let body = required_text(&payload.body, "body")?;
    let award = state.config.points.amount_for(PointEvent::CommentCreated);
    let (comment, total_points) = state
        .db
        .create_comment(post_id, auth.user_id, &body, award)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post {}", post_id)))?;

    Ok(Json(CommentResponse {
        comment,
        total_points,
    }))
}

/// PUT /api/posts/:post_id/like
pub async fn like(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<LikeResponse>> {
    let award = state.config.points.amount_for(PointEvent::LikeReceived);
    let changed = state
        .db
        .like_post(post_id, auth.user_id, award)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post {}", post_id)))?;

    Ok(Json(LikeResponse {
        post_id,
        liked: true,
        changed,
    }))
}

/// DELETE /api/posts/:post_id/like
pub async fn unlike(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<LikeResponse>> {
    if !state.db.post_exists(post_id).await? {
        return Err(ApiError::NotFound(format!("Post {}", post_id)));
    }
    let changed = state.db.unlike_post(post_id, auth.user_id).await?;

    Ok(Json(LikeResponse {
        post_id,
        liked: false,
        changed,
    }))
}
