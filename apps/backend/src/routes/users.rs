//! User registration and profile endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{RegisterUserRequest, RegisterUserResponse, UserResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::routes::required_text;
use crate::AppState;

/// POST /api/users/register
/// Creates a new user and returns its token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<RegisterUserResponse>> {
    let display_name = required_text(&payload.display_name, "display_name")?;
    let (user, token) = state.db.create_user(&display_name).await?;

    tracing::info!("Registered new user: {}", user.id);

    Ok(Json(RegisterUserResponse {
        user_id: user.id,
        token,
    }))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>> {
    let points = state.db.get_points_total(auth.user_id).await?;

    Ok(Json(UserResponse {
        user_id: auth.user_id,
        display_name: auth.display_name,
        points,
    }))
}
