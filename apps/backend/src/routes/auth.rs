//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::AppState;

/// Authenticated user info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub display_name: String,
}

impl AuthenticatedUser {
    /// Only the course instructor may change course structure
    pub fn require_instructor(&self, instructor_id: Uuid) -> Result<()> {
        if self.user_id != instructor_id {
            return Err(ApiError::Forbidden(
                "Only the course instructor can do this".to_string(),
            ));
        }
        Ok(())
    }
}

/// Auth middleware - resolves the bearer token to a user
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    // Extract Bearer token
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?;

    let user = state
        .db
        .get_user_by_token(token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        display_name: user.display_name,
    });

    Ok(next.run(request).await)
}
