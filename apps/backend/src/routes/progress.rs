//! Enrollment and progress endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::courses::load_course;
use crate::AppState;

/// POST /api/courses/:course_id/enroll
pub async fn enroll(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<EnrollResponse>> {
    load_course(&state, course_id).await?;
    let newly_enrolled = state.db.enroll(auth.user_id, course_id).await?;

    if newly_enrolled {
        tracing::info!("User {} enrolled in course {}", auth.user_id, course_id);
    }

    Ok(Json(EnrollResponse {
        course_id,
        newly_enrolled,
    }))
}

/// GET /api/courses/:course_id/progress
pub async fn course_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseProgressResponse>> {
    load_course(&state, course_id).await?;
    let (progress, lessons) = state
        .db
        .get_course_progress(auth.user_id, course_id)
        .await?;

    Ok(Json(CourseProgressResponse { progress, lessons }))
}

/// GET /api/progress
/// Percent complete for every enrolled course
pub async fn overview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ProgressOverviewResponse>> {
    let courses = state.db.get_enrolled_progress(auth.user_id).await?;
    Ok(Json(ProgressOverviewResponse { courses }))
}

/// GET /api/lessons/:lesson_id/progress
pub async fn lesson_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<LessonStatusResponse>> {
    state
        .db
        .get_lesson_owner(lesson_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Lesson {}", lesson_id)))?;

    let completed = state.db.is_lesson_completed(auth.user_id, lesson_id).await?;
    Ok(Json(LessonStatusResponse {
        lesson_id,
        completed,
    }))
}

/// PUT /api/lessons/:lesson_id/progress
/// Marks the caller's own completion; the first completion earns points
pub async fn set_lesson_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(lesson_id): Path<Uuid>,
    Json(payload): Json<SetLessonCompletionRequest>,
) -> Result<Json<LessonCompletionResponse>> {
    let owner = state
        .db
        .get_lesson_owner(lesson_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Lesson {}", lesson_id)))?;

    if !state.db.is_enrolled(auth.user_id, owner.course_id).await? {
        return Err(ApiError::Forbidden(
            "Enroll in the course before tracking progress".to_string(),
        ));
    }

    let award = state.config.points.amount_for(PointEvent::LessonCompleted);
    let outcome = state
        .db
        .set_lesson_completion(auth.user_id, lesson_id, payload.completed, award)
        .await?;

    Ok(Json(LessonCompletionResponse {
        progress: outcome.progress,
        points_awarded: if outcome.awarded_total.is_some() { award } else { 0 },
        total_points: outcome.awarded_total,
    }))
}
