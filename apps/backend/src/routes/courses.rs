//! Course structure endpoints: courses, modules, lessons and their ordering

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use progression_core::is_contiguous;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::required_text;
use crate::AppState;

pub(crate) async fn load_course(state: &AppState, course_id: Uuid) -> Result<Course> {
    state
        .db
        .get_course(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Course {}", course_id)))
}

/// POST /api/courses
/// The caller becomes the course instructor
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<Json<Course>> {
    let title = required_text(&payload.title, "title")?;
    let course = state
        .db
        .create_course(auth.user_id, &title, payload.description.as_deref())
        .await?;

    tracing::info!("User {} created course {}", auth.user_id, course.id);

    Ok(Json(course))
}

/// GET /api/courses/:course_id
pub async fn get(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseDetailResponse>> {
    let course = load_course(&state, course_id).await?;
    let modules = state.db.get_modules_with_lessons(course_id).await?;

    let module_indices: Vec<i32> = modules.iter().map(|m| m.module.order_index).collect();
    if !is_contiguous(&module_indices)
        || modules.iter().any(|m| {
            let lesson_indices: Vec<i32> = m.lessons.iter().map(|l| l.order_index).collect();
            !is_contiguous(&lesson_indices)
        })
    {
        tracing::warn!("Course {} has non-contiguous ordering", course_id);
    }

    Ok(Json(CourseDetailResponse { course, modules }))
}

/// DELETE /api/courses/:course_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    let course = load_course(&state, course_id).await?;
    auth.require_instructor(course.instructor_id)?;

    let deleted = state.db.delete_course(course_id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// POST /api/courses/:course_id/modules
pub async fn create_module(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<CreateModuleRequest>,
) -> Result<Json<Module>> {
    let course = load_course(&state, course_id).await?;
    auth.require_instructor(course.instructor_id)?;

    let title = required_text(&payload.title, "title")?;
    let module = state.db.create_module(course_id, &title).await?;
    Ok(Json(module))
}

/// PUT /api/courses/:course_id/modules/order
pub async fn reorder_modules(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<Vec<Module>>> {
    let course = load_course(&state, course_id).await?;
    auth.require_instructor(course.instructor_id)?;

    let modules = state
        .db
        .reorder_modules(course_id, &payload.ordered_ids)
        .await?;

    tracing::info!("Reordered {} modules in course {}", modules.len(), course_id);

    Ok(Json(modules))
}

/// DELETE /api/modules/:module_id
pub async fn delete_module(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(module_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    let owner = state
        .db
        .get_module_owner(module_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Module {}", module_id)))?;
    auth.require_instructor(owner.instructor_id)?;

    let deleted = state.db.delete_module(module_id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// POST /api/modules/:module_id/lessons
pub async fn create_lesson(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<Json<Lesson>> {
    let owner = state
        .db
        .get_module_owner(module_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Module {}", module_id)))?;
    auth.require_instructor(owner.instructor_id)?;

    let title = required_text(&payload.title, "title")?;
    let lesson = state
        .db
        .create_lesson(module_id, &title, &payload.content)
        .await?;
    Ok(Json(lesson))
}

/// PUT /api/modules/:module_id/lessons/order
pub async fn reorder_lessons(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<Vec<Lesson>>> {
    let owner = state
        .db
        .get_module_owner(module_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Module {}", module_id)))?;
    auth.require_instructor(owner.instructor_id)?;

    let lessons = state
        .db
        .reorder_lessons(module_id, &payload.ordered_ids)
        .await?;

    tracing::info!("Reordered {} lessons in module {}", lessons.len(), module_id);

    Ok(Json(lessons))
}

/// DELETE /api/lessons/:lesson_id
pub async fn delete_lesson(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    let owner = state
        .db
        .get_lesson_owner(lesson_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Lesson {}", lesson_id)))?;
    auth.require_instructor(owner.instructor_id)?;

    let deleted = state.db.delete_lesson(lesson_id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
