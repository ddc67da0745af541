//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

// Re-export shared types from progression-core
pub use progression_core::types::{CourseProgress, LeaderboardEntry, PointEvent, Standing};

// === Database Entity Types ===

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Course owned by an instructor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Module within a course
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Module {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

/// Lesson within a module
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub content: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

/// Module with the course and instructor it belongs to
#[derive(Debug, Clone, FromRow)]
pub struct ModuleOwner {
    pub module_id: Uuid,
    pub course_id: Uuid,
    pub instructor_id: Uuid,
}

/// Lesson with the module, course and instructor it belongs to
#[derive(Debug, Clone, FromRow)]
pub struct LessonOwner {
    pub lesson_id: Uuid,
    pub module_id: Uuid,
    pub course_id: Uuid,
    pub instructor_id: Uuid,
}

/// Per-user lesson completion
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonProgress {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub points_awarded: bool,
    pub updated_at: DateTime<Utc>,
}

/// Result of setting a lesson's completion
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub progress: LessonProgress,
    /// New points total when this call paid the first-completion award.
    pub awarded_total: Option<i64>,
}

/// Running points total
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PointsAccount {
    pub user_id: Uuid,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ledger row for one award
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PointEventRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub reason: PointEvent,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Points account joined with its user for ranking
#[derive(Debug, Clone, FromRow)]
pub struct StandingRow {
    pub user_id: Uuid,
    pub display_name: String,
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

impl StandingRow {
    /// Convert to progression-core Standing
    pub fn to_standing(&self) -> Standing {
        Standing {
            user_id: self.user_id,
            display_name: self.display_name.clone(),
            points: self.points,
            since: self.created_at,
        }
    }
}

/// Completion flag for one lesson of a course
#[derive(Debug, Clone, FromRow)]
pub struct LessonFlag {
    pub lesson_id: Uuid,
    pub is_completed: bool,
}

/// Lesson counts for one enrolled course
#[derive(Debug, Clone, FromRow)]
pub struct CourseTallyRow {
    pub course_id: Uuid,
    pub completed_lessons: i64,
    pub total_lessons: i64,
}

/// Feed post
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Comment on a post
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// === API Request/Response Types ===

// User types
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub display_name: String,
    pub points: i64,
}

// Course types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateModuleRequest {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLessonRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Complete new order for a sibling collection
#[derive(Debug, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub ordered_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleWithLessons {
    #[serde(flatten)]
    pub module: Module,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseDetailResponse {
    pub course: Course,
    pub modules: Vec<ModuleWithLessons>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnrollResponse {
    pub course_id: Uuid,
    pub newly_enrolled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

// Progress types
#[derive(Debug, Serialize, Deserialize)]
pub struct SetLessonCompletionRequest {
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LessonCompletionResponse {
    pub progress: LessonProgress,
    pub points_awarded: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_points: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LessonStatusResponse {
    pub lesson_id: Uuid,
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseProgressResponse {
    #[serde(flatten)]
    pub progress: CourseProgress,
    pub lessons: HashMap<Uuid, bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressOverviewResponse {
    pub courses: Vec<CourseProgress>,
}

// Points types
#[derive(Debug, Serialize, Deserialize)]
pub struct PointsSummaryResponse {
    pub points: i64,
    pub recent_events: Vec<PointEventRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

// Feed types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub post: Post,
    pub total_points: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub comment: Comment,
    pub total_points: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub post_id: Uuid,
    pub liked: bool,
    /// False when the like already existed (or did not exist, for unlike).
    pub changed: bool,
}
