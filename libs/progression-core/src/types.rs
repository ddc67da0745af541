//! Core types for engagement and progression.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngagementError;

/// Action that earns points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointEvent {
    PostCreated,
    LikeReceived,
    CommentCreated,
    LessonCompleted,
}

impl PointEvent {
    /// Get the event name as stored in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostCreated => "post_created",
            Self::LikeReceived => "like_received",
            Self::CommentCreated => "comment_created",
            Self::LessonCompleted => "lesson_completed",
        }
    }
}

impl FromStr for PointEvent {
    type Err = EngagementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post_created" => Ok(Self::PostCreated),
            "like_received" => Ok(Self::LikeReceived),
            "comment_created" => Ok(Self::CommentCreated),
            "lesson_completed" => Ok(Self::LessonCompleted),
            _ => Err(EngagementError::UnknownEvent {
                name: s.to_string(),
            }),
        }
    }
}

/// Ledger rows store the event name as text.
impl TryFrom<String> for PointEvent {
    type Error = EngagementError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A points account as read for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub user_id: Uuid,
    pub display_name: String,
    pub points: i64,
    /// When the account was created (first award).
    pub since: DateTime<Utc>,
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-indexed position in the returned list.
    pub rank: u32,
    pub user_id: Uuid,
    pub display_name: String,
    pub points: i64,
}

/// Completion summary for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub course_id: Uuid,
    pub completed_lessons: u32,
    pub total_lessons: u32,
    pub percent: u8,
}
