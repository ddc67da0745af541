//! Engagement and progression logic shared by the campus backend.
//!
//! Provides:
//! - Whole-list reorder validation for modules and lessons
//! - Course completion percentages
//! - Point award policy and amount validation
//! - Leaderboard ranking

pub mod error;
pub mod leaderboard;
pub mod ordering;
pub mod points;
pub mod progress;
pub mod types;

pub use error::{EngagementError, Result};
pub use leaderboard::{clamp_limit, rank_standings, MAX_LEADERBOARD_LIMIT};
pub use ordering::{append_index, is_contiguous, positions, validate_reorder};
pub use points::{validate_award, PointsPolicy};
pub use progress::{progress_percent, CompletionTally};
pub use types::{CourseProgress, LeaderboardEntry, PointEvent, Standing};
