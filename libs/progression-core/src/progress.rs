//! Course completion math.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::CourseProgress;

/// Completed and total lesson counts for one user in one course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTally {
    pub completed: u32,
    pub total: u32,
}

impl CompletionTally {
    pub fn new(completed: u32, total: u32) -> Self {
        Self { completed, total }
    }

    /// Tally a sequence of per-lesson completion flags.
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        flags.into_iter().fold(Self::default(), |mut tally, done| {
            tally.total += 1;
            if done {
                tally.completed += 1;
            }
            tally
        })
    }

    pub fn percent(&self) -> u8 {
        progress_percent(self.completed, self.total)
    }

    pub fn for_course(self, course_id: Uuid) -> CourseProgress {
        CourseProgress {
            course_id,
            completed_lessons: self.completed,
            total_lessons: self.total,
            percent: self.percent(),
        }
    }
}

/// `round(100 * completed / total)` with halves rounded up; 0 for an empty course.
pub fn progress_percent(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let total = u64::from(total);
    let completed = u64::from(completed).min(total);
    ((200 * completed + total) / (2 * total)) as u8
}
