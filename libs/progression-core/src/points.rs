//! Point award policy.

use serde::{Deserialize, Serialize};

use crate::error::{EngagementError, Result};
use crate::types::PointEvent;

/// Points granted per qualifying action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsPolicy {
    pub post_created: i64,
    pub like_received: i64,
    pub comment_created: i64,
    pub lesson_completed: i64,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            post_created: 10,
            like_received: 1,
            comment_created: 5,
            lesson_completed: 20,
        }
    }
}

impl PointsPolicy {
    /// Amount awarded for an event.
    pub fn amount_for(&self, event: PointEvent) -> i64 {
        match event {
            PointEvent::PostCreated => self.post_created,
            PointEvent::LikeReceived => self.like_received,
            PointEvent::CommentCreated => self.comment_created,
            PointEvent::LessonCompleted => self.lesson_completed,
        }
    }

    /// Check every amount is awardable.
    pub fn validate(&self) -> Result<()> {
        for amount in [
            self.post_created,
            self.like_received,
            self.comment_created,
            self.lesson_completed,
        ] {
            validate_award(amount)?;
        }
        Ok(())
    }
}

/// Awards only ever add to a total.
pub fn validate_award(amount: i64) -> Result<i64> {
    if amount <= 0 {
        return Err(EngagementError::NonPositiveAward { amount });
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_policy_amounts() {
        let policy = PointsPolicy::default();
        assert_eq!(policy.amount_for(PointEvent::PostCreated), 10);
        assert_eq!(policy.amount_for(PointEvent::LikeReceived), 1);
        assert_eq!(policy.amount_for(PointEvent::CommentCreated), 5);
        assert_eq!(policy.amount_for(PointEvent::LessonCompleted), 20);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn zero_and_negative_awards_rejected() {
        assert_eq!(
            validate_award(0),
            Err(EngagementError::NonPositiveAward { amount: 0 })
        );
        assert!(validate_award(-5).is_err());
        assert_eq!(validate_award(3), Ok(3));
    }

    #[test]
    fn policy_with_zero_amount_is_invalid() {
        let policy = PointsPolicy {
            like_received: 0,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }
}
