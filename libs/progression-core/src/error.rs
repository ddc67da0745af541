//! Error types for progression-core.

use thiserror::Error;

/// Result type alias using EngagementError.
pub type Result<T> = std::result::Result<T, EngagementError>;

/// Errors raised by ordering and points validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngagementError {
    #[error("id {id} appears more than once in the requested order")]
    DuplicateId { id: String },

    #[error("id {id} does not belong to this collection")]
    UnknownId { id: String },

    #[error("requested order lists {actual} of {expected} ids")]
    MissingIds { expected: usize, actual: usize },

    #[error("point award must be positive, got {amount}")]
    NonPositiveAward { amount: i64 },

    #[error("unknown point event '{name}'")]
    UnknownEvent { name: String },
}

impl EngagementError {
    /// Whether the caller's view of a sibling list is stale.
    pub fn is_order_mismatch(&self) -> bool {
        matches!(
            self,
            Self::DuplicateId { .. } | Self::UnknownId { .. } | Self::MissingIds { .. }
        )
    }
}
