//! Leaderboard ranking.
//!
//! Ranks are positional and never stored. Ties on points go to the account that
//! started earning first, then to the lower user id.

use std::cmp::Ordering;

use crate::types::{LeaderboardEntry, Standing};

/// Upper bound on entries returned by one leaderboard query.
pub const MAX_LEADERBOARD_LIMIT: u32 = 100;

/// Resolve a requested limit against the configured default.
pub fn clamp_limit(requested: Option<u32>, default: u32) -> u32 {
    requested
        .unwrap_or(default)
        .clamp(1, MAX_LEADERBOARD_LIMIT)
}

/// Total order used for ranking.
pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| a.since.cmp(&b.since))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Sort standings, keep the first `limit`, and number them from 1.
pub fn rank_standings(mut standings: Vec<Standing>, limit: u32) -> Vec<LeaderboardEntry> {
    standings.sort_by(compare_standings);
    standings
        .into_iter()
        .take(limit as usize)
        .enumerate()
        .map(|(position, s)| LeaderboardEntry {
            rank: position as u32 + 1,
            user_id: s.user_id,
            display_name: s.display_name,
            points: s.points,
        })
        .collect()
}
