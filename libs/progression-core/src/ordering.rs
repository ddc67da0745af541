//! Whole-list ordering for sibling collections (modules in a course, lessons in a module).
//!
//! A reorder request carries the complete new order. It is accepted only when it is a
//! permutation of the ids currently stored under the parent; each id then takes its
//! 0-based position in the request as its `order_index`.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::{EngagementError, Result};

/// Check that `requested` is a permutation of `current`.
///
/// Fails on the first id that is unknown or repeated, then on any id left out.
pub fn validate_reorder<T>(current: &[T], requested: &[T]) -> Result<()>
where
    T: Eq + Hash + Display,
{
    let known: HashSet<&T> = current.iter().collect();
    let mut seen: HashSet<&T> = HashSet::with_capacity(requested.len());

    for id in requested {
        if !known.contains(id) {
            return Err(EngagementError::UnknownId { id: id.to_string() });
        }
        if !seen.insert(id) {
            return Err(EngagementError::DuplicateId { id: id.to_string() });
        }
    }

    if seen.len() != known.len() {
        return Err(EngagementError::MissingIds {
            expected: known.len(),
            actual: seen.len(),
        });
    }

    Ok(())
}

/// Split an ordered id list into parallel id and index columns.
pub fn positions<T: Copy>(ordered: &[T]) -> (Vec<T>, Vec<i32>) {
    let ids = ordered.to_vec();
    let indices = (0..ordered.len() as i32).collect();
    (ids, indices)
}

/// Index for a new sibling appended after `sibling_count` existing ones.
pub fn append_index(sibling_count: i64) -> i32 {
    sibling_count as i32
}

/// Whether `indices` are exactly `0..n` in order.
pub fn is_contiguous(indices: &[i32]) -> bool {
    indices
        .iter()
        .enumerate()
        .all(|(position, &index)| index == position as i32)
}
