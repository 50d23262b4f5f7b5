//! Ordering rules for a character's lesson list.
//!
//! A character's lessons occupy positions `0..n` with no gaps and no
//! duplicates. The functions here compute the result of each mutating
//! operation on an in-memory, position-ordered list; storage backends
//! apply the same outcome atomically.

use std::collections::HashSet;

use crate::error::CoreError;

/// Check an insert position against the current list length.
///
/// Valid positions are `0..=len` (inserting at `len` appends).
pub fn validate_insert_position(position: i64, len: usize) -> Result<usize, CoreError> {
    match usize::try_from(position) {
        Ok(p) if p <= len => Ok(p),
        _ => Err(CoreError::InvalidPosition { position, len }),
    }
}

/// Insert `item` at `position`, shifting every item at or after it by one.
///
/// Returns the position the item now occupies.
pub fn insert_at<T>(items: &mut Vec<T>, position: i64, item: T) -> Result<usize, CoreError> {
    let p = validate_insert_position(position, items.len())?;
    items.insert(p, item);
    Ok(p)
}

/// Remove the item at `position`, closing the gap behind it.
///
/// `character_id` only feeds the `NotFound` error.
pub fn remove_at<T>(items: &mut Vec<T>, position: i64, character_id: &str) -> Result<T, CoreError> {
    match usize::try_from(position) {
        Ok(p) if p < items.len() => Ok(items.remove(p)),
        _ => Err(CoreError::NotFound {
            entity: "Lesson",
            id: format!("{character_id}@{position}"),
        }),
    }
}

/// Check that `requested` is a permutation of `current`.
///
/// Rejects duplicates, identifiers that are not in the current list, and
/// identifiers of the current list that are missing from the request.
pub fn validate_reorder<S: AsRef<str>>(current: &[S], requested: &[String]) -> Result<(), CoreError> {
    let existing: HashSet<&str> = current.iter().map(AsRef::as_ref).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(requested.len());

    for id in requested {
        if !seen.insert(id.as_str()) {
            return Err(CoreError::InvalidReorder(format!(
                "lesson '{id}' appears more than once"
            )));
        }
        if !existing.contains(id.as_str()) {
            return Err(CoreError::InvalidReorder(format!(
                "lesson '{id}' does not belong to this character"
            )));
        }
    }

    if seen.len() != existing.len() {
        let missing: Vec<&str> = current
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| !seen.contains(id))
            .collect();
        return Err(CoreError::InvalidReorder(format!(
            "missing lessons: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Rearrange `items` to follow `requested`, using `key` to read each id.
pub fn reorder<T, F>(items: Vec<T>, requested: &[String], key: F) -> Result<Vec<T>, CoreError>
where
    F: Fn(&T) -> &str,
{
    let current: Vec<&str> = items.iter().map(&key).collect();
    validate_reorder(&current, requested)?;

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());
    for id in requested {
        // validate_reorder guarantees a unique match.
        let idx = slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|item| key(item) == id.as_str()))
            .ok_or_else(|| CoreError::Internal(format!("lesson '{id}' vanished during reorder")))?;
        if let Some(item) = slots[idx].take() {
            ordered.push(item);
        }
    }
    Ok(ordered)
}

/// Pair each id with its index, producing the position table a store writes.
pub fn renumber<S: AsRef<str>>(ids: &[S]) -> Vec<(String, i32)> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| (id.as_ref().to_string(), i as i32))
        .collect()
}

/// True when `positions` is exactly `{0, 1, ..., n-1}`.
pub fn is_contiguous<I>(positions: I) -> bool
where
    I: IntoIterator<Item = i32>,
{
    let mut sorted: Vec<i32> = positions.into_iter().collect();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, p)| *p == i as i32)
}
