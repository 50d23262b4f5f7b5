//! A learner's place in one character's lesson list.
//!
//! The cursor is `(lesson_index, step_index)` over the position-ordered
//! lessons. `lesson_index == lessons.len()` with `step_index == 0` means
//! the learner is past the last lesson.

use crate::error::CoreError;

const MAX_USER_ID_LEN: usize = 128;

/// User ids are opaque client-chosen strings; only their shape is checked.
pub fn validate_user_id(user_id: &str) -> Result<(), CoreError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("user_id must not be empty".into()));
    }
    if trimmed != user_id || user_id.chars().count() > MAX_USER_ID_LEN {
        return Err(CoreError::Validation(format!(
            "user_id must be at most {MAX_USER_ID_LEN} characters without surrounding whitespace"
        )));
    }
    Ok(())
}

/// Check a cursor against the step counts of the ordered lesson list.
///
/// A step index equal to the lesson's step count is allowed: the learner
/// has finished that lesson but not yet moved on.
pub fn validate_cursor(
    lesson_index: i32,
    step_index: i32,
    step_counts: &[usize],
) -> Result<(), CoreError> {
    let (Ok(lesson), Ok(step)) = (usize::try_from(lesson_index), usize::try_from(step_index))
    else {
        return Err(CoreError::Validation(
            "lesson and step indexes must not be negative".into(),
        ));
    };

    match step_counts.get(lesson) {
        Some(&steps) if step <= steps => Ok(()),
        Some(&steps) => Err(CoreError::Validation(format!(
            "step {step} is out of range for lesson {lesson} ({steps} steps)"
        ))),
        None if lesson == step_counts.len() && step == 0 => Ok(()),
        None => Err(CoreError::Validation(format!(
            "lesson {lesson} is out of range ({} lessons)",
            step_counts.len()
        ))),
    }
}

/// Share of all steps behind the cursor, rounded down, in `0..=100`.
///
/// A completed record is always 100; a character without steps is 0.
pub fn percent_complete(
    completed: bool,
    lesson_index: i32,
    step_index: i32,
    step_counts: &[usize],
) -> u8 {
    if completed {
        return 100;
    }
    let total: usize = step_counts.iter().sum();
    if total == 0 {
        return 0;
    }

    let lesson = usize::try_from(lesson_index).unwrap_or(0);
    let step = usize::try_from(step_index).unwrap_or(0);
    let done: usize = step_counts.iter().take(lesson).sum::<usize>() + step;

    let percent = done.min(total) * 100 / total;
    u8::try_from(percent).unwrap_or(100)
}
