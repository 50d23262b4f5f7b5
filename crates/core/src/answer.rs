//! Stateless answer checking for question steps.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use crate::step::Step;

/// Wrong answers more similar than this to an accepted one get word-level hints.
pub const HINT_SIMILARITY: f32 = 0.6;

/// Outcome of checking a learner's answer against one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerVerdict {
    pub correct: bool,
    pub feedback: String,
    /// The expected answer, revealed only after a wrong attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl AnswerVerdict {
    fn accepted(feedback: &str) -> Self {
        Self {
            correct: true,
            feedback: feedback.to_string(),
            expected: None,
        }
    }

    fn rejected(feedback: String, expected: Option<String>) -> Self {
        Self {
            correct: false,
            feedback,
            expected,
        }
    }
}

fn is_gurmukhi(c: char) -> bool {
    ('\u{0A00}'..='\u{0A7F}').contains(&c)
}

/// Normalise an answer for comparison: punctuation dropped, whitespace
/// collapsed to single spaces, lowercased. Gurmukhi (including vowel signs)
/// is kept as is.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|&c| c.is_alphanumeric() || c.is_whitespace() || c == '_' || is_gurmukhi(c))
        .collect();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Character-level similarity ratio in `0.0..=1.0`.
pub fn similarity(a: &str, b: &str) -> f32 {
    TextDiff::from_chars(a, b).ratio()
}

/// Word-level differences of `given` against `expected`, as
/// `missing: <word>` / `extra: <word>` entries.
pub fn word_mistakes(expected: &str, given: &str) -> Vec<String> {
    let expected: Vec<&str> = expected.split_whitespace().collect();
    let given: Vec<&str> = given.split_whitespace().collect();
    TextDiff::configure()
        .diff_slices(&expected, &given)
        .iter_all_changes()
        .filter_map(|change| match change.tag() {
            ChangeTag::Delete => Some(format!("missing: {}", change.value())),
            ChangeTag::Insert => Some(format!("extra: {}", change.value())),
            ChangeTag::Equal => None,
        })
        .collect()
}

/// Pull the first double-quoted phrase out of a prompt, e.g.
/// `Type: "sat sri akal"` yields `sat sri akal`.
pub fn quoted_phrase(prompt: &str) -> Option<&str> {
    let start = prompt.find('"')? + 1;
    let len = prompt[start..].find('"')?;
    let phrase = prompt[start..start + len].trim();
    (!phrase.is_empty()).then_some(phrase)
}

/// Check `answer` against `step`.
///
/// - Non-question steps accept anything.
/// - Multiple-choice and text-input compare normalised text against
///   `correct_answers`.
/// - A text-input step without `correct_answers` expects the quoted phrase
///   in its roman (or english) prompt, or any non-empty answer when the
///   prompt quotes nothing.
///
/// A wrong answer close to an accepted one lists the missing and extra
/// words; otherwise the feedback names the expected answer.
pub fn check_answer(step: &Step, answer: &str) -> AnswerVerdict {
    match step {
        Step::MultipleChoice {
            correct_answers, ..
        } => judge(answer, correct_answers),
        Step::TextInput {
            prompt,
            correct_answers,
        } if correct_answers.is_empty() => {
            let source = prompt.roman.as_deref().unwrap_or(&prompt.english);
            match quoted_phrase(source) {
                Some(expected) => judge(answer, &[expected.to_string()]),
                None if !normalize(answer).is_empty() => AnswerVerdict::accepted("Accepted"),
                None => AnswerVerdict::rejected("Please provide an answer".into(), None),
            }
        }
        Step::TextInput {
            correct_answers, ..
        } => judge(answer, correct_answers),
        Step::Info { .. } | Step::Feedback { .. } | Step::Completion { .. } => {
            AnswerVerdict::accepted("Accepted")
        }
    }
}

fn judge(answer: &str, candidates: &[String]) -> AnswerVerdict {
    let given = normalize(answer);

    if candidates.is_empty() {
        return AnswerVerdict::accepted("Accepted");
    }
    if candidates.iter().any(|c| normalize(c) == given) {
        return AnswerVerdict::accepted("Correct!");
    }

    let (best, score) = candidates
        .iter()
        .map(|c| (c, similarity(&given, &normalize(c))))
        .fold((&candidates[0], f32::MIN), |acc, next| if next.1 > acc.1 { next } else { acc });

    let mistakes = word_mistakes(&normalize(best), &given);
    let feedback = if score > HINT_SIMILARITY && !mistakes.is_empty() {
        format!("Not quite. You wrote \"{}\". Check: {}", answer.trim(), mistakes.join(", "))
    } else {
        format!("Not quite. The answer is \"{best}\".")
    };
    AnswerVerdict::rejected(feedback, Some(best.clone()))
}
