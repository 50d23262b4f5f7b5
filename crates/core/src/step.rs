//! Lesson step model and shape validation.
//!
//! A lesson is an ordered list of steps. Each step has a `kind` and
//! kind-specific content; the JSON form is internally tagged:
//!
//! ```json
//! { "kind": "multiple-choice",
//!   "prompt": { "english": "How do you greet an elder?" },
//!   "choices": ["Sat Sri Akal", "Oye"],
//!   "correct_answers": ["Sat Sri Akal"] }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum number of steps a single lesson may carry.
pub const MAX_STEPS_PER_LESSON: usize = 200;

/// Maximum length of a lesson title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Text shown to the learner, in up to three language variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepText {
    pub english: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roman: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gurmukhi: Option<String>,
}

/// One step of a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Step {
    /// Informational text; the learner just advances.
    Info { text: StepText },
    /// Pick one of `choices`; any entry of `correct_answers` is accepted.
    MultipleChoice {
        prompt: StepText,
        choices: Vec<String>,
        correct_answers: Vec<String>,
    },
    /// Free text answer. An empty `correct_answers` accepts any non-empty input.
    TextInput {
        prompt: StepText,
        #[serde(default)]
        correct_answers: Vec<String>,
    },
    /// Feedback from the character about the previous steps.
    Feedback { text: StepText },
    /// Closing message of the lesson.
    Completion { text: StepText },
}

impl Step {
    /// Wire name of the step kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Info { .. } => "info",
            Step::MultipleChoice { .. } => "multiple-choice",
            Step::TextInput { .. } => "text-input",
            Step::Feedback { .. } => "feedback",
            Step::Completion { .. } => "completion",
        }
    }

    /// Whether the step expects an answer from the learner.
    pub fn is_question(&self) -> bool {
        matches!(self, Step::MultipleChoice { .. } | Step::TextInput { .. })
    }

    /// The text the character displays for this step.
    pub fn text(&self) -> &StepText {
        match self {
            Step::Info { text } | Step::Feedback { text } | Step::Completion { text } => text,
            Step::MultipleChoice { prompt, .. } | Step::TextInput { prompt, .. } => prompt,
        }
    }
}

/// Validate a lesson title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Lesson title must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Lesson title exceeds {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate the full step list of a lesson.
///
/// Error messages name the offending step by index so admins can find it.
pub fn validate_steps(steps: &[Step]) -> Result<(), CoreError> {
    if steps.len() > MAX_STEPS_PER_LESSON {
        return Err(CoreError::Validation(format!(
            "A lesson may have at most {MAX_STEPS_PER_LESSON} steps, got {}",
            steps.len()
        )));
    }
    for (index, step) in steps.iter().enumerate() {
        validate_step(step).map_err(|e| match e {
            CoreError::Validation(msg) => CoreError::Validation(format!("step {index}: {msg}")),
            other => other,
        })?;
    }
    Ok(())
}

/// Validate one step in isolation.
pub fn validate_step(step: &Step) -> Result<(), CoreError> {
    if step.text().english.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "{} step needs non-empty english text",
            step.kind()
        )));
    }

    match step {
        Step::MultipleChoice {
            choices,
            correct_answers,
            ..
        } => {
            let distinct: HashSet<&str> = choices.iter().map(|c| c.trim()).collect();
            if choices.len() < 2 || distinct.len() != choices.len() {
                return Err(CoreError::Validation(
                    "multiple-choice step needs at least two distinct choices".into(),
                ));
            }
            if choices.iter().any(|c| c.trim().is_empty()) {
                return Err(CoreError::Validation(
                    "multiple-choice choices must not be empty".into(),
                ));
            }
            if correct_answers.is_empty() {
                return Err(CoreError::Validation(
                    "multiple-choice step needs at least one correct answer".into(),
                ));
            }
            if let Some(stray) = correct_answers
                .iter()
                .find(|a| !distinct.contains(a.trim()))
            {
                return Err(CoreError::Validation(format!(
                    "correct answer '{stray}' is not one of the choices"
                )));
            }
            Ok(())
        }
        Step::TextInput {
            correct_answers, ..
        } => {
            if correct_answers.iter().any(|a| a.trim().is_empty()) {
                return Err(CoreError::Validation(
                    "text-input correct answers must not be empty".into(),
                ));
            }
            Ok(())
        }
        Step::Info { .. } | Step::Feedback { .. } | Step::Completion { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn text(s: &str) -> StepText {
        StepText {
            english: s.to_string(),
            roman: None,
            gurmukhi: None,
        }
    }

    #[test]
    fn parses_tagged_kinds() {
        let steps: Vec<Step> = serde_json::from_value(json!([
            { "kind": "info", "text": { "english": "Welcome" } },
            { "kind": "multiple-choice",
              "prompt": { "english": "Pick", "roman": "Chuno" },
              "choices": ["a", "b"], "correct_answers": ["a"] },
            { "kind": "text-input", "prompt": { "english": "Type \"ji\"" } },
            { "kind": "feedback", "text": { "english": "Shabash" } },
            { "kind": "completion", "text": { "english": "Done" } }
        ]))
        .unwrap();

        let kinds: Vec<&str> = steps.iter().map(Step::kind).collect();
        assert_eq!(
            kinds,
            ["info", "multiple-choice", "text-input", "feedback", "completion"]
        );
        assert!(steps[1].is_question());
        assert!(!steps[0].is_question());
        assert_eq!(steps[1].text().roman.as_deref(), Some("Chuno"));
    }

    #[test]
    fn unknown_kind_fails_to_parse() {
        let result: Result<Step, _> =
            serde_json::from_value(json!({ "kind": "quiz", "text": { "english": "?" } }));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let value = serde_json::to_value(Step::Info { text: text("Hi") }).unwrap();
        assert_eq!(value["kind"], "info");
        assert_eq!(value["text"]["english"], "Hi");
        assert!(value["text"].get("roman").is_none());
    }

    #[test]
    fn title_rules() {
        assert!(validate_title("Greetings").is_ok());
        assert_matches!(validate_title("   "), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_title(&"x".repeat(MAX_TITLE_LEN + 1)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn multiple_choice_needs_two_distinct_choices() {
        let step = Step::MultipleChoice {
            prompt: text("Pick"),
            choices: vec!["a".into(), "a".into()],
            correct_answers: vec!["a".into()],
        };
        assert_matches!(validate_step(&step), Err(CoreError::Validation(_)));
    }

    #[test]
    fn multiple_choice_answer_must_be_a_choice() {
        let step = Step::MultipleChoice {
            prompt: text("Pick"),
            choices: vec!["a".into(), "b".into()],
            correct_answers: vec!["c".into()],
        };
        assert_matches!(
            validate_step(&step),
            Err(CoreError::Validation(msg)) if msg.contains("'c'")
        );
    }

    #[test]
    fn empty_english_text_is_rejected() {
        assert_matches!(
            validate_step(&Step::Feedback { text: text(" ") }),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn step_errors_carry_index() {
        let steps = vec![
            Step::Info { text: text("ok") },
            Step::Completion { text: text("") },
        ];
        assert_matches!(
            validate_steps(&steps),
            Err(CoreError::Validation(msg)) if msg.starts_with("step 1:")
        );
    }

    #[test]
    fn text_input_without_answers_is_valid() {
        let step = Step::TextInput {
            prompt: text("Say anything"),
            correct_answers: vec![],
        };
        assert!(validate_step(&step).is_ok());
    }
}
