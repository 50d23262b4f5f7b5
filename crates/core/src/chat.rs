//! Chat prompt composition and reply shaping.
//!
//! The gateway is asked to answer with a JSON object carrying the reply in
//! three language variants plus an expression tag. [`shape_reply`] turns
//! whatever came back into the public reply shape, filling gaps.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum accepted length of a user chat message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Requested language variant of a chat exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Roman,
    Gurmukhi,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Roman => "roman",
            Language::Gurmukhi => "gurmukhi",
        }
    }

    /// Human description used inside the prompt.
    fn describe(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Roman => "Romanized Punjabi (Punjabi written with Latin letters)",
            Language::Gurmukhi => "Punjabi in Gurmukhi script",
        }
    }
}

/// Facial expression tag shown alongside a reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
}

impl Expression {
    pub const ALL: [Expression; 5] = [
        Expression::Neutral,
        Expression::Happy,
        Expression::Sad,
        Expression::Angry,
        Expression::Surprised,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Expression::Neutral => "neutral",
            Expression::Happy => "happy",
            Expression::Sad => "sad",
            Expression::Angry => "angry",
            Expression::Surprised => "surprised",
        }
    }

    /// Parse a tag, falling back to [`Expression::Neutral`] for anything
    /// unrecognised.
    pub fn parse_lenient(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == tag)
            .unwrap_or_default()
    }
}

/// Persona fields of a character that feed the prompt.
#[derive(Debug, Clone, Copy)]
pub struct Persona<'a> {
    pub name: &'a str,
    pub name_gurmukhi: Option<&'a str>,
    pub role: Option<&'a str>,
    pub persona: &'a str,
}

/// Reply text in the three language variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyText {
    pub english: String,
    pub roman: String,
    pub gurmukhi: String,
}

/// Reply fields as produced by the gateway, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawReply {
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub roman: Option<String>,
    #[serde(default)]
    pub gurmukhi: Option<String>,
    #[serde(default)]
    pub expression: Option<String>,
}

/// A reply ready to return to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedReply {
    pub reply: ReplyText,
    pub expression: Expression,
}

/// Validate and trim the user's chat message.
pub fn validate_message(message: &str) -> Result<&str, CoreError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("message must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(CoreError::Validation(format!(
            "message exceeds {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(trimmed)
}

/// Compose the single prompt sent to the gateway.
pub fn build_prompt(persona: &Persona<'_>, language: Language, message: &str) -> String {
    let mut prompt = String::new();

    let _ = write!(prompt, "You are {}", persona.name);
    if let Some(gurmukhi) = persona.name_gurmukhi.filter(|s| !s.is_empty()) {
        let _ = write!(prompt, " ({gurmukhi})");
    }
    if let Some(role) = persona.role.filter(|s| !s.is_empty()) {
        let _ = write!(prompt, ", {role}");
    }
    prompt.push_str(".\n\n");

    if !persona.persona.trim().is_empty() {
        let _ = writeln!(prompt, "{}\n", persona.persona.trim());
    }

    let _ = writeln!(
        prompt,
        "The learner is reading in {}. Stay in character and keep the reply short and \
         conversational, using everyday Punjabi phrases where natural.",
        language.describe()
    );
    let expressions: Vec<&str> = Expression::ALL.iter().map(|e| e.as_str()).collect();
    let _ = writeln!(
        prompt,
        "Answer ONLY with a JSON object of the form \
         {{\"english\": \"...\", \"roman\": \"...\", \"gurmukhi\": \"...\", \"expression\": \"...\"}} \
         where english is your reply in English, roman is the same reply in Romanized Punjabi, \
         gurmukhi is the same reply in Gurmukhi script, and expression is one of: {}.\n",
        expressions.join(", ")
    );
    let _ = write!(prompt, "Learner message: {message}");

    prompt
}

/// Apply defaults to a gateway reply.
///
/// The english text is mandatory; missing roman or gurmukhi variants fall
/// back to it, and the expression falls back to neutral.
pub fn shape_reply(raw: RawReply) -> Result<ShapedReply, CoreError> {
    let english = raw
        .english
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::Gateway("reply is missing the english text".into()))?;

    let variant = |v: Option<String>| {
        v.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| english.clone())
    };
    let roman = variant(raw.roman);
    let gurmukhi = variant(raw.gurmukhi);

    let expression = raw
        .expression
        .as_deref()
        .map(Expression::parse_lenient)
        .unwrap_or_default();

    Ok(ShapedReply {
        reply: ReplyText {
            english,
            roman,
            gurmukhi,
        },
        expression,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn persona() -> Persona<'static> {
        Persona {
            name: "Bibi",
            name_gurmukhi: Some("ਬੀਬੀ"),
            role: Some("the village grandmother"),
            persona: "Warm, patient, loves to feed guests.",
        }
    }

    #[test]
    fn prompt_embeds_persona_language_and_message() {
        let prompt = build_prompt(&persona(), Language::Gurmukhi, "Sat Sri Akal!");
        assert!(prompt.starts_with("You are Bibi (ਬੀਬੀ), the village grandmother."));
        assert!(prompt.contains("Warm, patient"));
        assert!(prompt.contains("Gurmukhi script"));
        assert!(prompt.contains("neutral, happy, sad, angry, surprised"));
        assert!(prompt.ends_with("Learner message: Sat Sri Akal!"));
    }

    #[test]
    fn prompt_skips_missing_optional_fields() {
        let p = Persona {
            name: "Chacha",
            name_gurmukhi: None,
            role: None,
            persona: "",
        };
        let prompt = build_prompt(&p, Language::English, "hi");
        assert!(prompt.starts_with("You are Chacha.\n\n"));
    }

    #[test]
    fn language_wire_names() {
        let lang: Language = serde_json::from_str("\"roman\"").unwrap();
        assert_eq!(lang, Language::Roman);
        assert!(serde_json::from_str::<Language>("\"hindi\"").is_err());
        assert_eq!(Language::Gurmukhi.as_str(), "gurmukhi");
    }

    #[test]
    fn expression_parse_is_lenient() {
        assert_eq!(Expression::parse_lenient(" Happy "), Expression::Happy);
        assert_eq!(Expression::parse_lenient("smug"), Expression::Neutral);
        assert_eq!(Expression::default(), Expression::Neutral);
    }

    #[test]
    fn shape_fills_missing_variants_and_expression() {
        let shaped = shape_reply(RawReply {
            english: Some(" Hello child ".into()),
            roman: None,
            gurmukhi: Some("  ".into()),
            expression: None,
        })
        .unwrap();

        assert_eq!(shaped.reply.english, "Hello child");
        assert_eq!(shaped.reply.roman, "Hello child");
        assert_eq!(shaped.reply.gurmukhi, "Hello child");
        assert_eq!(shaped.expression, Expression::Neutral);
    }

    #[test]
    fn shape_keeps_gateway_values() {
        let shaped = shape_reply(RawReply {
            english: Some("Welcome!".into()),
            roman: Some("Jee aayan nu!".into()),
            gurmukhi: Some("ਜੀ ਆਇਆਂ ਨੂੰ!".into()),
            expression: Some("happy".into()),
        })
        .unwrap();
        assert_eq!(shaped.reply.roman, "Jee aayan nu!");
        assert_eq!(shaped.expression, Expression::Happy);
    }

    #[test]
    fn shape_requires_english() {
        assert_matches!(
            shape_reply(RawReply::default()),
            Err(CoreError::Gateway(_))
        );
    }

    #[test]
    fn message_validation() {
        assert_eq!(validate_message("  hi  ").unwrap(), "hi");
        assert_matches!(validate_message(" \n "), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_message(&"a".repeat(MAX_MESSAGE_CHARS + 1)),
            Err(CoreError::Validation(_))
        );
    }
}
