//! Parsing of model output text into a [`RawReply`].

use tutor_core::chat::RawReply;

use crate::GatewayError;

/// Strip a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse the JSON object the prompt asks the model for.
///
/// An empty or missing `english` field is rejected; the other fields are
/// left for the chat service to default.
pub fn parse_reply(text: &str) -> Result<RawReply, GatewayError> {
    let json = strip_code_fence(text);
    let reply: RawReply = serde_json::from_str(json)
        .map_err(|e| GatewayError::Malformed(format!("reply is not the expected JSON: {e}")))?;

    match reply.english.as_deref().map(str::trim) {
        Some(english) if !english.is_empty() => Ok(reply),
        _ => Err(GatewayError::Malformed("reply has no english text".into())),
    }
}
