//! Best-effort extraction of a JSON object from generation replies.
//!
//! The service contract guarantees text, not JSON: replies routinely wrap
//! the payload in prose or markdown fences, so callers extract the first
//! balanced `{...}` span and decode that.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reply contains no JSON object")]
    MissingObject,
    #[error("reply contains an unterminated JSON object")]
    Unbalanced,
    #[error("invalid JSON: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Strip a markdown code fence around a reply, if present.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Find the first balanced `{...}` span in `text`.
///
/// Braces inside JSON string literals (and escaped quotes inside those
/// strings) do not count toward the balance.
pub fn extract_object(text: &str) -> Result<&str, ParseError> {
    let text = strip_fences(text);
    let start = text.find('{').ok_or(ParseError::MissingObject)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    Err(ParseError::Unbalanced)
}

/// Extract and decode the first JSON object in a generation reply.
pub fn parse_object<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    let object = extract_object(text)?;
    Ok(serde_json::from_str(object)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Reply {
        answer: String,
    }

    #[test]
    fn test_extracts_bare_object() {
        assert_eq!(extract_object(r#"{"a": 1}"#).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_skips_surrounding_prose() {
        let reply = r#"Sure, here is the JSON you asked for: {"a": 1} Hope that helps!"#;
        assert_eq!(extract_object(reply).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_strips_markdown_fences() {
        let reply = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_object(reply).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_braces_inside_strings_do_not_count() {
        let reply = r#"{"question": "What do {curly braces} mean?", "nested": {"b": 2}}"#;
        assert_eq!(extract_object(reply).unwrap(), reply);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let reply = r#"{"q": "he said \"hi {\" loudly"}"#;
        assert_eq!(extract_object(reply).unwrap(), reply);
    }

    #[test]
    fn test_missing_object() {
        assert!(matches!(
            extract_object("no json here"),
            Err(ParseError::MissingObject)
        ));
    }

    #[test]
    fn test_unbalanced_object() {
        assert!(matches!(
            extract_object(r#"{"a": {"b": 1}"#),
            Err(ParseError::Unbalanced)
        ));
    }

    #[test]
    fn test_parse_object_typed() {
        let reply = "Here it is:\n```json\n{\"answer\": \"42\"}\n```";
        let parsed: Reply = parse_object(reply).unwrap();
        assert_eq!(parsed.answer, "42");
    }

    #[test]
    fn test_parse_object_invalid_json() {
        let result: Result<Reply, _> = parse_object(r#"{"answer": 42}"#);
        assert!(matches!(result, Err(ParseError::Invalid(_))));
    }
}
