//! Best-effort cleanup of model replies that should have been pure JSON.
//!
//! Strict order: parse as-is (after fence stripping), then the first balanced
//! `{…}` / `[…]` span. Anything else is a `ParseError`.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("LLM reply is empty")]
    Empty,

    #[error("No JSON value found in LLM reply: {0}")]
    NoJson(#[from] serde_json::Error),
}

pub fn sanitize_json(raw: &str) -> Result<Value, ParseError> {
    let text = strip_json_fences(raw);
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let direct_err = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    match balanced_span(text) {
        Some(span) => serde_json::from_str(span).map_err(ParseError::NoJson),
        None => Err(ParseError::NoJson(direct_err)),
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// First bracket-balanced object or array in `text`, skipping brackets
/// inside string literals.
fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c == '{' || c == '[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_sanitize_plain_array() {
        let value = sanitize_json(r#"["Python", "SQL"]"#).unwrap();
        assert_eq!(value, json!(["Python", "SQL"]));
    }

    #[test]
    fn test_sanitize_extracts_object_from_prose() {
        let raw = "Sure! Here is the analysis:\n{\"missing\": [\"RAG\"], \"note\": \"use {braces}\"}\nHope it helps.";
        let value = sanitize_json(raw).unwrap();
        assert_eq!(value["missing"], json!(["RAG"]));
        assert_eq!(value["note"], "use {braces}");
    }

    #[test]
    fn test_sanitize_handles_escaped_quotes_in_strings() {
        let raw = r#"Result: ["say \"hi]\"", "ok"] trailing"#;
        let value = sanitize_json(raw).unwrap();
        assert_eq!(value, json!(["say \"hi]\"", "ok"]));
    }

    #[test]
    fn test_sanitize_rejects_prose() {
        assert!(matches!(
            sanitize_json("I could not find any skills."),
            Err(ParseError::NoJson(_))
        ));
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(matches!(sanitize_json("  ``` ```  "), Err(ParseError::Empty)));
    }

    #[test]
    fn test_sanitize_rejects_unbalanced() {
        assert!(sanitize_json("here: {\"a\": [1, 2").is_err());
    }
}
