// Two-stage JSON parsing for feeds that emit NaN/Infinity literals
use serde_json::Value;

const NON_FINITE_TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Strict parse first; on failure, rewrite non-finite number tokens to
/// `null` and parse once more. The second error is the one returned.
pub fn parse_tolerant(text: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(strict) => {
            tracing::debug!("Strict JSON parse failed ({}), repairing non-finite tokens", strict);
            serde_json::from_str(&repair_non_finite(text))
        }
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Replace bare `NaN`, `Infinity` and `-Infinity` tokens with `null`.
/// String literals are left untouched.
pub fn repair_non_finite(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;
    let mut copied_from = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        if b == b'"' {
            in_string = true;
            i += 1;
            continue;
        }

        let preceded_by_word = i > 0 && is_word_byte(bytes[i - 1]);
        let token = NON_FINITE_TOKENS.iter().find(|token| {
            let end = i + token.len();
            bytes[i..].starts_with(token.as_bytes())
                && !preceded_by_word
                && !bytes.get(end).copied().is_some_and(is_word_byte)
        });

        match token {
            Some(token) => {
                out.push_str(&text[copied_from..i]);
                out.push_str("null");
                i += token.len();
                copied_from = i;
            }
            None => i += 1,
        }
    }
    out.push_str(&text[copied_from..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_json_passes_through() {
        assert_eq!(parse_tolerant(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_non_finite_tokens_become_null() {
        let text = r#"{"points": [["t", NaN], ["u", Infinity], ["v", -Infinity], ["w", 2.5]]}"#;
        assert_eq!(
            parse_tolerant(text).unwrap(),
            json!({"points": [["t", null], ["u", null], ["v", null], ["w", 2.5]]})
        );
    }

    #[test]
    fn test_strings_are_not_rewritten() {
        let text = r#"{"src": "NaN model \"Infinity\"", "v": NaN}"#;
        assert_eq!(
            parse_tolerant(text).unwrap(),
            json!({"src": "NaN model \"Infinity\"", "v": null})
        );
    }

    #[test]
    fn test_partial_words_are_not_rewritten() {
        assert_eq!(repair_non_finite("NaNa xNaN Infinity1"), "NaNa xNaN Infinity1");
        assert_eq!(repair_non_finite("[NaN,NaN]"), "[null,null]");
    }

    #[test]
    fn test_unrepairable_body_fails() {
        assert!(parse_tolerant("<html>502 Bad Gateway</html>").is_err());
        assert!(parse_tolerant("").is_err());
        assert!(parse_tolerant("errore: città non trovata").is_err());
    }
}
