/// Extracts a structured payload out of free-form model output.
///
/// Model responses wrap the JSON we asked for in prose, markdown fences or
/// nothing at all, so this is kept behind a trait and tested on its own,
/// away from any network call.
pub trait StructuredExtractor: Send + Sync {
    /// Returns the first structured payload found in `text`, or `None`.
    fn extract<'a>(&self, text: &'a str) -> Option<&'a str>;
}

/// Finds the first balanced `{ ... }` object in the text. Brace counting is
/// aware of JSON strings and escape sequences, so braces inside string
/// values do not confuse it. Unterminated objects yield `None`.
pub struct JsonBlockExtractor;

impl StructuredExtractor for JsonBlockExtractor {
    fn extract<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = text.find('{')?;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, ch) in text[start..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[start..start + offset + ch.len_utf8()]);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<&str> {
        JsonBlockExtractor.extract(text)
    }

    #[test]
    fn plain_object_is_returned_whole() {
        let text = r#"{"summary": "s", "intent": "i", "suggestions": []}"#;
        assert_eq!(extract(text), Some(text));
    }

    #[test]
    fn surrounding_prose_is_stripped() {
        let text = "Sure, here is the analysis:\n```json\n{\"a\": 1}\n```\nHope this helps!";
        assert_eq!(extract(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn first_of_multiple_objects_wins() {
        let text = r#"{"first": true} and also {"second": true}"#;
        assert_eq!(extract(text), Some(r#"{"first": true}"#));
    }

    #[test]
    fn nested_objects_stay_balanced() {
        let text = r#"prefix {"outer": {"inner": {"deep": 1}}} suffix"#;
        assert_eq!(extract(text), Some(r#"{"outer": {"inner": {"deep": 1}}}"#));
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let text = r#"{"summary": "added a {promo} banner", "note": "}"}"#;
        assert_eq!(extract(text), Some(text));
    }

    #[test]
    fn escaped_quotes_do_not_end_the_string() {
        let text = r#"{"summary": "they said \"50% off\" {wow}"}"#;
        assert_eq!(extract(text), Some(text));
    }

    #[test]
    fn truncated_object_yields_none() {
        assert_eq!(extract(r#"{"summary": "cut off"#), None);
    }

    #[test]
    fn no_object_yields_none() {
        assert_eq!(extract("the model refused to answer"), None);
        assert_eq!(extract(""), None);
    }
}
