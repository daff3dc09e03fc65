//! Locates the JSON payload inside a free-form completion.
//!
//! Models wrap their answer in prose or code fences often enough that the
//! completion can't be handed to serde directly. The scan starts at the first
//! opening delimiter of the expected shape and walks forward counting bracket
//! depth, skipping anything inside string literals, until depth returns to zero.

/// The top-level JSON shape a section expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    fn opener(self) -> char {
        match self {
            JsonShape::Object => '{',
            JsonShape::Array => '[',
        }
    }
}

/// Returns the first balanced JSON value of `shape` in `text`, or `None` if the
/// opener is missing or its brackets never close.
pub fn first_balanced(text: &str, shape: JsonShape) -> Option<&str> {
    let start = text.find(shape.opener())?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
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

    #[test]
    fn test_object_inside_prose_and_fences() {
        let completion = "Here is the data:\n```json\n{\"name\": \"Jane\", \"email\": null}\n```\nLet me know!";
        assert_eq!(
            first_balanced(completion, JsonShape::Object),
            Some("{\"name\": \"Jane\", \"email\": null}")
        );
    }

    #[test]
    fn test_nested_array_is_returned_whole() {
        let completion = r#"[{"language": "English", "tags": ["a", "b"]}, {"language": "Tamil", "tags": []}] trailing"#;
        assert_eq!(
            first_balanced(completion, JsonShape::Array),
            Some(r#"[{"language": "English", "tags": ["a", "b"]}, {"language": "Tamil", "tags": []}]"#)
        );
    }

    #[test]
    fn test_brackets_inside_strings_are_ignored() {
        let completion = r#"{"description": "Built {fast} [parsers] and \"quoted\" }", "url": null} extra }"#;
        assert_eq!(
            first_balanced(completion, JsonShape::Object),
            Some(r#"{"description": "Built {fast} [parsers] and \"quoted\" }", "url": null}"#)
        );
    }

    #[test]
    fn test_array_scan_skips_text_before_first_bracket() {
        let completion = "No object here, only a list: [1, 2, 3]";
        assert_eq!(first_balanced(completion, JsonShape::Array), Some("[1, 2, 3]"));
        assert_eq!(first_balanced(completion, JsonShape::Object), None);
    }

    #[test]
    fn test_unbalanced_value_is_rejected() {
        assert_eq!(first_balanced("{\"name\": \"Jane\"", JsonShape::Object), None);
        assert_eq!(first_balanced("", JsonShape::Array), None);
    }

    #[test]
    fn test_multibyte_text_around_payload() {
        let completion = "Résumé → {\"name\": \"Zoë\"} ✓";
        assert_eq!(
            first_balanced(completion, JsonShape::Object),
            Some("{\"name\": \"Zoë\"}")
        );
    }
}
