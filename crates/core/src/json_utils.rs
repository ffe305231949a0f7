//! JSON utility functions shared across crates.

/// Strip markdown code block wrappers from JSON content.
///
/// Handles `` ```json ... ``` ``, `` ``` ... ``` `` and other language
/// identifiers, with or without a newline after the tag. An unterminated
/// fence still has its opening marker removed.
#[must_use]
pub fn strip_markdown_json(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    strip_language_tag(inner.trim_start()).trim()
}

/// A JSON document never starts with a bare word, so a leading alphanumeric run
/// followed by whitespace or an opening bracket is the fence language tag.
fn strip_language_tag(s: &str) -> &str {
    let tag_len = s.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(s.len());
    if tag_len == 0 {
        return s;
    }
    let rest = s.get(tag_len..).unwrap_or("");
    match rest.chars().next() {
        Some(c) if c.is_whitespace() || c == '{' || c == '[' => rest,
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_block() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_markdown_json(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_plain_block() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_markdown_json(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_no_block() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_markdown_json(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_whitespace() {
        let input = "  ```json\n{\"key\": \"value\"}\n```  ";
        assert_eq!(strip_markdown_json(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_uppercase_tag_without_newline() {
        let input = "```JSON{\"key\": \"value\"}```";
        assert_eq!(strip_markdown_json(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_space_before_lang() {
        let input = "``` json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_markdown_json(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_unterminated_fence() {
        let input = "```json\n{\"key\": \"value\"}";
        assert_eq!(strip_markdown_json(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_bare_literal_is_not_a_tag() {
        assert_eq!(strip_markdown_json("```null```"), "null");
    }
}
