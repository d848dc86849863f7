//! URI short-name extraction.

/// Return the fragment after the final `#` or `/` of a URI.
///
/// Trailing separators are ignored, so `http://x/ns/org#` yields `org`.
/// Plain tokens such as `member` are returned unchanged.
pub fn short_name(uri: &str) -> &str {
    let trimmed = uri.trim_end_matches(['#', '/']);
    trimmed.rsplit(['#', '/']).next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab;

    #[test]
    fn test_hash_fragment() {
        assert_eq!(short_name(vocab::person::PERSON), "Person");
        assert_eq!(short_name(vocab::RDF_TYPE), "type");
        assert_eq!(short_name(vocab::org::POST_IN), "postIn");
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(short_name("https://example.org/roles/chairman"), "chairman");
        assert_eq!(short_name("https://example.org/roles/chairman/"), "chairman");
    }

    #[test]
    fn test_plain_token() {
        assert_eq!(short_name("member"), "member");
        assert_eq!(short_name(""), "");
    }
}
