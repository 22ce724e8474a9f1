//! Display helpers for resource labels and predicate names

use std::borrow::Cow;

/// Decode XML character entities. Titles are often served HTML-encoded.
/// Text with an unknown entity is returned unchanged.
pub fn decode_entities(text: &str) -> String {
    match quick_xml::escape::unescape(text) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => text.to_string(),
    }
}

/// Label of last resort is the URI.
pub fn display_label(title: Option<&str>, short_title: Option<&str>, uri: &str) -> String {
    let raw = title
        .filter(|t| !t.is_empty())
        .or(short_title.filter(|t| !t.is_empty()))
        .unwrap_or(uri);
    decode_entities(raw)
}

/// Local part of a predicate: after the last `/`, then after the last `#`.
pub fn local_name(predicate: &str) -> &str {
    let tail = predicate.rsplit('/').next().unwrap_or(predicate);
    tail.rsplit('#').next().unwrap_or(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_strips_path_and_fragment() {
        assert_eq!(local_name("http://open-services.net/ns/rm#validatedBy"), "validatedBy");
        assert_eq!(local_name("http://purl.org/dc/terms/references"), "references");
        assert_eq!(local_name("urn:x:plain"), "urn:x:plain");
        assert_eq!(local_name("http://example.com/ns/"), "");
    }

    #[test]
    fn label_precedence() {
        assert_eq!(display_label(Some("Title"), Some("T"), "u"), "Title");
        assert_eq!(display_label(None, Some("T"), "u"), "T");
        assert_eq!(display_label(Some(""), None, "https://x/a&amp;b"), "https://x/a&b");
    }

    #[test]
    fn decode_numeric_and_named_entities() {
        assert_eq!(decode_entities("a &lt;b&gt; &#65;&#x42;"), "a <b> AB");
        assert_eq!(decode_entities("no entities"), "no entities");
    }

    #[test]
    fn unknown_entity_left_untouched() {
        assert_eq!(decode_entities("a&nbsp;b"), "a&nbsp;b");
    }
}
