//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Bytes escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/');

/// Percent-encode a path segment for use in a link. Post identifiers come
/// from filenames, which may carry spaces or non-ASCII characters.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_slug_unchanged() {
        assert_eq!(encode_segment("hello-world"), "hello-world");
    }

    #[test]
    fn test_space_encoded() {
        assert_eq!(encode_segment("hello world"), "hello%20world");
    }

    #[test]
    fn test_reserved_characters_encoded() {
        assert_eq!(encode_segment("50% off?"), "50%25%20off%3F");
    }

    #[test]
    fn test_non_ascii_encoded() {
        assert_eq!(encode_segment("日記"), "%E6%97%A5%E8%A8%98");
    }
}
