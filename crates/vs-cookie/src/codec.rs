//! Value transforms applied to cookie values on their way into and out of a header.
//!
//! The defaults mirror URI component encoding: everything except ASCII alphanumerics and
//! `- _ . ! ~ * ' ( )` is percent-encoded as UTF-8. Any pair of functions that are inverses of
//! each other can be supplied instead.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{CookieError, Result};

/// Transform applied to a value before it is placed in a header.
pub type Encoder = fn(&str) -> String;

/// Transform applied to a value read from a header. Must invert the matching [`Encoder`].
pub type Decoder = fn(&str) -> Result<String>;

const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a value the way URI components are encoded.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Reverse [`encode_uri_component`].
///
/// Fails on a `%` that is not followed by two hex digits, or when the decoded bytes are not
/// valid UTF-8.
pub fn decode_uri_component(value: &str) -> Result<String> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while let Some(offset) = bytes.get(i..).and_then(|rest| rest.iter().position(|b| *b == b'%')) {
        let start = i + offset;
        let escape_is_valid = matches!(
            bytes.get(start + 1..start + 3),
            Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
        );
        if !escape_is_valid {
            return Err(CookieError::Decoding(format!(
                "malformed percent escape at byte {start}"
            )));
        }
        i = start + 3;
    }

    percent_decode_str(value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| CookieError::Decoding(e.to_string()))
}

/// Leave the value untouched.
pub fn identity_encode(value: &str) -> String {
    value.to_owned()
}

/// Leave the value untouched.
pub fn identity_decode(value: &str) -> Result<String> {
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_keeps_unreserved_characters() {
        assert_eq!(
            encode_uri_component("AZaz09-_.!~*'()"),
            "AZaz09-_.!~*'()"
        );
    }

    #[test]
    fn test_encode_escapes_reserved_characters() {
        assert_eq!(
            encode_uri_component("Test cookie value:abc"),
            "Test%20cookie%20value%3Aabc"
        );
        assert_eq!(encode_uri_component("a;b=c"), "a%3Bb%3Dc");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn test_decode_reverses_encode() {
        let value = "Test cookie value:abc; é $@$";
        let encoded = encode_uri_component(value);
        assert_eq!(decode_uri_component(&encoded).unwrap(), value);
    }

    #[test]
    fn test_decode_passes_plain_text_through() {
        assert_eq!(decode_uri_component("plain").unwrap(), "plain");
        assert_eq!(decode_uri_component("").unwrap(), "");
    }

    #[test]
    fn test_decode_rejects_malformed_escape() {
        assert!(matches!(
            decode_uri_component("abc%zz"),
            Err(CookieError::Decoding(_))
        ));
        assert!(matches!(
            decode_uri_component("trailing%4"),
            Err(CookieError::Decoding(_))
        ));
        assert!(matches!(
            decode_uri_component("%"),
            Err(CookieError::Decoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(matches!(
            decode_uri_component("%FF%FE"),
            Err(CookieError::Decoding(_))
        ));
    }

    #[test]
    fn test_identity_codec() {
        assert_eq!(identity_encode("a b:c"), "a b:c");
        assert_eq!(identity_decode("a%20b").unwrap(), "a%20b");
    }
}
