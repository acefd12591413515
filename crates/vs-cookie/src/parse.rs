use std::collections::HashMap;

use crate::{
    codec::{self, Decoder},
    ensure,
    sign::{validate_separator, verify, VerifyOptions, DEFAULT_SEPARATOR},
    CookieError, Result,
};

/// Options for [`get_cookie`].
#[derive(Clone, Copy, Debug)]
pub struct GetCookieOptions<'a> {
    /// Applied to the raw cookie value. Defaults to [`codec::decode_uri_component`].
    pub decode: Decoder,
    /// When set, the cookie must carry a valid signature and only the signed value is returned.
    pub secret: Option<&'a str>,
    /// Separator between the value and its digest. This is the only separator override.
    pub separator: char,
}

impl Default for GetCookieOptions<'_> {
    fn default() -> Self {
        Self {
            decode: codec::decode_uri_component,
            secret: None,
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl<'a> GetCookieOptions<'a> {
    #[allow(missing_docs)]
    pub fn with_decode(self, decode: Decoder) -> Self {
        Self { decode, ..self }
    }

    #[allow(missing_docs)]
    pub fn with_secret(self, secret: &'a str) -> Self {
        Self {
            secret: Some(secret),
            ..self
        }
    }

    #[allow(missing_docs)]
    pub fn with_separator(self, separator: char) -> Self {
        Self { separator, ..self }
    }
}

/// Splits a `Cookie` header into `(name, value)` pairs, both trimmed. Segments that are blank
/// are skipped and a segment without `=` has an empty value.
fn pairs(cookies: &str) -> impl Iterator<Item = (&str, &str)> {
    cookies
        .split(';')
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (segment.trim(), ""),
        })
}

/// Parses a `Cookie` header into a map of names to decoded values.
///
/// When a name appears more than once the last value wins.
///
/// # Errors
///
/// Fails with [`CookieError::Decoding`] when a value cannot be decoded.
pub fn parse(cookies: &str, decode: Decoder) -> Result<HashMap<String, String>> {
    pairs(cookies)
        .map(|(name, value)| Ok((name.to_owned(), decode(value)?)))
        .collect()
}

/// [`parse`] with percent decoding.
pub fn parse_default(cookies: &str) -> Result<HashMap<String, String>> {
    parse(cookies, codec::decode_uri_component)
}

/// Finds the first cookie called `name` in a `Cookie` header.
///
/// Without a secret the decoded value is returned as is, including any signature. With a secret
/// the value must verify, and only the part before the separator is returned.
///
/// Returns `Ok(None)` when the header has no cookie with that name.
///
/// # Errors
///
/// - [`CookieError::EmptyArgument`] when `cookies` or `name` is empty.
/// - [`CookieError::InvalidSignature`] when a secret was given and the cookie does not verify.
/// - [`CookieError::Decoding`] when the value cannot be decoded.
pub fn get_cookie(
    cookies: &str,
    name: &str,
    options: GetCookieOptions<'_>,
) -> Result<Option<String>> {
    ensure!(!cookies.is_empty() => CookieError::EmptyArgument("cookies"));
    ensure!(!name.is_empty() => CookieError::EmptyArgument("name"));
    validate_separator(options.separator)?;

    let Some(raw) = pairs(cookies).find_map(|(n, value)| (n == name).then_some(value)) else {
        return Ok(None);
    };

    let Some(secret) = options.secret else {
        return (options.decode)(raw).map(Some);
    };

    let verify_options = VerifyOptions {
        separator: options.separator,
        decode: options.decode,
    };
    if raw.is_empty() || !verify(raw, secret, verify_options)? {
        tracing::warn!(cookie_name = %name, "Cookie signature verification failed");
        return Err(CookieError::InvalidSignature);
    }

    let decoded = (options.decode)(raw)?;
    let value = decoded
        .split_once(options.separator)
        .map(|(value, _digest)| value)
        .ok_or(CookieError::InvalidSignature)?;
    Ok(Some(value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sign, SignOptions};

    const SECRET: &str = "This is test cookie signing secret";

    #[test]
    fn test_parse_empty_header() {
        assert!(parse_default("").unwrap().is_empty());
        assert!(parse_default(" ; ;").unwrap().is_empty());
    }

    #[test]
    fn test_parse_skips_trailing_separator() {
        let parsed = parse_default("test=test;test1=test1;").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["test"], "test");
        assert_eq!(parsed["test1"], "test1");
    }

    #[test]
    fn test_parse_trims_and_decodes() {
        let parsed = parse_default("  a = hello%20world ; b=2").unwrap();
        assert_eq!(parsed["a"], "hello world");
        assert_eq!(parsed["b"], "2");
    }

    #[test]
    fn test_parse_splits_on_first_equals() {
        let parsed = parse_default("a=b=c").unwrap();
        assert_eq!(parsed["a"], "b=c");
    }

    #[test]
    fn test_parse_segment_without_equals() {
        let parsed = parse_default("flag;a=1").unwrap();
        assert_eq!(parsed["flag"], "");
        assert_eq!(parsed["a"], "1");
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let parsed = parse_default("a=1;a=2").unwrap();
        assert_eq!(parsed["a"], "2");
    }

    #[test]
    fn test_parse_with_custom_decoder() {
        let parsed = parse("a=hello%20world", codec::identity_decode).unwrap();
        assert_eq!(parsed["a"], "hello%20world");
    }

    #[test]
    fn test_parse_propagates_decode_error() {
        assert!(matches!(
            parse_default("a=%zz"),
            Err(CookieError::Decoding(_))
        ));
    }

    #[test]
    fn test_get_cookie_rejects_empty_arguments() {
        assert_eq!(
            get_cookie("", "a", GetCookieOptions::default()),
            Err(CookieError::EmptyArgument("cookies"))
        );
        assert_eq!(
            get_cookie("a=1", "", GetCookieOptions::default()),
            Err(CookieError::EmptyArgument("name"))
        );
    }

    #[test]
    fn test_get_cookie_missing() {
        assert_eq!(
            get_cookie("a=1;b=2", "c", GetCookieOptions::default()),
            Ok(None)
        );
    }

    #[test]
    fn test_get_cookie_matches_whole_name() {
        let header = "xenc=wrong; enc=right";
        assert_eq!(
            get_cookie(header, "enc", GetCookieOptions::default()),
            Ok(Some("right".to_owned()))
        );
    }

    #[test]
    fn test_get_cookie_first_occurrence_wins() {
        assert_eq!(
            get_cookie("a=1;a=2", "a", GetCookieOptions::default()),
            Ok(Some("1".to_owned()))
        );
    }

    #[test]
    fn test_get_cookie_without_secret_keeps_signature() {
        let signed = sign("Test cookie value", SECRET, SignOptions::default()).unwrap();
        let header = format!("test=test;test1=test1;encodedSignedCookie={signed}");

        let cookie = get_cookie(&header, "encodedSignedCookie", GetCookieOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(cookie, codec::decode_uri_component(&signed).unwrap());
        assert!(cookie.starts_with("Test cookie value:"));
    }

    #[test]
    fn test_get_cookie_with_secret_strips_signature() {
        let signed = sign("Test cookie value", SECRET, SignOptions::default()).unwrap();
        let header = format!("test=test;test1=test1;encodedSignedCookie={signed}");

        let cookie = get_cookie(
            &header,
            "encodedSignedCookie",
            GetCookieOptions::default().with_secret(SECRET),
        );
        assert_eq!(cookie, Ok(Some("Test cookie value".to_owned())));
    }

    #[test]
    fn test_get_cookie_with_custom_separator() {
        let signed = sign(
            "Test cookie value",
            SECRET,
            SignOptions::default().with_separator('-'),
        )
        .unwrap();
        let header = format!("test=test;test1=test1;encodedSignedCookie={signed}");

        let cookie = get_cookie(
            &header,
            "encodedSignedCookie",
            GetCookieOptions::default()
                .with_secret(SECRET)
                .with_separator('-'),
        );
        assert_eq!(cookie, Ok(Some("Test cookie value".to_owned())));
    }

    #[test]
    fn test_get_cookie_with_wrong_secret() {
        let signed = sign("Test cookie value", SECRET, SignOptions::default()).unwrap();
        let header = format!("a=1;enc={signed}");

        assert_eq!(
            get_cookie(
                &header,
                "enc",
                GetCookieOptions::default().with_secret("wrong secret")
            ),
            Err(CookieError::InvalidSignature)
        );
    }

    #[test]
    fn test_get_cookie_with_secret_and_unsigned_value() {
        assert_eq!(
            get_cookie("a=plain", "a", GetCookieOptions::default().with_secret(SECRET)),
            Err(CookieError::InvalidSignature)
        );
        assert_eq!(
            get_cookie("a=", "a", GetCookieOptions::default().with_secret(SECRET)),
            Err(CookieError::InvalidSignature)
        );
    }
}
