use subtle::ConstantTimeEq;

use crate::{
    codec::{self, Decoder, Encoder},
    ensure,
    hash::hash,
    CookieError, Result,
};

/// Separator placed between a value and its digest unless overridden.
pub const DEFAULT_SEPARATOR: char = ':';

/// Sentinel reserved for higher-level formatting. Values containing it are never signed.
pub const SIGNATURE_MARKER: &str = "$@$";

/// Options for [`sign`].
#[derive(Clone, Copy, Debug)]
pub struct SignOptions {
    /// Character placed between the value and its digest. Defaults to [`DEFAULT_SEPARATOR`].
    pub separator: char,
    /// Applied to the finished token. Defaults to [`codec::encode_uri_component`].
    pub encode: Encoder,
}

impl Default for SignOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            encode: codec::encode_uri_component,
        }
    }
}

impl SignOptions {
    #[allow(missing_docs)]
    pub fn with_separator(self, separator: char) -> Self {
        Self { separator, ..self }
    }

    #[allow(missing_docs)]
    pub fn with_encode(self, encode: Encoder) -> Self {
        Self { encode, ..self }
    }
}

/// Options for [`verify`].
#[derive(Clone, Copy, Debug)]
pub struct VerifyOptions {
    /// Character expected between the value and its digest. Defaults to [`DEFAULT_SEPARATOR`].
    pub separator: char,
    /// Applied to the token before it is split. Defaults to [`codec::decode_uri_component`].
    pub decode: Decoder,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            decode: codec::decode_uri_component,
        }
    }
}

impl VerifyOptions {
    #[allow(missing_docs)]
    pub fn with_separator(self, separator: char) -> Self {
        Self { separator, ..self }
    }

    #[allow(missing_docs)]
    pub fn with_decode(self, decode: Decoder) -> Self {
        Self { decode, ..self }
    }
}

/// Rejects separators that would clash with `;`/`=` in a cookie header, with the `%` escape,
/// or that are invisible in a header value.
pub(crate) fn validate_separator(separator: char) -> Result<()> {
    ensure!(
        !matches!(separator, ';' | '=' | '%')
            && !separator.is_whitespace()
            && !separator.is_control()
            => CookieError::InvalidSeparator(separator)
    );
    Ok(())
}

/// Signs `cookie` with `secret`, producing `encode(cookie + separator + digest)`.
///
/// # Errors
///
/// Fails with a usage error when `cookie` or `secret` is empty, when the separator is not
/// allowed, or when `cookie` contains the separator or [`SIGNATURE_MARKER`]. An embedded
/// separator would make the split in [`verify`] ambiguous, so it is rejected rather than escaped.
pub fn sign(cookie: &str, secret: &str, options: SignOptions) -> Result<String> {
    ensure!(!cookie.is_empty() => CookieError::EmptyArgument("cookie"));
    ensure!(!secret.is_empty() => CookieError::EmptyArgument("secret"));
    validate_separator(options.separator)?;
    ensure!(
        !cookie.contains(options.separator)
            => CookieError::ContainsSeparator(options.separator)
    );
    ensure!(!cookie.contains(SIGNATURE_MARKER) => CookieError::ContainsSignatureMarker);

    let digest = hash(cookie, secret)?;
    let token = format!("{cookie}{}{digest}", options.separator);
    Ok((options.encode)(&token))
}

/// Checks that `cookie` was produced by [`sign`] with the same `secret` and separator.
///
/// Returns `Ok(false)` for any well-typed input that does not verify: a wrong digest, a missing
/// separator, an empty value or digest, or a token that does not decode. The digest comparison
/// runs in constant time.
///
/// # Errors
///
/// Fails only with usage errors: an empty `cookie` or `secret`, or a separator that is not
/// allowed. Arguments are checked before anything is decoded.
pub fn verify(cookie: &str, secret: &str, options: VerifyOptions) -> Result<bool> {
    ensure!(!cookie.is_empty() => CookieError::EmptyArgument("cookie"));
    ensure!(!secret.is_empty() => CookieError::EmptyArgument("secret"));
    validate_separator(options.separator)?;

    let decoded = match (options.decode)(cookie) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!("Rejecting signed cookie that does not decode: {e}");
            return Ok(false);
        }
    };

    let Some((value, digest)) = decoded.split_once(options.separator) else {
        tracing::debug!("Rejecting signed cookie without separator");
        return Ok(false);
    };
    if value.is_empty() || digest.is_empty() {
        tracing::debug!("Rejecting signed cookie with an empty value or digest");
        return Ok(false);
    }

    let expected = hash(value, secret)?;
    // `ct_eq` on slices needs equal lengths to do a meaningful comparison
    if expected.len() != digest.len() {
        return Ok(false);
    }
    Ok(expected.as_bytes().ct_eq(digest.as_bytes()).into())
}
