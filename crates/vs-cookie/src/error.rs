use thiserror::Error;

/// Errors that can occur while signing, reading or building cookies.
///
/// Every variant except [`CookieError::InvalidSignature`] and [`CookieError::KeyedHash`] is a
/// usage error: the caller passed arguments that can never succeed. A signature that simply does
/// not match is not an error, [`crate::verify`] reports it as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookieError {
    /// A required string argument was empty
    #[error("{0} should be a non-empty string")]
    EmptyArgument(&'static str),

    /// The value to sign contains the active separator
    #[error("cookie value cannot contain separator({0}).")]
    ContainsSeparator(char),

    /// The value to sign contains the reserved signature marker
    #[error("cookie value cannot contain signature separator({}).", crate::SIGNATURE_MARKER)]
    ContainsSignatureMarker,

    /// The separator collides with cookie syntax or the percent-encoding escape
    #[error("separator {0:?} cannot be used to sign cookies")]
    InvalidSeparator(char),

    /// Cookie has invalid name, value or attributes
    #[error("Invalid cookie format or attributes: {0}")]
    InvalidCookie(String),

    /// Cookie attributes violate a prefix or SameSite rule
    #[error("Cookie security policy violation: {0}")]
    SecurityViolation(String),

    /// The cookie value could not be decoded
    #[error("Failed to decode cookie value: {0}")]
    Decoding(String),

    /// The caller asked for a signed cookie and the signature did not verify
    #[error("Invalid cookie signature")]
    InvalidSignature,

    /// The keyed hash could not be initialized
    #[error("Failed to compute cookie signature")]
    KeyedHash,
}

pub(crate) type Result<T, E = CookieError> = std::result::Result<T, E>;
