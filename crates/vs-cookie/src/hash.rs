use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{CookieError, Result};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 of `value` keyed with `secret`, base64 encoded with `=`, `+` and `/` removed.
///
/// The remaining alphabet is `[A-Za-z0-9]`, so the digest never contains the separator or a
/// character that needs escaping in a cookie.
pub(crate) fn hash(value: &str, secret: &str) -> Result<String> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| CookieError::KeyedHash)?;
    mac.update(value.as_bytes());

    let mut digest = STANDARD.encode(mac.finalize().into_bytes());
    digest.retain(|c| !matches!(c, '=' | '+' | '/'));
    Ok(digest)
}
