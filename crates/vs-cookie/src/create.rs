use std::{fmt, str::FromStr};

use crate::{
    codec::{self, Encoder},
    ensure, CookieError, Result,
};

/// Characters that are not allowed in a cookie name.
const NAME_SEPARATORS: &[char] = &[
    '(', ')', '<', '>', '@', ',', ';', ':', '"', '/', '[', ']', '?', '=', '{', '}',
];

/// SameSite cookie attribute for cross-site request policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSite {
    /// Cookie only sent to same-site requests
    Strict,
    /// Cookie sent to same-site requests and top-level navigation
    Lax,
    /// Cookie sent to all requests
    None,
}

/// Priority hint used by browsers when evicting cookies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Priority {
    #[allow(missing_docs)]
    High,
    #[allow(missing_docs)]
    #[default]
    Medium,
    #[allow(missing_docs)]
    Low,
}

/// Cookie name prefixes that browsers enforce extra rules for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CookiePrefix {
    /// `__Secure-`: the cookie must be `Secure`
    Secure,
    /// `__Host-`: the cookie must be `Secure`, have `Path=/` and no `Domain`
    Host,
}

impl CookiePrefix {
    /// The literal prefix prepended to the cookie name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CookiePrefix::Secure => "__Secure-",
            CookiePrefix::Host => "__Host-",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        })
    }
}

impl fmt::Display for CookiePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            _ => Err(CookieError::InvalidCookie(format!(
                "unknown SameSite value {s:?}"
            ))),
        }
    }
}

impl FromStr for Priority {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(CookieError::InvalidCookie(format!(
                "unknown Priority value {s:?}"
            ))),
        }
    }
}

impl FromStr for CookiePrefix {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "secure" | "__secure-" => Ok(CookiePrefix::Secure),
            "host" | "__host-" => Ok(CookiePrefix::Host),
            _ => Err(CookieError::InvalidCookie(format!(
                "unknown cookie prefix {s:?}"
            ))),
        }
    }
}

/// Everything needed to build a `Set-Cookie` value with [`create_cookie`].
///
/// `Priority` defaults to `Medium` and is always emitted. Every other attribute is only emitted
/// when set.
#[derive(Clone, Debug)]
pub struct CookieOptions {
    /// Cookie name, without the prefix
    pub name: String,
    /// Cookie value, before encoding
    pub value: String,
    /// Applied to the value. Defaults to [`codec::encode_uri_component`].
    pub encode: Encoder,
    /// Cookie path
    pub path: Option<String>,
    /// Cookie domain
    pub domain: Option<String>,
    /// HttpOnly attribute (prevents JavaScript access)
    pub http_only: bool,
    /// Seconds until the cookie expires. Zero or negative expires it immediately.
    pub max_age: Option<i64>,
    /// Name prefix with browser-enforced rules
    pub prefix: Option<CookiePrefix>,
    /// Eviction priority
    pub priority: Priority,
    /// Secure attribute (HTTPS-only)
    pub secure: bool,
    /// SameSite attribute. Requires `secure`.
    pub same_site: Option<SameSite>,
}

impl CookieOptions {
    /// Creates options for a session cookie with no attributes besides the default priority.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            encode: codec::encode_uri_component,
            path: None,
            domain: None,
            http_only: false,
            max_age: None,
            prefix: None,
            priority: Priority::default(),
            secure: false,
            same_site: None,
        }
    }

    #[allow(missing_docs)]
    pub fn with_encode(mut self, encode: Encoder) -> Self {
        self.encode = encode;
        self
    }

    #[allow(missing_docs)]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[allow(missing_docs)]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[allow(missing_docs)]
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    #[allow(missing_docs)]
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    #[allow(missing_docs)]
    pub fn with_prefix(mut self, prefix: CookiePrefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    #[allow(missing_docs)]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[allow(missing_docs)]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[allow(missing_docs)]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    fn validate(&self) -> Result<()> {
        let has_whitespace = |s: &str| s.chars().any(char::is_whitespace);

        ensure!(
            !self.name.is_empty() && !has_whitespace(&self.name)
                => CookieError::InvalidCookie(
                    "Cookie name cannot be empty or contain spaces".to_string()
                )
        );
        ensure!(
            !self.name.contains(NAME_SEPARATORS)
                => CookieError::InvalidCookie(
                    r#"Cookie name cannot contain special characters ( ) < > @ , ; : " / [ ] ? = { }"#
                        .to_string()
                )
        );
        ensure!(
            !has_whitespace(&self.value)
                => CookieError::InvalidCookie("Cookie value cannot contain spaces".to_string())
        );
        ensure!(
            !self.path.as_deref().is_some_and(has_whitespace)
                => CookieError::InvalidCookie("Cookie path cannot contain spaces".to_string())
        );
        ensure!(
            !self.domain.as_deref().is_some_and(has_whitespace)
                => CookieError::InvalidCookie("Cookie domain cannot contain spaces".to_string())
        );

        match self.prefix {
            Some(CookiePrefix::Host) => {
                if self.path.as_deref() != Some("/") {
                    return Err(CookieError::SecurityViolation(format!(
                        "Cookie with __Host- prefix must have path=/ (got {:?})",
                        self.path
                    )));
                }
                ensure!(
                    self.domain.is_none()
                        => CookieError::SecurityViolation(
                            "__Host- prefix cookies cannot specify domain attribute".to_string()
                        )
                );
                ensure!(
                    self.secure
                        => CookieError::SecurityViolation(
                            "__Host- prefix cookies must have Secure=true".to_string()
                        )
                );
            }
            Some(CookiePrefix::Secure) => {
                ensure!(
                    self.secure
                        => CookieError::SecurityViolation(
                            "__Secure- prefix cookies must have Secure=true".to_string()
                        )
                );
            }
            None => {}
        }

        if let Some(same_site) = self.same_site {
            ensure!(
                self.secure
                    => CookieError::SecurityViolation(format!(
                        "Cookie with SameSite={same_site} must have Secure=true"
                    ))
            );
        }

        Ok(())
    }
}

/// Builds a `Set-Cookie` header value from `options`.
///
/// Attributes are joined with `;` in a fixed order: `Domain`, `Path`, `HttpOnly`, `Max-Age`,
/// `Priority`, `Secure`, `SameSite`. Browsers may still reject a cookie this function accepts.
///
/// # Errors
///
/// - [`CookieError::InvalidCookie`] for an empty name, a name with whitespace or separator
///   characters, or whitespace in the value, path or domain.
/// - [`CookieError::SecurityViolation`] when a prefix rule is broken, or `SameSite` is set
///   without `Secure`.
pub fn create_cookie(options: &CookieOptions) -> Result<String> {
    options.validate()?;

    if !options.http_only {
        tracing::warn!(
            cookie_name = %options.name,
            "Cookie missing HttpOnly attribute - vulnerable to JavaScript access"
        );
    }
    if !options.secure {
        tracing::warn!(
            cookie_name = %options.name,
            "Cookie missing Secure attribute - vulnerable to non-HTTPS transmission"
        );
    }
    if options.same_site == Some(SameSite::None) {
        tracing::warn!(
            cookie_name = %options.name,
            "Cookie using SameSite=None - vulnerable to cross-site requests"
        );
    }

    let prefix = options.prefix.map(|p| p.as_str()).unwrap_or_default();
    let mut cookie = vec![format!(
        "{prefix}{}={}",
        options.name,
        (options.encode)(&options.value)
    )];

    if let Some(domain) = &options.domain {
        cookie.push(format!("Domain={domain}"));
    }
    if let Some(path) = &options.path {
        cookie.push(format!("Path={path}"));
    }
    if options.http_only {
        cookie.push("HttpOnly".to_string());
    }
    if let Some(max_age) = options.max_age {
        cookie.push(format!("Max-Age={max_age}"));
    }
    cookie.push(format!("Priority={}", options.priority));
    if options.secure {
        cookie.push("Secure".to_string());
    }
    if let Some(same_site) = options.same_site {
        cookie.push(format!("SameSite={same_site}"));
    }

    Ok(cookie.join(";"))
}
