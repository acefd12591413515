#![doc = include_str!("../README.md")]

//! # Stateless API
//!
//! Every operation is a free function over its arguments. Secrets are borrowed for the duration
//! of a single call and never retained, so the functions are safe to call from any number of
//! threads without coordination.

mod ensure;
pub(crate) use ensure::ensure;

pub mod codec;
mod create;
pub use create::{create_cookie, CookieOptions, CookiePrefix, Priority, SameSite};
mod error;
pub(crate) use error::Result;
pub use error::CookieError;
mod hash;
mod parse;
pub use parse::{get_cookie, parse, parse_default, GetCookieOptions};
mod sign;
pub use sign::{sign, verify, SignOptions, VerifyOptions, DEFAULT_SEPARATOR, SIGNATURE_MARKER};
