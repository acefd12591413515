//! A helper macro to more concisely express argument validation.

/// Ensures that an expression is true. Otherwise an error is returned.
/// ```ignore
/// fn example(value: &str) -> Result<(), CookieError> {
///     ensure!(!value.is_empty() => CookieError::EmptyArgument("value"));
///     Ok(())
/// }
/// ```
macro_rules! ensure {
    ($cond:expr => $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub(crate) use ensure;
