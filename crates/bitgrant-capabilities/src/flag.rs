//! Permissive boolean coercion for capability updates.
//!
//! Capability values usually arrive from forms, query strings or JSON, so
//! [`CapabilitySet::set`](crate::CapabilitySet::set) accepts anything that
//! implements [`IntoFlag`]. Exactly these forms are recognized:
//!
//! | value                            | flag    |
//! |----------------------------------|---------|
//! | `true`, `1`, `"1"`, `"true"`     | `true`  |
//! | `false`, `0`, `"0"`, `"false"`   | `false` |
//!
//! String forms are case-insensitive. Everything else, including `None`,
//! coerces to no flag at all and leaves the capability untouched.

/// Parse the string forms of a flag.
///
/// ```
/// use bitgrant_capabilities::parse_flag;
///
/// assert_eq!(parse_flag("TRUE"), Some(true));
/// assert_eq!(parse_flag("0"), Some(false));
/// assert_eq!(parse_flag("yes"), None);
/// ```
#[must_use]
pub fn parse_flag(input: &str) -> Option<bool> {
    if input == "1" || input.eq_ignore_ascii_case("true") {
        Some(true)
    } else if input == "0" || input.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// A value that may be coerced into a capability flag.
pub trait IntoFlag {
    /// The recognized flag, or `None` when the value should be ignored.
    fn into_flag(self) -> Option<bool>;
}

impl IntoFlag for bool {
    fn into_flag(self) -> Option<bool> {
        Some(self)
    }
}

impl IntoFlag for &bool {
    fn into_flag(self) -> Option<bool> {
        Some(*self)
    }
}

impl IntoFlag for &str {
    fn into_flag(self) -> Option<bool> {
        parse_flag(self)
    }
}

impl IntoFlag for String {
    fn into_flag(self) -> Option<bool> {
        parse_flag(&self)
    }
}

impl IntoFlag for &String {
    fn into_flag(self) -> Option<bool> {
        parse_flag(self)
    }
}

macro_rules! impl_numeric_flag {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoFlag for $ty {
                fn into_flag(self) -> Option<bool> {
                    match self {
                        1 => Some(true),
                        0 => Some(false),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_numeric_flag!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: IntoFlag> IntoFlag for Option<T> {
    fn into_flag(self) -> Option<bool> {
        self.and_then(IntoFlag::into_flag)
    }
}

impl IntoFlag for &serde_json::Value {
    fn into_flag(self) -> Option<bool> {
        match self {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::Number(n) => n.as_u64().and_then(IntoFlag::into_flag),
            serde_json::Value::String(s) => parse_flag(s),
            _ => None,
        }
    }
}

impl IntoFlag for serde_json::Value {
    fn into_flag(self) -> Option<bool> {
        (&self).into_flag()
    }
}
