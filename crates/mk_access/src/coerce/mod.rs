//! Conversion of raw external values into a member's declared type.
//!
//! External formats hand values over as [`RawValue`]s:
//!
//! - [`RawValue::Null`]: absent. Writing it leaves the member unchanged.
//! - [`RawValue::Text`]: parsed with the grammar of the declared type.
//! - [`RawValue::Value`]: already typed, passed through unchanged. A type
//!   mismatch is reported when it is stored.
//!
//! Parsing goes through [`FromText`]. Surrounding whitespace is ignored for
//! every grammar except text, which is taken verbatim. `Option<T>` reads
//! blank text as `None`. Entities, lists and opaque types have no textual
//! form and reject any text with [`AccessError::FormatMismatch`].

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use crate::info::TypeInfo;
use crate::value::Value;
use crate::{AccessError, AccessResult};

// -----------------------------------------------------------------------------
// FromText

/// Parses a value from external text.
///
/// Returns `None` when the text does not match the type's grammar.
pub trait FromText: Sized {
    fn from_text(text: &str) -> Option<Self>;
}

// -----------------------------------------------------------------------------
// RawValue

/// A value as delivered by an external source.
pub enum RawValue<'a> {
    Null,
    Text(Cow<'a, str>),
    Value(Box<dyn Value>),
}

impl<'a> RawValue<'a> {
    /// Wraps a typed value.
    #[inline]
    pub fn value<T: Value>(value: T) -> Self {
        Self::Value(Box::new(value))
    }

    /// Wraps borrowed or owned text.
    #[inline]
    pub fn text(text: impl Into<Cow<'a, str>>) -> Self {
        Self::Text(text.into())
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text, if this is textual.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for RawValue<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl From<String> for RawValue<'_> {
    #[inline]
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl From<Box<dyn Value>> for RawValue<'_> {
    #[inline]
    fn from(value: Box<dyn Value>) -> Self {
        Self::Value(value)
    }
}

/// `None` is a null, as produced by a nullable column.
impl<'a, T: Into<RawValue<'a>>> From<Option<T>> for RawValue<'a> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl fmt::Debug for RawValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Coercion

/// Converts `raw` to the type described by `declared`.
///
/// Returns `Ok(None)` for [`RawValue::Null`].
///
/// # Examples
///
/// ```
/// use mk_access::coerce::{coerce, RawValue};
/// use mk_access::info::Typed;
///
/// let value = coerce(RawValue::from(" 42 "), i32::type_info()).unwrap().unwrap();
/// assert_eq!(value.take::<i32>().ok(), Some(42));
///
/// assert!(coerce(RawValue::from("4x2"), i32::type_info()).is_err());
/// assert!(coerce(RawValue::Null, i32::type_info()).unwrap().is_none());
/// ```
pub fn coerce(raw: RawValue<'_>, declared: &'static TypeInfo) -> AccessResult<Option<Box<dyn Value>>> {
    match raw {
        RawValue::Null => Ok(None),
        RawValue::Value(value) => Ok(Some(value)),
        RawValue::Text(text) => parse_text(&text, declared).map(Some),
    }
}

/// Parses `text` with the grammar of `declared`.
pub fn parse_text(text: &str, declared: &'static TypeInfo) -> AccessResult<Box<dyn Value>> {
    match declared {
        TypeInfo::Scalar(info) => info.parse(text).ok_or_else(|| format_mismatch(text, declared)),
        TypeInfo::Optional(info) => {
            let inner = if text.trim().is_empty() {
                None
            } else {
                Some(parse_text(text, info.inner_info())?)
            };
            info.wrap(inner).map_err(|rejected| AccessError::ValueMismatch {
                member: "",
                expected: info.inner_ty().path(),
                actual: rejected.reflect_type_path(),
            })
        }
        TypeInfo::Entity(_) | TypeInfo::List(_) | TypeInfo::Opaque(_) => Err(format_mismatch(text, declared)),
    }
}

#[cold]
fn format_mismatch(text: &str, declared: &'static TypeInfo) -> AccessError {
    AccessError::FormatMismatch {
        input: text.to_string(),
        expected: declared.type_path(),
        grammar: declared.grammar(),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use chrono::NaiveDate;

    use super::{RawValue, coerce, parse_text};
    use crate::AccessError;
    use crate::info::Typed;

    #[test]
    fn optional_blank_is_none() {
        let value = parse_text("  ", <Option<i64>>::type_info()).unwrap();
        assert_eq!(value.take::<Option<i64>>().ok(), Some(None));

        let value = parse_text(" 7", <Option<i64>>::type_info()).unwrap();
        assert_eq!(value.take::<Option<i64>>().ok(), Some(Some(7)));

        let value = parse_text("", <Option<String>>::type_info()).unwrap();
        assert_eq!(value.take::<Option<String>>().ok(), Some(None));
    }

    #[test]
    fn mismatch_names_the_grammar() {
        let err = parse_text("2024-13-01", NaiveDate::type_info()).unwrap_err();
        assert_eq!(
            err,
            AccessError::FormatMismatch {
                input: "2024-13-01".into(),
                expected: "chrono::NaiveDate",
                grammar: "a date (YYYY-MM-DD)",
            }
        );

        let err = parse_text("x", <Option<u8>>::type_info()).unwrap_err();
        assert!(matches!(err, AccessError::FormatMismatch { expected: "u8", .. }));
    }

    #[test]
    fn structured_types_reject_text() {
        let err = parse_text("[1, 2]", <Vec<u8>>::type_info()).unwrap_err();
        assert!(matches!(err, AccessError::FormatMismatch { .. }));
    }

    #[test]
    fn typed_values_pass_through() {
        // The declared type is not consulted for typed values.
        let raw = RawValue::value(3_u64);
        let value = coerce(raw, i32::type_info()).unwrap().unwrap();
        assert!(value.is::<u64>());

        let raw: RawValue<'_> = None::<&str>.into();
        assert!(raw.is_null());
    }
}
