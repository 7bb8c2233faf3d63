use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::coerce::FromText;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{ScalarInfo, ScalarKind, TypeInfo, TypePath, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitDefault, TypeTraitList};
use crate::value::{Value, impl_value_cast_fn};

// -----------------------------------------------------------------------------
// Value, Typed and registration

macro_rules! impl_scalar {
    ($ty:ty, $kind:ident, $path:literal, $name:literal, $module:expr) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                $module
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<$ty>(ScalarKind::$kind)))
            }
        }

        impl Value for $ty {
            impl_value_cast_fn!();

            #[inline]
            fn set(&mut self, value: Box<dyn Value>) -> Result<(), Box<dyn Value>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn value_eq(&self, other: &dyn Value) -> Option<bool> {
                Some(other.downcast_ref::<Self>().is_some_and(|other| other == self))
            }

            #[inline]
            fn clone_value(&self) -> Option<Box<dyn Value>> {
                Some(Box::new(self.clone()))
            }

            #[inline]
            fn to_text(&self) -> Option<String> {
                Some(self.to_string())
            }

            #[inline]
            fn value_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::with_capacity::<Self>(2);
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta.insert_trait::<TypeTraitList>(FromType::<Self>::from_type());
                meta
            }
        }
    };
}

impl_scalar!(bool, Bool, "bool", "bool", None);
impl_scalar!(char, Char, "char", "char", None);
impl_scalar!(i8, SignedInt, "i8", "i8", None);
impl_scalar!(i16, SignedInt, "i16", "i16", None);
impl_scalar!(i32, SignedInt, "i32", "i32", None);
impl_scalar!(i64, SignedInt, "i64", "i64", None);
impl_scalar!(i128, SignedInt, "i128", "i128", None);
impl_scalar!(isize, SignedInt, "isize", "isize", None);
impl_scalar!(u8, UnsignedInt, "u8", "u8", None);
impl_scalar!(u16, UnsignedInt, "u16", "u16", None);
impl_scalar!(u32, UnsignedInt, "u32", "u32", None);
impl_scalar!(u64, UnsignedInt, "u64", "u64", None);
impl_scalar!(u128, UnsignedInt, "u128", "u128", None);
impl_scalar!(usize, UnsignedInt, "usize", "usize", None);
impl_scalar!(f32, Float, "f32", "f32", None);
impl_scalar!(f64, Float, "f64", "f64", None);
impl_scalar!(String, Text, "alloc::string::String", "String", Some("alloc::string"));
impl_scalar!(NaiveDate, Date, "chrono::NaiveDate", "NaiveDate", Some("chrono"));
impl_scalar!(NaiveDateTime, DateTime, "chrono::NaiveDateTime", "NaiveDateTime", Some("chrono"));
impl_scalar!(NaiveTime, Time, "chrono::NaiveTime", "NaiveTime", Some("chrono"));

// -----------------------------------------------------------------------------
// FromText

// Surrounding whitespace is insignificant for every grammar except text.
macro_rules! impl_from_text_by_parse {
    ($($ty:ty),* $(,)?) => {$(
        impl FromText for $ty {
            #[inline]
            fn from_text(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }
        }
    )*};
}

impl_from_text_by_parse!(i8, i16, i32, i64, i128, isize);
impl_from_text_by_parse!(u8, u16, u32, u64, u128, usize);
impl_from_text_by_parse!(f32, f64);

impl FromText for bool {
    fn from_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") || text == "1" {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") || text == "0" {
            Some(false)
        } else {
            None
        }
    }
}

impl FromText for char {
    fn from_text(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl FromText for String {
    #[inline]
    fn from_text(text: &str) -> Option<Self> {
        Some(String::from(text))
    }
}

impl FromText for NaiveDate {
    fn from_text(text: &str) -> Option<Self> {
        NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
    }
}

impl FromText for NaiveDateTime {
    fn from_text(text: &str) -> Option<Self> {
        let text = text.trim();
        ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
            .into_iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    }
}

impl FromText for NaiveTime {
    fn from_text(text: &str) -> Option<Self> {
        let text = text.trim();
        ["%H:%M:%S%.f", "%H:%M"]
            .into_iter()
            .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::coerce::FromText;
    use crate::value::Value;

    #[test]
    fn bool_grammar() {
        assert_eq!(bool::from_text("TRUE"), Some(true));
        assert_eq!(bool::from_text(" 0 "), Some(false));
        assert_eq!(bool::from_text("yes"), None);
    }

    #[test]
    fn numbers_are_trimmed_text_is_not() {
        assert_eq!(i32::from_text(" -42\n"), Some(-42));
        assert_eq!(u8::from_text("256"), None);
        assert_eq!(f64::from_text("2.5"), Some(2.5));
        assert_eq!(String::from_text(" a ").as_deref(), Some(" a "));
        assert_eq!(char::from_text("ab"), None);
    }

    #[test]
    fn dates_accept_both_separators() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(NaiveDateTime::from_text("2024-02-29 08:30:00"), Some(expected));
        assert_eq!(NaiveDateTime::from_text("2024-02-29T08:30:00"), Some(expected));
        assert_eq!(NaiveDate::from_text("2023-02-29"), None);
        assert_eq!(NaiveTime::from_text("08:30"), NaiveTime::from_hms_opt(8, 30, 0));
    }

    #[test]
    fn text_renders_in_the_parsed_grammar() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let text = date.to_text().unwrap();
        assert_eq!(NaiveDate::from_text(&text), Some(date));
        assert_eq!(1.25_f32.to_text().as_deref(), Some("1.25"));
    }

    #[test]
    fn set_rejects_other_types() {
        let mut x = 1_i32;
        assert!(x.set(Box::new(7_i32)).is_ok());
        assert_eq!(x, 7);

        let rejected = x.set(Box::new(7_i64)).unwrap_err();
        assert!(rejected.is::<i64>());
        assert_eq!(x, 7);
    }
}
