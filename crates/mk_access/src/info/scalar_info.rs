use alloc::boxed::Box;
use core::fmt;

use crate::coerce::FromText;
use crate::info::{Type, TypePath, impl_type_fn};
use crate::value::Value;

/// The textual grammar of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `true`/`false` in any ASCII case, or `1`/`0`.
    Bool,
    /// Exactly one character.
    Char,
    SignedInt,
    UnsignedInt,
    Float,
    /// Any text, taken verbatim.
    Text,
    /// `YYYY-MM-DD`.
    Date,
    /// `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DDTHH:MM:SS`, optional fraction.
    DateTime,
    /// `HH:MM:SS` or `HH:MM`, optional fraction.
    Time,
}

impl ScalarKind {
    /// Describes the accepted text, used in [`FormatMismatch`] messages.
    ///
    /// [`FormatMismatch`]: crate::AccessError::FormatMismatch
    pub const fn grammar(self) -> &'static str {
        match self {
            Self::Bool => "a boolean",
            Self::Char => "a single character",
            Self::SignedInt => "a signed integer",
            Self::UnsignedInt => "an unsigned integer",
            Self::Float => "a decimal number",
            Self::Text => "text",
            Self::Date => "a date (YYYY-MM-DD)",
            Self::DateTime => "a date-time (YYYY-MM-DD HH:MM:SS)",
            Self::Time => "a time of day (HH:MM:SS)",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.grammar())
    }
}

/// A leaf value that can be read from text.
#[derive(Clone)]
pub struct ScalarInfo {
    ty: Type,
    kind: ScalarKind,
    parse: fn(&str) -> Option<Box<dyn Value>>,
}

impl ScalarInfo {
    impl_type_fn!(ty);

    /// Creates the info of scalar `T`, parsed with [`FromText`].
    pub fn new<T: FromText + Value + TypePath>(kind: ScalarKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
            parse: |text| T::from_text(text).map(|v| Box::new(v) as Box<dyn Value>),
        }
    }

    /// Returns the grammar of this scalar.
    #[inline]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Parses `text`, returning `None` if it does not match the grammar.
    #[inline]
    pub fn parse(&self, text: &str) -> Option<Box<dyn Value>> {
        (self.parse)(text)
    }
}

impl fmt::Debug for ScalarInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarInfo")
            .field("ty", &self.ty)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
