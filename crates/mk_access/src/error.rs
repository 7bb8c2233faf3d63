use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::compile::Direction;

/// Why a member could not be bound in a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotAccessibleReason {
    /// The type declares no member with that name.
    NotFound,
    /// The member exists but cannot be read.
    NotReadable,
    /// The member exists but cannot be written.
    NotWritable,
}

impl fmt::Display for NotAccessibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "no such member",
            Self::NotReadable => "member is write-only",
            Self::NotWritable => "member is read-only",
        })
    }
}

/// Errors raised while compiling, resolving or invoking accessors.
///
/// Every error is reported to the immediate caller. Nothing that fails is
/// ever stored in a cache, so retrying after the cause is fixed recompiles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    /// The member does not exist or does not support the requested direction.
    #[error("member `{member}` of `{ty}` is not accessible for {direction}: {reason}")]
    MemberNotAccessible {
        ty: &'static str,
        member: String,
        direction: Direction,
        reason: NotAccessibleReason,
    },
    /// The factory was asked for an instance of a type without a default constructor.
    #[error("type `{ty}` has no default constructor")]
    NoDefaultConstructor { ty: &'static str },
    /// The factory was asked for a list of an element type it cannot build lists of.
    #[error("no list constructor registered for elements of `{ty}`")]
    NoListConstructor { ty: &'static str },
    /// A textual value does not match the grammar of the declared type.
    #[error("cannot read {input:?} as {grammar} for `{expected}`")]
    FormatMismatch {
        input: String,
        expected: &'static str,
        grammar: &'static str,
    },
    /// A member carries several different tags of the same mapping kind.
    #[error("member `{member}` of `{ty}` carries conflicting `{kind}` mapping tags")]
    AmbiguousMapping {
        ty: &'static str,
        member: &'static str,
        kind: &'static str,
    },
    /// The type was never registered.
    #[error("type `{ty}` is not registered")]
    UnknownType { ty: String },
    /// The type is registered but has no members to bind.
    #[error("type `{ty}` is not an entity")]
    NotAnEntity { ty: &'static str },
    /// An accessor was invoked on an instance of another type.
    #[error("accessor for `{expected}` invoked on `{actual}`")]
    InstanceMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// A non-textual value does not have the member's declared type.
    #[error("member `{member}` expects `{expected}`, got `{actual}`")]
    ValueMismatch {
        member: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    /// A list was given an element of another type.
    #[error("list of `{expected}` cannot hold `{actual}`")]
    ElementMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// A value had to be duplicated but its type does not support it.
    #[error("values of `{ty}` cannot be cloned")]
    Uncloneable { ty: &'static str },
    /// A record lacks the value of a member whose mapping is `required`.
    #[error("record for `{ty}` has no {kind} `{external}` (member `{member}` is required)")]
    MissingRequired {
        ty: &'static str,
        member: &'static str,
        kind: &'static str,
        external: String,
    },
}

/// A `Result` with [`AccessError`].
pub type AccessResult<T> = Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{AccessError, NotAccessibleReason};
    use crate::compile::Direction;

    #[test]
    fn messages_name_the_culprit() {
        let err = AccessError::MemberNotAccessible {
            ty: "demo::Point",
            member: "z".into(),
            direction: Direction::Get,
            reason: NotAccessibleReason::NotFound,
        };
        assert_eq!(
            err.to_string(),
            "member `z` of `demo::Point` is not accessible for get: no such member"
        );

        let err = AccessError::FormatMismatch {
            input: "abc".into(),
            expected: "i32",
            grammar: "a signed integer",
        };
        assert_eq!(err.to_string(), "cannot read \"abc\" as a signed integer for `i32`");
    }
}
