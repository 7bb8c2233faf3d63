//! Accessor compilation.
//!
//! An accessor binds one member of one entity type in one [`Direction`].
//! Three [`Strategy`]s produce them:
//!
//! - [`Strategy::Tree`]: builds an [`AccessTree`] (instance parameter, cast
//!   to the declaring type, member access, coercion of the value parameter,
//!   assignment) and compiles it into nested closures.
//! - [`Strategy::Emitted`]: binds the accessors generated by
//!   `#[derive(Entity)]` directly. Falls back to the tree compiler when the
//!   `native_backend` feature is off or no generated accessor exists.
//! - [`Strategy::Reflect`]: looks the member up by name on every call.
//!
//! All strategies behave identically: same values, same coercions, same
//! errors.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod compiler;
#[cfg(feature = "native_backend")]
mod emit;
mod reflect;
mod tree;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{CompiledAccessor, Getter, Setter};
pub use compiler::compile;
pub use tree::{AccessTree, InstanceExpr, ValueExpr};

use core::fmt;

// -----------------------------------------------------------------------------
// Direction

/// Whether an accessor reads or writes a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Get,
    Set,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "get",
            Self::Set => "set",
        })
    }
}

// -----------------------------------------------------------------------------
// Strategy

/// How an accessor is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Compile an expression tree into closures.
    #[default]
    Tree,
    /// Bind the accessors generated by `#[derive(Entity)]`.
    Emitted,
    /// Resolve the member by name on every call. Never cached.
    Reflect,
}

impl Strategy {
    /// Returns `true` if accessors of this strategy are cached.
    #[inline]
    pub const fn is_cached(self) -> bool {
        !matches!(self, Self::Reflect)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tree => "tree",
            Self::Emitted => "emitted",
            Self::Reflect => "reflect",
        })
    }
}
