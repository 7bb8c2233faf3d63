//! Member-to-external-name mapping, scoped by mapping kind.
//!
//! Every external format (database columns, spreadsheet cells, XML nodes,
//! delimited-text fields, ...) defines a [`MappingKind`] marker. Members
//! carry at most one [`MappingTag`] per kind, declared with
//! `#[entity(map(Kind, name = "..", mode = ReadOnly, index = 3, required))]`.
//!
//! The external name of a member is resolved by precedence:
//!
//! 1. the caller's [`NameOverrides`],
//! 2. the name of the member's tag of that kind,
//! 3. the member's own name.
//!
//! Tags of other kinds never participate. A member carrying two different
//! tags of one kind is reported as [`AmbiguousMapping`]; identical repeats
//! are accepted.
//!
//! [`AmbiguousMapping`]: crate::AccessError::AmbiguousMapping

// -----------------------------------------------------------------------------
// Modules

mod kind;
mod resolver;
mod tag;

// -----------------------------------------------------------------------------
// Exports

pub use kind::{KindId, MappingKind};
pub use resolver::{MappingTable, NameOverrides, NameSource, ResolvedMapping};
pub use resolver::{resolve_member, resolve_table};
pub use tag::{MappingMode, MappingTag};
