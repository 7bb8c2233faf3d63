#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Compilation switches.
pub mod cfg {
    /// Returns `true` when cache publications should be logged.
    ///
    /// Requires the `debug` feature and a debug build.
    #[inline(always)]
    pub const fn debug() -> bool {
        cfg!(all(debug_assertions, feature = "debug"))
    }
}

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate `mk_access` (resolved by `Manifest`),
// including doc tests and unit tests inside the crate.
extern crate self as mk_access;

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod cache;
pub mod coerce;
pub mod compile;
pub mod engine;
pub mod impls;
pub mod info;
pub mod mapping;
pub mod registry;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use error::{AccessError, AccessResult, NotAccessibleReason};
pub use mk_access_derive as derive;

/// The most used items.
pub mod prelude {
    pub use crate::coerce::RawValue;
    pub use crate::compile::{CompiledAccessor, Direction, Getter, Setter, Strategy};
    pub use crate::derive::Entity;
    pub use crate::engine::{AccessEngine, EngineConfig};
    pub use crate::info::{TypePath, Typed};
    pub use crate::mapping::{MappingKind, MappingMode, MappingTag, NameOverrides};
    pub use crate::registry::{TypeRegistry, TypeRegistryArc};
    pub use crate::value::{Entity, List, Value};
    pub use crate::{AccessError, AccessResult};
}
