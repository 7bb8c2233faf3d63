//! Compile-time descriptions of the types the engine can bind.
//!
//! - [`TypePath`] / [`DynamicTypePath`]: stable type names, without a leading `::`.
//! - [`Type`]: a `TypeId` plus its names.
//! - [`Typed`] / [`DynamicTyped`]: access to the [`TypeInfo`] of a type.
//! - [`TypeInfo`]: one of
//!     - [`EntityInfo`]: a type with named members, in declaration order.
//!     - [`ScalarInfo`]: a leaf value with a textual grammar.
//!     - [`OptionInfo`]: an optional value; blank text reads as absent.
//!     - [`ListInfo`]: a homogeneous list.
//!     - [`OpaqueInfo`]: anything else.
//! - [`MemberInfo`]: a member of an entity, its value type, its access mode,
//!   its mapping tags and the generated native accessors.

// -----------------------------------------------------------------------------
// Modules

mod container_info;
mod entity_info;
mod member_info;
mod scalar_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use container_info::{ListInfo, OpaqueInfo, OptionInfo};
pub use entity_info::EntityInfo;
pub use member_info::{MemberInfo, NativeAccess, NativeGetFn, NativeSetFn};
pub use scalar_info::{ScalarInfo, ScalarKind};
pub use type_info::{TypeInfo, TypeKind};
pub use type_path::{DynamicTypePath, Type, TypePath};
pub use typed::{DynamicTyped, Typed};

pub(crate) use type_path::impl_type_fn;
