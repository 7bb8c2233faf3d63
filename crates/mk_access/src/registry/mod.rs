//! Runtime type registry and object factory.
//!
//! - [`TypeTrait`]: a capability attached to a registered type.
//! - [`FromType`]: builds a `TypeTrait` for a concrete type.
//! - [`TypeMeta`]: a [`TypeInfo`] plus a table of type traits.
//! - [`GetTypeMeta`]: builds the `TypeMeta` of a type, implemented by `#[derive(Entity)]`.
//! - [`TypeRegistry`]: `TypeId` (or type path) to `TypeMeta`.
//! - Type traits:
//!     - [`TypeTraitDefault`]: creates a default instance, backs [`TypeRegistry::new_instance`].
//!     - [`TypeTraitList`]: creates an empty `Vec<T>`, backs [`TypeRegistry::new_list`].
//!
//! ## auto_register
//!
//! With the `auto_register` feature, every non-generic `#[derive(Entity)]` type
//! declared with `#[entity(auto_register)]`
//! submits itself through [`inventory`] and [`TypeRegistry::auto_register`]
//! registers all of them at once. Platforms without `inventory` support
//! simply report `false`.
//!
//! [`TypeInfo`]: crate::info::TypeInfo
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod factory;
mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::{TypeTraitDefault, TypeTraitList};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
pub use type_trait::TypeTrait;

pub(crate) use factory::unknown_type;
