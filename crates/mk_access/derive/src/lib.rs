//! Provides [`Entity`](derive@Entity).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static ENTITY_ATTRIBUTE_NAME: &str = "entity";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod entity_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Entity Derivation
///
/// `#[derive(Entity)]` implements `TypePath`, `Typed`, `Value`, `Entity`
/// and `GetTypeMeta` for a struct with named fields (or no fields). Every
/// field becomes a member, in declaration order, and every field type must
/// implement `Value + Typed + GetTypeMeta`.
///
/// For each member the macro also generates a monomorphic getter and
/// setter, bound by `Strategy::Emitted`.
///
/// ## Type attributes
///
/// ```rust, ignore
/// #[derive(Entity, Default, Clone)]
/// #[entity(default, clone, auto_register, type_path = "shop::Order")]
/// struct Order { /* ... */ }
/// ```
///
/// - `default`: the type implements `Default`; registers `TypeTraitDefault`
///   so the engine can create instances. For a generic type, `GetTypeMeta`
///   is then only implemented for instantiations that implement `Default`.
/// - `clone`: the type implements `Clone`; used by `clone_value`. Without
///   it, values are cloned member by member when no field is skipped.
/// - `type_path = "..."`: replaces `module_path!()::Ident`. Generic
///   arguments are appended automatically.
/// - `auto_register`: submits the type to `TypeRegistry::auto_register`.
///   No effect on generic types or without the `auto_register` feature.
///
/// ## Field attributes
///
/// ```rust, ignore
/// #[derive(Entity)]
/// struct Order {
///     #[entity(read_only, map(Column, name = "order_id"))]
///     id: u64,
///     #[entity(map(Column, mode = WriteOnly), map(Cell, index = 2, required))]
///     note: String,
///     #[entity(skip)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// - `skip`: not a member. Requires `default` if the engine must create instances.
/// - `read_only` / `write_only`: the member cannot be written / read.
/// - `map(Kind, ...)`: attaches a mapping tag for the kind `Kind` (a type
///   implementing `MappingKind`). Keys: `name = "..."`, `mode = ReadWrite |
///   ReadOnly | WriteOnly`, `index = N`, `required`. Repeat `map` for
///   several kinds.
///
/// Type parameters are bounded by `Value + Typed + GetTypeMeta`.
/// Lifetime and const parameters are not supported.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match entity_data::EntityDerive::from_input(&ast) {
        Ok(data) => impls::impl_entity(&data).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
