// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod trait_entity;
mod trait_get_type_meta;
mod trait_type_path;
mod trait_typed;
mod trait_value;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;

use crate::entity_data::EntityDerive;

/// Generates every impl for `#[derive(Entity)]`.
pub(crate) fn impl_entity(data: &EntityDerive) -> TokenStream {
    let type_path_impl = trait_type_path::impl_trait_type_path(data);
    let typed_impl = trait_typed::impl_trait_typed(data);
    let value_impl = trait_value::impl_trait_value(data);
    let entity_impl = trait_entity::impl_trait_entity(data);
    let get_type_meta_impl = trait_get_type_meta::impl_trait_get_type_meta(data);
    let auto_register_impl = auto_register::get_auto_register_impl(data);

    quote! {
        const _: () = {
            #type_path_impl

            #typed_impl

            #value_impl

            #entity_impl

            #get_type_meta_impl

            #auto_register_impl
        };
    }
}
