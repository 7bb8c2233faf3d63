use proc_macro2::TokenStream;
use quote::quote;

use crate::entity_data::EntityDerive;

/// Generates `Entity`: lookups by name and by declaration index.
pub(crate) fn impl_trait_entity(data: &EntityDerive) -> TokenStream {
    let mk = &data.mk_access;
    let value_ = crate::path::value_(mk);
    let entity_ = crate::path::entity_(mk);
    let entity_info_ = crate::path::entity_info_(mk);
    let ident = data.ident;
    let (impl_generics, ty_generics, where_clause) = data.split_generics();

    let names = data.members().map(|field| field.name_lit()).collect::<Vec<_>>();
    let indices = data.members().filter_map(|field| field.index).collect::<Vec<_>>();
    let idents = data.members().map(|field| field.ident).collect::<Vec<_>>();
    let member_len = data.member_len();

    quote! {
        impl #impl_generics #entity_ for #ident #ty_generics #where_clause {
            fn member(&self, name: &str) -> ::core::option::Option<&dyn #value_> {
                match name {
                    #(#names => ::core::option::Option::Some(&self.#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn member_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn #value_> {
                match name {
                    #(#names => ::core::option::Option::Some(&mut self.#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn member_at(&self, index: usize) -> ::core::option::Option<&dyn #value_> {
                match index {
                    #(#indices => ::core::option::Option::Some(&self.#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn member_at_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #value_> {
                match index {
                    #(#indices => ::core::option::Option::Some(&mut self.#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn member_len(&self) -> usize {
                #member_len
            }

            #[inline]
            fn entity_info(&self) -> &'static #entity_info_ {
                #entity_info_::of::<Self>()
            }
        }
    }
}
