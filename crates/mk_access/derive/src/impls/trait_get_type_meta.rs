use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::entity_data::EntityDerive;

/// Generates `GetTypeMeta`.
///
/// Always attaches `TypeTraitList`; `TypeTraitDefault` only for `#[entity(default)]`,
/// and for generic types only where the instantiation implements `Default`.
/// Member types are registered as dependencies.
pub(crate) fn impl_trait_get_type_meta(data: &EntityDerive) -> TokenStream {
    let mk = &data.mk_access;
    let get_type_meta_ = crate::path::get_type_meta_(mk);
    let type_meta_ = crate::path::type_meta_(mk);
    let type_registry_ = crate::path::type_registry_(mk);
    let from_type_ = crate::path::from_type_(mk);
    let type_trait_list_ = crate::path::type_trait_list_(mk);
    let ident = data.ident;
    let (impl_generics, ty_generics, mut where_clause) = data.split_generics();

    let mut trait_counter = 1_usize;

    let insert_default = match data.attrs.default {
        Some(span) => {
            trait_counter += 1;
            if data.is_generic() {
                // `#[derive(Default)]` bounds the parameters, not `Self`.
                where_clause
                    .predicates
                    .push(syn::parse_quote_spanned!(span => Self: ::core::default::Default));
            }
            let type_trait_default_ = crate::path::type_trait_default_(mk);
            quote_spanned! { span =>
                #type_meta_::insert_trait::<#type_trait_default_>(&mut __meta, #from_type_::<Self>::from_type());
            }
        }
        None => quote!(),
    };

    let registry = if data.member_len() == 0 {
        quote!(_registry)
    } else {
        quote!(registry)
    };
    let dependencies = data.members().map(|field| {
        let ty = field.ty;
        quote!(#type_registry_::register::<#ty>(#registry);)
    });

    quote! {
        impl #impl_generics #get_type_meta_ for #ident #ty_generics #where_clause {
            fn get_type_meta() -> #type_meta_ {
                let mut __meta = #type_meta_::with_capacity::<Self>(#trait_counter);
                #type_meta_::insert_trait::<#type_trait_list_>(&mut __meta, #from_type_::<Self>::from_type());
                #insert_default
                __meta
            }

            fn register_dependencies(#registry: &mut #type_registry_) {
                #(#dependencies)*
            }
        }
    }
}
