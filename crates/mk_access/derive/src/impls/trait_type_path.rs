use proc_macro2::TokenStream;
use quote::quote;

use crate::entity_data::EntityDerive;

fn static_path_cell(mk_access: &syn::Path, generator: TokenStream) -> TokenStream {
    let path_cell_ = crate::path::generic_type_path_cell_(mk_access);

    quote! {
        static CELL: #path_cell_ = #path_cell_::new();
        CELL.get_or_insert::<Self>(|| {
            #generator
        })
    }
}

/// Generates `TypePath`.
///
/// Generic types append their arguments: `my_crate::Pair<u8, alloc::string::String>`.
pub(crate) fn impl_trait_type_path(data: &EntityDerive) -> TokenStream {
    let mk = &data.mk_access;
    let type_path_ = crate::path::type_path_(mk);
    let ident = data.ident;
    let (impl_generics, ty_generics, where_clause) = data.split_generics();

    let (base_path, module_path) = data.base_path();
    let base_name = data.base_name();

    let (type_path, type_name) = if data.is_generic() {
        let concat_ = quote!(#mk::impls::concat);
        let params = data.type_params().collect::<Vec<_>>();
        let path_args = params.iter().enumerate().map(|(i, param)| {
            let sep = if i == 0 { quote!() } else { quote!(", ",) };
            quote!(#sep <#param as #type_path_>::type_path(),)
        });
        let name_args = params.iter().enumerate().map(|(i, param)| {
            let sep = if i == 0 { quote!() } else { quote!(", ",) };
            quote!(#sep <#param as #type_path_>::type_name(),)
        });
        (
            static_path_cell(mk, quote!(#concat_(&[#base_path, "<", #(#path_args)* ">"]))),
            static_path_cell(mk, quote!(#concat_(&[#base_name, "<", #(#name_args)* ">"]))),
        )
    } else {
        (base_path, quote!(#base_name))
    };

    quote! {
        impl #impl_generics #type_path_ for #ident #ty_generics #where_clause {
            fn type_path() -> &'static str {
                #type_path
            }

            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                #module_path
            }
        }
    }
}
