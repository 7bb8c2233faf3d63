use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;

use crate::attributes::{MapAttribute, Mode};
use crate::entity_data::{EntityDerive, EntityField};

/// Generates `Typed`, building the `EntityInfo` with one `MemberInfo` per member.
pub(crate) fn impl_trait_typed(data: &EntityDerive) -> TokenStream {
    let mk = &data.mk_access;
    let typed_ = crate::path::typed_(mk);
    let type_info_ = crate::path::type_info_(mk);
    let entity_info_ = crate::path::entity_info_(mk);
    let ident = data.ident;
    let (impl_generics, ty_generics, where_clause) = data.split_generics();

    let members = data.members().map(|field| member_info(data, field));

    let build = quote! {
        #type_info_::Entity(#entity_info_::new::<Self>(&[
            #(#members,)*
        ]))
    };

    let body = if data.is_generic() {
        let cell_ = crate::path::generic_type_info_cell_(mk);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_insert::<Self>(|| #build)
        }
    } else {
        let cell_ = crate::path::non_generic_type_info_cell_(mk);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_init(|| #build)
        }
    };

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #type_info_ {
                #body
            }
        }
    }
}

fn member_info(data: &EntityDerive, field: &EntityField) -> TokenStream {
    let mk = &data.mk_access;
    let member_info_ = crate::path::member_info_(mk);
    let mapping_mode_ = crate::path::mapping_mode_(mk);

    let index = field.index.unwrap_or_default();
    let name = field.name_lit();
    let ty = field.ty;

    let mode = match field.mode() {
        Mode::ReadWrite => quote!(),
        mode => {
            let mode = mode.ident();
            quote!(.with_mode(#mapping_mode_::#mode))
        }
    };

    let tags = field.attrs.maps.iter().map(|map| mapping_tag(data, map));
    let native = native_access(data, field);

    quote_spanned! { ty.span() =>
        #member_info_::new::<Self, #ty>(#index, #name)
            #mode
            #(#tags)*
            .with_native(#native)
    }
}

fn mapping_tag(data: &EntityDerive, map: &MapAttribute) -> TokenStream {
    let mapping_tag_ = crate::path::mapping_tag_(&data.mk_access);
    let mapping_mode_ = crate::path::mapping_mode_(&data.mk_access);
    let kind = &map.kind;

    let name = map.name.as_ref().map(|name| quote!(.with_name(#name)));
    let mode = map.mode.map(|mode| {
        let mode = mode.ident();
        quote!(.with_mode(#mapping_mode_::#mode))
    });
    let index = map.index.as_ref().map(|index| {
        // Validated while parsing.
        let index = index.base10_parse::<usize>().unwrap_or_default();
        quote!(.with_index(#index))
    });
    let required = map.required.then(|| quote!(.with_required(true)));

    quote_spanned! { kind.span() =>
        .with_tag::<#kind>(#mapping_tag_::new() #name #mode #index #required)
    }
}

/// The generated getter and setter of one member.
///
/// A read-only member gets no setter and a write-only member no getter.
fn native_access(data: &EntityDerive, field: &EntityField) -> TokenStream {
    let mk = &data.mk_access;
    let native_access_ = crate::path::native_access_(mk);
    let value_ = crate::path::value_(mk);
    let ident = field.ident;
    let ty = field.ty;
    let mode = field.mode();

    let getter = mode.readable().then(|| {
        quote! {
            .with_getter(|__this| {
                match __this.downcast_ref::<Self>() {
                    ::core::option::Option::Some(__this) => {
                        ::core::option::Option::Some(&__this.#ident as &dyn #value_)
                    }
                    ::core::option::Option::None => ::core::option::Option::None,
                }
            })
        }
    });

    let setter = mode.writable().then(|| {
        quote! {
            .with_setter(|__this, __value| {
                match __this.downcast_mut::<Self>() {
                    ::core::option::Option::Some(__this) => {
                        __this.#ident = __value.take::<#ty>()?;
                        ::core::result::Result::Ok(())
                    }
                    ::core::option::Option::None => ::core::result::Result::Err(__value),
                }
            })
        }
    });

    quote! {
        #native_access_::new() #getter #setter
    }
}
