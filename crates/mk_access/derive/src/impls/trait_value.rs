use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::entity_data::EntityDerive;

/// Generates `Value`.
///
/// Equality and debug formatting go member by member. `clone_value` uses
/// `Clone` when the type declares `clone`, and otherwise clones member by
/// member, which is only possible when no field is skipped.
pub(crate) fn impl_trait_value(data: &EntityDerive) -> TokenStream {
    let mk = &data.mk_access;
    let value_ = crate::path::value_(mk);
    let entity_ = crate::path::entity_(mk);
    let macro_utils_ = crate::path::macro_utils_(mk);
    let ident = data.ident;
    let (impl_generics, ty_generics, where_clause) = data.split_generics();

    let clone_value = match data.attrs.clone {
        Some(span) => quote_spanned! { span =>
            #[inline]
            fn clone_value(&self) -> ::core::option::Option<#macro_utils_::Box<dyn #value_>> {
                ::core::option::Option::Some(#macro_utils_::Box::new(<Self as ::core::clone::Clone>::clone(self)))
            }
        },
        None if data.has_skipped() => quote!(),
        None => {
            let fields = data.members().map(|field| {
                let ident = field.ident;
                let ty = field.ty;
                quote! {
                    #ident: #value_::clone_value(&self.#ident)?.take::<#ty>().ok()?
                }
            });
            quote! {
                fn clone_value(&self) -> ::core::option::Option<#macro_utils_::Box<dyn #value_>> {
                    ::core::option::Option::Some(#macro_utils_::Box::new(Self {
                        #(#fields,)*
                    }))
                }
            }
        }
    };

    quote! {
        impl #impl_generics #value_ for #ident #ty_generics #where_clause {
            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            #[inline]
            fn into_any(self: #macro_utils_::Box<Self>) -> #macro_utils_::Box<dyn ::core::any::Any> {
                self
            }

            #[inline]
            fn as_value(&self) -> &dyn #value_ {
                self
            }

            #[inline]
            fn as_value_mut(&mut self) -> &mut dyn #value_ {
                self
            }

            #[inline]
            fn into_value(self: #macro_utils_::Box<Self>) -> #macro_utils_::Box<dyn #value_> {
                self
            }

            #[inline]
            fn as_entity(&self) -> ::core::option::Option<&dyn #entity_> {
                ::core::option::Option::Some(self)
            }

            #[inline]
            fn as_entity_mut(&mut self) -> ::core::option::Option<&mut dyn #entity_> {
                ::core::option::Option::Some(self)
            }

            #[inline]
            fn into_entity(
                self: #macro_utils_::Box<Self>,
            ) -> ::core::result::Result<#macro_utils_::Box<dyn #entity_>, #macro_utils_::Box<dyn #value_>> {
                ::core::result::Result::Ok(self)
            }

            #[inline]
            fn set(
                &mut self,
                value: #macro_utils_::Box<dyn #value_>,
            ) -> ::core::result::Result<(), #macro_utils_::Box<dyn #value_>> {
                *self = value.take::<Self>()?;
                ::core::result::Result::Ok(())
            }

            #[inline]
            fn value_eq(&self, other: &dyn #value_) -> ::core::option::Option<bool> {
                #mk::impls::entity_eq(self, other)
            }

            #clone_value

            #[inline]
            fn value_debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                #mk::impls::entity_debug(self, f)
            }
        }
    }
}
