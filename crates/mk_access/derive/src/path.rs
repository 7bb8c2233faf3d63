//! Paths used by generated code.
//!
//! Everything is reached through the `mk_access` crate path, so that the
//! generated code works for dependents of `mk_access` and of the `mapkit`
//! facade alike.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Returns how the caller names the `mk_access` crate.
///
/// Reads the caller's `Cargo.toml`; call once per derive and pass the result around.
pub(crate) fn mk_access() -> syn::Path {
    mk_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("mk_access"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn macro_utils_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::__macro_exports::macro_utils)
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::__macro_exports::auto_register)
}

#[inline(always)]
pub(crate) fn value_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::value::Value)
}

#[inline(always)]
pub(crate) fn entity_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::value::Entity)
}

#[inline(always)]
pub(crate) fn type_path_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::info::TypePath)
}

#[inline(always)]
pub(crate) fn typed_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::info::Typed)
}

#[inline(always)]
pub(crate) fn type_info_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::info::TypeInfo)
}

#[inline(always)]
pub(crate) fn entity_info_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::info::EntityInfo)
}

#[inline(always)]
pub(crate) fn member_info_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::info::MemberInfo)
}

#[inline(always)]
pub(crate) fn native_access_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::info::NativeAccess)
}

#[inline(always)]
pub(crate) fn mapping_tag_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::mapping::MappingTag)
}

#[inline(always)]
pub(crate) fn mapping_mode_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::mapping::MappingMode)
}

#[inline(always)]
pub(crate) fn get_type_meta_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::registry::GetTypeMeta)
}

#[inline(always)]
pub(crate) fn type_meta_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::registry::TypeMeta)
}

#[inline(always)]
pub(crate) fn type_registry_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::registry::TypeRegistry)
}

#[inline(always)]
pub(crate) fn from_type_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::registry::FromType)
}

#[inline(always)]
pub(crate) fn type_trait_default_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::registry::TypeTraitDefault)
}

#[inline(always)]
pub(crate) fn type_trait_list_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::registry::TypeTraitList)
}

#[inline(always)]
pub(crate) fn non_generic_type_info_cell_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::impls::NonGenericTypeInfoCell)
}

#[inline(always)]
pub(crate) fn generic_type_info_cell_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::impls::GenericTypeInfoCell)
}

#[inline(always)]
pub(crate) fn generic_type_path_cell_(mk_access: &syn::Path) -> TokenStream {
    quote!(#mk_access::impls::GenericTypePathCell)
}
