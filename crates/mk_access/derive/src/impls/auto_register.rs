use proc_macro2::TokenStream;

use crate::entity_data::EntityDerive;

/// Generates the `inventory` submission for `#[entity(auto_register)]`.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(data: &EntityDerive) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = data.attrs.auto_register else {
        return TokenStream::new();
    };
    // One submission per type; a generic type has no single instantiation to submit.
    if data.is_generic() {
        return TokenStream::new();
    }

    let auto_register_ = crate::path::auto_register_(&data.mk_access);
    let ident = data.ident;

    quote_spanned! { span =>
        #auto_register_::inventory::submit!{
            #auto_register_::__AutoRegisterFunc(
                <#ident as #auto_register_::__RegisterType>::__register
            )
        }
    }
}

#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &EntityDerive) -> TokenStream {
    TokenStream::new()
}
