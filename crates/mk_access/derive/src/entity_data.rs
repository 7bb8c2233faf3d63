//! The parsed form of a `#[derive(Entity)]` input.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Ident, LitStr, Type, WhereClause};

use crate::attributes::{FieldAttributes, Mode, TypeAttributes};

// -----------------------------------------------------------------------------
// EntityField

/// A named field of the input struct.
pub(crate) struct EntityField<'a> {
    pub ident: &'a Ident,
    /// The field name without `r#`.
    pub name: String,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
    /// Declaration index among members; `None` for skipped fields.
    pub index: Option<usize>,
}

impl EntityField<'_> {
    #[inline]
    pub fn is_member(&self) -> bool {
        self.index.is_some()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.attrs.mode()
    }

    pub fn name_lit(&self) -> LitStr {
        LitStr::new(&self.name, self.ident.span())
    }
}

// -----------------------------------------------------------------------------
// EntityDerive

/// Everything the generators need.
pub(crate) struct EntityDerive<'a> {
    pub mk_access: syn::Path,
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    pub fields: Vec<EntityField<'a>>,
}

impl<'a> EntityDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        check_generics(&input.generics)?;

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => &named.named,
                Fields::Unit => return Ok(Self::new(input, attrs, Vec::new())),
                Fields::Unnamed(unnamed) => {
                    return Err(syn::Error::new(
                        unnamed.span(),
                        "`Entity` cannot be derived for tuple structs, members need names",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span(),
                    "`Entity` cannot be derived for enums",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span(),
                    "`Entity` cannot be derived for unions",
                ));
            }
        };

        let mut parsed = Vec::with_capacity(fields.len());
        let mut next_index = 0;
        for field in fields {
            let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            let index = if attrs.skip.is_some() {
                None
            } else {
                next_index += 1;
                Some(next_index - 1)
            };
            let Some(ident) = field.ident.as_ref() else {
                return Err(syn::Error::new(field.span(), "expected a named field"));
            };
            parsed.push(EntityField {
                ident,
                name: ident.unraw().to_string(),
                ty: &field.ty,
                attrs,
                index,
            });
        }

        Ok(Self::new(input, attrs, parsed))
    }

    fn new(input: &'a DeriveInput, attrs: TypeAttributes, fields: Vec<EntityField<'a>>) -> Self {
        Self {
            mk_access: crate::path::mk_access(),
            ident: &input.ident,
            generics: &input.generics,
            attrs,
            fields,
        }
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// Iterates over the fields that are members, in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &EntityField<'a>> {
        self.fields.iter().filter(|field| field.is_member())
    }

    pub fn member_len(&self) -> usize {
        self.members().count()
    }

    pub fn has_skipped(&self) -> bool {
        self.fields.iter().any(|field| !field.is_member())
    }

    /// The type parameter identifiers, in declaration order.
    pub fn type_params(&self) -> impl Iterator<Item = &Ident> {
        self.generics.type_params().map(|param| &param.ident)
    }

    /// Returns `(impl_generics, ty_generics, where_clause)` where every type
    /// parameter is bounded by `Value + Typed + GetTypeMeta`.
    pub fn split_generics(&self) -> (TokenStream, TokenStream, WhereClause) {
        let mk = &self.mk_access;
        let value_ = crate::path::value_(mk);
        let typed_ = crate::path::typed_(mk);
        let get_type_meta_ = crate::path::get_type_meta_(mk);

        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let mut where_clause = where_clause.cloned().unwrap_or_else(|| WhereClause {
            where_token: Default::default(),
            predicates: Default::default(),
        });
        for param in self.type_params() {
            where_clause
                .predicates
                .push(syn::parse_quote!(#param: #value_ + #typed_ + #get_type_meta_));
        }

        (quote!(#impl_generics), quote!(#ty_generics), where_clause)
    }

    /// The literal used as the type path prefix, and the module path.
    ///
    /// Both are expressions of type `&'static str`.
    pub fn base_path(&self) -> (TokenStream, TokenStream) {
        let ident = self.ident.unraw().to_string();
        match &self.attrs.type_path {
            Some(lit) => {
                let path = lit.value();
                let module = match path.rsplit_once("::") {
                    Some((module, _)) => {
                        let module = LitStr::new(module, lit.span());
                        quote!(::core::option::Option::Some(#module))
                    }
                    None => quote!(::core::option::Option::None),
                };
                (quote!(#lit), module)
            }
            None => {
                let suffix = LitStr::new(&format!("::{ident}"), Span::call_site());
                (
                    quote!(::core::concat!(::core::module_path!(), #suffix)),
                    quote!(::core::option::Option::Some(::core::module_path!())),
                )
            }
        }
    }

    /// The short type name without generic arguments.
    pub fn base_name(&self) -> LitStr {
        match &self.attrs.type_path {
            Some(lit) => {
                let path = lit.value();
                let name = path.rsplit_once("::").map_or(path.as_str(), |(_, name)| name);
                LitStr::new(name, lit.span())
            }
            None => LitStr::new(&self.ident.unraw().to_string(), self.ident.span()),
        }
    }
}

fn check_generics(generics: &Generics) -> syn::Result<()> {
    for param in &generics.params {
        match param {
            GenericParam::Type(_) => {}
            GenericParam::Lifetime(param) => {
                return Err(syn::Error::new(
                    param.span(),
                    "`Entity` types must be `'static`, lifetime parameters are not supported",
                ));
            }
            GenericParam::Const(param) => {
                return Err(syn::Error::new(
                    param.span(),
                    "const parameters are not supported by `Entity`",
                ));
            }
        }
    }
    Ok(())
}
