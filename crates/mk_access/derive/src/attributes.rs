//! Parsing of `#[entity(...)]` attributes.

use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Ident, LitInt, LitStr, Token, parenthesized};

use crate::ENTITY_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Access mode

/// The three spellings of `MappingMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

impl Mode {
    fn parse(ident: &Ident) -> syn::Result<Self> {
        match ident.to_string().as_str() {
            "ReadWrite" => Ok(Self::ReadWrite),
            "ReadOnly" => Ok(Self::ReadOnly),
            "WriteOnly" => Ok(Self::WriteOnly),
            _ => Err(syn::Error::new(
                ident.span(),
                "expected `ReadWrite`, `ReadOnly` or `WriteOnly`",
            )),
        }
    }

    pub fn ident(self) -> Ident {
        let name = match self {
            Self::ReadWrite => "ReadWrite",
            Self::ReadOnly => "ReadOnly",
            Self::WriteOnly => "WriteOnly",
        };
        Ident::new(name, Span::call_site())
    }

    #[inline]
    pub fn readable(self) -> bool {
        self != Self::WriteOnly
    }

    #[inline]
    pub fn writable(self) -> bool {
        self != Self::ReadOnly
    }
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Type-level attributes.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub default: Option<Span>,
    pub clone: Option<Span>,
    pub auto_register: Option<Span>,
    pub type_path: Option<LitStr>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(ENTITY_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| this.parse_meta(&meta))?;
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.span();
        if meta.path.is_ident("default") {
            set_flag(&mut self.default, span, "default")
        } else if meta.path.is_ident("clone") {
            set_flag(&mut self.clone, span, "clone")
        } else if meta.path.is_ident("auto_register") {
            set_flag(&mut self.auto_register, span, "auto_register")
        } else if meta.path.is_ident("type_path") {
            if self.type_path.is_some() {
                return Err(meta.error("duplicate `type_path`"));
            }
            let lit: LitStr = meta.value()?.parse()?;
            let path = lit.value();
            if path.is_empty() || path.contains(['<', '>', ' ']) {
                return Err(syn::Error::new(
                    lit.span(),
                    "`type_path` must be a plain path such as \"my_crate::Foo\"; generics are appended automatically",
                ));
            }
            self.type_path = Some(lit);
            Ok(())
        } else {
            Err(meta.error("unknown type attribute, expected `default`, `clone`, `auto_register` or `type_path`"))
        }
    }
}

fn set_flag(flag: &mut Option<Span>, span: Span, name: &str) -> syn::Result<()> {
    if flag.is_some() {
        return Err(syn::Error::new(span, format!("duplicate `{name}`")));
    }
    *flag = Some(span);
    Ok(())
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// One `map(Kind, ...)` entry.
pub(crate) struct MapAttribute {
    pub kind: syn::Path,
    pub name: Option<LitStr>,
    pub mode: Option<Mode>,
    pub index: Option<LitInt>,
    pub required: bool,
}

impl MapAttribute {
    fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        let content;
        parenthesized!(content in meta.input);

        let mut this = Self {
            kind: content.parse()?,
            name: None,
            mode: None,
            index: None,
            required: false,
        };

        while !content.is_empty() {
            content.parse::<Token![,]>()?;
            if content.is_empty() {
                break;
            }
            let key = content.call(Ident::parse_any)?;
            match key.to_string().as_str() {
                "name" => {
                    content.parse::<Token![=]>()?;
                    this.name = Some(content.parse()?);
                }
                "mode" => {
                    content.parse::<Token![=]>()?;
                    this.mode = Some(Mode::parse(&content.parse()?)?);
                }
                "index" => {
                    content.parse::<Token![=]>()?;
                    let index: LitInt = content.parse()?;
                    index.base10_parse::<usize>()?;
                    this.index = Some(index);
                }
                "required" => this.required = true,
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        "unknown mapping key, expected `name`, `mode`, `index` or `required`",
                    ));
                }
            }
        }
        Ok(this)
    }
}

/// Field-level attributes.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub skip: Option<Span>,
    pub read_only: Option<Span>,
    pub write_only: Option<Span>,
    pub maps: Vec<MapAttribute>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(ENTITY_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| this.parse_meta(&meta))?;
        }
        if let (Some(_), Some(span)) = (this.read_only, this.write_only) {
            return Err(syn::Error::new(span, "a member cannot be both `read_only` and `write_only`"));
        }
        if let Some(span) = this.skip
            && (this.read_only.is_some() || this.write_only.is_some() || !this.maps.is_empty())
        {
            return Err(syn::Error::new(span, "a skipped field takes no other attribute"));
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.span();
        if meta.path.is_ident("skip") {
            set_flag(&mut self.skip, span, "skip")
        } else if meta.path.is_ident("read_only") {
            set_flag(&mut self.read_only, span, "read_only")
        } else if meta.path.is_ident("write_only") {
            set_flag(&mut self.write_only, span, "write_only")
        } else if meta.path.is_ident("map") {
            self.maps.push(MapAttribute::parse(meta)?);
            Ok(())
        } else {
            Err(meta.error(
                "unknown field attribute, expected `skip`, `read_only`, `write_only` or `map(..)`",
            ))
        }
    }

    /// Returns the member-level mode.
    pub fn mode(&self) -> Mode {
        match (self.read_only, self.write_only) {
            (Some(_), _) => Mode::ReadOnly,
            (_, Some(_)) => Mode::WriteOnly,
            _ => Mode::ReadWrite,
        }
    }
}
