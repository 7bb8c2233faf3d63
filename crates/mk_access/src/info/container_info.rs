use alloc::boxed::Box;
use core::fmt;

use crate::info::{Type, TypeInfo, TypePath, Typed, impl_type_fn};
use crate::value::Value;

// -----------------------------------------------------------------------------
// OptionInfo

type WrapFn = fn(Option<Box<dyn Value>>) -> Result<Box<dyn Value>, Box<dyn Value>>;

/// Information about `Option<T>`.
///
/// Besides the inner type, it knows how to build an `Option<T>` from a
/// boxed `T`, which coercion needs after parsing the inner value.
#[derive(Clone)]
pub struct OptionInfo {
    ty: Type,
    inner_ty: Type,
    inner_info: fn() -> &'static TypeInfo,
    wrap: WrapFn,
}

impl OptionInfo {
    impl_type_fn!(ty);

    /// Creates the info of `Option<T>`.
    pub fn new<T: Value + Typed>() -> Self {
        Self {
            ty: Type::of::<Option<T>>(),
            inner_ty: Type::of::<T>(),
            inner_info: T::type_info,
            wrap: |inner| match inner {
                None => Ok(Box::new(None::<T>)),
                Some(value) => <dyn Value>::take::<T>(value).map(|v| Box::new(Some(v)) as Box<dyn Value>),
            },
        }
    }

    /// Returns the [`Type`] of `T`.
    #[inline]
    pub const fn inner_ty(&self) -> &Type {
        &self.inner_ty
    }

    /// Returns the [`TypeInfo`] of `T`.
    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner_info)()
    }

    /// Builds `Some(inner)` or `None`.
    ///
    /// Gives `inner` back if it is not a `T`.
    #[inline]
    pub fn wrap(&self, inner: Option<Box<dyn Value>>) -> Result<Box<dyn Value>, Box<dyn Value>> {
        (self.wrap)(inner)
    }
}

impl fmt::Debug for OptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionInfo")
            .field("ty", &self.ty)
            .field("inner", &self.inner_ty)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ListInfo

/// Information about a homogeneous list such as `Vec<T>`.
#[derive(Clone)]
pub struct ListInfo {
    ty: Type,
    element_ty: Type,
    element_info: fn() -> &'static TypeInfo,
}

impl ListInfo {
    impl_type_fn!(ty);

    /// Creates the info of list type `L` holding `T`.
    pub fn new<L: TypePath, T: Typed>() -> Self {
        Self {
            ty: Type::of::<L>(),
            element_ty: Type::of::<T>(),
            element_info: T::type_info,
        }
    }

    /// Returns the element [`Type`].
    #[inline]
    pub const fn element_ty(&self) -> &Type {
        &self.element_ty
    }

    /// Returns the element [`TypeInfo`].
    #[inline]
    pub fn element_info(&self) -> &'static TypeInfo {
        (self.element_info)()
    }
}

impl fmt::Debug for ListInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListInfo")
            .field("ty", &self.ty)
            .field("element", &self.element_ty)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// OpaqueInfo

/// A type without visible structure.
#[derive(Clone, Debug)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    impl_type_fn!(ty);

    /// Creates the info of `T`.
    pub const fn new<T: TypePath>() -> Self {
        Self { ty: Type::of::<T>() }
    }
}
