use crate::info::{TypeInfo, TypePath};

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to the [`TypeInfo`] of a type.
///
/// Implemented by `#[derive(Entity)]` and for every built-in value type.
/// The info is built once and lives for the rest of the program, see
/// [`NonGenericTypeInfoCell`] and [`GenericTypeInfoCell`].
///
/// # Examples
///
/// ```
/// use mk_access::info::{Typed, TypeKind};
///
/// assert_eq!(<Option<u32>>::type_info().kind(), TypeKind::Optional);
/// ```
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: TypePath {
    /// Returns the type information.
    ///
    /// Use [`DynamicTyped`] to reach it from a trait object.
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// DynamicTyped

/// Dynamic dispatch for [`Typed`].
///
/// Implemented for every `T: Typed`.
pub trait DynamicTyped {
    /// See [`Typed::type_info`].
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        Self::type_info()
    }
}
