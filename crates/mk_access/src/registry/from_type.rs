use crate::info::Typed;

/// Builds a [`TypeTrait`](crate::registry::TypeTrait) for the type `T`.
///
/// ```ignore
/// meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
/// ```
pub trait FromType<T: Typed> {
    fn from_type() -> Self;
}
