use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;
use core::ops::{Deref, DerefMut};

use mk_utils::TypeIdMap;

use crate::info::{Type, TypeInfo, Typed};
use crate::registry::{TypeRegistry, TypeTrait};

// -----------------------------------------------------------------------------
// TypeMeta

/// The registry entry of a type: its [`TypeInfo`] and its type traits.
///
/// # Examples
///
/// ```
/// use mk_access::registry::{TypeMeta, TypeTraitDefault, FromType};
///
/// let mut meta = TypeMeta::of::<u8>();
/// meta.insert_trait::<TypeTraitDefault>(FromType::<u8>::from_type());
///
/// let value = meta.get_trait::<TypeTraitDefault>().unwrap().default();
/// assert_eq!(value.take::<u8>().ok(), Some(0));
/// ```
pub struct TypeMeta {
    ty: Type,
    type_info: &'static TypeInfo,
    trait_table: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Creates a `TypeMeta` of `T` without type traits.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self::with_capacity::<T>(0)
    }

    /// Creates a `TypeMeta` of `T` with room for `capacity` type traits.
    #[inline]
    pub fn with_capacity<T: Typed>(capacity: usize) -> Self {
        let type_info = T::type_info();
        Self {
            ty: *type_info.ty(),
            type_info,
            trait_table: TypeIdMap::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    crate::info::impl_type_fn!(ty);

    /// Inserts a type trait, replacing any trait of the same type.
    #[inline(always)]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.insert_trait_by_id(TypeId::of::<T>(), Box::new(data));
    }

    #[inline(never)]
    fn insert_trait_by_id(&mut self, id: TypeId, val: Box<dyn TypeTrait>) {
        self.trait_table.insert(id, val);
    }

    /// Removes a type trait.
    pub fn remove_trait<T: TypeTrait>(&mut self) -> Option<Box<T>> {
        let removed = self.trait_table.remove(&TypeId::of::<T>())?;
        <Box<dyn Any>>::downcast::<T>(removed).ok()
    }

    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.trait_table
            .get(&TypeId::of::<T>())
            .and_then(|t| t.deref().downcast_ref())
    }

    #[inline]
    pub fn get_trait_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        self.trait_table
            .get_mut(&TypeId::of::<T>())
            .and_then(|t| t.deref_mut().downcast_mut())
    }

    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.trait_table.contains_type::<T>()
    }

    #[inline]
    pub fn trait_len(&self) -> usize {
        self.trait_table.len()
    }
}

impl Clone for TypeMeta {
    fn clone(&self) -> Self {
        let mut trait_table = TypeIdMap::with_capacity(self.trait_len());
        for (id, type_trait) in self.trait_table.iter() {
            trait_table.insert(*id, (**type_trait).clone_type_trait());
        }

        Self {
            ty: self.ty,
            type_info: self.type_info,
            trait_table,
        }
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("type_info", &self.type_info)
            .field("trait_table", &self.trait_table)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// Builds the [`TypeMeta`] of a type, used by [`TypeRegistry::register`].
///
/// Implemented by `#[derive(Entity)]` and for every built-in value type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `GetTypeMeta` so cannot be registered",
    note = "consider annotating `{Self}` with `#[derive(Entity)]`"
)]
pub trait GetTypeMeta: Typed {
    /// Returns the registry entry for this type.
    fn get_type_meta() -> TypeMeta;

    /// Registers the types this type depends on, such as member types.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
