//! Static storage for type information.
//!
//! - [`NonGenericTypeInfoCell`]: one [`TypeInfo`] per `static`, for non-generic types.
//! - [`GenericTypeInfoCell`] / [`GenericTypePathCell`]: a `static` inside a generic
//!   function is shared by every instantiation, so these store one entry per `TypeId`.
//!
//! Entries are leaked and live for the rest of the program.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};

use std::sync::{OnceLock, PoisonError, RwLock};

use mk_utils::TypeIdMap;

use crate::info::TypeInfo;

mod sealed {
    use super::TypeInfo;
    use alloc::string::String;

    pub trait TypedProperty: Send + Sync + 'static {}

    impl TypedProperty for String {}
    impl TypedProperty for TypeInfo {}
}

use sealed::TypedProperty;

// -----------------------------------------------------------------------------
// NonGenericTypeCell

/// Static storage for a non-generic type's property, see [`NonGenericTypeInfoCell`].
pub struct NonGenericTypeCell<T: TypedProperty>(OnceLock<T>);

/// Static storage for the [`TypeInfo`] of a non-generic type.
///
/// ```ignore
/// impl Typed for Celsius {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
/// ```
pub type NonGenericTypeInfoCell = NonGenericTypeCell<TypeInfo>;

impl<T: TypedProperty> NonGenericTypeCell<T> {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored value, initializing it with `f` on first use.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.0.get_or_init(f)
    }
}

impl<T: TypedProperty> Default for NonGenericTypeCell<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// Static storage keyed by `TypeId`, see [`GenericTypeInfoCell`].
pub struct GenericTypeCell<T: TypedProperty>(RwLock<TypeIdMap<&'static T>>);

/// Static storage for the [`TypeInfo`] of a generic type.
///
/// ```ignore
/// impl<T: Value + Typed> Typed for Option<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionInfo::new::<T>()))
///     }
/// }
/// ```
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Static storage for the type path or name of a generic type.
///
/// ```ignore
/// fn type_path() -> &'static str {
///     static CELL: GenericTypePathCell = GenericTypePathCell::new();
///     CELL.get_or_insert::<Self>(|| concat(&["alloc::vec::Vec<", T::type_path(), ">"]))
/// }
/// ```
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: TypedProperty> GenericTypeCell<T> {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the value stored for `G`, building it with `f` on first use.
    ///
    /// `f` runs without the lock held: nested generics (`Vec<Vec<u8>>`)
    /// reach the same `static` while building.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    fn get_by_type_id(&self, type_id: TypeId) -> Option<&T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[cold]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &T {
        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        // A racing thread may have won; the loser's value is dropped.
        *map.get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}

impl<T: TypedProperty> Default for GenericTypeCell<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::GenericTypePathCell;

    #[test]
    fn generic_cell_keeps_one_entry_per_type() {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        let a = CELL.get_or_insert::<u8>(|| String::from("u8"));
        let b = CELL.get_or_insert::<u8>(|| String::from("other"));
        let c = CELL.get_or_insert::<u16>(|| String::from("u16"));
        assert!(core::ptr::eq(a, b));
        assert_eq!(b, "u8");
        assert_eq!(c, "u16");
    }
}
