use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypePath

/// Stable names for a type.
///
/// Unlike [`core::any::type_name`], the result does not depend on the
/// compiler version. Names never start with `::`.
///
/// - [`type_path`](TypePath::type_path): unique, including module path and generics.
/// - [`type_name`](TypePath::type_name): without module path, may be duplicated.
///
/// Implemented by `#[derive(Entity)]` and for every built-in value type.
///
/// # Examples
///
/// ```
/// use mk_access::info::TypePath;
///
/// assert_eq!(<Option<i32>>::type_path(), "core::option::Option<i32>");
/// assert_eq!(<Vec<String>>::type_name(), "Vec<String>");
/// ```
pub trait TypePath: 'static {
    /// Returns the full path of the type, e.g. `my_crate::model::Point`.
    fn type_path() -> &'static str;

    /// Returns the path without module, e.g. `Point`.
    fn type_name() -> &'static str;

    /// Returns the module path, if the type has one.
    fn module_path() -> Option<&'static str> {
        None
    }
}

// -----------------------------------------------------------------------------
// DynamicTypePath

/// Dynamic dispatch for [`TypePath`].
///
/// Implemented for every `T: TypePath`.
pub trait DynamicTypePath {
    /// See [`TypePath::type_path`].
    fn reflect_type_path(&self) -> &'static str;

    /// See [`TypePath::type_name`].
    fn reflect_type_name(&self) -> &'static str;
}

impl<T: TypePath> DynamicTypePath for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        Self::type_path()
    }

    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        Self::type_name()
    }
}

// -----------------------------------------------------------------------------
// Type

/// A [`TypeId`] together with the type's [`TypePath`] functions.
///
/// Equality and hashing only use the `TypeId`.
#[derive(Copy, Clone)]
pub struct Type {
    type_id: TypeId,
    type_path: fn() -> &'static str,
    type_name: fn() -> &'static str,
}

impl Type {
    /// Returns the `Type` of `T`.
    #[inline]
    pub const fn of<T: TypePath>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: T::type_path,
            type_name: T::type_name,
        }
    }

    /// Returns the `TypeId`.
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.type_id
    }

    /// Returns `true` if this is the type `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }

    /// Returns the full type path.
    #[inline]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    /// Returns the type name.
    #[inline]
    pub fn name(&self) -> &'static str {
        (self.type_name)()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implements `ty`, `type_id`, `type_is`, `type_path` and `type_name`
/// for an info struct holding a [`Type`] in `$field`.
macro_rules! impl_type_fn {
    ($field:ident) => {
        /// Returns the underlying [`Type`](crate::info::Type).
        #[inline(always)]
        pub const fn ty(&self) -> &$crate::info::Type {
            &self.$field
        }

        /// Returns the `TypeId`.
        #[inline]
        pub const fn type_id(&self) -> ::core::any::TypeId {
            self.$field.id()
        }

        /// Returns `true` if the described type is `T`.
        #[inline]
        pub fn type_is<T: ::core::any::Any>(&self) -> bool {
            self.$field.is::<T>()
        }

        /// Returns the full type path.
        #[inline]
        pub fn type_path(&self) -> &'static str {
            self.$field.path()
        }

        /// Returns the type name.
        #[inline]
        pub fn type_name(&self) -> &'static str {
            self.$field.name()
        }
    };
}

pub(crate) use impl_type_fn;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{Type, TypePath};

    #[test]
    fn generic_paths_nest() {
        assert_eq!(<Vec<Option<u8>>>::type_path(), "alloc::vec::Vec<core::option::Option<u8>>");
        assert_eq!(<Vec<Option<u8>>>::type_name(), "Vec<Option<u8>>");
        assert_eq!(String::module_path(), Some("alloc::string"));
    }

    #[test]
    fn type_equality_uses_type_id() {
        assert_eq!(Type::of::<i32>(), Type::of::<i32>());
        assert_ne!(Type::of::<i32>(), Type::of::<u32>());
        assert!(Type::of::<String>().is::<String>());
        assert_eq!(Type::of::<String>().name(), "String");
    }
}
