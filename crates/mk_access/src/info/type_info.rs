use core::fmt;

use crate::info::{EntityInfo, ListInfo, OpaqueInfo, OptionInfo, ScalarInfo, Type};

// -----------------------------------------------------------------------------
// TypeKind

/// The shape of a [`TypeInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Entity,
    Scalar,
    Optional,
    List,
    Opaque,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeKind::Entity => "Entity",
            TypeKind::Scalar => "Scalar",
            TypeKind::Optional => "Optional",
            TypeKind::List => "List",
            TypeKind::Opaque => "Opaque",
        })
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information about a type, obtained from [`Typed`](crate::info::Typed).
#[derive(Debug)]
pub enum TypeInfo {
    Entity(EntityInfo),
    Scalar(ScalarInfo),
    Optional(OptionInfo),
    List(ListInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_cast_fn {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Returns the [`", stringify!($info), "`] if this is a `", stringify!($kind), "`.")]
        #[inline]
        pub const fn $name(&self) -> Option<&$info> {
            match self {
                Self::$kind(info) => Some(info),
                _ => None,
            }
        }
    };
}

impl TypeInfo {
    impl_cast_fn!(as_entity: Entity => EntityInfo);
    impl_cast_fn!(as_scalar: Scalar => ScalarInfo);
    impl_cast_fn!(as_optional: Optional => OptionInfo);
    impl_cast_fn!(as_list: List => ListInfo);

    /// Returns the underlying [`Type`].
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Entity(info) => info.ty(),
            Self::Scalar(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    /// Returns the `TypeId` of the described type.
    #[inline]
    pub const fn type_id(&self) -> core::any::TypeId {
        self.ty().id()
    }

    /// Returns `true` if the described type is `T`.
    #[inline]
    pub fn type_is<T: core::any::Any>(&self) -> bool {
        self.ty().is::<T>()
    }

    /// Returns the full type path.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    /// Returns the type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    /// Returns the kind of the described type.
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Entity(_) => TypeKind::Entity,
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Optional(_) => TypeKind::Optional,
            Self::List(_) => TypeKind::List,
            Self::Opaque(_) => TypeKind::Opaque,
        }
    }

    /// Describes the textual form accepted for this type, for error messages.
    pub fn grammar(&self) -> &'static str {
        match self {
            Self::Scalar(info) => info.kind().grammar(),
            Self::Optional(info) => info.inner_info().grammar(),
            Self::Entity(_) | Self::List(_) | Self::Opaque(_) => "a value with no textual form",
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::info::{TypeKind, Typed};

    #[test]
    fn grammar_sees_through_options() {
        let info = <Option<u16>>::type_info();
        assert_eq!(info.kind(), TypeKind::Optional);
        assert_eq!(info.grammar(), "an unsigned integer");
        assert!(info.as_optional().is_some());
        assert!(info.as_scalar().is_none());

        assert_eq!(<Vec<String>>::type_info().grammar(), "a value with no textual form");
    }
}
