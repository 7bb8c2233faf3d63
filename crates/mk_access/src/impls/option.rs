use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{OptionInfo, TypeInfo, TypePath, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault, TypeTraitList};
use crate::value::{Value, impl_value_cast_fn};

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("core::option")
    }
}

impl<T: Value + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionInfo::new::<T>()))
    }
}

impl<T: Value + Typed> Value for Option<T> {
    impl_value_cast_fn!();

    #[inline]
    fn set(&mut self, value: Box<dyn Value>) -> Result<(), Box<dyn Value>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    fn value_eq(&self, other: &dyn Value) -> Option<bool> {
        match (self, other.downcast_ref::<Self>()) {
            (None, Some(None)) => Some(true),
            (Some(a), Some(Some(b))) => a.value_eq(b),
            _ => Some(false),
        }
    }

    fn clone_value(&self) -> Option<Box<dyn Value>> {
        let cloned = match self {
            None => None::<T>,
            Some(value) => Some(value.clone_value()?.take::<T>().ok()?),
        };
        Some(Box::new(cloned))
    }

    /// `None` renders as empty text, which coercion reads back as `None`.
    fn to_text(&self) -> Option<String> {
        match self {
            None => Some(String::new()),
            Some(value) => value.to_text(),
        }
    }

    fn value_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            None => f.write_str("None"),
            Some(value) => {
                f.write_str("Some(")?;
                value.value_debug(f)?;
                f.write_str(")")
            }
        }
    }
}

impl<T: Value + GetTypeMeta> GetTypeMeta for Option<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::with_capacity::<Self>(2);
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta.insert_trait::<TypeTraitList>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::value::Value;

    #[test]
    fn option_equality_and_text() {
        let some: Box<dyn Value> = Box::new(Some(3_u8));
        let none: Box<dyn Value> = Box::new(None::<u8>);
        assert_eq!(some.value_eq(&Some(3_u8)), Some(true));
        assert_eq!(some.value_eq(&*none), Some(false));
        assert_eq!(none.to_text().as_deref(), Some(""));
        assert_eq!(some.to_text().as_deref(), Some("3"));

        let copy = some.clone_value().unwrap();
        assert_eq!(copy.take::<Option<u8>>().ok(), Some(Some(3)));
        assert_eq!(None::<String>.to_text().as_deref(), Some(""));
    }
}
