use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{ListInfo, TypeInfo, TypePath, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault, TypeTraitList};
use crate::value::{List, Value, impl_value_cast_fn};

impl<T: TypePath> TypePath for Vec<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::vec::Vec<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Vec<", T::type_name(), ">"]))
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::vec")
    }
}

impl<T: Value + Typed> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
    }
}

impl<T: Value + Typed> Value for Vec<T> {
    impl_value_cast_fn!();

    #[inline]
    fn set(&mut self, value: Box<dyn Value>) -> Result<(), Box<dyn Value>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    fn value_eq(&self, other: &dyn Value) -> Option<bool> {
        let Some(other) = other.downcast_ref::<Self>() else {
            return Some(false);
        };
        if self.len() != other.len() {
            return Some(false);
        }
        for (a, b) in self.iter().zip(other) {
            match a.value_eq(b) {
                Some(true) => {}
                res => return res,
            }
        }
        Some(true)
    }

    fn clone_value(&self) -> Option<Box<dyn Value>> {
        let cloned = self
            .iter()
            .map(|item| item.clone_value()?.take::<T>().ok())
            .collect::<Option<Vec<T>>>()?;
        Some(Box::new(cloned))
    }

    fn value_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|item| item as &dyn Value))
            .finish()
    }
}

impl<T: Value + Typed> List for Vec<T> {
    #[inline]
    fn element_info(&self) -> &'static TypeInfo {
        T::type_info()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Value> {
        self.as_slice().get(index).map(|item| item as &dyn Value)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Value> {
        self.as_mut_slice().get_mut(index).map(|item| item as &mut dyn Value)
    }

    fn push(&mut self, value: Box<dyn Value>) -> Result<(), Box<dyn Value>> {
        Vec::push(self, value.take::<T>()?);
        Ok(())
    }

    #[inline]
    fn pop(&mut self) -> Option<Box<dyn Value>> {
        Vec::pop(self).map(|item| Box::new(item) as Box<dyn Value>)
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<T: Value + GetTypeMeta> GetTypeMeta for Vec<T> {
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
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::info::TypePath;
    use crate::value::{List, Value};

    #[test]
    fn vec_is_a_list() {
        let mut list: Box<dyn List> = Box::new(Vec::<i32>::new());
        list.push(Box::new(4_i32)).unwrap();
        list.push(Box::new(5_i32)).unwrap();
        assert!(list.push(Box::new(5_u32)).is_err());
        assert_eq!(list.len(), 2);
        assert_eq!(list.element_info().type_path(), "i32");
        assert_eq!(list.iter().filter_map(|v| v.downcast_ref::<i32>()).sum::<i32>(), 9);
        assert_eq!(list.pop().and_then(|v| v.take::<i32>().ok()), Some(5));
    }

    #[test]
    fn vec_equality_is_elementwise() {
        let a = vec![1_u8, 2];
        assert_eq!(a.value_eq(&vec![1_u8, 2]), Some(true));
        assert_eq!(a.value_eq(&vec![1_u8]), Some(false));
        assert_eq!(<Vec<Vec<u8>>>::type_name(), "Vec<Vec<u8>>");
    }
}
