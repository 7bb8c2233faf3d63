use alloc::boxed::Box;
use alloc::format;
use core::any::TypeId;

use crate::registry::{TypeRegistry, TypeTraitDefault, TypeTraitList};
use crate::value::{List, Value};
use crate::{AccessError, AccessResult};

pub(crate) fn unknown_type(type_id: TypeId) -> AccessError {
    AccessError::UnknownType {
        ty: format!("{type_id:?}"),
    }
}

impl TypeRegistry {
    /// Creates an instance of a registered type with its default constructor.
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnknownType`] if the type is not registered.
    /// - [`AccessError::NoDefaultConstructor`] if it has no [`TypeTraitDefault`],
    ///   e.g. an entity without `#[entity(default)]`.
    pub fn new_instance(&self, type_id: TypeId) -> AccessResult<Box<dyn Value>> {
        let meta = self.get(type_id).ok_or_else(|| unknown_type(type_id))?;
        match meta.get_trait::<TypeTraitDefault>() {
            Some(ctor) => Ok(ctor.default()),
            None => Err(AccessError::NoDefaultConstructor {
                ty: meta.type_path(),
            }),
        }
    }

    /// Creates an empty list of a registered element type.
    ///
    /// The list accepts only values of exactly that type.
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnknownType`] if the element type is not registered.
    /// - [`AccessError::NoListConstructor`] if it has no [`TypeTraitList`].
    pub fn new_list(&self, element: TypeId) -> AccessResult<Box<dyn List>> {
        let meta = self.get(element).ok_or_else(|| unknown_type(element))?;
        match meta.get_trait::<TypeTraitList>() {
            Some(ctor) => Ok(ctor.new_list()),
            None => Err(AccessError::NoListConstructor {
                ty: meta.type_path(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use crate::AccessError;
    use crate::registry::{TypeMeta, TypeRegistry};

    #[test]
    fn instances_and_lists_of_scalars() {
        let registry = TypeRegistry::new();
        let value = registry.new_instance(TypeId::of::<String>()).unwrap();
        assert_eq!(value.take::<String>().ok().as_deref(), Some(""));

        let mut list = registry.new_list(TypeId::of::<u16>()).unwrap();
        list.push(Box::new(9_u16)).unwrap();
        let rejected = list.push(Box::new(9_u32)).unwrap_err();
        assert!(rejected.is::<u32>());
        assert_eq!(list.into_value().take::<Vec<u16>>().ok(), Some(Vec::from([9])));
    }

    #[test]
    fn missing_constructors_are_reported() {
        let mut registry = TypeRegistry::empty();
        assert!(matches!(
            registry.new_instance(TypeId::of::<u8>()),
            Err(AccessError::UnknownType { .. })
        ));

        registry.insert_type_meta(TypeMeta::of::<u8>());
        assert_eq!(
            registry.new_instance(TypeId::of::<u8>()).err(),
            Some(AccessError::NoDefaultConstructor { ty: "u8" })
        );
        assert_eq!(
            registry.new_list(TypeId::of::<u8>()).err(),
            Some(AccessError::NoListConstructor { ty: "u8" })
        );
    }
}
