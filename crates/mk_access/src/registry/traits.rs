use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::info::Typed;
use crate::registry::FromType;
use crate::value::{List, Value};

// -----------------------------------------------------------------------------
// TypeTraitDefault

/// Creates a default instance of a registered type.
///
/// Attached to entities declared with `#[entity(default)]` and to every
/// built-in value type.
#[derive(Clone)]
pub struct TypeTraitDefault {
    func: fn() -> Box<dyn Value>,
}

impl TypeTraitDefault {
    /// Returns a new default instance.
    #[inline(always)]
    pub fn default(&self) -> Box<dyn Value> {
        (self.func)()
    }
}

impl<T: Default + Typed + Value> FromType<T> for TypeTraitDefault {
    fn from_type() -> Self {
        Self {
            func: || Box::<T>::default(),
        }
    }
}

impl fmt::Debug for TypeTraitDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTraitDefault")
    }
}

// -----------------------------------------------------------------------------
// TypeTraitList

/// Creates an empty `Vec<T>` of a registered element type `T`.
#[derive(Clone)]
pub struct TypeTraitList {
    func: fn() -> Box<dyn List>,
}

impl TypeTraitList {
    /// Returns a new empty list.
    #[inline(always)]
    pub fn new_list(&self) -> Box<dyn List> {
        (self.func)()
    }
}

impl<T: Typed + Value> FromType<T> for TypeTraitList {
    fn from_type() -> Self {
        Self {
            func: || Box::new(Vec::<T>::new()),
        }
    }
}

impl fmt::Debug for TypeTraitList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTraitList")
    }
}
