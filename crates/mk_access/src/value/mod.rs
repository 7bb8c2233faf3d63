//! Runtime values the engine reads and writes.
//!
//! - [`Value`]: any bindable value, used through `dyn Value`.
//! - [`Entity`]: a value with named members.
//! - [`List`]: a homogeneous, growable list of values.

// -----------------------------------------------------------------------------
// Modules

mod entity;
mod list;

// -----------------------------------------------------------------------------
// Exports

pub use entity::Entity;
pub use list::List;

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{DynamicTypePath, DynamicTyped};

// -----------------------------------------------------------------------------
// Value

/// A value that can be stored in a member, a list or an accessor result.
///
/// Implemented for scalars (`bool`, integers, floats, `char`, `String`,
/// `chrono` dates and times), `Option<T>`, `Vec<T>` and every
/// `#[derive(Entity)]` type.
///
/// # Examples
///
/// ```
/// use mk_access::value::Value;
///
/// let boxed: Box<dyn Value> = Box::new(42_i32);
/// assert!(boxed.is::<i32>());
/// assert_eq!(boxed.to_text().as_deref(), Some("42"));
/// assert_eq!(boxed.take::<i32>().ok(), Some(42));
/// ```
pub trait Value: DynamicTypePath + DynamicTyped + Any + Send + Sync {
    /// Casts this type to a type-erased [`Any`] reference.
    fn as_any(&self) -> &dyn Any;

    /// Casts this type to a type-erased mutable [`Any`] reference.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Casts this type to a boxed type-erased [`Any`].
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Casts this type to a [`Value`] reference.
    fn as_value(&self) -> &dyn Value;

    /// Casts this type to a mutable [`Value`] reference.
    fn as_value_mut(&mut self) -> &mut dyn Value;

    /// Casts this type to a boxed [`Value`].
    fn into_value(self: Box<Self>) -> Box<dyn Value>;

    /// Returns this value as an [`Entity`], if it is one.
    #[inline]
    fn as_entity(&self) -> Option<&dyn Entity> {
        None
    }

    /// Returns this value as a mutable [`Entity`], if it is one.
    #[inline]
    fn as_entity_mut(&mut self) -> Option<&mut dyn Entity> {
        None
    }

    /// Converts a boxed value into a boxed [`Entity`], or gives it back.
    #[inline]
    fn into_entity(self: Box<Self>) -> Result<Box<dyn Entity>, Box<dyn Value>> {
        Err(self.into_value())
    }

    /// Replaces `self` with `value` if it has the same type.
    ///
    /// Gives `value` back otherwise.
    fn set(&mut self, value: Box<dyn Value>) -> Result<(), Box<dyn Value>>;

    /// Compares two values.
    ///
    /// Returns `None` if the type does not support comparison.
    #[inline]
    fn value_eq(&self, _other: &dyn Value) -> Option<bool> {
        None
    }

    /// Returns a boxed copy of this value, if the type supports it.
    #[inline]
    fn clone_value(&self) -> Option<Box<dyn Value>> {
        None
    }

    /// Renders the value in the same grammar coercion reads.
    ///
    /// Returns `None` for values with no textual form.
    #[inline]
    fn to_text(&self) -> Option<String> {
        None
    }

    /// Debug formatter for the value.
    #[inline]
    fn value_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(..)", self.reflect_type_path())
    }
}

impl fmt::Debug for dyn Value {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value_debug(f)
    }
}

impl dyn Value {
    /// Returns the `TypeId` of the concrete value.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Returns `true` if the concrete value is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts to `&T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcasts to `&mut T`.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Downcasts a boxed value to `Box<T>`, or gives it back.
    pub fn downcast<T: Any>(self: Box<dyn Value>) -> Result<Box<T>, Box<dyn Value>> {
        if self.is::<T>() {
            match self.into_any().downcast::<T>() {
                Ok(value) => Ok(value),
                Err(_) => unreachable!("type was checked before the downcast"),
            }
        } else {
            Err(self)
        }
    }

    /// Unboxes the value as a `T`, or gives it back.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Value>) -> Result<T, Box<dyn Value>> {
        self.downcast::<T>().map(|value| *value)
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implements the six casting methods of [`Value`] for a sized type.
macro_rules! impl_value_cast_fn {
    () => {
        #[inline]
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        #[inline]
        fn into_any(self: ::alloc::boxed::Box<Self>) -> ::alloc::boxed::Box<dyn ::core::any::Any> {
            self
        }

        #[inline]
        fn as_value(&self) -> &dyn $crate::value::Value {
            self
        }

        #[inline]
        fn as_value_mut(&mut self) -> &mut dyn $crate::value::Value {
            self
        }

        #[inline]
        fn into_value(self: ::alloc::boxed::Box<Self>) -> ::alloc::boxed::Box<dyn $crate::value::Value> {
            self
        }
    };
}

pub(crate) use impl_value_cast_fn;
