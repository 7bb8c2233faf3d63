use alloc::boxed::Box;
use core::fmt;

use crate::info::TypeInfo;
use crate::value::Value;

/// A homogeneous list of values, growable through `dyn List`.
///
/// Implemented for `Vec<T>`. The factory builds empty lists of any
/// registered element type, which are then filled with [`List::push`].
///
/// # Examples
///
/// ```
/// use mk_access::value::{List, Value};
///
/// let mut list: Box<dyn List> = Box::new(Vec::<u8>::new());
/// assert!(list.push(Box::new(3_u8)).is_ok());
/// assert!(list.push(Box::new(1_i64)).is_err());
/// assert_eq!(list.len(), 1);
///
/// let vec = list.into_value().take::<Vec<u8>>().unwrap();
/// assert_eq!(vec, [3]);
/// ```
pub trait List: Value {
    /// Returns the element type information.
    fn element_info(&self) -> &'static TypeInfo;

    /// Returns the element at `index`.
    fn get(&self, index: usize) -> Option<&dyn Value>;

    /// Returns the element at `index` mutably.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Value>;

    /// Appends `value`, or gives it back if it is not of the element type.
    fn push(&mut self, value: Box<dyn Value>) -> Result<(), Box<dyn Value>>;

    /// Removes and returns the last element.
    fn pop(&mut self) -> Option<Box<dyn Value>>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl dyn List {
    /// Iterates over the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Value> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}

impl fmt::Debug for dyn List {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value_debug(f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::format;
    use alloc::vec::Vec;

    use super::List;

    #[test]
    fn debug_lists_the_elements() {
        let list: Box<dyn List> = Box::new(Vec::from([1_u8, 2]));
        assert_eq!(format!("{list:?}"), "[1, 2]");

        let result: Result<Box<dyn List>, ()> = Ok(list);
        assert!(result.is_ok_and(|list| list.len() == 2));
    }
}
