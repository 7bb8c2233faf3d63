use core::fmt;

use crate::info::EntityInfo;
use crate::value::Value;

/// A value with named members, reachable by name or declaration index.
///
/// Implemented by `#[derive(Entity)]`; writing it by hand is possible but
/// `member_at` must agree with the order of [`EntityInfo`].
///
/// This is the uncached reflective interface. Accessors obtained from the
/// engine go through it (tree strategy) or around it (emitted strategy).
///
/// # Examples
///
/// ```
/// use mk_access::derive::Entity;
/// use mk_access::value::{Entity, Value};
///
/// #[derive(Entity)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let mut p = Point { x: 1, y: 2 };
/// assert_eq!(p.member("y").unwrap().downcast_ref::<i32>(), Some(&2));
///
/// *p.member_at_mut(0).unwrap().downcast_mut::<i32>().unwrap() = 5;
/// assert_eq!(p.x, 5);
/// ```
pub trait Entity: Value {
    /// Returns the member called `name`.
    fn member(&self, name: &str) -> Option<&dyn Value>;

    /// Returns the member called `name` mutably.
    fn member_mut(&mut self, name: &str) -> Option<&mut dyn Value>;

    /// Returns the member at declaration index `index`.
    fn member_at(&self, index: usize) -> Option<&dyn Value>;

    /// Returns the member at declaration index `index` mutably.
    fn member_at_mut(&mut self, index: usize) -> Option<&mut dyn Value>;

    /// Returns the number of members.
    fn member_len(&self) -> usize;

    /// Returns the static description of this entity type.
    fn entity_info(&self) -> &'static EntityInfo;
}

impl dyn Entity {
    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter_members(&self) -> impl Iterator<Item = (&'static str, &dyn Value)> + '_ {
        self.entity_info()
            .members()
            .filter_map(move |member| Some((member.name(), self.member_at(member.index())?)))
    }
}

impl fmt::Debug for dyn Entity {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value_debug(f)
    }
}
