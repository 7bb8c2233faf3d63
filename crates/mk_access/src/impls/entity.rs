use core::fmt;

use crate::value::{Entity, Value};

/// Compares an entity with any value, member by member.
///
/// Returns `Some(false)` if `other` has another type, and `None` if a
/// member does not support comparison.
#[inline(never)]
pub fn entity_eq(x: &dyn Entity, y: &dyn Value) -> Option<bool> {
    let Some(y) = y.as_entity() else {
        return Some(false);
    };
    if x.as_value().ty_id() != y.as_value().ty_id() || x.member_len() != y.member_len() {
        return Some(false);
    }
    for index in 0..x.member_len() {
        let (Some(a), Some(b)) = (x.member_at(index), y.member_at(index)) else {
            return Some(false);
        };
        match a.value_eq(b) {
            Some(true) => {}
            other => return other,
        }
    }
    Some(true)
}

/// Formats an entity as `Name { member: value, .. }`.
#[inline(never)]
pub fn entity_debug(x: &dyn Entity, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut debug = f.debug_struct(x.reflect_type_name());
    for (name, value) in x.iter_members() {
        debug.field(name, &value as &dyn fmt::Debug);
    }
    debug.finish()
}
