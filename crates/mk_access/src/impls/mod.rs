//! [`Value`](crate::value::Value) implementations for built-in types, and the
//! helpers used by `#[derive(Entity)]`.
//!
//! ## Built-in values
//!
//! - scalars: `bool` `char` `f32` `f64` `String`
//!   `i8` `i16` `i32` `i64` `i128` `isize` `u8` `u16` `u32` `u64` `u128` `usize`
//! - `chrono`: `NaiveDate` `NaiveDateTime` `NaiveTime`
//! - `Option<T>` and `Vec<T>` for any value `T`

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod entity;
mod option;
mod scalar;
mod vec;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeCell, GenericTypeInfoCell, GenericTypePathCell};
pub use cell::{NonGenericTypeCell, NonGenericTypeInfoCell};
pub use entity::{entity_debug, entity_eq};

use alloc::string::String;

/// Concatenates string slices, used to build generic type paths.
///
/// ```
/// assert_eq!(mk_access::impls::concat(&["Vec<", "u8", ">"]), "Vec<u8>");
/// ```
#[inline(never)]
pub fn concat(arr: &[&str]) -> String {
    let len = arr.iter().map(|s| s.len()).sum();
    let mut res = String::with_capacity(len);
    for s in arr {
        res.push_str(s);
    }
    res
}
