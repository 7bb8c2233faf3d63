use core::any::TypeId;

use crate::compile::{Direction, Strategy};
use crate::mapping::KindId;

/// The identity of a cached accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessorKey {
    pub ty: TypeId,
    pub member: &'static str,
    pub direction: Direction,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MapKey {
    pub ty: TypeId,
    pub direction: Direction,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TableKey {
    pub ty: TypeId,
    pub kind: KindId,
}
