use alloc::boxed::Box;

use mk_utils::hash::HashMap;

use crate::compile::{CompiledAccessor, Direction, Strategy};
use crate::info::{EntityInfo, Type};

/// Every accessor of one entity type in one direction, in declaration order.
///
/// Members that do not support the direction are left out.
#[derive(Debug)]
pub struct AccessorMap {
    ty: Type,
    direction: Direction,
    strategy: Strategy,
    accessors: Box<[CompiledAccessor]>,
    index: HashMap<&'static str, usize>,
}

impl AccessorMap {
    pub(crate) fn new(
        info: &'static EntityInfo,
        direction: Direction,
        strategy: Strategy,
        accessors: Box<[CompiledAccessor]>,
    ) -> Self {
        let index = accessors
            .iter()
            .enumerate()
            .map(|(i, accessor)| (accessor.name(), i))
            .collect();
        Self {
            ty: *info.ty(),
            direction,
            strategy,
            accessors,
            index,
        }
    }

    /// Returns the entity type.
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the requested strategy.
    #[inline]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the accessor of `member`.
    pub fn get(&self, member: &str) -> Option<&CompiledAccessor> {
        self.accessors.get(*self.index.get(member)?)
    }

    #[inline]
    pub fn contains(&self, member: &str) -> bool {
        self.index.contains_key(member)
    }

    /// Iterates over `(name, accessor)` pairs in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'static str, &CompiledAccessor)> + '_ {
        self.accessors.iter().map(|accessor| (accessor.name(), accessor))
    }

    /// Iterates over the member names in declaration order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.accessors.iter().map(CompiledAccessor::name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

impl<'a> IntoIterator for &'a AccessorMap {
    type Item = &'a CompiledAccessor;
    type IntoIter = core::slice::Iter<'a, CompiledAccessor>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.accessors.iter()
    }
}
