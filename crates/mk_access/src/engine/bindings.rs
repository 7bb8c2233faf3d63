use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::TypeId;

use mk_utils::hash::{FixedHashState, HashMap};

use crate::compile::{CompiledAccessor, Direction, Getter, Setter};
use crate::engine::AccessEngine;
use crate::info::{EntityInfo, Type};
use crate::mapping::{KindId, MappingTag, NameOverrides, ResolvedMapping, resolve_member};
use crate::AccessResult;

// -----------------------------------------------------------------------------
// MemberBinding

/// A member's mapping for one kind together with its accessor.
#[derive(Debug, Clone)]
pub struct MemberBinding {
    mapping: ResolvedMapping,
    accessor: CompiledAccessor,
}

impl MemberBinding {
    #[inline]
    pub fn external_name(&self) -> &str {
        self.mapping.external_name()
    }

    #[inline]
    pub const fn member_name(&self) -> &'static str {
        self.mapping.member_name()
    }

    #[inline]
    pub const fn tag(&self) -> &MappingTag {
        self.mapping.tag()
    }

    #[inline]
    pub const fn mapping(&self) -> &ResolvedMapping {
        &self.mapping
    }

    #[inline]
    pub const fn accessor(&self) -> &CompiledAccessor {
        &self.accessor
    }

    #[inline]
    pub const fn getter(&self) -> Option<&Getter> {
        self.accessor.as_getter()
    }

    #[inline]
    pub const fn setter(&self) -> Option<&Setter> {
        self.accessor.as_setter()
    }
}

// -----------------------------------------------------------------------------
// Bindings

/// The bindings of an entity for one kind and direction, in declaration order.
///
/// Members excluded by their mode or by their tag's mode are left out.
/// When two members share an external name, lookups find the first.
#[derive(Debug, Clone)]
pub struct Bindings {
    ty: Type,
    kind: KindId,
    direction: Direction,
    entries: Vec<MemberBinding>,
    by_external: HashMap<String, usize>,
}

impl Bindings {
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn kind(&self) -> KindId {
        self.kind
    }

    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the binding whose external name is `external`.
    pub fn get(&self, external: &str) -> Option<&MemberBinding> {
        self.entries.get(self.position(external)?)
    }

    /// Returns the position of the binding whose external name is `external`.
    #[inline]
    pub fn position(&self, external: &str) -> Option<usize> {
        self.by_external.get(external).copied()
    }

    #[inline]
    pub fn get_at(&self, position: usize) -> Option<&MemberBinding> {
        self.entries.get(position)
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, MemberBinding> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Bindings {
    type Item = &'a MemberBinding;
    type IntoIter = core::slice::Iter<'a, MemberBinding>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// -----------------------------------------------------------------------------
// Engine

impl AccessEngine {
    /// Combines the mapping of `ty` for `kind` with its accessors.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    /// use mk_access::mapping::KindId;
    /// use mk_access::prelude::*;
    ///
    /// struct Column;
    /// impl MappingKind for Column {
    ///     const NAME: &'static str = "column";
    /// }
    ///
    /// #[derive(Entity)]
    /// struct User {
    ///     #[entity(map(Column, name = "user_id", mode = ReadOnly))]
    ///     id: u64,
    ///     name: String,
    /// }
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register::<User>();
    /// let engine = AccessEngine::new(registry);
    /// let ty = TypeId::of::<User>();
    /// let kind = KindId::of::<Column>();
    ///
    /// let readers = engine.bindings(ty, kind, Direction::Get, None).unwrap();
    /// assert_eq!(readers.iter().map(|b| b.external_name()).collect::<Vec<_>>(), ["user_id", "name"]);
    ///
    /// let overrides = NameOverrides::new().rename("name", "login");
    /// let writers = engine.bindings(ty, kind, Direction::Set, Some(&overrides)).unwrap();
    /// assert_eq!(writers.iter().map(|b| b.external_name()).collect::<Vec<_>>(), ["login"]);
    /// ```
    pub fn bindings(
        &self,
        ty: TypeId,
        kind: KindId,
        direction: Direction,
        overrides: Option<&NameOverrides>,
    ) -> AccessResult<Bindings> {
        self.bindings_of(self.entity_info(ty)?, kind, direction, overrides)
    }

    pub(crate) fn bindings_of(
        &self,
        info: &'static EntityInfo,
        kind: KindId,
        direction: Direction,
        overrides: Option<&NameOverrides>,
    ) -> AccessResult<Bindings> {
        let table = self.cache().mapping_table(info, kind)?;
        let strategy = self.config().default_strategy();

        let mut entries = Vec::with_capacity(table.len());
        let mut by_external = HashMap::with_capacity_and_hasher(table.len(), FixedHashState);
        for entry in table.iter_for(direction) {
            let mapping = match overrides {
                Some(overrides) => resolve_member(entry.member(), kind, Some(overrides))?,
                None => entry.clone(),
            };
            let accessor = self
                .cache()
                .get_or_compile(info, mapping.member_name(), direction, strategy)?;
            by_external
                .entry(mapping.external_name().to_string())
                .or_insert(entries.len());
            entries.push(MemberBinding { mapping, accessor });
        }

        Ok(Bindings {
            ty: *info.ty(),
            kind,
            direction,
            entries,
            by_external,
        })
    }
}
