//! The long-lived entry point handed to format helpers.
//!
//! An [`AccessEngine`] owns a [`TypeRegistryArc`] (run-time type tokens,
//! constructors) and an [`AccessorCache`]. There is no global state: every
//! helper that needs accessors is given an engine.
//!
//! # Examples
//!
//! ```
//! use core::any::TypeId;
//! use mk_access::prelude::*;
//!
//! #[derive(Entity, Default)]
//! #[entity(default)]
//! struct Point { x: i32, y: i32 }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Point>();
//! let engine = AccessEngine::new(registry);
//!
//! let ty = TypeId::of::<Point>();
//! let writers = engine.accessors_for(ty, Direction::Set).unwrap();
//! assert_eq!(writers.len(), 2);
//!
//! let mut point = engine.new_instance(ty).unwrap();
//! let point = point.as_entity_mut().unwrap();
//! writers.get("x").unwrap().as_setter().unwrap().set(point, "5").unwrap();
//!
//! let x = engine.getter(ty, "x").unwrap();
//! assert_eq!(x.get_as::<i32>(point), Ok(&5));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod bindings;
mod config;
mod ops;

// -----------------------------------------------------------------------------
// Exports

pub use bindings::{Bindings, MemberBinding};
pub use config::EngineConfig;

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use crate::cache::{AccessorCache, AccessorMap};
use crate::compile::{CompiledAccessor, Direction, Getter, Setter, Strategy};
use crate::info::{EntityInfo, MemberInfo, Typed};
use crate::mapping::{KindId, MappingKind, MappingTable, NameOverrides, ResolvedMapping, resolve_member};
use crate::registry::{TypeRegistry, TypeRegistryArc};
use crate::value::{List, Value};
use crate::{AccessError, AccessResult};

// -----------------------------------------------------------------------------
// AccessEngine

/// Accessor compilation, metadata caching and object construction.
///
/// Run-time type tokens are [`TypeId`]s of types registered in the
/// registry. The typed shortcuts ([`accessor`](Self::accessor),
/// [`accessors`](Self::accessors), [`metadata`](Self::metadata)) work for
/// any entity type, registered or not. Requests by token check the registry
/// even when the cache already holds the result.
pub struct AccessEngine {
    registry: TypeRegistryArc,
    cache: AccessorCache,
    config: EngineConfig,
}

impl Default for AccessEngine {
    /// An engine over [`TypeRegistry::new`] plus every auto-registered type.
    fn default() -> Self {
        let mut registry = TypeRegistry::new();
        registry.auto_register();
        Self::new(registry)
    }
}

impl AccessEngine {
    /// Creates an engine with the default [`EngineConfig`].
    #[inline]
    pub fn new(registry: impl Into<TypeRegistryArc>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: impl Into<TypeRegistryArc>, config: EngineConfig) -> Self {
        Self {
            registry: registry.into(),
            cache: AccessorCache::with_shards(config.shard_count()),
            config,
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    #[inline]
    pub fn cache(&self) -> &AccessorCache {
        &self.cache
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Introspection

    /// Returns the entity description of a registered type.
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnknownType`] if `ty` is not registered.
    /// - [`AccessError::NotAnEntity`] if `ty` has no members.
    pub fn entity_info(&self, ty: TypeId) -> AccessResult<&'static EntityInfo> {
        let info = self
            .registry
            .read()
            .get_type_info(ty)
            .ok_or_else(|| crate::registry::unknown_type(ty))?;
        info.as_entity()
            .ok_or(AccessError::NotAnEntity { ty: info.type_path() })
    }

    /// Returns the members of a registered entity type in declaration order.
    ///
    /// The sequence can be restarted by calling this again; the members are
    /// discovered once per type.
    pub fn members(&self, ty: TypeId) -> AccessResult<core::slice::Iter<'static, MemberInfo>> {
        Ok(self.entity_info(ty)?.members())
    }

    // -------------------------------------------------------------------------
    // Accessors

    /// Returns every accessor of `ty` usable in `direction`, compiled with the
    /// configured default strategy.
    #[inline]
    pub fn accessors_for(&self, ty: TypeId, direction: Direction) -> AccessResult<Arc<AccessorMap>> {
        self.accessors_for_with_strategy(ty, direction, self.config.default_strategy())
    }

    pub fn accessors_for_with_strategy(
        &self,
        ty: TypeId,
        direction: Direction,
        strategy: Strategy,
    ) -> AccessResult<Arc<AccessorMap>> {
        self.cache.all_accessors(self.entity_info(ty)?, direction, strategy)
    }

    /// Returns the accessor of `member` of `ty`, compiled with the configured
    /// default strategy.
    ///
    /// # Errors
    ///
    /// [`AccessError::MemberNotAccessible`] if the member does not exist or
    /// does not support `direction`, and the errors of [`entity_info`](Self::entity_info).
    #[inline]
    pub fn accessor_for(&self, ty: TypeId, member: &str, direction: Direction) -> AccessResult<CompiledAccessor> {
        self.accessor_for_with_strategy(ty, member, direction, self.config.default_strategy())
    }

    pub fn accessor_for_with_strategy(
        &self,
        ty: TypeId,
        member: &str,
        direction: Direction,
        strategy: Strategy,
    ) -> AccessResult<CompiledAccessor> {
        self.cache
            .get_or_compile(self.entity_info(ty)?, member, direction, strategy)
    }

    /// Returns the reader of `member` of `ty`.
    pub fn getter(&self, ty: TypeId, member: &str) -> AccessResult<Getter> {
        match self.accessor_for(ty, member, Direction::Get)? {
            CompiledAccessor::Getter(getter) => Ok(getter),
            CompiledAccessor::Setter(_) => unreachable!("a getter was requested"),
        }
    }

    /// Returns the writer of `member` of `ty`.
    pub fn setter(&self, ty: TypeId, member: &str) -> AccessResult<Setter> {
        match self.accessor_for(ty, member, Direction::Set)? {
            CompiledAccessor::Setter(setter) => Ok(setter),
            CompiledAccessor::Getter(_) => unreachable!("a setter was requested"),
        }
    }

    /// Typed form of [`accessor_for`](Self::accessor_for).
    pub fn accessor<T: Typed>(&self, member: &str, direction: Direction) -> AccessResult<CompiledAccessor> {
        self.cache
            .get_or_compile(entity_info_of::<T>()?, member, direction, self.config.default_strategy())
    }

    /// Typed form of [`accessors_for`](Self::accessors_for).
    pub fn accessors<T: Typed>(&self, direction: Direction) -> AccessResult<Arc<AccessorMap>> {
        self.cache
            .all_accessors(entity_info_of::<T>()?, direction, self.config.default_strategy())
    }

    // -------------------------------------------------------------------------
    // Mapping metadata

    /// Returns the mapping of every member of `ty` for `kind`.
    ///
    /// # Errors
    ///
    /// [`AccessError::AmbiguousMapping`] if a member carries conflicting tags of `kind`.
    pub fn metadata_for(&self, ty: TypeId, kind: KindId) -> AccessResult<Arc<MappingTable>> {
        self.cache.mapping_table(self.entity_info(ty)?, kind)
    }

    /// Typed form of [`metadata_for`](Self::metadata_for).
    pub fn metadata<T: Typed, K: MappingKind>(&self) -> AccessResult<Arc<MappingTable>> {
        self.cache.mapping_table(entity_info_of::<T>()?, KindId::of::<K>())
    }

    /// Resolves the mapping of one member for `kind`.
    ///
    /// A name in `overrides` wins over the declared tag name, which wins
    /// over the member name. Returns `Ok(None)` if `ty` has no such member.
    pub fn resolve(
        &self,
        ty: TypeId,
        member: &str,
        kind: KindId,
        overrides: Option<&NameOverrides>,
    ) -> AccessResult<Option<ResolvedMapping>> {
        let table = self.metadata_for(ty, kind)?;
        let Some(entry) = table.get(member) else {
            return Ok(None);
        };
        match overrides {
            Some(overrides) => resolve_member(entry.member(), kind, Some(overrides)).map(Some),
            None => Ok(Some(entry.clone())),
        }
    }

    // -------------------------------------------------------------------------
    // Construction

    /// Creates a default instance of a registered type.
    ///
    /// # Errors
    ///
    /// [`AccessError::NoDefaultConstructor`] if the type has none, or
    /// [`AccessError::UnknownType`].
    #[inline]
    pub fn new_instance(&self, ty: TypeId) -> AccessResult<Box<dyn Value>> {
        self.registry.read().new_instance(ty)
    }

    /// Creates an empty list of a registered element type.
    #[inline]
    pub fn new_list(&self, element: TypeId) -> AccessResult<Box<dyn List>> {
        self.registry.read().new_list(element)
    }
}

fn entity_info_of<T: Typed>() -> AccessResult<&'static EntityInfo> {
    T::type_info()
        .as_entity()
        .ok_or(AccessError::NotAnEntity { ty: T::type_path() })
}

impl fmt::Debug for AccessEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessEngine")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::any::TypeId;

    use chrono::NaiveDate;

    use super::{AccessEngine, EngineConfig};
    use crate::mapping::{KindId, NameSource};
    use crate::prelude::*;

    struct Column;

    impl MappingKind for Column {
        const NAME: &'static str = "column";
    }

    #[derive(Entity, Debug, PartialEq, Default)]
    #[entity(default, type_path = "tests::Point")]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Entity)]
    #[entity(type_path = "tests::Ledger")]
    struct Ledger {
        #[entity(map(Column, name = "Z"))]
        total: i64,
        #[entity(read_only)]
        opened: NaiveDate,
        #[entity(write_only)]
        token: String,
        #[entity(map(Column, mode = ReadOnly))]
        checksum: u32,
    }

    struct Unregistered;

    fn engine() -> AccessEngine {
        let mut registry = TypeRegistry::new();
        registry.register::<Point>();
        registry.register::<Ledger>();
        AccessEngine::new(registry)
    }

    fn ledger() -> Ledger {
        Ledger {
            total: 0,
            opened: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            token: String::new(),
            checksum: 0,
        }
    }

    const POINT: TypeId = TypeId::of::<Point>();
    const LEDGER: TypeId = TypeId::of::<Ledger>();

    #[test]
    fn point_scenario() {
        let engine = engine();
        let writers = engine.accessors_for(POINT, Direction::Set).unwrap();
        assert_eq!(writers.len(), 2);

        let mut point = engine.new_instance(POINT).unwrap();
        let entity = point.as_entity_mut().unwrap();
        writers.get("x").unwrap().as_setter().unwrap().set(entity, "5").unwrap();

        let x = engine.getter(POINT, "x").unwrap();
        assert_eq!(x.get_as::<i32>(entity), Ok(&5));
        assert_eq!(point.take::<Point>().ok(), Some(Point { x: 5, y: 0 }));
    }

    #[test]
    fn repeated_requests_behave_identically() {
        let engine = engine();
        let point = Point { x: -3, y: 8 };
        let first = engine.getter(POINT, "y").unwrap();
        let second = engine.getter(POINT, "y").unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(first.get_as::<i32>(&point), second.get_as::<i32>(&point));

        for strategy in [Strategy::Tree, Strategy::Emitted, Strategy::Reflect] {
            let getter = engine
                .accessor_for_with_strategy(POINT, "y", Direction::Get, strategy)
                .unwrap()
                .into_getter()
                .unwrap();
            assert_eq!(getter.get_as::<i32>(&point), Ok(&8));
        }
        assert_eq!(engine.cache().stats().hits, 2);
    }

    #[test]
    fn integer_text_round_trip() {
        let engine = engine();
        let set = engine.setter(LEDGER, "total").unwrap();
        let get = engine
            .accessor_for(LEDGER, "total", Direction::Get)
            .unwrap()
            .into_getter()
            .unwrap();

        let mut target = ledger();
        for value in [i64::MIN, -1, 0, 1, 42, 1 << 40, i64::MAX] {
            set.set(&mut target, value.to_string()).unwrap();
            assert_eq!(get.get_as::<i64>(&target), Ok(&value));
            assert_eq!(get.get_text(&target), Ok(Some(value.to_string())));
        }
    }

    #[test]
    fn concurrent_requests_agree() {
        let engine = engine();
        let point = Point { x: 11, y: 12 };

        let results = std::thread::scope(|s| {
            let handles = (0..16)
                .map(|_| {
                    s.spawn(|| {
                        let getter = engine.getter(POINT, "x").unwrap();
                        *getter.get_as::<i32>(&point).unwrap()
                    })
                })
                .collect::<Vec<_>>();
            handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
        });

        assert!(results.iter().all(|x| *x == 11));
        assert_eq!(engine.cache().len(), 1);
    }

    #[test]
    fn mode_filtering() {
        let engine = engine();
        let writers = engine.accessors_for(LEDGER, Direction::Set).unwrap();
        assert!(!writers.contains("opened"));
        assert!(writers.contains("token"));
        let readers = engine.accessors_for(LEDGER, Direction::Get).unwrap();
        assert!(readers.contains("opened"));
        assert!(!readers.contains("token"));

        let column = KindId::of::<Column>();
        let bound = engine.bindings(LEDGER, column, Direction::Set, None).unwrap();
        let names = bound.iter().map(|b| b.member_name()).collect::<Vec<_>>();
        assert_eq!(names, ["total", "token"]);
    }

    #[test]
    fn override_wins_over_declared_name() {
        let engine = engine();
        let column = KindId::of::<Column>();

        let declared = engine.resolve(LEDGER, "total", column, None).unwrap().unwrap();
        assert_eq!(declared.external_name(), "Z");
        assert_eq!(declared.source(), NameSource::Declared);

        let overrides = NameOverrides::new().rename("total", "Y");
        let resolved = engine.resolve(LEDGER, "total", column, Some(&overrides)).unwrap().unwrap();
        assert_eq!(resolved.external_name(), "Y");
        assert_eq!(resolved.source(), NameSource::Override);

        let own = engine.resolve(LEDGER, "token", column, None).unwrap().unwrap();
        assert_eq!(own.external_name(), "token");
        assert!(engine.resolve(LEDGER, "missing", column, None).unwrap().is_none());

        let table = engine.metadata::<Ledger, Column>().unwrap();
        assert!(alloc::sync::Arc::ptr_eq(&table, &engine.metadata_for(LEDGER, column).unwrap()));
    }

    #[test]
    fn no_default_constructor() {
        let engine = engine();
        assert!(matches!(
            engine.new_instance(LEDGER),
            Err(AccessError::NoDefaultConstructor { ty: "tests::Ledger" })
        ));
    }

    #[test]
    fn text_that_does_not_parse() {
        let engine = engine();
        let mut point = Point { x: 1, y: 2 };
        let err = engine.setter(POINT, "x").unwrap().set(&mut point, "not-a-number").unwrap_err();
        assert!(matches!(err, AccessError::FormatMismatch { expected: "i32", .. }));
        assert_eq!(point.x, 1);

        let opened = crate::coerce::coerce(RawValue::from("2024-13-40"), NaiveDate::type_info());
        assert!(matches!(opened, Err(AccessError::FormatMismatch { .. })));
    }

    #[test]
    fn unknown_tokens() {
        let engine = engine();
        assert!(matches!(
            engine.accessor_for(TypeId::of::<Unregistered>(), "x", Direction::Get),
            Err(AccessError::UnknownType { .. })
        ));
        assert!(matches!(
            engine.accessors_for(TypeId::of::<u8>(), Direction::Get),
            Err(AccessError::NotAnEntity { ty: "u8" })
        ));
        assert!(matches!(
            engine.accessor::<String>("len", Direction::Get),
            Err(AccessError::NotAnEntity { .. })
        ));
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn typed_shortcuts_skip_the_registry() {
        let engine = AccessEngine::with_config(
            TypeRegistry::empty(),
            EngineConfig::new().with_default_strategy(Strategy::Emitted),
        );
        let getter = engine.accessor::<Point>("y", Direction::Get).unwrap();
        let point = Point { x: 0, y: 4 };
        assert_eq!(getter.as_getter().unwrap().get_as::<i32>(&point), Ok(&4));

        let all = engine.accessors::<Point>(Direction::Get).unwrap();
        assert_eq!(all.names().collect::<Vec<_>>(), ["x", "y"]);
        assert!(matches!(
            engine.accessor_for(POINT, "y", Direction::Get),
            Err(AccessError::UnknownType { .. })
        ));
    }

    #[test]
    fn registration_is_checked_on_every_request() {
        let engine = AccessEngine::new(TypeRegistry::empty());
        assert!(matches!(
            engine.accessor_for(POINT, "x", Direction::Get),
            Err(AccessError::UnknownType { .. })
        ));

        engine.accessor::<Point>("x", Direction::Get).unwrap();
        engine.accessors::<Point>(Direction::Get).unwrap();
        assert_eq!(engine.cache().len(), 2);

        assert!(matches!(
            engine.accessor_for(POINT, "x", Direction::Get),
            Err(AccessError::UnknownType { .. })
        ));
        assert!(matches!(
            engine.accessors_for(POINT, Direction::Get),
            Err(AccessError::UnknownType { .. })
        ));
        assert!(matches!(
            engine.accessor_for_with_strategy(POINT, "x", Direction::Get, Strategy::Reflect),
            Err(AccessError::UnknownType { .. })
        ));
    }

    #[test]
    fn lists_check_their_elements() {
        let engine = engine();
        let mut list = engine.new_list(POINT).unwrap();
        list.push(alloc::boxed::Box::new(Point { x: 1, y: 1 })).unwrap();
        assert!(list.push(alloc::boxed::Box::new(7_i32)).is_err());
        assert_eq!(list.len(), 1);
    }
}
