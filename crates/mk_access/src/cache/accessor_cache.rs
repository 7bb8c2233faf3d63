use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;
use core::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mk_utils::hash::FixedHashState;

use crate::cache::AccessorMap;
use crate::cache::key::{AccessorKey, MapKey, TableKey};
use crate::compile::{CompiledAccessor, Direction, Strategy, compile};
use crate::info::EntityInfo;
use crate::mapping::{KindId, MappingTable, resolve_table};
use crate::AccessResult;

/// Shard count used by [`AccessorCache::new`].
pub const DEFAULT_SHARD_COUNT: usize = 16;

// -----------------------------------------------------------------------------
// CacheStats

/// Counters of an [`AccessorCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compile.
    pub misses: u64,
    /// Accessors compiled successfully.
    pub compilations: u64,
    /// Compiled accessors dropped because another thread published first.
    pub discarded: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    compilations: AtomicU64,
    discarded: AtomicU64,
}

#[inline]
fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

// -----------------------------------------------------------------------------
// Publication

type Table<K, V> = DashMap<K, V, FixedHashState>;

enum Published<V> {
    Inserted(V),
    Existing(V),
}

impl<V> Published<V> {
    #[inline]
    fn into_inner(self) -> V {
        match self {
            Self::Inserted(v) | Self::Existing(v) => v,
        }
    }
}

fn new_table<K: Eq + Hash, V>(shards: usize) -> Table<K, V> {
    DashMap::with_hasher_and_shard_amount(FixedHashState, shards)
}

#[inline]
fn lookup<K: Eq + Hash, V: Clone>(table: &Table<K, V>, key: &K) -> Option<V> {
    table.get(key).map(|entry| entry.value().clone())
}

/// Stores `value` unless `key` already has one. The shard is locked only
/// for the probe and the insertion.
fn publish<K: Eq + Hash, V: Clone>(table: &Table<K, V>, key: K, value: V) -> Published<V> {
    match table.entry(key) {
        Entry::Occupied(entry) => Published::Existing(entry.get().clone()),
        Entry::Vacant(entry) => Published::Inserted(entry.insert(value).value().clone()),
    }
}

// -----------------------------------------------------------------------------
// AccessorCache

/// Memoizes compiled accessors, accessor maps and mapping tables.
///
/// Each table is a [`DashMap`]; a lookup only read-locks one shard. On a
/// miss the accessor is compiled with no lock held, then published: the
/// first candidate stored for a key wins and is returned to every caller.
/// Failures are never stored.
///
/// [`Strategy::Reflect`] accessors are never cached.
///
/// # Examples
///
/// ```
/// use mk_access::cache::AccessorCache;
/// use mk_access::info::EntityInfo;
/// use mk_access::prelude::*;
///
/// #[derive(Entity)]
/// struct Point { x: i32, y: i32 }
///
/// let cache = AccessorCache::new();
/// let info = EntityInfo::of::<Point>();
///
/// let a = cache.get_or_compile(info, "x", Direction::Get, Strategy::Tree).unwrap();
/// let b = cache.get_or_compile(info, "x", Direction::Get, Strategy::Tree).unwrap();
/// assert!(a.ptr_eq(&b));
/// assert_eq!(cache.stats().compilations, 1);
/// ```
pub struct AccessorCache {
    accessors: Table<AccessorKey, CompiledAccessor>,
    maps: Table<MapKey, Arc<AccessorMap>>,
    tables: Table<TableKey, Arc<MappingTable>>,
    counters: Counters,
}

impl Default for AccessorCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl AccessorCache {
    /// Creates an empty cache with [`DEFAULT_SHARD_COUNT`] shards per table.
    #[inline]
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARD_COUNT)
    }

    /// Creates an empty cache with at least `shards` shards per table.
    ///
    /// The count is rounded up to a power of two, with a minimum of two.
    pub fn with_shards(shards: usize) -> Self {
        let shards = shards.max(2).next_power_of_two();
        Self {
            accessors: new_table(shards),
            maps: new_table(shards),
            tables: new_table(shards),
            counters: Counters::default(),
        }
    }

    /// Returns the accessor for `member` of `info`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Errors from [`compile`]. Nothing is cached on failure.
    pub fn get_or_compile(
        &self,
        info: &'static EntityInfo,
        member: &str,
        direction: Direction,
        strategy: Strategy,
    ) -> AccessResult<CompiledAccessor> {
        if !strategy.is_cached() {
            return compile(info, member, direction, strategy);
        }
        let Some(declared) = info.member(member) else {
            // Fails with `MemberNotAccessible`.
            return compile(info, member, direction, strategy);
        };

        // Keyed by the requested strategy: an emitted request served by the
        // tree compiler is not recompiled on every call.
        let key = AccessorKey {
            ty: info.type_id(),
            member: declared.name(),
            direction,
            strategy,
        };
        if let Some(accessor) = lookup(&self.accessors, &key) {
            bump(&self.counters.hits);
            return Ok(accessor);
        }
        bump(&self.counters.misses);

        let accessor = compile(info, member, direction, strategy)?;
        bump(&self.counters.compilations);
        Ok(self.publish(key, accessor))
    }

    fn publish(&self, key: AccessorKey, accessor: CompiledAccessor) -> CompiledAccessor {
        match publish(&self.accessors, key, accessor) {
            Published::Inserted(accessor) => {
                if crate::cfg::debug() {
                    log::debug!(
                        "published {} accessor `{}::{}` ({})",
                        key.direction,
                        accessor.member().declaring(),
                        key.member,
                        accessor.strategy(),
                    );
                }
                accessor
            }
            Published::Existing(accessor) => {
                bump(&self.counters.discarded);
                log::debug!(
                    "discarded a concurrently compiled {} accessor for `{}::{}`",
                    key.direction,
                    accessor.member().declaring(),
                    key.member,
                );
                accessor
            }
        }
    }

    /// Returns the accessors of every member of `info` that supports
    /// `direction`, in declaration order.
    ///
    /// Individual accessors are shared with [`get_or_compile`](Self::get_or_compile).
    pub fn all_accessors(
        &self,
        info: &'static EntityInfo,
        direction: Direction,
        strategy: Strategy,
    ) -> AccessResult<Arc<AccessorMap>> {
        let key = MapKey {
            ty: info.type_id(),
            direction,
            strategy,
        };
        if strategy.is_cached()
            && let Some(map) = lookup(&self.maps, &key)
        {
            bump(&self.counters.hits);
            return Ok(map);
        }

        let accessors = info
            .members()
            .filter(|member| member.supports(direction))
            .map(|member| self.get_or_compile(info, member.name(), direction, strategy))
            .collect::<AccessResult<Vec<_>>>()?;
        let map = Arc::new(AccessorMap::new(info, direction, strategy, accessors.into_boxed_slice()));

        if !strategy.is_cached() {
            return Ok(map);
        }
        Ok(publish(&self.maps, key, map).into_inner())
    }

    /// Returns the mapping table of `info` for `kind`, resolving it on first use.
    ///
    /// # Errors
    ///
    /// [`AccessError::AmbiguousMapping`](crate::AccessError::AmbiguousMapping). Nothing is cached on failure.
    pub fn mapping_table(&self, info: &'static EntityInfo, kind: KindId) -> AccessResult<Arc<MappingTable>> {
        let key = TableKey {
            ty: info.type_id(),
            kind,
        };
        if let Some(table) = lookup(&self.tables, &key) {
            return Ok(table);
        }
        let table = Arc::new(resolve_table(info, kind)?);
        log::trace!("resolved {} mapping of `{}`", kind, info.ty());
        Ok(publish(&self.tables, key, table).into_inner())
    }

    /// Returns `true` if an accessor is cached for the key.
    #[inline]
    pub fn contains(&self, key: &AccessorKey) -> bool {
        self.accessors.contains_key(key)
    }

    /// Returns the number of cached accessors.
    #[inline]
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            compilations: self.counters.compilations.load(Ordering::Relaxed),
            discarded: self.counters.discarded.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for AccessorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorCache")
            .field("accessors", &self.accessors.len())
            .field("maps", &self.maps.len())
            .field("tables", &self.tables.len())
            .field("stats", &self.stats())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::AccessorCache;
    use crate::cache::AccessorKey;
    use crate::compile::{Direction, Strategy};
    use crate::info::EntityInfo;
    use crate::prelude::*;

    #[derive(Entity, Default)]
    #[entity(type_path = "tests::Row")]
    struct Row {
        id: u32,
        #[entity(read_only)]
        code: String,
        label: String,
        #[entity(write_only)]
        password: String,
    }

    fn info() -> &'static EntityInfo {
        EntityInfo::of::<Row>()
    }

    const ROW: TypeId = TypeId::of::<Row>();

    #[test]
    fn hit_after_miss() {
        let cache = AccessorCache::new();
        let a = cache.get_or_compile(info(), "id", Direction::Get, Strategy::Tree).unwrap();
        let name = "id".to_string();
        let b = cache.get_or_compile(info(), &name, Direction::Get, Strategy::Tree).unwrap();
        assert!(a.ptr_eq(&b));

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.compilations), (1, 1, 1));
        assert!(cache.contains(&AccessorKey {
            ty: ROW,
            member: "id",
            direction: Direction::Get,
            strategy: Strategy::Tree,
        }));
    }

    #[test]
    fn directions_and_strategies_are_distinct_keys() {
        let cache = AccessorCache::new();
        let get = cache.get_or_compile(info(), "id", Direction::Get, Strategy::Tree).unwrap();
        let set = cache.get_or_compile(info(), "id", Direction::Set, Strategy::Tree).unwrap();
        let emitted = cache.get_or_compile(info(), "id", Direction::Get, Strategy::Emitted).unwrap();
        assert!(!get.ptr_eq(&set));
        assert!(!get.ptr_eq(&emitted));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = AccessorCache::new();
        assert!(cache.get_or_compile(info(), "nope", Direction::Get, Strategy::Tree).is_err());
        assert!(cache.get_or_compile(info(), "code", Direction::Set, Strategy::Tree).is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().compilations, 0);
    }

    #[test]
    fn reflect_is_not_cached() {
        let cache = AccessorCache::new();
        let a = cache.get_or_compile(info(), "id", Direction::Get, Strategy::Reflect).unwrap();
        let b = cache.get_or_compile(info(), "id", Direction::Get, Strategy::Reflect).unwrap();
        assert!(!a.ptr_eq(&b));
        assert!(cache.is_empty());

        let row = Row { id: 3, ..Row::default() };
        let (a, b) = (a.into_getter().unwrap(), b.into_getter().unwrap());
        assert_eq!(a.get_as::<u32>(&row), b.get_as::<u32>(&row));
    }

    #[test]
    fn all_accessors_filters_by_direction() {
        let cache = AccessorCache::new();
        let info = EntityInfo::of::<Row>();

        let readers = cache.all_accessors(info, Direction::Get, Strategy::Tree).unwrap();
        assert_eq!(readers.names().collect::<Vec<_>>(), ["id", "code", "label"]);
        let writers = cache.all_accessors(info, Direction::Set, Strategy::Tree).unwrap();
        assert_eq!(writers.names().collect::<Vec<_>>(), ["id", "label", "password"]);
        assert!(!writers.contains("code"));

        let again = cache.all_accessors(info, Direction::Set, Strategy::Tree).unwrap();
        assert!(alloc::sync::Arc::ptr_eq(&writers, &again));

        let single = cache
            .get_or_compile(info, "label", Direction::Set, Strategy::Tree)
            .unwrap();
        assert!(writers.get("label").unwrap().ptr_eq(&single));
    }

    #[test]
    fn small_shard_counts_are_raised() {
        for shards in [0, 1, 3] {
            let cache = AccessorCache::with_shards(shards);
            assert!(cache.get_or_compile(info(), "id", Direction::Get, Strategy::Tree).is_ok());
            assert_eq!(cache.len(), 1);
        }
    }

    #[test]
    fn concurrent_requests_converge() {
        let cache = AccessorCache::with_shards(2);
        let row = Row { id: 99, ..Row::default() };

        let accessors = std::thread::scope(|s| {
            let handles = (0..8)
                .map(|_| s.spawn(|| cache.get_or_compile(info(), "id", Direction::Get, Strategy::Tree)))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect::<Vec<_>>()
        });

        let first = &accessors[0];
        for accessor in &accessors {
            assert!(accessor.ptr_eq(first));
            assert_eq!(accessor.as_getter().unwrap().get_as::<u32>(&row), Ok(&99));
        }
        let stats = cache.stats();
        assert_eq!(cache.len(), 1);
        assert_eq!(stats.compilations, stats.discarded + 1);
    }
}
