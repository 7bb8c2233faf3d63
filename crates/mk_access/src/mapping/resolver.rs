use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use mk_utils::hash::{FixedHashState, HashMap};

use crate::compile::Direction;
use crate::info::{EntityInfo, MemberInfo, Type};
use crate::mapping::{KindId, MappingTag};
use crate::{AccessError, AccessResult};

// -----------------------------------------------------------------------------
// NameOverrides

/// Caller-supplied external names, keyed by member name.
///
/// Overrides win over declared tags and are never cached.
///
/// # Examples
///
/// ```
/// use mk_access::mapping::NameOverrides;
///
/// let overrides = NameOverrides::new().rename("id", "ID").rename("name", "full_name");
/// assert_eq!(overrides.get("id"), Some("ID"));
/// assert_eq!(overrides.get("age"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NameOverrides {
    names: HashMap<String, String>,
}

impl NameOverrides {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `member` to `external`.
    #[inline]
    pub fn rename(mut self, member: impl Into<String>, external: impl Into<String>) -> Self {
        self.insert(member, external);
        self
    }

    /// Maps `member` to `external`, returning the previous override.
    pub fn insert(&mut self, member: impl Into<String>, external: impl Into<String>) -> Option<String> {
        self.names.insert(member.into(), external.into())
    }

    /// Returns the override for `member`.
    #[inline]
    pub fn get(&self, member: &str) -> Option<&str> {
        self.names.get(member).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NameOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// -----------------------------------------------------------------------------
// ResolvedMapping

/// Where a resolved external name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameSource {
    /// A caller override.
    Override,
    /// The member's tag for the kind.
    Declared,
    /// No override or named tag: the member's own name.
    Member,
}

/// The mapping of one member for one kind.
#[derive(Debug, Clone)]
pub struct ResolvedMapping {
    member: &'static MemberInfo,
    external_name: Cow<'static, str>,
    source: NameSource,
    tag: MappingTag,
}

impl ResolvedMapping {
    /// Returns the mapped member.
    #[inline]
    pub const fn member(&self) -> &'static MemberInfo {
        self.member
    }

    #[inline]
    pub const fn member_name(&self) -> &'static str {
        self.member.name()
    }

    /// Returns the resolved external name.
    #[inline]
    pub fn external_name(&self) -> &str {
        &self.external_name
    }

    #[inline]
    pub const fn source(&self) -> NameSource {
        self.source
    }

    /// Returns the member's tag for the kind, or a default tag if it has none.
    #[inline]
    pub const fn tag(&self) -> &MappingTag {
        &self.tag
    }

    /// Returns `true` if both the member and its tag allow `direction`.
    #[inline]
    pub fn allows(&self, direction: Direction) -> bool {
        self.member.supports(direction) && self.tag.mode().allows(direction)
    }

    fn with_override(&self, overrides: &NameOverrides) -> Self {
        match overrides.get(self.member.name()) {
            Some(name) => Self {
                external_name: Cow::Owned(name.to_string()),
                source: NameSource::Override,
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

/// Resolves the mapping of `member` for `kind`.
///
/// # Errors
///
/// [`AccessError::AmbiguousMapping`] if the member carries two different tags of `kind`.
pub fn resolve_member(
    member: &'static MemberInfo,
    kind: KindId,
    overrides: Option<&NameOverrides>,
) -> AccessResult<ResolvedMapping> {
    let mut tags = member.tags_of(kind);
    let tag = match tags.next() {
        None => MappingTag::new(),
        Some(first) => {
            if tags.any(|other| other != first) {
                return Err(AccessError::AmbiguousMapping {
                    ty: member.declaring().path(),
                    member: member.name(),
                    kind: kind.name(),
                });
            }
            first.clone()
        }
    };

    let (external_name, source) = match (overrides.and_then(|o| o.get(member.name())), tag.name_cow()) {
        (Some(name), _) => (Cow::Owned(name.to_string()), NameSource::Override),
        (None, Some(name)) => (name.clone(), NameSource::Declared),
        (None, None) => (Cow::Borrowed(member.name()), NameSource::Member),
    };

    Ok(ResolvedMapping {
        member,
        external_name,
        source,
        tag,
    })
}

// -----------------------------------------------------------------------------
// MappingTable

/// The mapping of every member of an entity for one kind, in declaration order.
///
/// Tables without overrides are cached by the engine per `(type, kind)`.
#[derive(Debug, Clone)]
pub struct MappingTable {
    ty: Type,
    kind: KindId,
    entries: Box<[ResolvedMapping]>,
    by_member: HashMap<&'static str, usize>,
    by_external: HashMap<String, usize>,
}

impl MappingTable {
    fn from_entries(ty: Type, kind: KindId, entries: Box<[ResolvedMapping]>) -> Self {
        let by_member = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.member_name(), index))
            .collect();

        let mut by_external = HashMap::with_capacity_and_hasher(entries.len(), FixedHashState);
        for (index, entry) in entries.iter().enumerate() {
            let external = entry.external_name().to_string();
            if let Some(first) = by_external.get(&external) {
                let first: &ResolvedMapping = &entries[*first];
                log::warn!(
                    "`{}` maps both `{}` and `{}` to {} `{}`; lookups by name find `{}`",
                    ty,
                    first.member_name(),
                    entry.member_name(),
                    kind,
                    external,
                    first.member_name(),
                );
            } else {
                by_external.insert(external, index);
            }
        }

        Self {
            ty,
            kind,
            entries,
            by_member,
            by_external,
        }
    }

    /// Returns the entity type.
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn kind(&self) -> KindId {
        self.kind
    }

    /// Returns the mapping of `member`.
    pub fn get(&self, member: &str) -> Option<&ResolvedMapping> {
        self.entries.get(*self.by_member.get(member)?)
    }

    /// Returns the mapping whose external name is `external`.
    pub fn by_external(&self, external: &str) -> Option<&ResolvedMapping> {
        self.entries.get(*self.by_external.get(external)?)
    }

    /// Iterates over all mappings in declaration order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, ResolvedMapping> {
        self.entries.iter()
    }

    /// Iterates over the mappings that take part in `direction`.
    pub fn iter_for(&self, direction: Direction) -> impl Iterator<Item = &ResolvedMapping> + '_ {
        self.entries.iter().filter(move |entry| entry.allows(direction))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a copy of this table with `overrides` applied.
    pub fn with_overrides(&self, overrides: &NameOverrides) -> Self {
        if overrides.is_empty() {
            return self.clone();
        }
        let entries = self.entries.iter().map(|e| e.with_override(overrides)).collect();
        Self::from_entries(self.ty, self.kind, entries)
    }
}

/// Resolves the mapping of every member of `info` for `kind`, without overrides.
///
/// # Errors
///
/// [`AccessError::AmbiguousMapping`] for the first member with conflicting tags.
pub fn resolve_table(info: &'static EntityInfo, kind: KindId) -> AccessResult<MappingTable> {
    let entries = info
        .members()
        .map(|member| resolve_member(member, kind, None))
        .collect::<AccessResult<Vec<_>>>()?;
    Ok(MappingTable::from_entries(*info.ty(), kind, entries.into_boxed_slice()))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{NameOverrides, NameSource, resolve_member, resolve_table};
    use crate::AccessError;
    use crate::compile::Direction;
    use crate::derive::Entity;
    use crate::info::EntityInfo;
    use crate::mapping::{KindId, MappingKind, MappingMode};

    struct Column;
    impl MappingKind for Column {
        const NAME: &'static str = "column";
    }

    struct Cell;
    impl MappingKind for Cell {
        const NAME: &'static str = "cell";
    }

    #[derive(Entity)]
    #[entity(type_path = "tests::Invoice")]
    struct Invoice {
        #[entity(map(Column, name = "invoice_id", mode = ReadOnly))]
        #[entity(map(Cell, index = 0))]
        id: u64,
        #[entity(map(Column, name = "customer"))]
        #[entity(map(Column, name = "customer"))]
        customer: String,
        #[entity(map(Cell, name = "Total", index = 2, required))]
        total: f64,
        #[entity(write_only)]
        #[entity(map(Column, mode = ReadOnly))]
        secret: String,
    }

    #[derive(Entity)]
    struct Broken {
        #[entity(map(Column, name = "a"))]
        #[entity(map(Column, name = "b"))]
        value: i32,
    }

    #[test]
    fn precedence_is_override_then_tag_then_member() {
        let info = EntityInfo::of::<Invoice>();
        let id = info.member("id").unwrap();
        let column = KindId::of::<Column>();

        let resolved = resolve_member(id, column, None).unwrap();
        assert_eq!(resolved.external_name(), "invoice_id");
        assert_eq!(resolved.source(), NameSource::Declared);

        let overrides = NameOverrides::new().rename("id", "ID");
        let resolved = resolve_member(id, column, Some(&overrides)).unwrap();
        assert_eq!(resolved.external_name(), "ID");
        assert_eq!(resolved.source(), NameSource::Override);

        let total = info.member("total").unwrap();
        let resolved = resolve_member(total, column, None).unwrap();
        assert_eq!(resolved.external_name(), "total");
        assert_eq!(resolved.source(), NameSource::Member);
    }

    #[test]
    fn kinds_do_not_leak_into_each_other() {
        let table = resolve_table(EntityInfo::of::<Invoice>(), KindId::of::<Cell>()).unwrap();
        let id = table.get("id").unwrap();
        assert_eq!(id.external_name(), "id");
        assert_eq!(id.tag().index(), Some(0));
        assert_eq!(id.tag().mode(), MappingMode::ReadWrite);

        let total = table.by_external("Total").unwrap();
        assert_eq!(total.member_name(), "total");
        assert!(total.tag().is_required());
    }

    #[test]
    fn identical_duplicates_collapse_conflicting_fail() {
        let table = resolve_table(EntityInfo::of::<Invoice>(), KindId::of::<Column>()).unwrap();
        assert_eq!(table.get("customer").unwrap().external_name(), "customer");

        let err = resolve_table(EntityInfo::of::<Broken>(), KindId::of::<Column>()).unwrap_err();
        assert!(matches!(
            err,
            AccessError::AmbiguousMapping { member: "value", kind: "column", .. }
        ));
        // Other kinds are unaffected.
        assert!(resolve_table(EntityInfo::of::<Broken>(), KindId::of::<Cell>()).is_ok());
    }

    #[test]
    fn modes_filter_directions() {
        let table = resolve_table(EntityInfo::of::<Invoice>(), KindId::of::<Column>()).unwrap();
        let readable: Vec<_> = table.iter_for(Direction::Get).map(|m| m.member_name()).collect();
        let writable: Vec<_> = table.iter_for(Direction::Set).map(|m| m.member_name()).collect();
        assert_eq!(readable, ["id", "customer", "total"]);
        // `secret` is write-only on the member but read-only for columns.
        assert_eq!(writable, ["customer", "total"]);
    }

    #[test]
    fn overrides_rebuild_external_index() {
        let table = resolve_table(EntityInfo::of::<Invoice>(), KindId::of::<Column>()).unwrap();
        let renamed = table.with_overrides(&NameOverrides::from_iter([("total", "amount")]));
        assert_eq!(renamed.by_external("amount").unwrap().member_name(), "total");
        assert!(renamed.by_external("total").is_none());
        assert!(table.by_external("total").is_some());
    }
}
