use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

/// A marker type naming one external format.
///
/// # Examples
///
/// ```
/// use mk_access::mapping::{KindId, MappingKind};
///
/// pub struct Column;
///
/// impl MappingKind for Column {
///     const NAME: &'static str = "column";
/// }
///
/// assert_eq!(KindId::of::<Column>().name(), "column");
/// ```
pub trait MappingKind: 'static {
    /// A readable name for messages and logs.
    const NAME: &'static str;
}

/// The runtime identity of a [`MappingKind`].
///
/// Equality and hashing only use the `TypeId`.
#[derive(Clone, Copy)]
pub struct KindId {
    id: TypeId,
    name: &'static str,
}

impl KindId {
    #[inline]
    pub const fn of<K: MappingKind>() -> Self {
        Self {
            id: TypeId::of::<K>(),
            name: K::NAME,
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for KindId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for KindId {}

impl Hash for KindId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KindId({})", self.name)
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
