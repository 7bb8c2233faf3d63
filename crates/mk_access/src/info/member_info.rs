use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::compile::Direction;
use crate::info::{Type, TypeInfo, TypePath, Typed};
use crate::mapping::{KindId, MappingKind, MappingMode, MappingTag};
use crate::value::Value;

// -----------------------------------------------------------------------------
// NativeAccess

/// A generated getter: borrows the member from an instance of the declaring type.
///
/// Returns `None` if the instance has another type.
pub type NativeGetFn = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Value>;

/// A generated setter: moves a value of the member's type into an instance.
///
/// Gives the value back if the instance or the value has the wrong type.
pub type NativeSetFn = fn(&mut dyn Any, Box<dyn Value>) -> Result<(), Box<dyn Value>>;

/// Direct member accessors generated by `#[derive(Entity)]`.
///
/// Used by [`Strategy::Emitted`](crate::compile::Strategy::Emitted).
#[derive(Clone, Copy, Default)]
pub struct NativeAccess {
    getter: Option<NativeGetFn>,
    setter: Option<NativeSetFn>,
}

impl NativeAccess {
    /// Creates an empty table.
    #[inline]
    pub const fn new() -> Self {
        Self {
            getter: None,
            setter: None,
        }
    }

    /// Sets the getter.
    #[inline]
    pub fn with_getter(mut self, getter: NativeGetFn) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Sets the setter.
    #[inline]
    pub fn with_setter(mut self, setter: NativeSetFn) -> Self {
        self.setter = Some(setter);
        self
    }

    #[inline]
    pub fn getter(&self) -> Option<NativeGetFn> {
        self.getter
    }

    #[inline]
    pub fn setter(&self) -> Option<NativeSetFn> {
        self.setter
    }
}

impl fmt::Debug for NativeAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeAccess")
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MemberInfo

/// A named member of an entity.
///
/// Carries everything needed to bind the member without touching an
/// instance: the declaring type, the value type, whether it can be read or
/// written, the mapping tags of every kind, and the generated accessors.
///
/// # Examples
///
/// ```
/// use mk_access::derive::Entity;
/// use mk_access::info::Typed;
///
/// #[derive(Entity, Default)]
/// struct Account {
///     #[entity(read_only)]
///     id: u64,
///     owner: String,
/// }
///
/// let info = Account::type_info().as_entity().unwrap();
/// let id = info.member("id").unwrap();
/// assert_eq!(id.index(), 0);
/// assert_eq!(id.value_ty().path(), "u64");
/// assert!(id.is_readable() && !id.is_writable());
/// ```
#[derive(Clone)]
pub struct MemberInfo {
    declaring: Type,
    name: &'static str,
    index: usize,
    value_ty: Type,
    value_info: fn() -> &'static TypeInfo,
    mode: MappingMode,
    tags: Vec<(KindId, MappingTag)>,
    native: NativeAccess,
}

impl MemberInfo {
    /// Creates a readable and writable member of `Owner` holding a `V`.
    pub fn new<Owner: TypePath, V: Typed>(index: usize, name: &'static str) -> Self {
        Self {
            declaring: Type::of::<Owner>(),
            name,
            index,
            value_ty: Type::of::<V>(),
            value_info: V::type_info,
            mode: MappingMode::ReadWrite,
            tags: Vec::new(),
            native: NativeAccess::new(),
        }
    }

    /// Restricts the member to reading or writing, for every mapping kind.
    #[inline]
    pub fn with_mode(mut self, mode: MappingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Attaches a mapping tag for kind `K`.
    #[inline]
    pub fn with_tag<K: MappingKind>(mut self, tag: MappingTag) -> Self {
        self.tags.push((KindId::of::<K>(), tag));
        self
    }

    /// Attaches the generated accessors.
    #[inline]
    pub fn with_native(mut self, native: NativeAccess) -> Self {
        self.native = native;
        self
    }

    /// Returns the type that declares this member.
    #[inline]
    pub const fn declaring(&self) -> &Type {
        &self.declaring
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declaration index.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the [`Type`] of the member's value.
    #[inline]
    pub const fn value_ty(&self) -> &Type {
        &self.value_ty
    }

    /// Returns the [`TypeInfo`] of the member's value.
    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value_info)()
    }

    /// Returns the member-level access mode.
    #[inline]
    pub const fn mode(&self) -> MappingMode {
        self.mode
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.mode.allows(Direction::Get)
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.mode.allows(Direction::Set)
    }

    /// Returns `true` if the member can be accessed in `direction`.
    #[inline]
    pub fn supports(&self, direction: Direction) -> bool {
        self.mode.allows(direction)
    }

    /// Returns every mapping tag, in declaration order.
    #[inline]
    pub fn tags(&self) -> &[(KindId, MappingTag)] {
        &self.tags
    }

    /// Returns the tags of one mapping kind.
    pub fn tags_of(&self, kind: KindId) -> impl Iterator<Item = &MappingTag> {
        self.tags.iter().filter(move |(k, _)| *k == kind).map(|(_, tag)| tag)
    }

    /// Returns the generated accessors.
    #[inline]
    pub const fn native(&self) -> &NativeAccess {
        &self.native
    }

    #[inline]
    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("declaring", &self.declaring)
            .field("name", &self.name)
            .field("index", &self.index)
            .field("value_ty", &self.value_ty)
            .field("mode", &self.mode)
            .field("tags", &self.tags)
            .field("native", &self.native)
            .finish()
    }
}
