use alloc::boxed::Box;

use mk_utils::hash::HashMap;

use crate::info::{MemberInfo, Type, TypeInfo, TypePath, Typed, impl_type_fn};

/// Information about an entity: a type with named members.
///
/// Members keep declaration order. Enumerating them is restartable and
/// always yields the same sequence.
///
/// # Examples
///
/// ```
/// use mk_access::derive::Entity;
/// use mk_access::info::Typed;
///
/// #[derive(Entity)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let info = Point::type_info().as_entity().unwrap();
/// assert_eq!(info.member_len(), 2);
/// assert_eq!(info.index_of("y"), Some(1));
/// let names: Vec<_> = info.members().map(|m| m.name()).collect();
/// assert_eq!(names, ["x", "y"]);
/// ```
#[derive(Clone, Debug)]
pub struct EntityInfo {
    ty: Type,
    members: Box<[MemberInfo]>,
    index: HashMap<&'static str, usize>,
}

impl EntityInfo {
    impl_type_fn!(ty);

    /// Creates a new [`EntityInfo`].
    ///
    /// Members are re-indexed in the given order.
    pub fn new<T: TypePath>(members: &[MemberInfo]) -> Self {
        let members: Box<[MemberInfo]> = members
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let mut member = member.clone();
                member.set_index(index);
                member
            })
            .collect();
        let index = members
            .iter()
            .map(|member| (member.name(), member.index()))
            .collect();

        Self {
            ty: Type::of::<T>(),
            members,
            index,
        }
    }

    /// Returns the [`EntityInfo`] of `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not an entity. Intended for generated code.
    pub fn of<T: Typed>() -> &'static EntityInfo {
        match T::type_info() {
            TypeInfo::Entity(info) => info,
            other => panic!("`{}` is a {}, not an Entity", other.type_path(), other.kind()),
        }
    }

    /// Returns the member called `name`.
    #[inline]
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members.get(*self.index.get(name)?)
    }

    /// Returns the member at declaration index `index`.
    #[inline]
    pub fn member_at(&self, index: usize) -> Option<&MemberInfo> {
        self.members.get(index)
    }

    /// Returns the declaration index of `name`.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Iterates over the members in declaration order.
    #[inline]
    pub fn members(&self) -> core::slice::Iter<'_, MemberInfo> {
        self.members.iter()
    }

    /// Iterates over the member names in declaration order.
    pub fn member_names(&self) -> impl ExactSizeIterator<Item = &'static str> + Clone + '_ {
        self.members.iter().map(MemberInfo::name)
    }

    #[inline]
    pub fn member_len(&self) -> usize {
        self.members.len()
    }
}
