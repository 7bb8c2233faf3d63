use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::coerce::RawValue;
use crate::compile::{Direction, Strategy};
use crate::info::{MemberInfo, Type, TypePath};
use crate::value::{Entity, Value};
use crate::{AccessError, AccessResult, NotAccessibleReason};

// -----------------------------------------------------------------------------
// Closure types

pub(crate) type GetFn = dyn for<'a> Fn(&'a dyn Entity) -> AccessResult<&'a dyn Value> + Send + Sync;

pub(crate) type SetFn = dyn Fn(&mut dyn Entity, RawValue<'_>) -> AccessResult<()> + Send + Sync;

// The bounds pin the higher-ranked signature of the closure.
#[inline]
pub(crate) fn getter_fn<F>(f: F) -> Arc<GetFn>
where
    F: for<'a> Fn(&'a dyn Entity) -> AccessResult<&'a dyn Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[inline]
pub(crate) fn setter_fn<F>(f: F) -> Arc<SetFn>
where
    F: Fn(&mut dyn Entity, RawValue<'_>) -> AccessResult<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

// -----------------------------------------------------------------------------
// Shared checks

#[inline]
pub(crate) fn check_instance(expected: &Type, target: &dyn Value) -> AccessResult<()> {
    if target.ty_id() == expected.id() {
        Ok(())
    } else {
        Err(instance_mismatch(expected, target))
    }
}

#[cold]
pub(crate) fn instance_mismatch(expected: &Type, target: &dyn Value) -> AccessError {
    AccessError::InstanceMismatch {
        expected: expected.path(),
        actual: target.reflect_type_path(),
    }
}

#[cold]
pub(crate) fn value_mismatch(member: &MemberInfo, rejected: &dyn Value) -> AccessError {
    AccessError::ValueMismatch {
        member: member.name(),
        expected: member.value_ty().path(),
        actual: rejected.reflect_type_path(),
    }
}

#[cold]
pub(crate) fn not_accessible(ty: &Type, member: &str, direction: Direction, reason: NotAccessibleReason) -> AccessError {
    AccessError::MemberNotAccessible {
        ty: ty.path(),
        member: String::from(member),
        direction,
        reason,
    }
}

// -----------------------------------------------------------------------------
// Getter

/// A compiled reader of one member.
///
/// Cheap to clone; clones share the compiled closure.
#[derive(Clone)]
pub struct Getter {
    member: &'static MemberInfo,
    strategy: Strategy,
    func: Arc<GetFn>,
}

impl Getter {
    #[inline]
    pub(crate) fn new(member: &'static MemberInfo, strategy: Strategy, func: Arc<GetFn>) -> Self {
        Self {
            member,
            strategy,
            func,
        }
    }

    /// Reads the member of `target`.
    ///
    /// # Errors
    ///
    /// [`AccessError::InstanceMismatch`] if `target` is not of the declaring type.
    #[inline]
    pub fn get<'a>(&self, target: &'a dyn Entity) -> AccessResult<&'a dyn Value> {
        (self.func)(target)
    }

    /// Reads the member of `target` as a `T`.
    pub fn get_as<'a, T: Value + TypePath>(&self, target: &'a dyn Entity) -> AccessResult<&'a T> {
        let value = self.get(target)?;
        value.downcast_ref::<T>().ok_or_else(|| AccessError::ValueMismatch {
            member: self.member.name(),
            expected: T::type_path(),
            actual: value.reflect_type_path(),
        })
    }

    /// Reads the member of `target` and renders it as text.
    ///
    /// Returns `Ok(None)` for values without a textual form.
    #[inline]
    pub fn get_text(&self, target: &dyn Entity) -> AccessResult<Option<String>> {
        Ok(self.get(target)?.to_text())
    }

    /// Reads the member of `target` and clones it.
    ///
    /// # Errors
    ///
    /// [`AccessError::Uncloneable`] if the value cannot be cloned.
    pub fn get_cloned(&self, target: &dyn Entity) -> AccessResult<Box<dyn Value>> {
        let value = self.get(target)?;
        value.clone_value().ok_or_else(|| AccessError::Uncloneable {
            ty: value.reflect_type_path(),
        })
    }

    /// Returns the bound member.
    #[inline]
    pub const fn member(&self) -> &'static MemberInfo {
        self.member
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.member.name()
    }

    /// Returns the strategy that produced this accessor.
    ///
    /// An [`Emitted`](Strategy::Emitted) request served by the tree compiler reports [`Tree`](Strategy::Tree).
    #[inline]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns `true` if both handles share one compiled closure.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("ty", self.member.declaring())
            .field("member", &self.member.name())
            .field("strategy", &self.strategy)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Setter

/// A compiled writer of one member.
///
/// Cheap to clone; clones share the compiled closure.
#[derive(Clone)]
pub struct Setter {
    member: &'static MemberInfo,
    strategy: Strategy,
    func: Arc<SetFn>,
}

impl Setter {
    #[inline]
    pub(crate) fn new(member: &'static MemberInfo, strategy: Strategy, func: Arc<SetFn>) -> Self {
        Self {
            member,
            strategy,
            func,
        }
    }

    /// Coerces `raw` to the member's type and stores it into `target`.
    ///
    /// A [`RawValue::Null`] leaves the member unchanged.
    ///
    /// # Errors
    ///
    /// - [`AccessError::InstanceMismatch`] if `target` is not of the declaring type.
    /// - [`AccessError::FormatMismatch`] if text does not match the member's grammar.
    /// - [`AccessError::ValueMismatch`] if a typed value has another type.
    #[inline]
    pub fn set<'v>(&self, target: &mut dyn Entity, raw: impl Into<RawValue<'v>>) -> AccessResult<()> {
        (self.func)(target, raw.into())
    }

    /// Stores a typed value into `target`.
    #[inline]
    pub fn set_value<T: Value>(&self, target: &mut dyn Entity, value: T) -> AccessResult<()> {
        (self.func)(target, RawValue::value(value))
    }

    /// Returns the bound member.
    #[inline]
    pub const fn member(&self) -> &'static MemberInfo {
        self.member
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.member.name()
    }

    /// Returns the strategy that produced this accessor.
    #[inline]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns `true` if both handles share one compiled closure.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("ty", self.member.declaring())
            .field("member", &self.member.name())
            .field("strategy", &self.strategy)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// CompiledAccessor

/// A compiled accessor of either direction.
#[derive(Clone, Debug)]
pub enum CompiledAccessor {
    Getter(Getter),
    Setter(Setter),
}

impl CompiledAccessor {
    #[inline]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::Getter(_) => Direction::Get,
            Self::Setter(_) => Direction::Set,
        }
    }

    /// Returns the bound member.
    #[inline]
    pub const fn member(&self) -> &'static MemberInfo {
        match self {
            Self::Getter(getter) => getter.member(),
            Self::Setter(setter) => setter.member(),
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.member().name()
    }

    #[inline]
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::Getter(getter) => getter.strategy(),
            Self::Setter(setter) => setter.strategy(),
        }
    }

    #[inline]
    pub const fn as_getter(&self) -> Option<&Getter> {
        match self {
            Self::Getter(getter) => Some(getter),
            Self::Setter(_) => None,
        }
    }

    #[inline]
    pub const fn as_setter(&self) -> Option<&Setter> {
        match self {
            Self::Setter(setter) => Some(setter),
            Self::Getter(_) => None,
        }
    }

    #[inline]
    pub fn into_getter(self) -> Option<Getter> {
        match self {
            Self::Getter(getter) => Some(getter),
            Self::Setter(_) => None,
        }
    }

    #[inline]
    pub fn into_setter(self) -> Option<Setter> {
        match self {
            Self::Setter(setter) => Some(setter),
            Self::Getter(_) => None,
        }
    }

    /// Returns `true` if both accessors share one compiled closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Getter(a), Self::Getter(b)) => a.ptr_eq(b),
            (Self::Setter(a), Self::Setter(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}
