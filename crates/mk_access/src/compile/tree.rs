use alloc::boxed::Box;
use core::fmt;

use crate::coerce::{RawValue, coerce, parse_text};
use crate::compile::accessor::{check_instance, getter_fn, not_accessible, setter_fn, value_mismatch};
use crate::compile::{CompiledAccessor, Direction, Getter, Setter, Strategy};
use crate::info::{MemberInfo, Type, TypeInfo};
use crate::value::Entity;
use crate::{AccessResult, NotAccessibleReason};

// -----------------------------------------------------------------------------
// Expressions

/// An expression producing the target instance.
#[derive(Clone, Debug)]
pub enum InstanceExpr {
    /// The instance parameter of the accessor.
    Param,
    /// Checks that the operand is of type `ty`.
    Cast { operand: Box<InstanceExpr>, ty: Type },
}

/// An expression producing the value to store.
#[derive(Clone, Debug)]
pub enum ValueExpr {
    /// The value parameter of the accessor.
    Param,
    /// Converts the operand to the type described by `declared`.
    Coerce {
        operand: Box<ValueExpr>,
        declared: &'static TypeInfo,
    },
}

impl InstanceExpr {
    #[inline]
    pub fn cast(self, ty: Type) -> Self {
        Self::Cast {
            operand: Box::new(self),
            ty,
        }
    }
}

impl ValueExpr {
    #[inline]
    pub fn coerce(self, declared: &'static TypeInfo) -> Self {
        Self::Coerce {
            operand: Box::new(self),
            declared,
        }
    }
}

// -----------------------------------------------------------------------------
// AccessTree

/// The expression tree of one accessor.
///
/// # Examples
///
/// ```
/// use mk_access::compile::AccessTree;
/// use mk_access::info::EntityInfo;
/// use mk_access::prelude::*;
///
/// #[derive(Entity)]
/// #[entity(type_path = "demo::Point")]
/// struct Point { x: i32 }
///
/// let member = EntityInfo::of::<Point>().member("x").unwrap();
/// assert_eq!(AccessTree::reader(member).to_string(), "($target as demo::Point).x");
/// assert_eq!(
///     AccessTree::writer(member).to_string(),
///     "($target as demo::Point).x = coerce($value, i32)",
/// );
/// ```
#[derive(Clone, Debug)]
pub enum AccessTree {
    Read {
        instance: InstanceExpr,
        member: &'static MemberInfo,
    },
    Write {
        instance: InstanceExpr,
        member: &'static MemberInfo,
        value: ValueExpr,
    },
}

impl AccessTree {
    /// Builds the tree reading `member`.
    pub fn reader(member: &'static MemberInfo) -> Self {
        Self::Read {
            instance: InstanceExpr::Param.cast(*member.declaring()),
            member,
        }
    }

    /// Builds the tree writing `member`.
    pub fn writer(member: &'static MemberInfo) -> Self {
        Self::Write {
            instance: InstanceExpr::Param.cast(*member.declaring()),
            member,
            value: ValueExpr::Param.coerce(member.value_info()),
        }
    }

    #[inline]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::Read { .. } => Direction::Get,
            Self::Write { .. } => Direction::Set,
        }
    }

    #[inline]
    pub const fn member(&self) -> &'static MemberInfo {
        match self {
            Self::Read { member, .. } | Self::Write { member, .. } => *member,
        }
    }

    /// Compiles the tree into an accessor.
    pub fn compile(&self) -> CompiledAccessor {
        match self {
            Self::Read { instance, member } => {
                let member: &'static MemberInfo = *member;
                let instance = instance.compile_ref();
                let index = member.index();
                let func = getter_fn(move |target| {
                    let target = instance(target)?;
                    target.member_at(index).ok_or_else(|| {
                        not_accessible(member.declaring(), member.name(), Direction::Get, NotAccessibleReason::NotFound)
                    })
                });
                CompiledAccessor::Getter(Getter::new(member, Strategy::Tree, func))
            }
            Self::Write {
                instance,
                member,
                value,
            } => {
                let member: &'static MemberInfo = *member;
                let instance = instance.compile_mut();
                let value = value.compile();
                let index = member.index();
                let func = setter_fn(move |target, raw| {
                    let target = instance(target)?;
                    let value = match value(raw)? {
                        RawValue::Null => return Ok(()),
                        RawValue::Value(value) => value,
                        // Only for trees built without a coerce node.
                        RawValue::Text(text) => parse_text(&text, member.value_info())?,
                    };
                    let slot = target.member_at_mut(index).ok_or_else(|| {
                        not_accessible(member.declaring(), member.name(), Direction::Set, NotAccessibleReason::NotFound)
                    })?;
                    slot.set(value).map_err(|rejected| value_mismatch(member, &*rejected))
                });
                CompiledAccessor::Setter(Setter::new(member, Strategy::Tree, func))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Expression compilation

type InstanceFn = dyn for<'a> Fn(&'a dyn Entity) -> AccessResult<&'a dyn Entity> + Send + Sync;

type InstanceMutFn = dyn for<'a> Fn(&'a mut dyn Entity) -> AccessResult<&'a mut dyn Entity> + Send + Sync;

type ValueFn = dyn for<'v> Fn(RawValue<'v>) -> AccessResult<RawValue<'v>> + Send + Sync;

fn instance_fn<F>(f: F) -> Box<InstanceFn>
where
    F: for<'a> Fn(&'a dyn Entity) -> AccessResult<&'a dyn Entity> + Send + Sync + 'static,
{
    Box::new(f)
}

fn instance_mut_fn<F>(f: F) -> Box<InstanceMutFn>
where
    F: for<'a> Fn(&'a mut dyn Entity) -> AccessResult<&'a mut dyn Entity> + Send + Sync + 'static,
{
    Box::new(f)
}

fn value_fn<F>(f: F) -> Box<ValueFn>
where
    F: for<'v> Fn(RawValue<'v>) -> AccessResult<RawValue<'v>> + Send + Sync + 'static,
{
    Box::new(f)
}

impl InstanceExpr {
    fn compile_ref(&self) -> Box<InstanceFn> {
        match self {
            Self::Param => instance_fn(|target| Ok(target)),
            Self::Cast { operand, ty } => {
                let operand = operand.compile_ref();
                let ty = *ty;
                instance_fn(move |target| {
                    let target = operand(target)?;
                    check_instance(&ty, target.as_value())?;
                    Ok(target)
                })
            }
        }
    }

    fn compile_mut(&self) -> Box<InstanceMutFn> {
        match self {
            Self::Param => instance_mut_fn(|target| Ok(target)),
            Self::Cast { operand, ty } => {
                let operand = operand.compile_mut();
                let ty = *ty;
                instance_mut_fn(move |target| {
                    let target = operand(target)?;
                    check_instance(&ty, target.as_value())?;
                    Ok(target)
                })
            }
        }
    }
}

impl ValueExpr {
    fn compile(&self) -> Box<ValueFn> {
        match self {
            Self::Param => value_fn(|raw| Ok(raw)),
            Self::Coerce { operand, declared } => {
                let operand = operand.compile();
                let declared: &'static TypeInfo = *declared;
                value_fn(move |raw| {
                    Ok(match coerce(operand(raw)?, declared)? {
                        Some(value) => RawValue::Value(value),
                        None => RawValue::Null,
                    })
                })
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Display

impl fmt::Display for InstanceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param => f.write_str("$target"),
            Self::Cast { operand, ty } => write!(f, "({operand} as {ty})"),
        }
    }
}

impl fmt::Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param => f.write_str("$value"),
            Self::Coerce { operand, declared } => write!(f, "coerce({operand}, {})", declared.type_path()),
        }
    }
}

impl fmt::Display for AccessTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { instance, member } => write!(f, "{instance}.{}", member.name()),
            Self::Write {
                instance,
                member,
                value,
            } => write!(f, "{instance}.{} = {value}", member.name()),
        }
    }
}
