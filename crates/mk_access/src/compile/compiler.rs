use crate::compile::accessor::not_accessible;
use crate::compile::tree::AccessTree;
use crate::compile::{CompiledAccessor, Direction, Strategy, reflect};
use crate::info::{EntityInfo, MemberInfo};
use crate::{AccessResult, NotAccessibleReason};

/// Compiles the accessor of `member` on the entity described by `info`.
///
/// No caching happens here; see [`AccessorCache`](crate::cache::AccessorCache).
///
/// # Errors
///
/// [`AccessError::MemberNotAccessible`](crate::AccessError::MemberNotAccessible)
/// if the member does not exist or does not support `direction`.
///
/// # Examples
///
/// ```
/// use mk_access::compile::compile;
/// use mk_access::info::EntityInfo;
/// use mk_access::prelude::*;
///
/// #[derive(Entity)]
/// struct Point { x: i32, y: i32 }
///
/// let info = EntityInfo::of::<Point>();
/// let setter = compile(info, "y", Direction::Set, Strategy::Tree).unwrap().into_setter().unwrap();
///
/// let mut p = Point { x: 1, y: 2 };
/// setter.set(&mut p, " 7 ").unwrap();
/// assert_eq!(p.y, 7);
///
/// assert!(compile(info, "z", Direction::Get, Strategy::Tree).is_err());
/// ```
pub fn compile(
    info: &'static EntityInfo,
    member: &str,
    direction: Direction,
    strategy: Strategy,
) -> AccessResult<CompiledAccessor> {
    let Some(member_info) = info.member(member) else {
        return Err(not_accessible(info.ty(), member, direction, NotAccessibleReason::NotFound));
    };
    if !member_info.supports(direction) {
        let reason = match direction {
            Direction::Get => NotAccessibleReason::NotReadable,
            Direction::Set => NotAccessibleReason::NotWritable,
        };
        return Err(not_accessible(info.ty(), member, direction, reason));
    }

    Ok(match strategy {
        Strategy::Tree => compile_tree(member_info, direction),
        Strategy::Emitted => emit_or_compile_tree(member_info, direction),
        Strategy::Reflect => reflect::reflect(member_info, direction),
    })
}

fn compile_tree(member: &'static MemberInfo, direction: Direction) -> CompiledAccessor {
    let tree = match direction {
        Direction::Get => AccessTree::reader(member),
        Direction::Set => AccessTree::writer(member),
    };
    log::trace!("compiling `{tree}`");
    tree.compile()
}

#[cfg(feature = "native_backend")]
fn emit_or_compile_tree(member: &'static MemberInfo, direction: Direction) -> CompiledAccessor {
    match super::emit::emit(member, direction) {
        Some(accessor) => accessor,
        None => {
            log::debug!(
                "`{}::{}` has no generated {direction} accessor, using the tree compiler",
                member.declaring(),
                member.name(),
            );
            compile_tree(member, direction)
        }
    }
}

#[cfg(not(feature = "native_backend"))]
fn emit_or_compile_tree(member: &'static MemberInfo, direction: Direction) -> CompiledAccessor {
    log::debug!(
        "native backend disabled, compiling `{}::{}` with the tree compiler",
        member.declaring(),
        member.name(),
    );
    compile_tree(member, direction)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use crate::compile::{AccessTree, Direction, InstanceExpr, Strategy, ValueExpr, compile};
    use crate::info::EntityInfo;
    use crate::prelude::*;
    use crate::{AccessError, NotAccessibleReason};

    #[derive(Entity, Debug, PartialEq)]
    #[entity(type_path = "tests::Account")]
    struct Account {
        id: u64,
        owner: String,
        balance: Option<f64>,
        #[entity(read_only)]
        created: String,
        #[entity(write_only)]
        secret: String,
    }

    #[derive(Entity)]
    #[entity(type_path = "tests::Other")]
    struct Other {
        id: u64,
    }

    const STRATEGIES: [Strategy; 3] = [Strategy::Tree, Strategy::Emitted, Strategy::Reflect];

    fn account() -> Account {
        Account {
            id: 7,
            owner: "ada".to_string(),
            balance: None,
            created: "2024-01-01".to_string(),
            secret: String::new(),
        }
    }

    #[test]
    fn strategies_agree() {
        let info = EntityInfo::of::<Account>();
        for strategy in STRATEGIES {
            let mut acc = account();
            let get = compile(info, "id", Direction::Get, strategy).unwrap().into_getter().unwrap();
            let set = compile(info, "id", Direction::Set, strategy).unwrap().into_setter().unwrap();

            assert_eq!(get.get_as::<u64>(&acc), Ok(&7));
            set.set(&mut acc, "42").unwrap();
            assert_eq!(acc.id, 42);
            set.set_value(&mut acc, 43_u64).unwrap();
            assert_eq!(get.get_text(&acc), Ok(Some("43".to_string())));

            let err = set.set(&mut acc, "4x2").unwrap_err();
            assert!(matches!(err, AccessError::FormatMismatch { .. }), "{strategy}: {err}");
            assert_eq!(acc.id, 43);
        }
    }

    #[test]
    fn reported_strategy() {
        let info = EntityInfo::of::<Account>();
        let tree = compile(info, "owner", Direction::Get, Strategy::Tree).unwrap();
        let reflect = compile(info, "owner", Direction::Get, Strategy::Reflect).unwrap();
        assert_eq!(tree.strategy(), Strategy::Tree);
        assert_eq!(reflect.strategy(), Strategy::Reflect);

        let emitted = compile(info, "owner", Direction::Get, Strategy::Emitted).unwrap();
        if cfg!(feature = "native_backend") {
            assert_eq!(emitted.strategy(), Strategy::Emitted);
        } else {
            assert_eq!(emitted.strategy(), Strategy::Tree);
        }
    }

    #[test]
    fn null_leaves_member_unchanged() {
        let info = EntityInfo::of::<Account>();
        for strategy in STRATEGIES {
            let mut acc = account();
            let set = compile(info, "owner", Direction::Set, strategy).unwrap().into_setter().unwrap();
            set.set(&mut acc, RawValue::Null).unwrap();
            assert_eq!(acc.owner, "ada");
        }
    }

    #[test]
    fn optional_members() {
        let info = EntityInfo::of::<Account>();
        for strategy in STRATEGIES {
            let mut acc = account();
            let set = compile(info, "balance", Direction::Set, strategy).unwrap().into_setter().unwrap();
            set.set(&mut acc, "12.5").unwrap();
            assert_eq!(acc.balance, Some(12.5));
            set.set(&mut acc, "  ").unwrap();
            assert_eq!(acc.balance, None);
            set.set_value(&mut acc, Some(1.0_f64)).unwrap();
            assert_eq!(acc.balance, Some(1.0));
        }
    }

    #[test]
    fn access_modes() {
        let info = EntityInfo::of::<Account>();
        let err = compile(info, "created", Direction::Set, Strategy::Tree).unwrap_err();
        assert!(matches!(
            err,
            AccessError::MemberNotAccessible { reason: NotAccessibleReason::NotWritable, .. }
        ));
        let err = compile(info, "secret", Direction::Get, Strategy::Tree).unwrap_err();
        assert!(matches!(
            err,
            AccessError::MemberNotAccessible { reason: NotAccessibleReason::NotReadable, .. }
        ));
        assert!(compile(info, "created", Direction::Get, Strategy::Tree).is_ok());
        assert!(compile(info, "secret", Direction::Set, Strategy::Tree).is_ok());

        let err = compile(info, "missing", Direction::Get, Strategy::Emitted).unwrap_err();
        assert_eq!(
            err.to_string(),
            "member `missing` of `tests::Account` is not accessible for get: no such member"
        );
    }

    #[test]
    fn wrong_instance_and_value() {
        let info = EntityInfo::of::<Account>();
        for strategy in STRATEGIES {
            let get = compile(info, "id", Direction::Get, strategy).unwrap().into_getter().unwrap();
            let set = compile(info, "id", Direction::Set, strategy).unwrap().into_setter().unwrap();

            let mut other = Other { id: 1 };
            assert!(matches!(get.get(&other), Err(AccessError::InstanceMismatch { .. })));
            assert!(matches!(set.set(&mut other, "2"), Err(AccessError::InstanceMismatch { .. })));
            assert_eq!(other.id, 1);

            let mut acc = account();
            let err = set.set_value(&mut acc, "text".to_string()).unwrap_err();
            assert!(matches!(err, AccessError::ValueMismatch { member: "id", .. }), "{strategy}: {err}");
        }
    }

    #[test]
    fn tree_display() {
        let info = EntityInfo::of::<Account>();
        let member = info.member("balance").unwrap();
        assert_eq!(
            crate::compile::AccessTree::writer(member).to_string(),
            "($target as tests::Account).balance = coerce($value, core::option::Option<f64>)"
        );
    }

    #[test]
    fn writer_without_coercion_parses_text() {
        let member = EntityInfo::of::<Account>().member("id").unwrap();
        let tree = AccessTree::Write {
            instance: InstanceExpr::Param.cast(*member.declaring()),
            member,
            value: ValueExpr::Param,
        };
        assert_eq!(tree.to_string(), "($target as tests::Account).id = $value");

        let set = tree.compile().into_setter().unwrap();
        let mut acc = account();
        set.set(&mut acc, " 9 ").unwrap();
        assert_eq!(acc.id, 9);
        assert!(set.set(&mut acc, "nine").is_err());
    }
}
