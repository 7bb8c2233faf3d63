use crate::coerce::coerce;
use crate::compile::accessor::{check_instance, getter_fn, not_accessible, setter_fn, value_mismatch};
use crate::compile::{CompiledAccessor, Direction, Getter, Setter, Strategy};
use crate::info::MemberInfo;
use crate::NotAccessibleReason;

/// Binds `member` by name. Every call looks the member up again.
pub(super) fn reflect(member: &'static MemberInfo, direction: Direction) -> CompiledAccessor {
    let ty = *member.declaring();
    let name = member.name();
    match direction {
        Direction::Get => {
            let func = getter_fn(move |target| {
                check_instance(&ty, target.as_value())?;
                target
                    .member(name)
                    .ok_or_else(|| not_accessible(&ty, name, Direction::Get, NotAccessibleReason::NotFound))
            });
            CompiledAccessor::Getter(Getter::new(member, Strategy::Reflect, func))
        }
        Direction::Set => {
            let func = setter_fn(move |target, raw| {
                check_instance(&ty, target.as_value())?;
                let info = target
                    .entity_info()
                    .member(name)
                    .ok_or_else(|| not_accessible(&ty, name, Direction::Set, NotAccessibleReason::NotFound))?;
                let Some(value) = coerce(raw, info.value_info())? else {
                    return Ok(());
                };
                let slot = target
                    .member_mut(name)
                    .ok_or_else(|| not_accessible(&ty, name, Direction::Set, NotAccessibleReason::NotFound))?;
                slot.set(value).map_err(|rejected| value_mismatch(info, &*rejected))
            });
            CompiledAccessor::Setter(Setter::new(member, Strategy::Reflect, func))
        }
    }
}
