use crate::coerce::coerce;
use crate::compile::accessor::{check_instance, getter_fn, instance_mismatch, setter_fn, value_mismatch};
use crate::compile::{CompiledAccessor, Direction, Getter, Setter, Strategy};
use crate::info::MemberInfo;

/// Binds the accessor generated by `#[derive(Entity)]` for `member`.
///
/// Returns `None` if the type did not generate one for `direction`.
pub(super) fn emit(member: &'static MemberInfo, direction: Direction) -> Option<CompiledAccessor> {
    let ty = *member.declaring();
    match direction {
        Direction::Get => {
            let get = member.native().getter()?;
            let func = getter_fn(move |target| {
                get(target.as_any()).ok_or_else(|| instance_mismatch(&ty, target.as_value()))
            });
            Some(CompiledAccessor::Getter(Getter::new(member, Strategy::Emitted, func)))
        }
        Direction::Set => {
            let set = member.native().setter()?;
            let func = setter_fn(move |target, raw| {
                check_instance(&ty, target.as_value())?;
                let Some(value) = coerce(raw, member.value_info())? else {
                    return Ok(());
                };
                set(target.as_any_mut(), value).map_err(|rejected| value_mismatch(member, &*rejected))
            });
            Some(CompiledAccessor::Setter(Setter::new(member, Strategy::Emitted, func)))
        }
    }
}
