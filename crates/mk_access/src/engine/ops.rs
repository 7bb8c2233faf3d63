use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec;
use core::any::TypeId;

use crate::coerce::RawValue;
use crate::compile::{Direction, Strategy};
use crate::engine::{AccessEngine, MemberBinding};
use crate::info::EntityInfo;
use crate::mapping::{KindId, NameOverrides};
use crate::value::{Entity, List};
use crate::{AccessError, AccessResult};

impl AccessEngine {
    /// Copies every member readable on `source` into the member of the same
    /// name on `target`, if it is writable there.
    ///
    /// Values of the same type are cloned; values of different types are
    /// converted through their textual form. Returns the number of members
    /// copied.
    ///
    /// The copy is not transactional: on error, members copied so far stay
    /// written.
    ///
    /// # Errors
    ///
    /// - [`AccessError::Uncloneable`] if a shared member has a type without clone support.
    /// - Setter errors of the target, e.g. [`AccessError::FormatMismatch`] when a
    ///   converted text does not fit the target type.
    pub fn copy_members(&self, source: &dyn Entity, target: &mut dyn Entity) -> AccessResult<usize> {
        self.copy_members_with_strategy(source, target, self.config().default_strategy())
    }

    pub fn copy_members_with_strategy(
        &self,
        source: &dyn Entity,
        target: &mut dyn Entity,
        strategy: Strategy,
    ) -> AccessResult<usize> {
        let getters = self.cache().all_accessors(source.entity_info(), Direction::Get, strategy)?;
        let setters = self.cache().all_accessors(target.entity_info(), Direction::Set, strategy)?;

        let mut copied = 0;
        for (name, getter) in getters.iter() {
            let (Some(getter), Some(setter)) = (getter.as_getter(), setters.get(name).and_then(|s| s.as_setter()))
            else {
                continue;
            };
            let value = getter.get(source)?;
            let raw = if value.ty_id() == setter.member().value_ty().id() {
                RawValue::Value(value.clone_value().ok_or_else(|| AccessError::Uncloneable {
                    ty: value.reflect_type_path(),
                })?)
            } else {
                match value.to_text() {
                    Some(text) => RawValue::from(text),
                    None => {
                        return Err(AccessError::ValueMismatch {
                            member: setter.name(),
                            expected: setter.member().value_ty().path(),
                            actual: value.reflect_type_path(),
                        });
                    }
                }
            };
            setter.set(target, raw)?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Builds a list of new `element` instances, one per record.
    ///
    /// Each record is a sequence of `(external name, raw value)` pairs,
    /// resolved against the mapping of `element` for `kind` (after
    /// `overrides`). Unknown names are ignored.
    ///
    /// # Errors
    ///
    /// See [`materialize_into`](Self::materialize_into).
    pub fn materialize<'v, R, N, V>(
        &self,
        element: TypeId,
        kind: KindId,
        records: impl IntoIterator<Item = R>,
        overrides: Option<&NameOverrides>,
    ) -> AccessResult<Box<dyn List>>
    where
        R: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<RawValue<'v>>,
    {
        let mut list = self.new_list(element)?;
        self.materialize_into(&mut *list, kind, records, overrides)?;
        Ok(list)
    }

    /// Appends one new instance of the list's element type per record.
    ///
    /// Returns the number of elements appended. Not transactional: when a
    /// record fails, the elements of earlier records stay in `list` and the
    /// failing record is dropped.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotAnEntity`] if the element type has no members.
    /// - [`AccessError::NoDefaultConstructor`] if it cannot be instantiated.
    /// - [`AccessError::MissingRequired`] if a record lacks a `required` member
    ///   or gives it [`RawValue::Null`].
    /// - Setter errors such as [`AccessError::FormatMismatch`].
    pub fn materialize_into<'v, R, N, V>(
        &self,
        list: &mut dyn List,
        kind: KindId,
        records: impl IntoIterator<Item = R>,
        overrides: Option<&NameOverrides>,
    ) -> AccessResult<usize>
    where
        R: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<RawValue<'v>>,
    {
        let element = list.element_info();
        let info: &'static EntityInfo = element
            .as_entity()
            .ok_or(AccessError::NotAnEntity { ty: element.type_path() })?;
        let bindings = self.bindings_of(info, kind, Direction::Set, overrides)?;

        let mut appended = 0;
        for record in records {
            let mut instance = self.new_instance(info.type_id())?;
            let entity = instance
                .as_entity_mut()
                .ok_or(AccessError::NotAnEntity { ty: info.type_path() })?;

            let mut seen = vec![false; bindings.len()];
            for (name, raw) in record {
                let Some(position) = bindings.position(name.as_ref()) else {
                    continue;
                };
                let raw: RawValue<'v> = raw.into();
                // A null leaves the member unset, so it does not count as present.
                seen[position] |= !raw.is_null();
                if let Some(setter) = bindings.get_at(position).and_then(MemberBinding::setter) {
                    setter.set(entity, raw)?;
                }
            }

            if let Some(missing) = bindings
                .iter()
                .zip(&seen)
                .find(|(binding, seen)| binding.tag().is_required() && !**seen)
                .map(|(binding, _)| binding)
            {
                return Err(AccessError::MissingRequired {
                    ty: info.type_path(),
                    member: missing.member_name(),
                    kind: kind.name(),
                    external: missing.external_name().to_string(),
                });
            }

            list.push(instance).map_err(|rejected| AccessError::ElementMismatch {
                expected: info.type_path(),
                actual: rejected.reflect_type_path(),
            })?;
            appended += 1;
        }
        Ok(appended)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::any::TypeId;

    use crate::engine::AccessEngine;
    use crate::mapping::KindId;
    use crate::prelude::*;

    struct Csv;

    impl MappingKind for Csv {
        const NAME: &'static str = "csv column";
    }

    #[derive(Entity, Debug, Clone, PartialEq, Default)]
    #[entity(default, clone, type_path = "tests::Person")]
    struct Person {
        #[entity(map(Csv, name = "Name", required))]
        name: String,
        #[entity(map(Csv, name = "Age"))]
        age: u8,
        email: Option<String>,
    }

    #[derive(Entity, Debug, Default)]
    #[entity(type_path = "tests::Contact")]
    struct Contact {
        name: String,
        age: u32,
        #[entity(read_only)]
        email: Option<String>,
        phone: String,
    }

    #[derive(Entity)]
    #[entity(type_path = "tests::Tagged")]
    struct Tagged {
        name: String,
        tags: Vec<String>,
    }

    #[derive(Entity)]
    #[entity(type_path = "tests::Holder")]
    struct Holder {
        name: String,
        tags: String,
    }

    fn engine() -> AccessEngine {
        let mut registry = TypeRegistry::new();
        registry.register::<Person>();
        AccessEngine::new(registry)
    }

    fn ada() -> Person {
        Person {
            name: "Ada".to_string(),
            age: 36,
            email: Some("ada@example.com".to_string()),
        }
    }

    #[test]
    fn copy_between_types() {
        let engine = engine();
        let mut contact = Contact {
            phone: "555".to_string(),
            ..Contact::default()
        };
        let copied = engine.copy_members(&ada(), &mut contact).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(contact.name, "Ada");
        assert_eq!(contact.age, 36);
        assert_eq!(contact.email, None);
        assert_eq!(contact.phone, "555");
    }

    #[test]
    fn copy_same_type() {
        let engine = engine();
        let mut target = Person::default();
        assert_eq!(engine.copy_members(&ada(), &mut target).unwrap(), 3);
        assert_eq!(target, ada());
    }

    #[test]
    fn copy_without_text_form_fails() {
        let engine = engine();
        let source = Tagged {
            name: "n".to_string(),
            tags: Vec::from(["a".to_string()]),
        };
        let mut target = Holder {
            name: String::new(),
            tags: String::new(),
        };
        let err = engine.copy_members(&source, &mut target).unwrap_err();
        assert!(matches!(err, AccessError::ValueMismatch { member: "tags", .. }));
        // Not transactional.
        assert_eq!(target.name, "n");
    }

    #[test]
    fn materialize_records() {
        let engine = engine();
        let records = [
            Vec::from([("Name", "Ada"), ("Age", " 36 "), ("Unknown", "x")]),
            Vec::from([("Name", "Bob"), ("email", "bob@example.com")]),
        ];
        let list = engine
            .materialize(TypeId::of::<Person>(), KindId::of::<Csv>(), records, None)
            .unwrap();
        let people = list.into_value().take::<Vec<Person>>().ok().unwrap();

        assert_eq!(people.len(), 2);
        assert_eq!(people[0].name, "Ada");
        assert_eq!(people[0].age, 36);
        assert_eq!(people[0].email, None);
        assert_eq!(people[1].name, "Bob");
        assert_eq!(people[1].email.as_deref(), Some("bob@example.com"));
    }

    #[test]
    fn materialize_with_overrides_and_nulls() {
        let engine = engine();
        let overrides = NameOverrides::new().rename("email", "Mail");
        let records = [Vec::from([
            ("Name", RawValue::from("Cy")),
            ("Age", RawValue::Null),
            ("Mail", RawValue::value(Some("cy@example.com".to_string()))),
        ])];
        let list = engine
            .materialize(TypeId::of::<Person>(), KindId::of::<Csv>(), records, Some(&overrides))
            .unwrap();
        let people = list.into_value().take::<Vec<Person>>().ok().unwrap();
        assert_eq!(people[0].age, 0);
        assert_eq!(people[0].email.as_deref(), Some("cy@example.com"));
    }

    #[test]
    fn materialize_keeps_earlier_records() {
        let engine = engine();
        let mut list = engine.new_list(TypeId::of::<Person>()).unwrap();
        let records = [
            Vec::from([("Name", "Ada"), ("Age", "36")]),
            Vec::from([("Name", "Bob"), ("Age", "old")]),
            Vec::from([("Name", "Cy"), ("Age", "20")]),
        ];
        let err = engine
            .materialize_into(&mut *list, KindId::of::<Csv>(), records, None)
            .unwrap_err();

        assert!(matches!(err, AccessError::FormatMismatch { .. }));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn materialize_requires_required_members() {
        let engine = engine();
        let records = [Vec::from([("Age", "3")])];
        let err = engine
            .materialize(TypeId::of::<Person>(), KindId::of::<Csv>(), records, None)
            .unwrap_err();
        assert!(matches!(err, AccessError::MissingRequired { member: "name", .. }));
    }

    #[test]
    fn null_does_not_satisfy_required_members() {
        let engine = engine();
        let records = [Vec::from([("Name", RawValue::Null), ("Age", RawValue::from("3"))])];
        let err = engine
            .materialize(TypeId::of::<Person>(), KindId::of::<Csv>(), records, None)
            .unwrap_err();
        assert!(matches!(err, AccessError::MissingRequired { member: "name", .. }));
    }
}
