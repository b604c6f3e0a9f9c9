use crate::{
    error::{Error, ErrorClass, ErrorOrigin},
    model::{
        field::{Coercion, FieldDescriptor, ScalarType},
        message::MessageDescriptor,
    },
};
use std::{
    collections::{BTreeMap, BTreeSet},
    ptr,
};
use thiserror::Error as ThisError;

///
/// SchemaError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("message type '{name}' registered twice with different definitions")]
    ConflictingType { name: &'static str },

    #[error("duplicate field name '{field}' in '{message}'")]
    DuplicateFieldName {
        message: &'static str,
        field: &'static str,
    },

    #[error("duplicate field number {number} in '{message}'")]
    DuplicateFieldNumber { message: &'static str, number: u32 },

    #[error("duplicate storage key '{key}' in '{message}'")]
    DuplicateStorageKey { message: &'static str, key: String },

    #[error("empty required role on '{message}.{field}'")]
    EmptyRole {
        message: &'static str,
        field: &'static str,
    },

    #[error("identifier coercion requires a text field: '{message}.{field}'")]
    IdentifierOnNonText {
        message: &'static str,
        field: &'static str,
    },

    #[error("key field '{message}.{field}' must be a singular identifier text field")]
    InvalidKeyField {
        message: &'static str,
        field: &'static str,
    },

    #[error("field '{message}.{field}' does not hold a '{expected}' message")]
    NotAMessageField {
        message: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("field number 0 is reserved: '{message}.{field}'")]
    ReservedFieldNumber {
        message: &'static str,
        field: &'static str,
    },

    #[error("field '{field}' not found in '{message}'")]
    UnknownField { message: &'static str, field: String },

    #[error("message type '{0}' is not registered")]
    UnknownType(String),
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Schema, err.to_string())
    }
}

///
/// SchemaRegistry
///
/// Validated set of message descriptors, filled once at startup and then
/// only read. Registering a type also registers every nested type.
///

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    types: BTreeMap<&'static str, &'static MessageDescriptor>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a descriptor tree.
    pub fn register(&mut self, descriptor: &'static MessageDescriptor) -> Result<(), SchemaError> {
        let mut pending = vec![descriptor];

        while let Some(next) = pending.pop() {
            match self.types.get(next.name) {
                Some(existing) if ptr::eq(*existing, next) => continue,
                Some(_) => return Err(SchemaError::ConflictingType { name: next.name }),
                None => {}
            }

            validate_descriptor(next)?;
            self.types.insert(next.name, next);

            pending.extend(next.fields.iter().filter_map(|f| f.kind.nested()));
        }

        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static MessageDescriptor> {
        self.types.get(name).copied()
    }

    pub fn try_get(&self, name: &str) -> Result<&'static MessageDescriptor, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static MessageDescriptor> + '_ {
        self.types.values().copied()
    }
}

// Local invariants of one message type; nested types are checked on their own.
fn validate_descriptor(descriptor: &'static MessageDescriptor) -> Result<(), SchemaError> {
    let message = descriptor.name;
    let mut numbers = BTreeSet::new();
    let mut names = BTreeSet::new();
    let mut keys = BTreeSet::new();

    for field in descriptor.fields {
        if field.number == 0 {
            return Err(SchemaError::ReservedFieldNumber {
                message,
                field: field.name,
            });
        }
        if !numbers.insert(field.number) {
            return Err(SchemaError::DuplicateFieldNumber {
                message,
                number: field.number,
            });
        }
        if !names.insert(field.name) {
            return Err(SchemaError::DuplicateFieldName {
                message,
                field: field.name,
            });
        }

        let key = field.storage_key().into_owned();
        if !keys.insert(key.clone()) {
            return Err(SchemaError::DuplicateStorageKey { message, key });
        }

        validate_annotations(message, field)?;
    }

    Ok(())
}

fn validate_annotations(message: &'static str, field: &FieldDescriptor) -> Result<(), SchemaError> {
    if field.required_role().is_some_and(str::is_empty) {
        return Err(SchemaError::EmptyRole {
            message,
            field: field.name,
        });
    }

    if field.coercion() == Coercion::Identifier
        && field.kind.scalar() != Some(ScalarType::Text)
    {
        return Err(SchemaError::IdentifierOnNonText {
            message,
            field: field.name,
        });
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{
            field::{FieldKind, StorageOptions},
            message::FIELD_MASK,
        },
        test_support::fixtures::{ADDRESS, PERSON, PERSON_REQUEST},
    };

    static DUPLICATE_NUMBER: MessageDescriptor = MessageDescriptor::new(
        "test.DuplicateNumber",
        &[
            FieldDescriptor::new(1, "a", FieldKind::Scalar(ScalarType::Text)),
            FieldDescriptor::new(1, "b", FieldKind::Scalar(ScalarType::Text)),
        ],
    );

    static CLASHING_KEYS: MessageDescriptor = MessageDescriptor::new(
        "test.ClashingKeys",
        &[
            FieldDescriptor::new(1, "user_id", FieldKind::Scalar(ScalarType::Text)),
            FieldDescriptor::new(2, "owner", FieldKind::Scalar(ScalarType::Text))
                .storage(StorageOptions::new().named("userId")),
        ],
    );

    static BAD_IDENTIFIER: MessageDescriptor = MessageDescriptor::new(
        "test.BadIdentifier",
        &[FieldDescriptor::new(1, "id", FieldKind::Scalar(ScalarType::Int))
            .storage(StorageOptions::new().identifier())],
    );

    static EMPTY_ROLE: MessageDescriptor = MessageDescriptor::new(
        "test.EmptyRole",
        &[FieldDescriptor::new(1, "secret", FieldKind::Scalar(ScalarType::Text)).role("")],
    );

    static IMPOSTOR_PERSON: MessageDescriptor = MessageDescriptor::new("api.Person", &[]);

    static TREE: MessageDescriptor = MessageDescriptor::new(
        "test.Tree",
        &[
            FieldDescriptor::new(1, "label", FieldKind::Scalar(ScalarType::Text)),
            FieldDescriptor::new(2, "children", FieldKind::RepeatedMessage(&TREE)),
        ],
    );

    #[test]
    fn register_walks_nested_types() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(&PERSON_REQUEST)
            .expect("fixture schema should validate");

        assert!(registry.contains(PERSON_REQUEST.name));
        assert!(registry.contains(PERSON.name));
        assert!(registry.contains(ADDRESS.name));
        assert!(registry.contains(FIELD_MASK.name));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn register_is_idempotent_and_tolerates_cycles() {
        let mut registry = SchemaRegistry::new();
        registry.register(&TREE).expect("recursive schema should validate");
        registry.register(&TREE).expect("re-registering should be a no-op");

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_rejects_conflicting_type_names() {
        let mut registry = SchemaRegistry::new();
        registry.register(&PERSON).expect("person should register");

        let err = registry.register(&IMPOSTOR_PERSON).unwrap_err();
        assert_eq!(err, SchemaError::ConflictingType { name: "api.Person" });
    }

    #[test]
    fn register_rejects_invalid_descriptors() {
        let cases: [(&'static MessageDescriptor, fn(&SchemaError) -> bool); 4] = [
            (&DUPLICATE_NUMBER, |e| {
                matches!(e, SchemaError::DuplicateFieldNumber { number: 1, .. })
            }),
            (&CLASHING_KEYS, |e| {
                matches!(e, SchemaError::DuplicateStorageKey { key, .. } if key == "userId")
            }),
            (&BAD_IDENTIFIER, |e| {
                matches!(e, SchemaError::IdentifierOnNonText { field: "id", .. })
            }),
            (&EMPTY_ROLE, |e| {
                matches!(e, SchemaError::EmptyRole { field: "secret", .. })
            }),
        ];

        for (descriptor, check) in cases {
            let err = SchemaRegistry::new().register(descriptor).unwrap_err();
            assert!(check(&err), "unexpected error for {}: {err}", descriptor.name);
        }
    }

    #[test]
    fn try_get_reports_unknown_types() {
        let registry = SchemaRegistry::new();

        assert_eq!(
            registry.try_get("api.Missing").unwrap_err(),
            SchemaError::UnknownType("api.Missing".to_string())
        );
    }
}
