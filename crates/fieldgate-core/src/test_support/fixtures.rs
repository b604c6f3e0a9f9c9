use crate::{
    message::DynamicMessage,
    model::{
        field::{FieldDescriptor, FieldKind, ScalarType, StorageOptions},
        message::{FIELD_MASK, MessageDescriptor},
    },
    policy::FieldMask,
    test_support::{ADMIN, BILLING},
    value::Value,
};

const TEXT: FieldKind = FieldKind::Scalar(ScalarType::Text);

pub static ADDRESS: MessageDescriptor = MessageDescriptor::new(
    "api.Address",
    &[
        FieldDescriptor::new(1, "street", TEXT),
        FieldDescriptor::new(2, "city", TEXT),
        FieldDescriptor::new(3, "postal_code", TEXT).role(ADMIN),
    ],
);

pub static PERSON: MessageDescriptor = MessageDescriptor::new(
    "api.Person",
    &[
        FieldDescriptor::new(1, "id", TEXT)
            .readonly()
            .storage(StorageOptions::new().named("_id").identifier()),
        FieldDescriptor::new(2, "name", TEXT),
        FieldDescriptor::new(3, "secret", TEXT).role(ADMIN),
        FieldDescriptor::new(4, "address", FieldKind::Message(&ADDRESS)),
        FieldDescriptor::new(5, "tags", FieldKind::RepeatedScalar(ScalarType::Text)),
        FieldDescriptor::new(6, "age", FieldKind::Scalar(ScalarType::Int)),
        FieldDescriptor::new(7, "manager_id", TEXT).storage(StorageOptions::new().identifier()),
        FieldDescriptor::new(8, "created_by", TEXT).readonly(),
        FieldDescriptor::new(
            9,
            "previous_addresses",
            FieldKind::RepeatedMessage(&ADDRESS),
        ),
        FieldDescriptor::new(10, "score", FieldKind::Scalar(ScalarType::Float))
            .storage(StorageOptions::new().named("rating")),
        FieldDescriptor::new(11, "avatar", FieldKind::Scalar(ScalarType::Bytes)),
        FieldDescriptor::new(12, "verified", FieldKind::Scalar(ScalarType::Bool)).role(ADMIN),
        FieldDescriptor::new(13, "billing_address", FieldKind::Message(&ADDRESS)).role(BILLING),
    ],
);

pub static PERSON_REQUEST: MessageDescriptor = MessageDescriptor::new(
    "api.PersonRequest",
    &[
        FieldDescriptor::new(1, "person", FieldKind::Message(&PERSON)),
        FieldDescriptor::new(2, "update_mask", FieldKind::Message(&FIELD_MASK)),
    ],
);

/// Address with every field set.
#[must_use]
pub fn address(street: &str, city: &str, postal_code: &str) -> DynamicMessage {
    let mut out = DynamicMessage::new(&ADDRESS);
    out.put(0, Value::from(street));
    out.put(1, Value::from(city));
    out.put(2, Value::from(postal_code));

    out
}

/// Person with every field set to a non-zero value.
#[must_use]
pub fn person(id: &str) -> DynamicMessage {
    let values = [
        Value::from(id),
        Value::from("Ada"),
        Value::from("s3cr3t"),
        Value::Message(address("1 Main St", "Springfield", "12345")),
        Value::from(vec!["admin", "ops"]),
        Value::Int(36),
        Value::from("01HZX3N7Q8S4M2V6B9C1D5F7GJ"),
        Value::from("system"),
        Value::List(vec![Value::Message(address("9 Old Rd", "Shelbyville", "54321"))]),
        Value::Float(4.5),
        Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef]),
        Value::Bool(true),
        Value::Message(address("2 Bank Ave", "Capital City", "99999")),
    ];

    let mut out = DynamicMessage::new(&PERSON);
    for (index, value) in values.into_iter().enumerate() {
        out.put(index, value);
    }

    out
}

/// Envelope wrapping `person` with `mask` in the carrier field.
#[must_use]
pub fn request(person: DynamicMessage, mask: &FieldMask) -> DynamicMessage {
    let mut out = DynamicMessage::new(&PERSON_REQUEST);
    out.put(0, Value::Message(person));
    out.put(1, Value::Message(mask.to_message()));

    out
}
