use crate::wire::{
    WireError, decode::parse_mask, decode_message, encode_error, encode_message, to_json_string,
};
use fieldgate_core::{
    error::{Error, ErrorClass, ErrorOrigin},
    message::DynamicMessage,
    model::{
        field::{FieldDescriptor, FieldKind, ScalarType},
        message::{FIELD_MASK, MessageDescriptor},
    },
    policy::FieldMask,
    test_support::fixtures::{PERSON, PERSON_REQUEST, person, request},
    value::Value,
};
use serde_json::json;

const ID: &str = "01HZX3N7Q8S4M2V6B9C1D5F7GH";

static POSTAL: MessageDescriptor = MessageDescriptor::new(
    "test.Postal",
    &[
        FieldDescriptor::new(1, "address_line1", FieldKind::Scalar(ScalarType::Text)),
        FieldDescriptor::new(2, "address_line2", FieldKind::Scalar(ScalarType::Text)),
    ],
);

static POSTAL_REQUEST: MessageDescriptor = MessageDescriptor::new(
    "test.PostalRequest",
    &[
        FieldDescriptor::new(1, "postal", FieldKind::Message(&POSTAL)),
        FieldDescriptor::new(2, "update_mask", FieldKind::Message(&FIELD_MASK)),
    ],
);

#[test]
fn envelope_with_mask_string_decodes() {
    let body = json!({
        "person": {
            "name": "Ada",
            "address": { "postalCode": "12345", "city": "Springfield" },
            "tags": ["a", "b"],
            "age": "36",
            "score": 4.5,
            "avatar": "3q2+7w==",
            "previous_addresses": [{ "street": "9 Old Rd" }]
        },
        "updateMask": "person.name, person.address.postalCode,person.previousAddresses"
    });

    let msg = decode_message(&body.to_string(), &PERSON_REQUEST).unwrap();
    let person = msg.message("person").unwrap();

    assert_eq!(person.text("name"), Some("Ada"));
    assert_eq!(person.message("address").unwrap().text("postal_code"), Some("12345"));
    assert_eq!(person.get("age"), Some(&Value::Int(36)));
    assert_eq!(person.get("avatar"), Some(&Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef])));
    assert_eq!(
        FieldMask::find_in(&msg),
        Some(FieldMask::from_paths([
            "person.name",
            "person.address.postal_code",
            "person.previous_addresses",
        ]))
    );
}

#[test]
fn mask_object_form_is_accepted() {
    let body = json!({ "updateMask": { "paths": ["person.name"] } });
    let msg = decode_message(&body.to_string(), &PERSON_REQUEST).unwrap();

    assert_eq!(
        FieldMask::find_in(&msg),
        Some(FieldMask::from_paths(["person.name"]))
    );
}

#[test]
fn unknown_keys_are_decode_errors() {
    let err = decode_message(r#"{ "nickname": "Addy" }"#, &PERSON).unwrap_err();

    assert!(matches!(
        err,
        WireError::UnknownField { message: "api.Person", ref key } if key == "nickname"
    ));
    assert_eq!(Error::from(err).class, ErrorClass::Decode);
}

#[test]
fn malformed_values_report_their_path() {
    let cases = [
        (json!({ "age": "thirty" }), "age"),
        (json!({ "address": { "city": 5 } }), "address.city"),
        (json!({ "tags": ["a", 1] }), "tags[1]"),
        (json!({ "address": [] }), "address"),
    ];

    for (body, expected) in cases {
        match decode_message(&body.to_string(), &PERSON).unwrap_err() {
            WireError::Type { path, .. } => assert_eq!(path, expected),
            other => panic!("unexpected error: {other}"),
        }
    }

    assert!(matches!(
        decode_message(r#"{ "avatar": "***" }"#, &PERSON),
        Err(WireError::Base64 { .. })
    ));
    assert!(matches!(
        decode_message("{ not json", &PERSON),
        Err(WireError::Syntax(_))
    ));
}

#[test]
fn null_decodes_as_zero() {
    let msg = decode_message(r#"{ "name": null, "address": null }"#, &PERSON).unwrap();

    assert!(msg.is_zero());
}

#[test]
fn encode_leaves_out_unpopulated_fields() {
    let msg = DynamicMessage::new(&PERSON)
        .with("name", "Ada")
        .and_then(|m| m.with("age", Value::Int(36)))
        .unwrap();

    assert_eq!(encode_message(&msg), json!({ "name": "Ada", "age": "36" }));
}

#[test]
fn messages_survive_the_wire() {
    let mask = FieldMask::from_paths(["person.name", "person.address.postal_code"]);
    let original = request(person(ID), &mask);

    let text = to_json_string(&original);
    assert!(text.contains("\"updateMask\":\"person.address.postalCode,person.name\""));
    assert!(text.contains("\"previousAddresses\""));

    assert_eq!(decode_message(&text, &PERSON_REQUEST).unwrap(), original);
}

#[test]
fn mask_strings_map_camel_segments_to_field_names() {
    let mask = parse_mask("person.managerId, ,person.created_by,", &PERSON_REQUEST);

    assert_eq!(
        mask,
        FieldMask::from_paths(["person.manager_id", "person.created_by"])
    );
}

#[test]
fn mask_segments_with_digits_resolve_to_field_names() {
    let mask = parse_mask(
        "postal.addressLine1,postal.address_line2,postal.lineThree",
        &POSTAL_REQUEST,
    );

    assert_eq!(
        mask,
        FieldMask::from_paths([
            "postal.address_line1",
            "postal.address_line2",
            "postal.lineThree",
        ])
    );
    assert!(POSTAL_REQUEST.resolve_path("postal.address_line1").is_some());
}

#[test]
fn envelope_mask_resolves_against_the_request_type() {
    let body = json!({
        "postal": { "addressLine1": "1 Main St" },
        "updateMask": "postal.addressLine1"
    });

    let msg = decode_message(&body.to_string(), &POSTAL_REQUEST).unwrap();

    assert_eq!(
        FieldMask::find_in(&msg),
        Some(FieldMask::from_paths(["postal.address_line1"]))
    );
}

#[test]
fn error_body_carries_status_and_class() {
    let err = Error::new(ErrorClass::NotFound, ErrorOrigin::Store, "document not found");
    let body: serde_json::Value = serde_json::from_str(&encode_error(&err)).unwrap();

    assert_eq!(
        body,
        json!({
            "status": 404,
            "class": "not_found",
            "origin": "store",
            "message": "document not found",
        })
    );
}
