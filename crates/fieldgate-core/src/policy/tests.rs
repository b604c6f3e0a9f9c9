use crate::{
    message::{DynamicMessage, MessageError},
    model::message::MessageDescriptor,
    policy::{
        CallerContext, FieldMask, RedactionReason, RedactionReport, merge, merge_into,
        redact_for_read, redact_for_read_with_report,
    },
    test_support::{
        ADMIN, BILLING, USER, caller,
        credentials::Credentials,
        fixtures::{ADDRESS, PERSON, PERSON_REQUEST, address, person, request},
    },
    value::Value,
};
use proptest::prelude::*;

// ---- helpers -----------------------------------------------------------

const BASELINE_ID: &str = "01HZX3N7Q8S4M2V6B9C1D5F7GH";

/// Every leaf path of `api.Person`, as field masks name them.
const PERSON_LEAVES: [&str; 17] = [
    "id",
    "name",
    "secret",
    "address.street",
    "address.city",
    "address.postal_code",
    "tags",
    "age",
    "manager_id",
    "created_by",
    "previous_addresses",
    "score",
    "avatar",
    "verified",
    "billing_address.street",
    "billing_address.city",
    "billing_address.postal_code",
];

// A person differing from the fixture in every leaf.
fn incoming_person() -> DynamicMessage {
    DynamicMessage::new(&PERSON)
        .with("id", "01J0000000000000000000000Z")
        .and_then(|m| m.with("name", "Mallory"))
        .and_then(|m| m.with("secret", "leaked"))
        .and_then(|m| {
            m.with(
                "address",
                Value::Message(address("7 New St", "Ogdenville", "00000")),
            )
        })
        .and_then(|m| m.with("tags", vec!["guest"]))
        .and_then(|m| m.with("age", Value::Int(99)))
        .and_then(|m| m.with("manager_id", "01J0000000000000000000000Y"))
        .and_then(|m| m.with("created_by", "intruder"))
        .and_then(|m| m.with("previous_addresses", Value::List(vec![])))
        .and_then(|m| m.with("score", Value::Float(0.5)))
        .and_then(|m| m.with("avatar", Value::Bytes(vec![1])))
        .and_then(|m| m.with("verified", Value::Bool(false)))
        .and_then(|m| {
            m.with(
                "billing_address",
                Value::Message(address("8 Vault Ln", "North Haverbrook", "11111")),
            )
        })
        .unwrap()
}

// Value at a dotted path through singular message fields.
fn value_at(msg: &DynamicMessage, path: &str) -> Value {
    let mut current = msg;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let value = current.get(segment).unwrap();
        if segments.peek().is_none() {
            return value.clone();
        }
        current = value.as_message().unwrap();
    }

    unreachable!("empty path")
}

// Whether `caller` holds every role guarding `path` or its ancestors.
fn authorized(descriptor: &'static MessageDescriptor, path: &str, caller: &CallerContext) -> bool {
    let mut fields = descriptor.fields;

    for segment in path.split('.') {
        let field = fields.iter().find(|f| f.name == segment).unwrap();
        if !caller.may_access(field) {
            return false;
        }
        if let Some(nested) = field.kind.nested() {
            fields = nested.fields;
        }
    }

    true
}

fn is_readonly(path: &str) -> bool {
    PERSON.resolve_path(path).unwrap().is_readonly()
}

// ---- scenarios ---------------------------------------------------------

#[test]
fn read_redaction_clears_fields_the_caller_cannot_see() {
    let mut msg = DynamicMessage::new(&PERSON)
        .with("name", "Alice")
        .and_then(|m| m.with("secret", "X"))
        .unwrap();

    redact_for_read(&mut msg, &caller(&[USER])).unwrap();

    assert_eq!(msg.text("name"), Some("Alice"));
    assert_eq!(msg.text("secret"), Some(""));
}

#[test]
fn merge_copies_only_masked_fields() {
    let baseline = DynamicMessage::new(&PERSON)
        .with("name", "old")
        .and_then(|m| m.with("secret", "old2"))
        .unwrap();
    let input = DynamicMessage::new(&PERSON)
        .with("name", "new")
        .and_then(|m| m.with("secret", "new2"))
        .unwrap();

    let merged = merge(
        &input,
        &FieldMask::from_paths(["name"]),
        &caller(&[ADMIN]),
        &baseline,
    )
    .unwrap();

    assert_eq!(merged.text("name"), Some("new"));
    assert_eq!(merged.text("secret"), Some("old2"));
}

#[test]
fn merge_never_touches_readonly_fields() {
    let baseline = person(BASELINE_ID);
    let input = DynamicMessage::new(&PERSON).with("id", "hacked").unwrap();

    let merged = merge(
        &input,
        &FieldMask::from_paths(["id"]),
        &caller(&[ADMIN, BILLING]),
        &baseline,
    )
    .unwrap();

    assert_eq!(merged.text("id"), Some(BASELINE_ID));
}

// ---- write path --------------------------------------------------------

#[test]
fn merge_follows_nested_paths_through_the_envelope() {
    let baseline = request(person(BASELINE_ID), &FieldMask::new());
    let mask = FieldMask::from_paths(["person.address.city", "person.name"]);
    let input = request(incoming_person(), &mask);

    let merged = merge(&input, &mask, &caller(&[USER]), &baseline).unwrap();
    let merged_person = merged.message("person").unwrap();

    assert_eq!(merged_person.text("name"), Some("Mallory"));
    assert_eq!(
        merged_person.message("address").unwrap().text("city"),
        Some("Ogdenville")
    );
    assert_eq!(
        merged_person.message("address").unwrap().text("street"),
        Some("1 Main St")
    );
    assert_eq!(merged_person.text("secret"), Some("s3cr3t"));

    // the mask carrier is never merged
    assert_eq!(merged.message("update_mask"), baseline.message("update_mask"));
}

#[test]
fn merge_descends_into_zero_baseline_messages() {
    let baseline = DynamicMessage::new(&PERSON);
    let merged = merge(
        &incoming_person(),
        &FieldMask::from_paths(["address.street"]),
        &caller(&[]),
        &baseline,
    )
    .unwrap();

    let address = merged.message("address").unwrap();
    assert_eq!(address.text("street"), Some("7 New St"));
    assert_eq!(address.text("city"), Some(""));
}

#[test]
fn merge_skips_message_fields_guarded_by_a_missing_role() {
    let baseline = person(BASELINE_ID);
    let mask = FieldMask::from_paths(["billing_address.city"]);
    let mut output = baseline.clone();
    let mut report = RedactionReport::new();

    merge_into(
        &incoming_person(),
        &mask,
        &caller(&[ADMIN]),
        &mut output,
        &mut report,
    )
    .unwrap();

    assert_eq!(output, baseline);
    assert_eq!(report.len(), 1);
    assert_eq!(report.entries()[0].path, "billing_address");
    assert_eq!(
        report.entries()[0].reason,
        RedactionReason::MissingRole(BILLING)
    );
}

#[test]
fn merge_copies_masked_zero_values() {
    let baseline = person(BASELINE_ID);
    let input = DynamicMessage::new(&PERSON);

    let merged = merge(
        &input,
        &FieldMask::from_paths(["name", "tags", "previous_addresses"]),
        &caller(&[]),
        &baseline,
    )
    .unwrap();

    assert_eq!(merged.text("name"), Some(""));
    assert_eq!(merged.get("tags"), Some(&Value::List(vec![])));
    assert_eq!(merged.get("previous_addresses"), Some(&Value::List(vec![])));
    assert_eq!(merged.text("created_by"), Some("system"));
}

#[test]
fn merge_replaces_repeated_fields_whole() {
    let baseline = person(BASELINE_ID);
    let input = DynamicMessage::new(&PERSON)
        .with("tags", vec!["x", "y", "z"])
        .unwrap();

    let merged = merge(
        &input,
        &FieldMask::from_paths(["tags"]),
        &caller(&[]),
        &baseline,
    )
    .unwrap();

    assert_eq!(merged.get("tags"), Some(&Value::from(vec!["x", "y", "z"])));
}

#[test]
fn merge_ignores_unresolved_mask_paths() {
    let baseline = person(BASELINE_ID);
    let mask = FieldMask::from_paths(["nickname", "address.zip", "tags.0", "address.", ""]);

    let merged = merge(&incoming_person(), &mask, &caller(&[ADMIN]), &baseline).unwrap();

    assert_eq!(merged, baseline);
    assert_eq!(
        mask.unresolved(&PERSON),
        vec!["", "address.", "address.zip", "nickname", "tags.0"]
    );
}

#[test]
fn merge_reports_requested_but_dropped_leaves() {
    let mask = FieldMask::from_paths(["id", "secret", "name", "address.postal_code"]);
    let mut output = person(BASELINE_ID);
    let mut report = RedactionReport::new();

    merge_into(
        &incoming_person(),
        &mask,
        &caller(&[USER]),
        &mut output,
        &mut report,
    )
    .unwrap();

    assert_eq!(report.len(), 3);
    assert!(report.contains("id"));
    assert!(report.contains("secret"));
    assert!(report.contains("address.postal_code"));
    assert!(!report.contains("name"));
    assert!(report.entries().iter().any(|r| r.path == "id" && r.reason == RedactionReason::Readonly));
}

#[test]
fn merge_rejects_mismatched_message_types() {
    let err = merge(
        &DynamicMessage::new(&ADDRESS),
        &FieldMask::from_paths(["city"]),
        &caller(&[]),
        &DynamicMessage::new(&PERSON),
    )
    .unwrap_err();

    assert_eq!(
        err,
        MessageError::DescriptorMismatch {
            expected: "api.Person",
            found: "api.Address",
        }
    );
}

#[test]
fn merge_into_works_on_typed_messages() {
    let input = Credentials {
        username: "mallory".to_string(),
        password_hash: vec![9, 9],
        attempts: 0,
    };
    let mut output = Credentials {
        username: "ada".to_string(),
        password_hash: vec![1, 2, 3],
        attempts: 4,
    };
    let mask = FieldMask::from_paths(["username", "password_hash", "attempts"]);
    let mut report = RedactionReport::new();

    merge_into(&input, &mask, &caller(&[USER]), &mut output, &mut report).unwrap();

    assert_eq!(output.username, "ada");
    assert_eq!(output.password_hash, vec![1, 2, 3]);
    assert_eq!(output.attempts, 0);
    assert_eq!(report.len(), 2);
}

// ---- read path ---------------------------------------------------------

#[test]
fn read_redaction_clears_guarded_subtrees_and_repeated_elements() {
    let mut msg = person(BASELINE_ID);
    let mut report = RedactionReport::new();

    redact_for_read_with_report(&mut msg, &caller(&[USER]), &mut report).unwrap();

    assert!(msg.message("billing_address").unwrap().is_zero());
    assert_eq!(msg.message("address").unwrap().text("postal_code"), Some(""));
    assert_eq!(msg.message("address").unwrap().text("city"), Some("Springfield"));

    let previous = msg.get("previous_addresses").and_then(Value::as_list).unwrap();
    assert_eq!(previous[0].as_message().unwrap().text("postal_code"), Some(""));
    assert_eq!(previous[0].as_message().unwrap().text("street"), Some("9 Old Rd"));

    let mut paths: Vec<_> = report.into_iter().map(|r| r.path).collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            "address.postal_code",
            "billing_address",
            "previous_addresses[0].postal_code",
            "secret",
            "verified",
        ]
    );
}

#[test]
fn read_redaction_does_not_report_zero_fields() {
    let mut msg = DynamicMessage::new(&PERSON).with("name", "Alice").unwrap();
    let mut report = RedactionReport::new();

    redact_for_read_with_report(&mut msg, &CallerContext::anonymous(), &mut report).unwrap();

    assert!(report.is_empty());
    assert_eq!(msg.text("name"), Some("Alice"));
}

#[test]
fn read_redaction_allows_everything_to_a_full_caller() {
    let original = person(BASELINE_ID);
    let mut msg = original.clone();

    redact_for_read(&mut msg, &caller(&[ADMIN, BILLING])).unwrap();

    assert_eq!(msg, original);
}

// ---- field mask --------------------------------------------------------

#[test]
fn field_mask_is_found_in_the_envelope() {
    let mask = FieldMask::from_paths(["person.name", "person.age"]);
    let envelope = request(DynamicMessage::new(&PERSON), &mask);

    assert_eq!(FieldMask::find_in(&envelope), Some(mask.clone()));
    assert_eq!(mask.to_string(), "person.age,person.name");
    assert!(FieldMask::find_in(&DynamicMessage::new(&PERSON)).is_none());
    assert!(FieldMask::from_message(&DynamicMessage::new(&PERSON)).is_err());
}

#[test]
fn field_mask_touches_prefixes_on_segment_boundaries() {
    let mask = FieldMask::from_paths(["person.address.city"]);

    assert!(mask.touches("person"));
    assert!(mask.touches("person.address"));
    assert!(mask.touches("person.address.city"));
    assert!(!mask.touches("person.addr"));
    assert!(!mask.touches("person.address.city.x"));
    assert_eq!(PERSON_REQUEST.resolve_path("person.address.city").map(|f| f.name), Some("city"));
}

// ---- properties --------------------------------------------------------

fn arb_mask() -> impl Strategy<Value = FieldMask> {
    prop::sample::subsequence(PERSON_LEAVES.to_vec(), 0..=PERSON_LEAVES.len())
        .prop_map(FieldMask::from_paths)
}

fn arb_caller() -> impl Strategy<Value = CallerContext> {
    prop::sample::subsequence(vec![ADMIN, USER, BILLING], 0..=3).prop_map(CallerContext::new)
}

proptest! {
    #[test]
    fn readonly_fields_always_keep_the_baseline(mask in arb_mask(), caller in arb_caller()) {
        let baseline = person(BASELINE_ID);
        let merged = merge(&incoming_person(), &mask, &caller, &baseline).unwrap();

        for path in PERSON_LEAVES.iter().filter(|p| is_readonly(p)) {
            prop_assert_eq!(value_at(&merged, path), value_at(&baseline, path));
        }
    }

    #[test]
    fn only_masked_authorized_writable_leaves_change(
        mask in arb_mask(),
        caller in arb_caller(),
    ) {
        let baseline = person(BASELINE_ID);
        let input = incoming_person();
        let merged = merge(&input, &mask, &caller, &baseline).unwrap();

        for path in PERSON_LEAVES {
            let copied = mask.contains(path)
                && !is_readonly(path)
                && authorized(&PERSON, path, &caller);
            let expected = if copied { &input } else { &baseline };

            prop_assert_eq!(value_at(&merged, path), value_at(expected, path), "path {}", path);
        }
    }

    #[test]
    fn role_gating_is_symmetric(caller in arb_caller()) {
        let baseline = person(BASELINE_ID);
        let everything = FieldMask::from_paths(PERSON_LEAVES);
        let merged = merge(&incoming_person(), &everything, &caller, &baseline).unwrap();

        let mut read = person(BASELINE_ID);
        redact_for_read(&mut read, &caller).unwrap();

        for path in PERSON_LEAVES.iter().filter(|p| !authorized(&PERSON, p, &caller)) {
            prop_assert_eq!(value_at(&merged, path), value_at(&baseline, path));
            prop_assert!(value_at(&read, path).is_zero(), "path {} not cleared", path);
        }
    }
}
