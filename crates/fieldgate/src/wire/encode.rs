use base64::{Engine as _, engine::general_purpose::STANDARD};
use convert_case::{Case, Casing};
use fieldgate_core::{
    error::Error,
    message::Message,
    policy::FieldMask,
    value::Value,
};
use serde_json::{Map, Number, Value as JsonValue, json};

/// Render a message as a JSON value, leaving out unpopulated fields.
pub fn encode_message(message: &dyn Message) -> JsonValue {
    let descriptor = message.descriptor();

    if descriptor.is_field_mask() {
        return FieldMask::from_message(message)
            .map_or(JsonValue::Null, |mask| JsonValue::String(mask_string(&mask)));
    }

    let mut out = Map::new();
    for (index, field) in descriptor.fields.iter().enumerate() {
        match message.get_field(index) {
            Some(value) if !value.is_zero() => {
                out.insert(field.default_key(), encode_value(value));
            }
            _ => {}
        }
    }

    JsonValue::Object(out)
}

/// Compact JSON text of `message`.
#[must_use]
pub fn to_json_string(message: &dyn Message) -> String {
    encode_message(message).to_string()
}

/// JSON error body: status, class, origin and message.
#[must_use]
pub fn encode_error(err: &Error) -> String {
    json!({
        "status": err.status_code(),
        "class": err.class.to_string(),
        "origin": err.origin.to_string(),
        "message": err.message,
    })
    .to_string()
}

fn encode_value(value: Value) -> JsonValue {
    match value {
        Value::Bool(v) => JsonValue::Bool(v),
        Value::Bytes(v) => JsonValue::String(STANDARD.encode(v)),
        Value::Float(v) => encode_float(v),
        Value::Int(v) => JsonValue::String(v.to_string()),
        Value::List(items) => JsonValue::Array(items.into_iter().map(encode_value).collect()),
        Value::Message(nested) => encode_message(&nested),
        Value::Text(v) => JsonValue::String(v),
    }
}

fn encode_float(v: f64) -> JsonValue {
    match Number::from_f64(v) {
        Some(n) => JsonValue::Number(n),
        None if v.is_nan() => JsonValue::String("NaN".into()),
        None if v > 0.0 => JsonValue::String("Infinity".into()),
        None => JsonValue::String("-Infinity".into()),
    }
}

fn mask_string(mask: &FieldMask) -> String {
    mask.iter()
        .map(|path| {
            path.split('.')
                .map(|segment| segment.to_case(Case::Camel))
                .collect::<Vec<_>>()
                .join(".")
        })
        .collect::<Vec<_>>()
        .join(",")
}
