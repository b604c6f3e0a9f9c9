use crate::wire::{WireError, json_label};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use fieldgate_core::{
    message::{DynamicMessage, Message},
    model::{
        field::{FieldDescriptor, FieldKind, ScalarType},
        message::MessageDescriptor,
    },
    policy::FieldMask,
    value::Value,
    visitor::FieldPath,
};
use serde_json::Value as JsonValue;

/// Parse a JSON document into a message of type `descriptor`.
pub fn decode_message(
    json: &str,
    descriptor: &'static MessageDescriptor,
) -> Result<DynamicMessage, WireError> {
    let value: JsonValue =
        serde_json::from_str(json).map_err(|e| WireError::Syntax(e.to_string()))?;

    decode_value(&value, descriptor)
}

/// Decode an already-parsed JSON value.
pub fn decode_value(
    value: &JsonValue,
    descriptor: &'static MessageDescriptor,
) -> Result<DynamicMessage, WireError> {
    WireDecoder {
        root: descriptor,
        path: FieldPath::new(),
    }
    .message(value, descriptor)
}

///
/// WireDecoder
///

struct WireDecoder {
    // mask paths are relative to the top-level message
    root: &'static MessageDescriptor,
    path: FieldPath,
}

impl WireDecoder {
    fn message(
        &mut self,
        value: &JsonValue,
        descriptor: &'static MessageDescriptor,
    ) -> Result<DynamicMessage, WireError> {
        if descriptor.is_field_mask()
            && let JsonValue::String(paths) = value
        {
            return Ok(parse_mask(paths, self.root).to_message());
        }

        let JsonValue::Object(entries) = value else {
            return Err(self.mismatch("object", value));
        };

        let mut out = DynamicMessage::new(descriptor);
        for (key, item) in entries {
            let (index, field) =
                find_field(descriptor, key).ok_or_else(|| WireError::UnknownField {
                    message: descriptor.name,
                    key: key.clone(),
                })?;

            self.path.push(field.name);
            let decoded = self.field(field, item);
            self.path.pop();

            out.set_field(index, decoded?)?;
        }

        Ok(out)
    }

    fn field(&mut self, field: &FieldDescriptor, value: &JsonValue) -> Result<Value, WireError> {
        if value.is_null() {
            return Ok(Value::zero(&field.kind));
        }

        match field.kind {
            FieldKind::Scalar(scalar) => self.scalar(scalar, value),
            FieldKind::Message(nested) => self.message(value, nested).map(Value::Message),
            FieldKind::RepeatedScalar(scalar) => self.list(value, |d, item| d.scalar(scalar, item)),
            FieldKind::RepeatedMessage(nested) => self.list(value, |d, item| {
                d.message(item, nested).map(Value::Message)
            }),
        }
    }

    fn list<F>(&mut self, value: &JsonValue, mut decode_item: F) -> Result<Value, WireError>
    where
        F: FnMut(&mut Self, &JsonValue) -> Result<Value, WireError>,
    {
        let JsonValue::Array(items) = value else {
            return Err(self.mismatch("array", value));
        };

        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            self.path.push(i);
            let decoded = decode_item(self, item);
            self.path.pop();

            out.push(decoded?);
        }

        Ok(Value::List(out))
    }

    fn scalar(&self, scalar: ScalarType, value: &JsonValue) -> Result<Value, WireError> {
        let decoded = match (scalar, value) {
            (ScalarType::Bool, JsonValue::Bool(v)) => Some(Value::Bool(*v)),
            (ScalarType::Int, JsonValue::Number(n)) => n.as_i64().map(Value::Int),
            (ScalarType::Int, JsonValue::String(s)) => s.parse().ok().map(Value::Int),
            (ScalarType::Float, JsonValue::Number(n)) => n.as_f64().map(Value::Float),
            (ScalarType::Float, JsonValue::String(s)) => parse_float(s).map(Value::Float),
            (ScalarType::Text, JsonValue::String(s)) => Some(Value::Text(s.clone())),
            (ScalarType::Bytes, JsonValue::String(s)) => {
                let bytes = STANDARD.decode(s).map_err(|_| WireError::Base64 {
                    path: self.path.render(),
                })?;
                Some(Value::Bytes(bytes))
            }
            _ => None,
        };

        decoded.ok_or_else(|| self.mismatch(scalar.label(), value))
    }

    fn mismatch(&self, expected: &'static str, found: &JsonValue) -> WireError {
        WireError::Type {
            path: self.path.render(),
            expected,
            found: json_label(found),
        }
    }
}

fn find_field(
    descriptor: &'static MessageDescriptor,
    key: &str,
) -> Option<(usize, &'static FieldDescriptor)> {
    descriptor
        .fields
        .iter()
        .enumerate()
        .find(|(_, f)| f.name == key || f.default_key() == key)
}

// proto3 JSON spells non-finite floats as strings
fn parse_float(s: &str) -> Option<f64> {
    match s {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => s.parse().ok(),
    }
}

/// Comma-separated mask. Each segment is matched against the field names
/// and JSON names of `root`'s tree; segments that match nothing are kept
/// as written.
pub(super) fn parse_mask(paths: &str, root: &'static MessageDescriptor) -> FieldMask {
    paths
        .split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(|path| resolve_mask_path(path, root))
        .collect()
}

fn resolve_mask_path(path: &str, root: &'static MessageDescriptor) -> String {
    let mut current = Some(root);
    let mut names = Vec::new();

    for segment in path.split('.') {
        match current.and_then(|d| find_field(d, segment)) {
            Some((_, field)) => {
                names.push(field.name);
                current = field.kind.nested();
            }
            None => {
                names.push(segment);
                current = None;
            }
        }
    }

    names.join(".")
}
