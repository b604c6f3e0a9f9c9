use crate::{
    codec::{CodecError, DocValue, Document},
    message::DynamicMessage,
    model::{
        field::{Coercion, FieldDescriptor, FieldKind, ScalarType},
        message::MessageDescriptor,
    },
    types::ObjectId,
    value::Value,
};

///
/// decode
///
/// Rebuild a message of type `descriptor` from a stored document.
///
/// Keys are matched against storage overrides first, then against default
/// keys. Unmatched keys are ignored, missing fields keep their zero value,
/// and null decodes as the zero value.
///
pub fn decode(
    doc: &Document,
    descriptor: &'static MessageDescriptor,
) -> Result<DynamicMessage, CodecError> {
    let mut message = DynamicMessage::new(descriptor);

    for (key, stored) in doc.iter() {
        let Some((index, field)) = match_key(descriptor, key) else {
            continue;
        };

        let value = decode_field(field, stored).map_err(|e| e.with_field(field.name))?;
        message.put(index, value);
    }

    Ok(message)
}

fn match_key(
    descriptor: &'static MessageDescriptor,
    key: &str,
) -> Option<(usize, &'static FieldDescriptor)> {
    let fields = descriptor.fields;

    fields
        .iter()
        .position(|f| f.storage_name() == Some(key))
        .or_else(|| fields.iter().position(|f| f.default_key() == key))
        .map(|index| (index, &fields[index]))
}

fn decode_field(field: &FieldDescriptor, stored: &DocValue) -> Result<Value, CodecError> {
    if stored.is_null() {
        return Ok(Value::zero(&field.kind));
    }

    match field.kind {
        FieldKind::Scalar(scalar) => decode_scalar(scalar, field.coercion(), stored),

        FieldKind::Message(nested) => decode_nested(nested, stored),

        FieldKind::RepeatedScalar(scalar) => decode_array(stored, |item| {
            decode_scalar(scalar, field.coercion(), item)
        }),

        FieldKind::RepeatedMessage(nested) => decode_array(stored, |item| {
            if item.is_null() {
                return Ok(Value::Message(DynamicMessage::new(nested)));
            }
            decode_nested(nested, item)
        }),
    }
}

fn decode_nested(
    descriptor: &'static MessageDescriptor,
    stored: &DocValue,
) -> Result<Value, CodecError> {
    match stored {
        DocValue::Document(doc) => decode(doc, descriptor).map(Value::Message),
        other => Err(CodecError::type_mismatch("document", other.label())),
    }
}

fn decode_array<F>(stored: &DocValue, mut decode_item: F) -> Result<Value, CodecError>
where
    F: FnMut(&DocValue) -> Result<Value, CodecError>,
{
    let DocValue::Array(items) = stored else {
        return Err(CodecError::type_mismatch("array", stored.label()));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| decode_item(item).map_err(|e| e.with_index(i)))
        .collect::<Result<_, _>>()
        .map(Value::List)
}

#[allow(clippy::cast_precision_loss)]
fn decode_scalar(
    scalar: ScalarType,
    coercion: Coercion,
    stored: &DocValue,
) -> Result<Value, CodecError> {
    if coercion == Coercion::Identifier && scalar == ScalarType::Text {
        return decode_identifier(stored);
    }

    match (scalar, stored) {
        (_, DocValue::Null) => Ok(Value::zero_scalar(scalar)),
        (ScalarType::Bool, DocValue::Bool(v)) => Ok(Value::Bool(*v)),
        (ScalarType::Bytes, DocValue::Binary(v)) => Ok(Value::Bytes(v.clone())),
        (ScalarType::Float, DocValue::Double(v)) => Ok(Value::Float(*v)),
        (ScalarType::Float, DocValue::Int64(v)) => Ok(Value::Float(*v as f64)),
        (ScalarType::Int, DocValue::Int64(v)) => Ok(Value::Int(*v)),
        (ScalarType::Text, DocValue::String(v)) => Ok(Value::Text(v.clone())),
        (scalar, other) => Err(CodecError::type_mismatch(scalar, other.label())),
    }
}

fn decode_identifier(stored: &DocValue) -> Result<Value, CodecError> {
    let id = match stored {
        DocValue::Null => return Ok(Value::Text(String::new())),
        DocValue::ObjectId(id) => *id,
        DocValue::Binary(bytes) => ObjectId::try_from_bytes(bytes)
            .map_err(|_| CodecError::format(format!("{} byte binary", bytes.len())))?,
        DocValue::String(text) => return Err(CodecError::format(text.clone())),
        other => return Err(CodecError::format(other.label())),
    };

    Ok(Value::Text(id.to_string()))
}
