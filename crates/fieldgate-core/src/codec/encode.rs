use crate::{
    codec::{CodecError, DocValue, Document},
    message::Message,
    model::field::{Coercion, FieldDescriptor, FieldKind},
    types::ObjectId,
    value::Value,
};

///
/// encode
///
/// Translate `message` into its stored document. Every field is written
/// under its resolved storage key. Any failure aborts the whole document.
///
pub fn encode(message: &dyn Message) -> Result<Document, CodecError> {
    let descriptor = message.descriptor();
    let mut doc = Document::new();

    for (index, field) in descriptor.fields.iter().enumerate() {
        let Some(value) = message.get_field(index) else {
            continue;
        };

        let encoded = encode_field(field, value).map_err(|e| e.with_field(field.name))?;
        doc.insert(field.storage_key(), encoded);
    }

    Ok(doc)
}

fn encode_field(field: &FieldDescriptor, value: Value) -> Result<DocValue, CodecError> {
    match (field.kind, value) {
        (FieldKind::Scalar(_), value) => encode_scalar(field.coercion(), value),

        (FieldKind::Message(_), Value::Message(nested)) => encode(&nested).map(DocValue::Document),

        (FieldKind::RepeatedScalar(_), Value::List(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| encode_scalar(field.coercion(), item).map_err(|e| e.with_index(i)))
            .collect::<Result<_, _>>()
            .map(DocValue::Array),

        (FieldKind::RepeatedMessage(_), Value::List(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Message(nested) => encode(&nested).map(DocValue::Document),
                other => Err(CodecError::type_mismatch("message", other.label())),
            }
            .map_err(|e| e.with_index(i)))
            .collect::<Result<_, _>>()
            .map(DocValue::Array),

        (kind, value) => Err(CodecError::type_mismatch(kind, value.label())),
    }
}

fn encode_scalar(coercion: Coercion, value: Value) -> Result<DocValue, CodecError> {
    match (coercion, value) {
        (Coercion::Identifier, Value::Text(text)) => encode_identifier(&text),

        (_, Value::Bool(v)) => Ok(DocValue::Bool(v)),
        (_, Value::Bytes(v)) => Ok(DocValue::Binary(v)),
        (_, Value::Float(v)) => Ok(DocValue::Double(v)),
        (_, Value::Int(v)) => Ok(DocValue::Int64(v)),
        (_, Value::Text(v)) => Ok(DocValue::String(v)),

        (_, other @ (Value::List(_) | Value::Message(_))) => {
            Err(CodecError::type_mismatch("scalar", other.label()))
        }
    }
}

// The empty string is the zero value and is stored as null. Only the
// canonical text form is accepted, so decoding yields the same string.
fn encode_identifier(text: &str) -> Result<DocValue, CodecError> {
    if text.is_empty() {
        return Ok(DocValue::Null);
    }

    match text.parse::<ObjectId>() {
        Ok(id) if id.to_string() == text => Ok(DocValue::ObjectId(id)),
        _ => Err(CodecError::format(text)),
    }
}
