use fieldgate_core::{
    message::{DynamicMessage, Message, MessageError},
    model::{
        field::{Coercion, FieldKind, ScalarType},
        message::MessageDescriptor,
        registry::{SchemaError, SchemaRegistry},
    },
    value::Value,
};

///
/// Collection
///
/// Binds one stored entity type to its request envelope.
/// The entity lives in a message field of the envelope; its key field is
/// a singular text field with identifier coercion.
///

#[derive(Clone, Copy, Debug)]
pub struct Collection {
    pub name: &'static str,
    pub entity: &'static MessageDescriptor,
    pub request: &'static MessageDescriptor,
    entity_field: usize,
    id_field: usize,
}

impl Collection {
    /// Validate the envelope and register every type it reaches.
    pub fn new(
        name: &'static str,
        request: &'static MessageDescriptor,
        entity_field: &str,
        id_field: &str,
        registry: &mut SchemaRegistry,
    ) -> Result<Self, SchemaError> {
        registry.register(request)?;

        let (entity_index, field) =
            request
                .field_by_name(entity_field)
                .ok_or_else(|| SchemaError::UnknownField {
                    message: request.name,
                    field: entity_field.to_string(),
                })?;
        let FieldKind::Message(entity) = field.kind else {
            return Err(SchemaError::NotAMessageField {
                message: request.name,
                field: field.name,
                expected: "entity",
            });
        };

        let (id_index, key) =
            entity
                .field_by_name(id_field)
                .ok_or_else(|| SchemaError::UnknownField {
                    message: entity.name,
                    field: id_field.to_string(),
                })?;
        let is_key = matches!(key.kind, FieldKind::Scalar(ScalarType::Text))
            && key.coercion() == Coercion::Identifier;
        if !is_key {
            return Err(SchemaError::InvalidKeyField {
                message: entity.name,
                field: key.name,
            });
        }

        Ok(Self {
            name,
            entity,
            request,
            entity_field: entity_index,
            id_field: id_index,
        })
    }

    /// Envelope wrapping `entity`, every other field zero.
    pub(crate) fn wrap(&self, entity: DynamicMessage) -> Result<DynamicMessage, MessageError> {
        let mut envelope = DynamicMessage::new(self.request);
        envelope.set_field(self.entity_field, Value::Message(entity))?;

        Ok(envelope)
    }

    /// Move the entity out of an envelope.
    pub(crate) fn unwrap_entity(&self, mut envelope: DynamicMessage) -> DynamicMessage {
        envelope
            .take(self.entity_field)
            .and_then(Value::into_message)
            .unwrap_or_else(|| DynamicMessage::new(self.entity))
    }

    pub(crate) fn set_id(&self, entity: &mut DynamicMessage, id: String) -> Result<(), MessageError> {
        entity.set_field(self.id_field, Value::Text(id))
    }
}
