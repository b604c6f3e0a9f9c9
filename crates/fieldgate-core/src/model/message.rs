use crate::model::field::{FieldDescriptor, FieldKind, ScalarType};
use std::ptr;

/// Full name of the sentinel type that carries field-mask paths.
pub const FIELD_MASK_NAME: &str = "google.protobuf.FieldMask";

/// Built-in descriptor for the field-mask carrier message.
pub static FIELD_MASK: MessageDescriptor = MessageDescriptor::new(
    FIELD_MASK_NAME,
    &[FieldDescriptor::new(
        1,
        "paths",
        FieldKind::RepeatedScalar(ScalarType::Text),
    )],
);

///
/// MessageDescriptor
/// Runtime schema for one message type; ordered field list, immutable.
///

#[derive(Debug)]
pub struct MessageDescriptor {
    /// Fully-qualified type name, unique within a registry.
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    #[must_use]
    pub const fn new(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self { name, fields }
    }

    #[must_use]
    pub fn field(&self, index: usize) -> Option<&'static FieldDescriptor> {
        self.fields.get(index)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<(usize, &'static FieldDescriptor)> {
        let fields = self.fields;

        fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn is_field_mask(&self) -> bool {
        self.name == FIELD_MASK_NAME
    }

    /// Whether both descriptors describe the same message type.
    #[must_use]
    pub fn same_type(&self, other: &Self) -> bool {
        ptr::eq(self, other) || self.name == other.name
    }

    /// Resolve a dot-delimited path from this message's root.
    ///
    /// Every segment but the last must name a singular message field.
    /// Empty segments never resolve.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> Option<&'static FieldDescriptor> {
        let mut segments = path.split('.').peekable();
        let mut fields = self.fields;

        while let Some(segment) = segments.next() {
            if segment.is_empty() {
                return None;
            }

            let field = fields.iter().find(|f| f.name == segment)?;
            if segments.peek().is_none() {
                return Some(field);
            }

            match field.kind {
                FieldKind::Message(nested) if !nested.is_field_mask() => fields = nested.fields,
                _ => return None,
            }
        }

        None
    }
}
