use crate::{
    message::{Message, MessageError, check_field},
    model::{field::FieldDescriptor, message::MessageDescriptor},
    value::Value,
};
use std::fmt::{self, Debug};

///
/// DynamicMessage
///
/// Generic message instance: a descriptor plus one value per field, in
/// descriptor order. Every slot always holds a conforming value.
///

#[derive(Clone)]
pub struct DynamicMessage {
    descriptor: &'static MessageDescriptor,
    values: Vec<Value>,
}

impl DynamicMessage {
    /// Zero-valued instance of `descriptor`.
    #[must_use]
    pub fn new(descriptor: &'static MessageDescriptor) -> Self {
        let values = descriptor
            .fields
            .iter()
            .map(|f| Value::zero(&f.kind))
            .collect();

        Self { descriptor, values }
    }

    /// Builder-style setter by field name.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, MessageError> {
        self.set(name, value)?;

        Ok(self)
    }

    /// Set a field by name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), MessageError> {
        let index = self.index_of(name)?;

        self.set_field(index, value.into())
    }

    /// Borrow a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.descriptor.index_of(name)?;

        self.values.get(index)
    }

    /// Borrow a text field by name.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// Borrow a nested message field by name.
    #[must_use]
    pub fn message(&self, name: &str) -> Option<&Self> {
        self.get(name).and_then(Value::as_message)
    }

    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Move the value out of `index`, leaving the zero value behind.
    pub fn take(&mut self, index: usize) -> Option<Value> {
        let field = self.descriptor.field(index)?;
        let slot = self.values.get_mut(index)?;

        Some(std::mem::replace(slot, Value::zero(&field.kind)))
    }

    /// Iterate fields with their current values, in descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldDescriptor, &Value)> {
        let fields = self.descriptor.fields;

        fields.iter().zip(self.values.iter())
    }

    /// Whether every field holds its zero value.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(Value::is_zero)
    }

    // Unchecked store; callers have already validated conformance.
    pub(crate) fn put(&mut self, index: usize, value: Value) {
        debug_assert!(check_field(self.descriptor, index, &value).is_ok());

        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    fn index_of(&self, name: &str) -> Result<usize, MessageError> {
        self.descriptor
            .index_of(name)
            .ok_or_else(|| MessageError::UnknownField {
                message: self.descriptor.name,
                field: name.to_string(),
            })
    }
}

impl Message for DynamicMessage {
    fn descriptor(&self) -> &'static MessageDescriptor {
        self.descriptor
    }

    fn get_field(&self, index: usize) -> Option<Value> {
        self.values.get(index).cloned()
    }

    fn set_field(&mut self, index: usize, value: Value) -> Result<(), MessageError> {
        check_field(self.descriptor, index, &value)?;
        self.values[index] = value;

        Ok(())
    }

    fn to_dynamic(&self) -> DynamicMessage {
        self.clone()
    }
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.same_type(other.descriptor) && self.values == other.values
    }
}

impl Debug for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.descriptor.name)?;

        f.debug_map()
            .entries(self.iter().map(|(field, value)| (field.name, value)))
            .finish()
    }
}
