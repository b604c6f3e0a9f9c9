use crate::{
    message::{DynamicMessage, Message},
    model::field::{FieldKind, ScalarType},
};
use derive_more::From;

///
/// Value
///
/// In-memory value of one message field.
///
/// Scalars follow proto3 zero-value semantics: there is no null, an unset
/// field holds the zero value of its type. Message fields always hold a
/// (possibly zero-valued) nested message.
///

#[derive(Clone, Debug, From, PartialEq)]
pub enum Value {
    Bool(bool),
    Bytes(Vec<u8>),
    Float(f64),
    Int(i64),
    /// Repeated field; element order is preserved.
    List(Vec<Self>),
    Message(DynamicMessage),
    Text(String),
}

impl Value {
    /// Zero value for a field of the given kind.
    #[must_use]
    pub fn zero(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Scalar(t) => Self::zero_scalar(*t),
            FieldKind::Message(d) => Self::Message(DynamicMessage::new(*d)),
            FieldKind::RepeatedScalar(_) | FieldKind::RepeatedMessage(_) => Self::List(Vec::new()),
        }
    }

    #[must_use]
    pub const fn zero_scalar(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Bool => Self::Bool(false),
            ScalarType::Bytes => Self::Bytes(Vec::new()),
            ScalarType::Float => Self::Float(0.0),
            ScalarType::Int => Self::Int(0),
            ScalarType::Text => Self::Text(String::new()),
        }
    }

    /// Whether this value can be stored in a field of `kind`.
    #[must_use]
    pub fn conforms_to(&self, kind: &FieldKind) -> bool {
        match (kind, self) {
            (FieldKind::Scalar(t), value) => value.is_scalar_of(*t),
            (FieldKind::Message(d), Self::Message(m)) => m.descriptor().same_type(d),
            (FieldKind::RepeatedScalar(t), Self::List(items)) => {
                items.iter().all(|item| item.is_scalar_of(*t))
            }
            (FieldKind::RepeatedMessage(d), Self::List(items)) => items
                .iter()
                .all(|item| matches!(item, Self::Message(m) if m.descriptor().same_type(d))),
            _ => false,
        }
    }

    const fn is_scalar_of(&self, scalar: ScalarType) -> bool {
        matches!(
            (scalar, self),
            (ScalarType::Bool, Self::Bool(_))
                | (ScalarType::Bytes, Self::Bytes(_))
                | (ScalarType::Float, Self::Float(_))
                | (ScalarType::Int, Self::Int(_))
                | (ScalarType::Text, Self::Text(_))
        )
    }

    /// Whether this is the zero value of its own type.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Bool(v) => !v,
            Self::Bytes(v) => v.is_empty(),
            Self::Float(v) => *v == 0.0,
            Self::Int(v) => *v == 0,
            Self::List(v) => v.is_empty(),
            Self::Message(m) => m.is_zero(),
            Self::Text(v) => v.is_empty(),
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::List(_) => "list",
            Self::Message(_) => "message",
            Self::Text(_) => "text",
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_message(&self) -> Option<&DynamicMessage> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_message(self) -> Option<DynamicMessage> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(Self::from).collect())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::{ADDRESS, PERSON};

    #[test]
    fn zero_values_follow_field_kind() {
        assert_eq!(Value::zero(&FieldKind::Scalar(ScalarType::Text)), Value::Text(String::new()));
        assert_eq!(Value::zero(&FieldKind::Scalar(ScalarType::Int)), Value::Int(0));
        assert_eq!(Value::zero(&FieldKind::RepeatedMessage(&ADDRESS)), Value::List(vec![]));

        let nested = Value::zero(&FieldKind::Message(&ADDRESS));
        assert!(nested.is_zero());
        assert_eq!(nested.as_message().map(|m| m.descriptor().name), Some(ADDRESS.name));
    }

    #[test]
    fn conformance_checks_nested_type_identity() {
        let address = Value::Message(DynamicMessage::new(&ADDRESS));
        let person = Value::Message(DynamicMessage::new(&PERSON));

        assert!(address.conforms_to(&FieldKind::Message(&ADDRESS)));
        assert!(!person.conforms_to(&FieldKind::Message(&ADDRESS)));
        assert!(!Value::from("x").conforms_to(&FieldKind::Message(&ADDRESS)));
    }

    #[test]
    fn conformance_checks_every_list_element() {
        let kind = FieldKind::RepeatedScalar(ScalarType::Text);

        assert!(Value::from(vec!["a", "b"]).conforms_to(&kind));
        assert!(!Value::List(vec![Value::from("a"), Value::Int(1)]).conforms_to(&kind));
        assert!(!Value::from("a").conforms_to(&kind));
    }
}
