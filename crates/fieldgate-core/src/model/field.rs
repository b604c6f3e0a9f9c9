use crate::model::message::MessageDescriptor;
use convert_case::{Case, Casing};
use std::{
    borrow::Cow,
    fmt::{self, Debug, Display},
};

///
/// FieldDescriptor
///
/// Static description of one field of a message type.
/// Built with the `const` helpers below so whole schemas can live in statics.
///

#[derive(Clone, Copy, Debug)]
pub struct FieldDescriptor {
    /// Field number, unique within the owning message type.
    pub number: u32,
    /// Schema field name (snake_case), used in field-mask paths.
    pub name: &'static str,
    pub kind: FieldKind,
    pub annotations: FieldAnnotations,
}

impl FieldDescriptor {
    #[must_use]
    pub const fn new(number: u32, name: &'static str, kind: FieldKind) -> Self {
        Self {
            number,
            name,
            kind,
            annotations: FieldAnnotations::NONE,
        }
    }

    /// Mark the field as immutable through the write path.
    #[must_use]
    pub const fn readonly(mut self) -> Self {
        self.annotations.readonly = true;
        self
    }

    /// Require `role` to read or write the field.
    #[must_use]
    pub const fn role(mut self, role: &'static str) -> Self {
        self.annotations.required_role = Some(role);
        self
    }

    #[must_use]
    pub const fn storage(mut self, storage: StorageOptions) -> Self {
        self.annotations.storage = Some(storage);
        self
    }

    #[must_use]
    pub const fn is_readonly(&self) -> bool {
        self.annotations.readonly
    }

    #[must_use]
    pub const fn required_role(&self) -> Option<&'static str> {
        self.annotations.required_role
    }

    #[must_use]
    pub const fn coercion(&self) -> Coercion {
        match self.annotations.storage {
            Some(storage) => storage.coercion,
            None => Coercion::None,
        }
    }

    /// Storage key override, if one is declared.
    #[must_use]
    pub const fn storage_name(&self) -> Option<&'static str> {
        match self.annotations.storage {
            Some(storage) => storage.field_name,
            None => None,
        }
    }

    /// Default derived key: the lowerCamelCase JSON name of the field.
    #[must_use]
    pub fn default_key(&self) -> String {
        self.name.to_case(Case::Camel)
    }

    /// Resolved key under which the field is persisted.
    #[must_use]
    pub fn storage_key(&self) -> Cow<'static, str> {
        match self.storage_name() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.default_key()),
        }
    }
}

///
/// FieldKind
///
/// Shape of a field. Message-bearing variants carry the nested descriptor,
/// so a nested type exists exactly when the kind involves a message.
///

#[derive(Clone, Copy)]
pub enum FieldKind {
    Scalar(ScalarType),
    Message(&'static MessageDescriptor),
    RepeatedScalar(ScalarType),
    RepeatedMessage(&'static MessageDescriptor),
}

impl FieldKind {
    #[must_use]
    pub const fn nested(&self) -> Option<&'static MessageDescriptor> {
        match self {
            Self::Message(d) | Self::RepeatedMessage(d) => Some(*d),
            Self::Scalar(_) | Self::RepeatedScalar(_) => None,
        }
    }

    #[must_use]
    pub const fn scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(t) | Self::RepeatedScalar(t) => Some(*t),
            Self::Message(_) | Self::RepeatedMessage(_) => None,
        }
    }

    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        matches!(self, Self::RepeatedScalar(_) | Self::RepeatedMessage(_))
    }
}

// Nested descriptors are printed by name only; schemas may be recursive.
impl Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(t) => write!(f, "Scalar({t:?})"),
            Self::Message(d) => write!(f, "Message({})", d.name),
            Self::RepeatedScalar(t) => write!(f, "RepeatedScalar({t:?})"),
            Self::RepeatedMessage(d) => write!(f, "RepeatedMessage({})", d.name),
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(t) => write!(f, "{t}"),
            Self::Message(d) => write!(f, "message {}", d.name),
            Self::RepeatedScalar(t) => write!(f, "list<{t}>"),
            Self::RepeatedMessage(d) => write!(f, "list<message {}>", d.name),
        }
    }
}

///
/// ScalarType
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarType {
    Bool,
    Bytes,
    Float,
    Int,
    Text,
}

impl ScalarType {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Bytes => "bytes",
            Self::Float => "float",
            Self::Int => "int",
            Self::Text => "text",
        }
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// FieldAnnotations
///
/// Declarative per-field policy. Absent annotations mean "no restriction".
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FieldAnnotations {
    pub readonly: bool,
    pub required_role: Option<&'static str>,
    pub storage: Option<StorageOptions>,
}

impl FieldAnnotations {
    pub const NONE: Self = Self {
        readonly: false,
        required_role: None,
        storage: None,
    };
}

///
/// StorageOptions
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StorageOptions {
    /// Overrides the default derived storage key.
    pub field_name: Option<&'static str>,
    pub coercion: Coercion,
}

impl StorageOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            field_name: None,
            coercion: Coercion::None,
        }
    }

    #[must_use]
    pub const fn named(mut self, field_name: &'static str) -> Self {
        self.field_name = Some(field_name);
        self
    }

    #[must_use]
    pub const fn identifier(mut self) -> Self {
        self.coercion = Coercion::Identifier;
        self
    }
}

///
/// Coercion
///
/// Value transform applied between the in-memory and stored forms.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Coercion {
    #[default]
    None,
    /// Identifier string in memory, store-native object id at rest.
    Identifier,
}
