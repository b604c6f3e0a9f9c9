use crate::{
    message::{DynamicMessage, Message, MessageError},
    model::{
        field::FieldKind,
        message::{FIELD_MASK, MessageDescriptor},
    },
    value::Value,
};
use std::{
    collections::BTreeSet,
    fmt::{self, Display},
};

///
/// FieldMask
///
/// Unordered set of dot-delimited field paths, relative to the root of the
/// message being merged. Paths are matched verbatim; anything that does not
/// resolve simply never matches.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldMask {
    paths: BTreeSet<String>,
}

impl FieldMask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Whether any path names `prefix` itself or something beneath it.
    #[must_use]
    pub fn touches(&self, prefix: &str) -> bool {
        self.paths.iter().any(|path| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Paths that do not resolve against `descriptor`.
    #[must_use]
    pub fn unresolved(&self, descriptor: &MessageDescriptor) -> Vec<&str> {
        self.iter()
            .filter(|path| descriptor.resolve_path(path).is_none())
            .collect()
    }

    /// Read the paths out of a field-mask carrier message.
    pub fn from_message(message: &dyn Message) -> Result<Self, MessageError> {
        let descriptor = message.descriptor();
        if !descriptor.is_field_mask() {
            return Err(MessageError::DescriptorMismatch {
                expected: FIELD_MASK.name,
                found: descriptor.name,
            });
        }

        let paths = match message.get_field(0) {
            Some(Value::List(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Text(path) => Some(path),
                    _ => None,
                })
                .collect(),
            _ => BTreeSet::new(),
        };

        Ok(Self { paths })
    }

    /// Locate the first field-mask carrier field of `request` and read it.
    #[must_use]
    pub fn find_in(request: &dyn Message) -> Option<Self> {
        let descriptor = request.descriptor();
        let index = descriptor
            .fields
            .iter()
            .position(|f| matches!(f.kind, FieldKind::Message(d) if d.is_field_mask()))?;

        match request.get_field(index)? {
            Value::Message(carrier) => Self::from_message(&carrier).ok(),
            _ => None,
        }
    }

    /// Build the carrier message for this mask.
    #[must_use]
    pub fn to_message(&self) -> DynamicMessage {
        let mut out = DynamicMessage::new(&FIELD_MASK);
        let paths = self.paths.iter().cloned().map(Value::Text).collect();
        out.put(0, Value::List(paths));

        out
    }
}

impl Display for FieldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.paths.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(path)?;
        }

        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for FieldMask {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_paths(iter)
    }
}
