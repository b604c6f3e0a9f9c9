use crate::error::{Error, ErrorClass, ErrorOrigin};
use thiserror::Error as ThisError;

///
/// CodecError
///
/// Failure while translating between a message and a document.
/// Leaf variants are wrapped in `Context` carrying the field path.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CodecError {
    #[error("invalid identifier: {value}")]
    Format { value: String },

    #[error("type mismatch: expected {expected}, found {found}")]
    Type {
        expected: String,
        found: &'static str,
    },

    #[error("at {path}: {source}")]
    Context {
        path: String,
        #[source]
        source: Box<Self>,
    },
}

impl CodecError {
    pub(crate) fn format(value: impl Into<String>) -> Self {
        Self::Format {
            value: value.into(),
        }
    }

    pub(crate) fn type_mismatch(expected: impl ToString, found: &'static str) -> Self {
        Self::Type {
            expected: expected.to_string(),
            found,
        }
    }

    /// Prepend a field segment to the error path.
    #[must_use]
    pub fn with_field(self, field: impl AsRef<str>) -> Self {
        self.with_path_segment(field.as_ref())
    }

    /// Prepend an index segment to the error path.
    #[must_use]
    pub fn with_index(self, index: usize) -> Self {
        self.with_path_segment(format!("[{index}]"))
    }

    #[must_use]
    pub const fn path(&self) -> Option<&str> {
        match self {
            Self::Context { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Innermost non-context variant.
    #[must_use]
    pub fn leaf(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.leaf(),
            _ => self,
        }
    }

    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self.leaf(), Self::Format { .. })
    }

    #[must_use]
    pub fn is_type(&self) -> bool {
        matches!(self.leaf(), Self::Type { .. })
    }

    fn with_path_segment(self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        match self {
            Self::Context { path, source } => Self::Context {
                path: join_segments(&segment, &path),
                source,
            },
            source => Self::Context {
                path: segment,
                source: Box::new(source),
            },
        }
    }
}

fn join_segments(prefix: &str, suffix: &str) -> String {
    if suffix.starts_with('[') {
        format!("{prefix}{suffix}")
    } else {
        format!("{prefix}.{suffix}")
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        let class = if err.is_format() {
            ErrorClass::Format
        } else {
            ErrorClass::Type
        };

        Self::new(class, ErrorOrigin::Codec, err.to_string())
    }
}

///
/// TESTS
///
