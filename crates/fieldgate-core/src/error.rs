use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Classified error surfaced to the service boundary.
/// Module errors convert into this with a fixed (class, origin) pair; the
/// class decides the caller-visible status.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a wire-origin decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Decode, ErrorOrigin::Wire, message)
    }

    /// Construct a format error for a malformed identifier supplied by the caller.
    pub fn format(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Format, origin, message)
    }

    /// Construct a corruption error for data read back from the store.
    pub fn corruption(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, origin, message)
    }

    pub fn not_found(key: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Store,
            format!("document not found: {key}"),
        )
    }

    pub fn transient(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Transient, origin, message)
    }

    pub fn conflict(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Conflict, origin, message)
    }

    pub fn internal(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, origin, message)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.class.is_transient()
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.class.status_code()
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    /// Optimistic version check failed.
    Conflict,
    /// Stored data cannot be interpreted (e.g. a bad identifier at rest).
    Corruption,
    /// Malformed inbound wire message.
    Decode,
    /// Malformed identifier supplied by the caller.
    Format,
    Internal,
    NotFound,
    /// Store timeout or connectivity failure.
    Transient,
    /// Stored document shape disagrees with the schema.
    Type,
}

impl ErrorClass {
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Decode | Self::Format => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Corruption | Self::Internal | Self::Type => 500,
            Self::Transient => 503,
        }
    }

    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Transient)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Conflict => "conflict",
            Self::Corruption => "corruption",
            Self::Decode => "decode",
            Self::Format => "format",
            Self::Internal => "internal",
            Self::NotFound => "not_found",
            Self::Transient => "transient",
            Self::Type => "type",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorOrigin {
    Codec,
    Config,
    Schema,
    Serialize,
    Service,
    Store,
    Wire,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Codec => "codec",
            Self::Config => "config",
            Self::Schema => "schema",
            Self::Serialize => "serialize",
            Self::Service => "service",
            Self::Store => "store",
            Self::Wire => "wire",
        };
        write!(f, "{label}")
    }
}
