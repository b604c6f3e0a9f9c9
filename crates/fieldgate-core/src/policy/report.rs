use std::fmt::{self, Display};

///
/// RedactionReason
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedactionReason {
    /// Requested on the write path but the field is readonly.
    Readonly,
    /// Caller lacks the role the field requires.
    MissingRole(&'static str),
}

impl Display for RedactionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Readonly => f.write_str("readonly"),
            Self::MissingRole(role) => write!(f, "missing role {role}"),
        }
    }
}

///
/// Redaction
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redaction {
    pub path: String,
    pub reason: RedactionReason,
}

///
/// RedactionReport
///
/// Non-fatal record of fields a redactor left out.
/// Only fields the caller actually asked for (write) or that carried a value
/// (read) are recorded.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RedactionReport {
    entries: Vec<Redaction>,
}

impl RedactionReport {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, path: String, reason: RedactionReason) {
        self.entries.push(Redaction { path, reason });
    }

    #[must_use]
    pub fn entries(&self) -> &[Redaction] {
        &self.entries
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|r| r.path == path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl IntoIterator for RedactionReport {
    type Item = Redaction;
    type IntoIter = std::vec::IntoIter<Redaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
