//! Field-level authorization.
//!
//! - `write` merges a request into a baseline, copying only masked leaves
//!   the caller may write.
//! - `read` clears, in place, every field the caller may not read.
//!
//! Unauthorized fields are dropped, never rejected; the optional
//! [`RedactionReport`] records what was dropped and why.

mod mask;
mod read;
mod report;
mod write;

#[cfg(test)]
mod tests;

pub use mask::FieldMask;
pub use read::{redact_for_read, redact_for_read_with_report};
pub use report::{Redaction, RedactionReason, RedactionReport};
pub use write::{merge, merge_into};

use crate::model::field::FieldDescriptor;
use std::collections::BTreeSet;

///
/// CallerContext
///
/// Pre-validated role set of the caller. Opaque to this crate.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CallerContext {
    roles: BTreeSet<String>,
}

impl CallerContext {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Caller with no roles at all.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Role the caller lacks for `field`, if any. No annotation means no restriction.
    #[must_use]
    pub fn missing_role(&self, field: &FieldDescriptor) -> Option<&'static str> {
        field.required_role().filter(|role| !self.has_role(role))
    }

    #[must_use]
    pub fn may_access(&self, field: &FieldDescriptor) -> bool {
        self.missing_role(field).is_none()
    }
}

impl<S: Into<String>> FromIterator<S> for CallerContext {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
