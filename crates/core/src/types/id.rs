//! Transaction identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A GA4 transaction ID.
///
/// GA4 reports transaction IDs as free-form strings (including the literal
/// `(not set)` for purchases sent without one), so no validation is applied.
/// Ordering is plain string ordering, which the duplicate list relies on for
/// tie-breaking.
///
/// ```
/// use ga4_audit_core::TransactionId;
///
/// let id = TransactionId::new("T-1001");
/// assert_eq!(id.as_str(), "T-1001");
/// assert_eq!(id.to_string(), "T-1001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create a transaction ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
