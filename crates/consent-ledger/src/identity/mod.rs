//! Participant identities.
//!
//! The ledger never manages keys. An identity is whatever opaque handle the
//! host environment authenticates callers with (an account address, or a
//! zero-knowledge commitment when calls arrive through the proof gate).
//! Participants without an on-registry identity are addressed by an
//! external contact reference instead; [`Party`] keeps the two apart.

pub mod party;

use serde::{Deserialize, Serialize};

use crate::proof::FieldElement;

pub use party::Party;

/// Opaque on-registry identity of a caller or participant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub String);

impl IdentityId {
    /// Create an identity from any string-like handle.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Bind an identity to a zero-knowledge commitment.
    ///
    /// The identity is the commitment's canonical decimal text, verbatim.
    pub fn from_commitment(commitment: &FieldElement) -> Self {
        Self(commitment.as_str().to_string())
    }

    /// Borrow the raw handle.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// External contact reference (an email address or equivalent) for a
/// participant that has no on-registry identity yet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContactRef(pub String);

impl ContactRef {
    pub fn new(contact: impl Into<String>) -> Self {
        Self(contact.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContactRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
