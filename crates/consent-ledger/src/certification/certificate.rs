//! Certificate records.

use serde::{Deserialize, Serialize};

use crate::identity::IdentityId;

/// Identifier of a certifiable resource (a record, document or dataset).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An issuer's attestation that `resource_id` belongs to `subject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub resource_id: ResourceId,
    pub subject: IdentityId,
    pub issuer: IdentityId,
    /// Issue timestamp (microseconds since epoch).
    pub issued_at: u64,
}
