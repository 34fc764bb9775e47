//! Tagged participant: on-registry identity or external contact.

use serde::{Deserialize, Serialize};

use super::{ContactRef, IdentityId};

/// A recipient, observer or accessor.
///
/// Contact-addressed parties cannot confirm anything on the ledger, so
/// their presence in an agreement is treated as consent. Identity-addressed
/// parties must act for themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Identity(IdentityId),
    Contact(ContactRef),
}

impl Party {
    /// Resolve optional identity and contact inputs into a party.
    ///
    /// Empty strings count as absent. When both are present the identity
    /// wins. Returns `None` when neither is usable.
    pub fn resolve(identity: Option<IdentityId>, contact: Option<ContactRef>) -> Option<Self> {
        match (identity, contact) {
            (Some(id), _) if !id.0.is_empty() => Some(Self::Identity(id)),
            (_, Some(c)) if !c.0.is_empty() => Some(Self::Contact(c)),
            _ => None,
        }
    }

    /// The on-registry identity, if this party has one.
    pub fn identity(&self) -> Option<&IdentityId> {
        match self {
            Self::Identity(id) => Some(id),
            Self::Contact(_) => None,
        }
    }

    /// Whether the identity or contact reference is the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Identity(id) => id.0.is_empty(),
            Self::Contact(c) => c.0.is_empty(),
        }
    }

    pub fn is_contact(&self) -> bool {
        matches!(self, Self::Contact(_))
    }

    /// Whether `caller` is this party's on-registry identity.
    pub fn is_identity(&self, caller: &IdentityId) -> bool {
        self.identity() == Some(caller)
    }
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity(id) => write!(f, "{id}"),
            Self::Contact(c) => write!(f, "contact:{c}"),
        }
    }
}

impl From<IdentityId> for Party {
    fn from(id: IdentityId) -> Self {
        Self::Identity(id)
    }
}

impl From<ContactRef> for Party {
    fn from(c: ContactRef) -> Self {
        Self::Contact(c)
    }
}
