//! Events emitted by ledger operations.
//!
//! Every mutating operation returns the event describing what it did, so
//! callers and tests can assert on it directly. The [`crate::ledger::Ledger`]
//! also appends each event to its journal.

use serde::{Deserialize, Serialize};

use crate::agreement::{AgreementId, AgreementKind, AgreementState, Disposition};
use crate::certification::ResourceId;
use crate::identity::{IdentityId, Party};
use crate::registry::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    RoleGranted {
        role: Role,
        identity: IdentityId,
        granted_by: IdentityId,
    },
    RoleRevoked {
        role: Role,
        identity: IdentityId,
        revoked_by: IdentityId,
    },
    CertificateIssued {
        resource_id: ResourceId,
        subject: IdentityId,
        issuer: IdentityId,
    },
    CertificateRevoked {
        resource_id: ResourceId,
        issuer: IdentityId,
    },
    AgreementCreated {
        id: AgreementId,
        kind: AgreementKind,
        provider: IdentityId,
        recipient: Party,
        state: AgreementState,
    },
    AgreementAccepted {
        id: AgreementId,
        kind: AgreementKind,
    },
    AgreementTerminated {
        id: AgreementId,
        kind: AgreementKind,
        disposition: Disposition,
        by: IdentityId,
    },
    ObserverAssigned {
        id: AgreementId,
        observer: Party,
        accepted: bool,
    },
    ObserverAccepted {
        id: AgreementId,
        observer: IdentityId,
    },
    ObserverRemoved {
        id: AgreementId,
        observer: Party,
    },
    AccessLogged {
        id: AgreementId,
        resource_id: ResourceId,
        accessor: Party,
        logged_by: IdentityId,
    },
}

impl LedgerEvent {
    /// The agreement this event concerns, if any.
    pub fn agreement_id(&self) -> Option<&AgreementId> {
        match self {
            Self::AgreementCreated { id, .. }
            | Self::AgreementAccepted { id, .. }
            | Self::AgreementTerminated { id, .. }
            | Self::ObserverAssigned { id, .. }
            | Self::ObserverAccepted { id, .. }
            | Self::ObserverRemoved { id, .. }
            | Self::AccessLogged { id, .. } => Some(id),
            Self::RoleGranted { .. }
            | Self::RoleRevoked { .. }
            | Self::CertificateIssued { .. }
            | Self::CertificateRevoked { .. } => None,
        }
    }

    /// Return a stable tag for this event type.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::RoleGranted { .. } => "role_granted",
            Self::RoleRevoked { .. } => "role_revoked",
            Self::CertificateIssued { .. } => "certificate_issued",
            Self::CertificateRevoked { .. } => "certificate_revoked",
            Self::AgreementCreated { .. } => "agreement_created",
            Self::AgreementAccepted { .. } => "agreement_accepted",
            Self::AgreementTerminated { .. } => "agreement_terminated",
            Self::ObserverAssigned { .. } => "observer_assigned",
            Self::ObserverAccepted { .. } => "observer_accepted",
            Self::ObserverRemoved { .. } => "observer_removed",
            Self::AccessLogged { .. } => "access_logged",
        }
    }
}
