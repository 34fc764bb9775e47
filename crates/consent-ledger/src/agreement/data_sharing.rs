//! Simple bilateral data sharing agreements.
//!
//! One agreement per (provider, recipient) pair: the id is derived from the
//! pair, so creating again for the same pair replaces the previous terms and
//! puts the agreement back into `Pending`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::event::LedgerEvent;
use crate::identity::{IdentityId, Party};
use crate::index::{AgreementIndex, Enumerable, ParticipantRole};
use crate::registry::{Role, TrustRegistry};

use super::types::{AgreementDuration, AgreementId, AgreementKind, AgreementState, Disposition};

/// A patient's agreement to share a described asset with one professional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSharingAgreement {
    pub id: AgreementId,
    pub provider: IdentityId,
    pub recipient: IdentityId,
    pub duration: AgreementDuration,
    pub description: String,
    pub state: AgreementState,
    /// Creation timestamp (microseconds since epoch).
    pub created_at: u64,
}

/// Store and state machine for [`DataSharingAgreement`] records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSharingAgreements {
    agreements: HashMap<AgreementId, DataSharingAgreement>,
    index: AgreementIndex,
}

impl DataSharingAgreements {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id an agreement between `provider` and `recipient` lives at.
    pub fn id_for(provider: &IdentityId, recipient: &IdentityId) -> AgreementId {
        AgreementId::derive(
            AgreementKind::DataSharing,
            &[provider.as_str(), recipient.as_str()],
        )
    }

    /// Create (or replace) the pending agreement from `caller` to `recipient`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `caller` is not a patient or `recipient` is not a
    /// healthcare professional; `InvalidDuration` for an unknown term.
    pub fn create(
        &mut self,
        registry: &TrustRegistry,
        caller: &IdentityId,
        recipient: &IdentityId,
        duration: &str,
        description: &str,
    ) -> Result<LedgerEvent> {
        registry.require(Role::Patient, caller)?;
        registry.require(Role::HealthcareProfessional, recipient)?;
        let duration: AgreementDuration = duration.parse()?;

        let id = Self::id_for(caller, recipient);
        let agreement = DataSharingAgreement {
            id: id.clone(),
            provider: caller.clone(),
            recipient: recipient.clone(),
            duration,
            description: description.to_string(),
            state: AgreementState::Pending,
            created_at: crate::time::now_micros(),
        };

        if self.agreements.insert(id.clone(), agreement).is_some() {
            log::debug!("data sharing agreement {id} replaced by a new create");
        }
        self.index.insert(ParticipantRole::Provider, caller, &id);
        self.index.insert(ParticipantRole::Recipient, recipient, &id);
        log::info!("data sharing agreement {id} created by {caller} for {recipient}");

        Ok(LedgerEvent::AgreementCreated {
            id,
            kind: AgreementKind::DataSharing,
            provider: caller.clone(),
            recipient: Party::Identity(recipient.clone()),
            state: AgreementState::Pending,
        })
    }

    /// Accept a pending agreement. Only the recipient may accept.
    pub fn accept(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let agreement = self.in_state_mut(id, AgreementState::Pending)?;
        if &agreement.recipient != caller {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} is not the recipient of {id}"
            )));
        }
        agreement.state = AgreementState::Active;
        log::debug!("data sharing agreement {id} accepted");

        Ok(LedgerEvent::AgreementAccepted {
            id: id.clone(),
            kind: AgreementKind::DataSharing,
        })
    }

    /// Withdraw a pending agreement. Only the provider may cancel.
    pub fn cancel(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let agreement = self.in_state(id, AgreementState::Pending)?;
        if &agreement.provider != caller {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} is not the provider of {id}"
            )));
        }
        Ok(self.terminate(caller, id, Disposition::Cancelled))
    }

    /// Decline a pending agreement. Only the recipient may reject.
    pub fn reject(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let agreement = self.in_state(id, AgreementState::Pending)?;
        if &agreement.recipient != caller {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} is not the recipient of {id}"
            )));
        }
        Ok(self.terminate(caller, id, Disposition::Rejected))
    }

    /// End an active agreement. Either party may revoke.
    pub fn revoke(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let agreement = self.in_state(id, AgreementState::Active)?;
        if &agreement.provider != caller && &agreement.recipient != caller {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} is not a party to {id}"
            )));
        }
        Ok(self.terminate(caller, id, Disposition::Revoked))
    }

    /// Current state of a live agreement.
    pub fn state(&self, id: &AgreementId) -> Result<AgreementState> {
        self.get(id).map(|a| a.state)
    }

    /// Read a live agreement.
    pub fn get(&self, id: &AgreementId) -> Result<&DataSharingAgreement> {
        self.agreements
            .get(id)
            .ok_or_else(|| LedgerError::NotFound(format!("data sharing agreement {id}")))
    }

    pub fn len(&self) -> usize {
        self.agreements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agreements.is_empty()
    }

    // ── internals ────────────────────────────────────────────────────────────

    fn in_state(&self, id: &AgreementId, state: AgreementState) -> Result<&DataSharingAgreement> {
        self.agreements
            .get(id)
            .filter(|a| a.state == state)
            .ok_or_else(|| LedgerError::NotFound(format!("no {state} data sharing agreement {id}")))
    }

    fn in_state_mut(
        &mut self,
        id: &AgreementId,
        state: AgreementState,
    ) -> Result<&mut DataSharingAgreement> {
        self.agreements
            .get_mut(id)
            .filter(|a| a.state == state)
            .ok_or_else(|| LedgerError::NotFound(format!("no {state} data sharing agreement {id}")))
    }

    /// Drop the record and its index entries. Caller has checked existence.
    fn terminate(&mut self, by: &IdentityId, id: &AgreementId, disposition: Disposition) -> LedgerEvent {
        if let Some(agreement) = self.agreements.remove(id) {
            self.index
                .remove(ParticipantRole::Provider, &agreement.provider, id);
            self.index
                .remove(ParticipantRole::Recipient, &agreement.recipient, id);
        }
        log::info!(
            "data sharing agreement {id} {} by {by}",
            disposition.as_str()
        );
        LedgerEvent::AgreementTerminated {
            id: id.clone(),
            kind: AgreementKind::DataSharing,
            disposition,
            by: by.clone(),
        }
    }
}

impl Enumerable for DataSharingAgreements {
    type Record = DataSharingAgreement;

    fn index(&self) -> &AgreementIndex {
        &self.index
    }

    fn lookup(&self, id: &AgreementId) -> Option<&DataSharingAgreement> {
        self.agreements.get(id)
    }

    fn state_of(record: &DataSharingAgreement) -> AgreementState {
        record.state
    }
}
