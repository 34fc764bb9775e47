//! Resource sharing agreements: a bundle of certified resources shared with
//! one recipient, optionally opened up to observers.
//!
//! Ids are fresh per creation, so a provider may hold several agreements
//! with the same recipient at once. Terminating an agreement removes the
//! record, its observer list and every index entry pointing at it in one
//! call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::certification::{ResourceCertification, ResourceId};
use crate::error::{LedgerError, Result};
use crate::event::LedgerEvent;
use crate::identity::{ContactRef, IdentityId, Party};
use crate::index::{AgreementIndex, Enumerable, ParticipantRole};
use crate::registry::{Role, TrustRegistry};

use super::observer::ObserverAssignment;
use super::types::{AgreementDuration, AgreementId, AgreementKind, AgreementState, Disposition};

/// A live resource sharing agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSharingAgreement {
    pub id: AgreementId,
    pub provider: IdentityId,
    pub recipient: Party,
    pub duration: AgreementDuration,
    /// Whether the recipient may assign observers ("second opinion").
    pub observers_enabled: bool,
    pub resources: Vec<ResourceId>,
    pub state: AgreementState,
    pub observers: Vec<ObserverAssignment>,
    /// Creation timestamp (microseconds since epoch).
    pub created_at: u64,
}

impl ResourceSharingAgreement {
    pub fn has_resource(&self, resource_id: &ResourceId) -> bool {
        self.resources.contains(resource_id)
    }

    /// Whether `accessor` is the recipient or an accepted observer.
    pub fn can_access(&self, accessor: &Party) -> bool {
        &self.recipient == accessor
            || self.observers.iter().any(|a| a.grants_access_to(accessor))
    }
}

/// Parameters for [`ResourceSharingAgreements::create`].
#[derive(Debug, Clone)]
pub struct ResourceAgreementRequest {
    recipient: Option<IdentityId>,
    recipient_contact: Option<ContactRef>,
    duration: String,
    observers_enabled: bool,
    resources: Vec<ResourceId>,
}

impl ResourceAgreementRequest {
    /// Start a request for the given duration label.
    pub fn new(duration: impl Into<String>) -> Self {
        Self {
            recipient: None,
            recipient_contact: None,
            duration: duration.into(),
            observers_enabled: false,
            resources: Vec::new(),
        }
    }

    /// Address the agreement to an on-registry recipient.
    pub fn recipient(mut self, recipient: IdentityId) -> Self {
        self.recipient = Some(recipient);
        self
    }

    /// Address the agreement to an external contact.
    pub fn recipient_contact(mut self, contact: ContactRef) -> Self {
        self.recipient_contact = Some(contact);
        self
    }

    /// Allow (or forbid) the recipient to assign observers.
    pub fn observers(mut self, enabled: bool) -> Self {
        self.observers_enabled = enabled;
        self
    }

    /// Add a resource to the bundle.
    pub fn resource(mut self, resource_id: ResourceId) -> Self {
        self.resources.push(resource_id);
        self
    }

    /// Add multiple resources.
    pub fn resources(mut self, resources: Vec<ResourceId>) -> Self {
        self.resources.extend(resources);
        self
    }
}

/// Store and state machine for [`ResourceSharingAgreement`] records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceSharingAgreements {
    agreements: HashMap<AgreementId, ResourceSharingAgreement>,
    index: AgreementIndex,
    next_nonce: u64,
}

impl ResourceSharingAgreements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an agreement from `caller` (the provider).
    ///
    /// Agreements addressed to an identity start `Pending` and wait for the
    /// recipient. Agreements addressed to a contact start `Active`.
    ///
    /// # Errors
    ///
    /// In order of checking: `Unauthorized` (caller not a patient),
    /// `InvalidDuration`, `MissingRecipient`, `Unauthorized` (recipient not
    /// a healthcare professional), `UncertifiedResource`.
    pub fn create(
        &mut self,
        registry: &TrustRegistry,
        certs: &ResourceCertification,
        caller: &IdentityId,
        request: ResourceAgreementRequest,
    ) -> Result<LedgerEvent> {
        registry.require(Role::Patient, caller)?;
        let duration: AgreementDuration = request.duration.parse()?;
        let recipient = Party::resolve(request.recipient, request.recipient_contact)
            .ok_or(LedgerError::MissingRecipient)?;
        if let Party::Identity(recipient_id) = &recipient {
            registry.require(Role::HealthcareProfessional, recipient_id)?;
        }
        if let Some(missing) = request.resources.iter().find(|r| !certs.is_certified(r)) {
            return Err(LedgerError::UncertifiedResource(missing.to_string()));
        }

        self.next_nonce += 1;
        let (recipient_kind, recipient_ref) = match &recipient {
            Party::Identity(id) => ("identity", id.as_str()),
            Party::Contact(c) => ("contact", c.as_str()),
        };
        let nonce = self.next_nonce.to_string();
        let id = AgreementId::derive(
            AgreementKind::ResourceSharing,
            &[caller.as_str(), recipient_kind, recipient_ref, &nonce],
        );
        let state = if recipient.is_contact() {
            AgreementState::Active
        } else {
            AgreementState::Pending
        };

        self.index.insert(ParticipantRole::Provider, caller, &id);
        if let Some(recipient_id) = recipient.identity() {
            self.index
                .insert(ParticipantRole::Recipient, recipient_id, &id);
        }
        self.agreements.insert(
            id.clone(),
            ResourceSharingAgreement {
                id: id.clone(),
                provider: caller.clone(),
                recipient: recipient.clone(),
                duration,
                observers_enabled: request.observers_enabled,
                resources: request.resources,
                state,
                observers: Vec::new(),
                created_at: crate::time::now_micros(),
            },
        );
        log::info!("resource sharing agreement {id} created by {caller} for {recipient} ({state})");

        Ok(LedgerEvent::AgreementCreated {
            id,
            kind: AgreementKind::ResourceSharing,
            provider: caller.clone(),
            recipient,
            state,
        })
    }

    /// Accept a pending agreement. Only an identity recipient may accept.
    pub fn accept(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let agreement = self.in_state_mut(id, AgreementState::Pending)?;
        if !agreement.recipient.is_identity(caller) {
            return Err(not_recipient(caller, id));
        }
        agreement.state = AgreementState::Active;
        log::debug!("resource sharing agreement {id} accepted");

        Ok(LedgerEvent::AgreementAccepted {
            id: id.clone(),
            kind: AgreementKind::ResourceSharing,
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
        if !agreement.recipient.is_identity(caller) {
            return Err(not_recipient(caller, id));
        }
        Ok(self.terminate(caller, id, Disposition::Rejected))
    }

    /// End an active agreement. The provider or an identity recipient may
    /// revoke.
    pub fn revoke(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let agreement = self.in_state(id, AgreementState::Active)?;
        if &agreement.provider != caller && !agreement.recipient.is_identity(caller) {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} is not a party to {id}"
            )));
        }
        Ok(self.terminate(caller, id, Disposition::Revoked))
    }

    // ── Observers ────────────────────────────────────────────────────────────

    /// Assign an observer. Only the recipient may assign, and only when the
    /// agreement was created with observers enabled.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized`, `ObserverDisabled`, `MissingObserver`
    /// (empty identity or contact), `DuplicateObserver`.
    pub fn create_observer_assignment(
        &mut self,
        caller: &IdentityId,
        id: &AgreementId,
        observer: Party,
    ) -> Result<LedgerEvent> {
        let agreement = self
            .agreements
            .get_mut(id)
            .ok_or_else(|| not_found(id))?;
        if !agreement.recipient.is_identity(caller) {
            return Err(not_recipient(caller, id));
        }
        if !agreement.observers_enabled {
            return Err(LedgerError::ObserverDisabled(id.to_string()));
        }
        if observer.is_empty() {
            return Err(LedgerError::MissingObserver);
        }
        if agreement.observers.iter().any(|a| a.observer == observer) {
            return Err(LedgerError::DuplicateObserver(observer.to_string()));
        }

        let assignment = ObserverAssignment::new(observer.clone());
        let accepted = assignment.accepted;
        agreement.observers.push(assignment);
        if let Some(observer_id) = observer.identity() {
            self.index.insert(ParticipantRole::Observer, observer_id, id);
        }
        log::debug!("observer {observer} assigned to {id} (accepted: {accepted})");

        Ok(LedgerEvent::ObserverAssigned {
            id: id.clone(),
            observer,
            accepted,
        })
    }

    /// Accept the caller's pending observer assignment on `id`.
    pub fn accept_observer_assignment(
        &mut self,
        caller: &IdentityId,
        id: &AgreementId,
    ) -> Result<LedgerEvent> {
        let assignment = self
            .agreements
            .get_mut(id)
            .and_then(|a| {
                a.observers
                    .iter_mut()
                    .find(|o| !o.accepted && o.observer.is_identity(caller))
            })
            .ok_or_else(|| {
                LedgerError::NotFound(format!(
                    "no pending observer assignment for {caller} on {id}"
                ))
            })?;
        assignment.accepted = true;
        log::debug!("observer {caller} accepted assignment on {id}");

        Ok(LedgerEvent::ObserverAccepted {
            id: id.clone(),
            observer: caller.clone(),
        })
    }

    /// Remove an observer. Only the recipient may remove.
    pub fn remove_observer_assignment(
        &mut self,
        caller: &IdentityId,
        id: &AgreementId,
        observer: &Party,
    ) -> Result<LedgerEvent> {
        let agreement = self
            .agreements
            .get_mut(id)
            .ok_or_else(|| not_found(id))?;
        if !agreement.recipient.is_identity(caller) {
            return Err(not_recipient(caller, id));
        }
        let position = agreement
            .observers
            .iter()
            .position(|a| &a.observer == observer)
            .ok_or_else(|| LedgerError::NotFound(format!("observer {observer} on {id}")))?;

        agreement.observers.remove(position);
        if let Some(observer_id) = observer.identity() {
            self.index.remove(ParticipantRole::Observer, observer_id, id);
        }
        log::debug!("observer {observer} removed from {id}");

        Ok(LedgerEvent::ObserverRemoved {
            id: id.clone(),
            observer: observer.clone(),
        })
    }

    // ── Access ───────────────────────────────────────────────────────────────

    /// Check that `accessor` may read `resource_id` under agreement `id`.
    ///
    /// The caller is the healthcare organisation serving the resource, not
    /// the accessor. Logging the access is left to the owner of the access
    /// log (see [`crate::ledger::Ledger::authorize_and_log_access`]).
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `caller` is not a healthcare organisation or
    /// `accessor` is neither the recipient nor an accepted observer;
    /// `NotFound` if the agreement is missing or not active, or does not
    /// share `resource_id`.
    pub fn authorize_access(
        &self,
        registry: &TrustRegistry,
        caller: &IdentityId,
        id: &AgreementId,
        resource_id: &ResourceId,
        accessor: &Party,
    ) -> Result<()> {
        registry.require(Role::HealthcareOrganization, caller)?;
        let agreement = self.in_state(id, AgreementState::Active)?;
        if !agreement.has_resource(resource_id) {
            return Err(LedgerError::NotFound(format!(
                "{resource_id} is not shared under {id}"
            )));
        }
        if !agreement.can_access(accessor) {
            return Err(LedgerError::Unauthorized(format!(
                "{accessor} may not access resources of {id}"
            )));
        }
        log::debug!("access to {resource_id} under {id} by {accessor} authorised for {caller}");
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    /// Read a live agreement.
    pub fn get(&self, id: &AgreementId) -> Result<&ResourceSharingAgreement> {
        self.agreements.get(id).ok_or_else(|| not_found(id))
    }

    pub fn len(&self) -> usize {
        self.agreements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agreements.is_empty()
    }

    // ── internals ────────────────────────────────────────────────────────────

    fn in_state(&self, id: &AgreementId, state: AgreementState) -> Result<&ResourceSharingAgreement> {
        self.agreements
            .get(id)
            .filter(|a| a.state == state)
            .ok_or_else(|| {
                LedgerError::NotFound(format!("no {state} resource sharing agreement {id}"))
            })
    }

    fn in_state_mut(
        &mut self,
        id: &AgreementId,
        state: AgreementState,
    ) -> Result<&mut ResourceSharingAgreement> {
        self.agreements
            .get_mut(id)
            .filter(|a| a.state == state)
            .ok_or_else(|| {
                LedgerError::NotFound(format!("no {state} resource sharing agreement {id}"))
            })
    }

    /// Drop the record, its observers and all its index entries.
    fn terminate(&mut self, by: &IdentityId, id: &AgreementId, disposition: Disposition) -> LedgerEvent {
        if let Some(agreement) = self.agreements.remove(id) {
            self.index
                .remove(ParticipantRole::Provider, &agreement.provider, id);
            if let Some(recipient_id) = agreement.recipient.identity() {
                self.index
                    .remove(ParticipantRole::Recipient, recipient_id, id);
            }
            for assignment in &agreement.observers {
                if let Some(observer_id) = assignment.observer.identity() {
                    self.index
                        .remove(ParticipantRole::Observer, observer_id, id);
                }
            }
        }
        log::info!(
            "resource sharing agreement {id} {} by {by}",
            disposition.as_str()
        );
        LedgerEvent::AgreementTerminated {
            id: id.clone(),
            kind: AgreementKind::ResourceSharing,
            disposition,
            by: by.clone(),
        }
    }
}

fn not_found(id: &AgreementId) -> LedgerError {
    LedgerError::NotFound(format!("resource sharing agreement {id}"))
}

fn not_recipient(caller: &IdentityId, id: &AgreementId) -> LedgerError {
    LedgerError::Unauthorized(format!("{caller} is not the recipient of {id}"))
}

impl Enumerable for ResourceSharingAgreements {
    type Record = ResourceSharingAgreement;

    fn index(&self) -> &AgreementIndex {
        &self.index
    }

    fn lookup(&self, id: &AgreementId) -> Option<&ResourceSharingAgreement> {
        self.agreements.get(id)
    }

    fn state_of(record: &ResourceSharingAgreement) -> AgreementState {
        record.state
    }
}
