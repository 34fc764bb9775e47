//! The ledger: one store object owning every component.
//!
//! All mutation goes through `&mut Ledger`, so operations are serialized by
//! the borrow checker. Each mutating method forwards to the owning
//! component, records the resulting [`LedgerEvent`] in the journal and
//! returns it. A rejected operation records nothing.

pub mod journal;

use serde::{Deserialize, Serialize};

use crate::agreement::{
    AccessLogEntry, AgreementId, AgreementState, DataSharingAgreement, DataSharingAgreements,
    ResourceAgreementRequest, ResourceSharingAgreement, ResourceSharingAgreements,
};
use crate::certification::{Certificate, ResourceCertification, ResourceId};
use crate::error::Result;
use crate::event::LedgerEvent;
use crate::identity::{IdentityId, Party};
use crate::index::{Enumerator, ParticipantRole};
use crate::proof::{FieldElement, Groth16Proof, ProofGate, ProofVerifier};
use crate::registry::{Role, TrustRegistry};

pub use journal::{verify_journal, Journal, JournalEntry};

/// Process-owned consent ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    registry: TrustRegistry,
    certificates: ResourceCertification,
    data_sharing: DataSharingAgreements,
    resource_sharing: ResourceSharingAgreements,
    access_log: Vec<AccessLogEntry>,
    journal: Journal,
}

impl Ledger {
    /// Create an empty ledger whose registry is owned by `owner`.
    pub fn new(owner: IdentityId) -> Self {
        log::info!("new ledger owned by {owner}");
        Self {
            registry: TrustRegistry::new(owner),
            certificates: ResourceCertification::new(),
            data_sharing: DataSharingAgreements::new(),
            resource_sharing: ResourceSharingAgreements::new(),
            access_log: Vec::new(),
            journal: Journal::new(),
        }
    }

    fn record(&mut self, outcome: Result<LedgerEvent>) -> Result<LedgerEvent> {
        let event = outcome?;
        self.journal.append(event.clone())?;
        Ok(event)
    }

    // ── Components ───────────────────────────────────────────────────────────

    pub fn registry(&self) -> &TrustRegistry {
        &self.registry
    }

    pub fn certificates(&self) -> &ResourceCertification {
        &self.certificates
    }

    pub fn data_sharing(&self) -> &DataSharingAgreements {
        &self.data_sharing
    }

    pub fn resource_sharing(&self) -> &ResourceSharingAgreements {
        &self.resource_sharing
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Every recorded event, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.journal.events()
    }

    /// Every logged resource access, oldest first.
    pub fn access_log(&self) -> &[AccessLogEntry] {
        &self.access_log
    }

    /// Logged accesses under one agreement.
    pub fn access_log_for<'a>(
        &'a self,
        id: &'a AgreementId,
    ) -> impl Iterator<Item = &'a AccessLogEntry> + 'a {
        self.access_log.iter().filter(move |e| &e.agreement_id == id)
    }

    // ── Registry ─────────────────────────────────────────────────────────────

    /// Grant `role` to `identity`. Re-granting keeps the original grant.
    pub fn add_role(
        &mut self,
        caller: &IdentityId,
        role: Role,
        identity: &IdentityId,
    ) -> Result<LedgerEvent> {
        let outcome = self
            .registry
            .add_role(caller, role, identity)
            .map(|m| LedgerEvent::RoleGranted {
                role,
                identity: m.identity,
                granted_by: m.added_by,
            });
        self.record(outcome)
    }

    pub fn remove_role(
        &mut self,
        caller: &IdentityId,
        role: Role,
        identity: &IdentityId,
    ) -> Result<LedgerEvent> {
        let outcome = self
            .registry
            .remove_role(caller, role, identity)
            .map(|m| LedgerEvent::RoleRevoked {
                role,
                identity: m.identity,
                revoked_by: caller.clone(),
            });
        self.record(outcome)
    }

    pub fn has_role(&self, role: Role, identity: &IdentityId) -> bool {
        self.registry.has_role(role, identity)
    }

    // ── Certification ────────────────────────────────────────────────────────

    pub fn certify(
        &mut self,
        caller: &IdentityId,
        resource_id: ResourceId,
        subject: IdentityId,
    ) -> Result<LedgerEvent> {
        let outcome = self
            .certificates
            .certify(&self.registry, caller, resource_id, subject)
            .map(|c| LedgerEvent::CertificateIssued {
                resource_id: c.resource_id,
                subject: c.subject,
                issuer: c.issuer,
            });
        self.record(outcome)
    }

    pub fn revoke_certificate(
        &mut self,
        caller: &IdentityId,
        resource_id: &ResourceId,
    ) -> Result<LedgerEvent> {
        let outcome = self
            .certificates
            .revoke(caller, resource_id)
            .map(|c| LedgerEvent::CertificateRevoked {
                resource_id: c.resource_id,
                issuer: c.issuer,
            });
        self.record(outcome)
    }

    pub fn verify_certificate(&self, resource_id: &ResourceId) -> Result<&Certificate> {
        self.certificates.verify(resource_id)
    }

    // ── Data sharing agreements ──────────────────────────────────────────────

    pub fn create_dsa(
        &mut self,
        caller: &IdentityId,
        recipient: &IdentityId,
        duration: &str,
        description: &str,
    ) -> Result<LedgerEvent> {
        let outcome =
            self.data_sharing
                .create(&self.registry, caller, recipient, duration, description);
        self.record(outcome)
    }

    pub fn accept_dsa(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let outcome = self.data_sharing.accept(caller, id);
        self.record(outcome)
    }

    pub fn cancel_dsa(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let outcome = self.data_sharing.cancel(caller, id);
        self.record(outcome)
    }

    pub fn reject_dsa(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let outcome = self.data_sharing.reject(caller, id);
        self.record(outcome)
    }

    pub fn revoke_dsa(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let outcome = self.data_sharing.revoke(caller, id);
        self.record(outcome)
    }

    /// Create a data sharing agreement with the proven commitment as
    /// provider.
    #[allow(clippy::too_many_arguments)]
    pub fn create_dsa_with_proof<V: ProofVerifier>(
        &mut self,
        gate: &ProofGate<V>,
        recipient: &IdentityId,
        duration: &str,
        description: &str,
        proof: &Groth16Proof,
        public_inputs: &[FieldElement],
    ) -> Result<LedgerEvent> {
        let outcome = gate.create_with_proof(
            &mut self.data_sharing,
            &self.registry,
            recipient,
            duration,
            description,
            proof,
            public_inputs,
        );
        self.record(outcome)
    }

    /// Accept a data sharing agreement as the proven commitment.
    pub fn accept_dsa_with_proof<V: ProofVerifier>(
        &mut self,
        gate: &ProofGate<V>,
        id: &AgreementId,
        proof: &Groth16Proof,
        public_inputs: &[FieldElement],
    ) -> Result<LedgerEvent> {
        let outcome = gate.accept_with_proof(&mut self.data_sharing, id, proof, public_inputs);
        self.record(outcome)
    }

    pub fn dsa(&self, id: &AgreementId) -> Result<&DataSharingAgreement> {
        self.data_sharing.get(id)
    }

    pub fn dsa_state(&self, id: &AgreementId) -> Result<AgreementState> {
        self.data_sharing.state(id)
    }

    pub fn count_dsas(
        &self,
        role: ParticipantRole,
        participant: &IdentityId,
        filter: &str,
    ) -> Result<usize> {
        Enumerator::new(&self.data_sharing).count(role, participant, filter)
    }

    pub fn list_dsas(
        &self,
        role: ParticipantRole,
        participant: &IdentityId,
        filter: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<&DataSharingAgreement>> {
        Enumerator::new(&self.data_sharing).page(role, participant, filter, offset, limit)
    }

    // ── Resource sharing agreements ──────────────────────────────────────────

    pub fn create_rsa(
        &mut self,
        caller: &IdentityId,
        request: ResourceAgreementRequest,
    ) -> Result<LedgerEvent> {
        let outcome =
            self.resource_sharing
                .create(&self.registry, &self.certificates, caller, request);
        self.record(outcome)
    }

    pub fn accept_rsa(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let outcome = self.resource_sharing.accept(caller, id);
        self.record(outcome)
    }

    pub fn cancel_rsa(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let outcome = self.resource_sharing.cancel(caller, id);
        self.record(outcome)
    }

    pub fn reject_rsa(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let outcome = self.resource_sharing.reject(caller, id);
        self.record(outcome)
    }

    pub fn revoke_rsa(&mut self, caller: &IdentityId, id: &AgreementId) -> Result<LedgerEvent> {
        let outcome = self.resource_sharing.revoke(caller, id);
        self.record(outcome)
    }

    pub fn create_observer_assignment(
        &mut self,
        caller: &IdentityId,
        id: &AgreementId,
        observer: Party,
    ) -> Result<LedgerEvent> {
        let outcome = self
            .resource_sharing
            .create_observer_assignment(caller, id, observer);
        self.record(outcome)
    }

    pub fn accept_observer_assignment(
        &mut self,
        caller: &IdentityId,
        id: &AgreementId,
    ) -> Result<LedgerEvent> {
        let outcome = self.resource_sharing.accept_observer_assignment(caller, id);
        self.record(outcome)
    }

    pub fn remove_observer_assignment(
        &mut self,
        caller: &IdentityId,
        id: &AgreementId,
        observer: &Party,
    ) -> Result<LedgerEvent> {
        let outcome = self
            .resource_sharing
            .remove_observer_assignment(caller, id, observer);
        self.record(outcome)
    }

    /// Authorise an access and append it to the access log.
    ///
    /// # Errors
    ///
    /// See [`ResourceSharingAgreements::authorize_access`]. Nothing is
    /// logged on error.
    pub fn authorize_and_log_access(
        &mut self,
        caller: &IdentityId,
        id: &AgreementId,
        resource_id: ResourceId,
        accessor: Party,
    ) -> Result<LedgerEvent> {
        self.resource_sharing
            .authorize_access(&self.registry, caller, id, &resource_id, &accessor)?;

        self.access_log.push(AccessLogEntry {
            agreement_id: id.clone(),
            resource_id: resource_id.clone(),
            accessor: accessor.clone(),
            logged_by: caller.clone(),
            timestamp: crate::time::now_micros(),
        });
        log::info!("access to {resource_id} under {id} by {accessor} logged by {caller}");

        self.record(Ok(LedgerEvent::AccessLogged {
            id: id.clone(),
            resource_id,
            accessor,
            logged_by: caller.clone(),
        }))
    }

    pub fn rsa(&self, id: &AgreementId) -> Result<&ResourceSharingAgreement> {
        self.resource_sharing.get(id)
    }

    pub fn count_rsas(
        &self,
        role: ParticipantRole,
        participant: &IdentityId,
        filter: &str,
    ) -> Result<usize> {
        Enumerator::new(&self.resource_sharing).count(role, participant, filter)
    }

    pub fn list_rsas(
        &self,
        role: ParticipantRole,
        participant: &IdentityId,
        filter: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<&ResourceSharingAgreement>> {
        Enumerator::new(&self.resource_sharing).page(role, participant, filter, offset, limit)
    }
}
