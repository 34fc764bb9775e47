//! Integration test: full end-to-end workflow.
//!
//! Tests the complete lifecycle through the `Ledger` store:
//! 1. Delegate roles down from the registry owner
//! 2. Certify resources
//! 3. Drive data and resource sharing agreements through their states
//! 4. Assign, accept and remove observers, and log accesses
//! 5. Gate agreement operations behind a proof
//! 6. Persist the ledger and verify its journal

use consent_ledger::proof::{FieldElement, FixedVerifier, Groth16Proof, ProofGate};
use consent_ledger::storage::{load_ledger, save_ledger};
use consent_ledger::{
    AgreementDuration, AgreementId, AgreementState, ContactRef, Disposition, IdentityId, Ledger,
    LedgerError, LedgerEvent, ParticipantRole, Party, ResourceAgreementRequest, Role,
};

fn id(s: &str) -> IdentityId {
    IdentityId::from(s)
}

fn contact(s: &str) -> Party {
    Party::Contact(ContactRef::from(s))
}

/// Owner, trusted application `app`, organisation/issuer `org`, patient
/// `pat`, professionals `doc` and `obs`, and certified `resource1..3`.
fn clinic() -> Ledger {
    let owner = id("owner");
    let mut ledger = Ledger::new(owner.clone());
    ledger
        .add_role(&owner, Role::TrustedApplication, &id("app"))
        .unwrap();
    ledger
        .add_role(&owner, Role::HealthcareOrganization, &id("org"))
        .unwrap();
    ledger
        .add_role(&owner, Role::TrustedIssuer, &id("org"))
        .unwrap();
    ledger
        .add_role(&id("app"), Role::Patient, &id("pat"))
        .unwrap();
    for professional in ["doc", "obs"] {
        ledger
            .add_role(&id("org"), Role::HealthcareProfessional, &id(professional))
            .unwrap();
    }
    for resource in ["resource1", "resource2", "resource3"] {
        ledger
            .certify(&id("org"), resource.into(), id("pat"))
            .unwrap();
    }
    ledger
}

fn created_id(event: &LedgerEvent) -> AgreementId {
    event
        .agreement_id()
        .cloned()
        .expect("creation event should carry an agreement id")
}

fn two_resource_request() -> ResourceAgreementRequest {
    ResourceAgreementRequest::new("1 day")
        .recipient(id("doc"))
        .observers(true)
        .resource("resource1".into())
        .resource("resource2".into())
}

#[test]
fn full_workflow_resource_agreement_with_observers() {
    let mut ledger = clinic();

    // ── Step 1: Create and accept ───────────────────────────────────────
    let event = ledger.create_rsa(&id("pat"), two_resource_request()).unwrap();
    let rsa_id = created_id(&event);
    assert!(matches!(
        event,
        LedgerEvent::AgreementCreated {
            state: AgreementState::Pending,
            ..
        }
    ));
    ledger.accept_rsa(&id("doc"), &rsa_id).unwrap();

    let rsa = ledger.rsa(&rsa_id).unwrap();
    assert_eq!(rsa.duration, AgreementDuration::OneDay);
    assert_eq!(rsa.state, AgreementState::Active);
    assert_eq!(rsa.resources.len(), 2);

    // ── Step 2: Identity observer starts unaccepted ─────────────────────
    let event = ledger
        .create_observer_assignment(&id("doc"), &rsa_id, Party::Identity(id("obs")))
        .unwrap();
    assert!(matches!(
        event,
        LedgerEvent::ObserverAssigned {
            accepted: false,
            ..
        }
    ));

    // ── Step 3: Contact observer is accepted immediately ────────────────
    let email = contact("observer@example.com");
    let event = ledger
        .create_observer_assignment(&id("doc"), &rsa_id, email.clone())
        .unwrap();
    assert!(matches!(
        event,
        LedgerEvent::ObserverAssigned { accepted: true, .. }
    ));

    ledger
        .authorize_and_log_access(&id("org"), &rsa_id, "resource1".into(), email.clone())
        .unwrap();

    // ── Step 4: Identity observer gains access only after accepting ─────
    let err = ledger
        .authorize_and_log_access(
            &id("org"),
            &rsa_id,
            "resource2".into(),
            Party::Identity(id("obs")),
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized(_)));

    ledger
        .accept_observer_assignment(&id("obs"), &rsa_id)
        .unwrap();
    ledger
        .authorize_and_log_access(
            &id("org"),
            &rsa_id,
            "resource2".into(),
            Party::Identity(id("obs")),
        )
        .unwrap();

    // A resource outside the bundle stays closed.
    let err = ledger
        .authorize_and_log_access(&id("org"), &rsa_id, "resource3".into(), email)
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    assert_eq!(ledger.access_log_for(&rsa_id).count(), 2);
    assert!(ledger.journal().verify().is_ok());
}

#[test]
fn full_workflow_duplicate_observers_rejected() {
    let mut ledger = clinic();
    let rsa_id = created_id(&ledger.create_rsa(&id("pat"), two_resource_request()).unwrap());
    ledger.accept_rsa(&id("doc"), &rsa_id).unwrap();

    for observer in [contact("observer@example.com"), Party::Identity(id("obs"))] {
        ledger
            .create_observer_assignment(&id("doc"), &rsa_id, observer.clone())
            .unwrap();
        let err = ledger
            .create_observer_assignment(&id("doc"), &rsa_id, observer)
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateObserver(_)));
    }
}

#[test]
fn full_workflow_invalid_duration_and_missing_recipient() {
    let mut ledger = clinic();

    let err = ledger
        .create_rsa(
            &id("pat"),
            ResourceAgreementRequest::new("2 weeks")
                .recipient(id("doc"))
                .resource("resource1".into()),
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidDuration(_)));
    assert_eq!(err.kind(), "invalid_duration");

    let err = ledger
        .create_rsa(
            &id("pat"),
            ResourceAgreementRequest::new("1 day").resource("resource1".into()),
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::MissingRecipient));

    assert!(ledger.resource_sharing().is_empty());
}

#[test]
fn full_workflow_revoke_clears_every_bucket() {
    let mut ledger = clinic();

    for _ in 0..2 {
        let rsa_id = created_id(&ledger.create_rsa(&id("pat"), two_resource_request()).unwrap());
        ledger.accept_rsa(&id("doc"), &rsa_id).unwrap();

        // Re-created agreements start without observers.
        assert!(ledger.rsa(&rsa_id).unwrap().observers.is_empty());

        ledger
            .create_observer_assignment(&id("doc"), &rsa_id, Party::Identity(id("obs")))
            .unwrap();
        ledger
            .accept_observer_assignment(&id("obs"), &rsa_id)
            .unwrap();

        assert_eq!(ledger.count_rsas(ParticipantRole::Provider, &id("pat"), "ALL").unwrap(), 1);
        assert_eq!(ledger.count_rsas(ParticipantRole::Recipient, &id("doc"), "ALL").unwrap(), 1);
        assert_eq!(ledger.count_rsas(ParticipantRole::Observer, &id("obs"), "ALL").unwrap(), 1);

        let event = ledger.revoke_rsa(&id("pat"), &rsa_id).unwrap();
        assert!(matches!(
            event,
            LedgerEvent::AgreementTerminated {
                disposition: Disposition::Revoked,
                ..
            }
        ));

        for (role, who) in [
            (ParticipantRole::Provider, "pat"),
            (ParticipantRole::Recipient, "doc"),
            (ParticipantRole::Observer, "obs"),
        ] {
            assert!(ledger
                .list_rsas(role, &id(who), "ALL", 0, 10)
                .unwrap()
                .is_empty());
        }
        assert!(matches!(
            ledger.rsa(&rsa_id).unwrap_err(),
            LedgerError::NotFound(_)
        ));
    }
}

#[test]
fn full_workflow_data_sharing_single_record_per_pair() {
    let mut ledger = clinic();

    let first = created_id(
        &ledger
            .create_dsa(&id("pat"), &id("doc"), "1 month", "blood tests")
            .unwrap(),
    );
    ledger.accept_dsa(&id("doc"), &first).unwrap();
    let second = created_id(
        &ledger
            .create_dsa(&id("pat"), &id("doc"), "1 year", "imaging")
            .unwrap(),
    );

    assert_eq!(first, second);
    assert_eq!(ledger.data_sharing().len(), 1);
    let dsa = ledger.dsa(&first).unwrap();
    assert_eq!(dsa.state, AgreementState::Pending);
    assert_eq!(dsa.description, "imaging");
    assert_eq!(
        ledger
            .count_dsas(ParticipantRole::Provider, &id("pat"), "ALL")
            .unwrap(),
        1
    );
}

#[test]
fn full_workflow_colon_bearing_identities_stay_separate() {
    let mut ledger = clinic();
    for patient in ["a:b", "a"] {
        ledger.add_role(&id("app"), Role::Patient, &id(patient)).unwrap();
    }
    for professional in ["c", "b:c"] {
        ledger
            .add_role(&id("org"), Role::HealthcareProfessional, &id(professional))
            .unwrap();
    }

    let first = created_id(&ledger.create_dsa(&id("a:b"), &id("c"), "1 week", "x").unwrap());
    let second = created_id(&ledger.create_dsa(&id("a"), &id("b:c"), "1 week", "y").unwrap());
    assert_ne!(first, second);
    assert_eq!(ledger.data_sharing().len(), 2);

    for (who, role) in [("c", ParticipantRole::Recipient), ("a:b", ParticipantRole::Provider)] {
        let page = ledger.list_dsas(role, &id(who), "ALL", 0, 10).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, first);
    }

    ledger.cancel_dsa(&id("a:b"), &first).unwrap();
    assert_eq!(ledger.dsa(&second).unwrap().recipient, id("b:c"));
}

#[test]
fn full_workflow_transitions_are_single_use() {
    let mut ledger = clinic();

    let accepted = created_id(&ledger.create_dsa(&id("pat"), &id("doc"), "1 week", "a").unwrap());
    ledger.accept_dsa(&id("doc"), &accepted).unwrap();
    assert!(matches!(
        ledger.accept_dsa(&id("doc"), &accepted).unwrap_err(),
        LedgerError::NotFound(_)
    ));
    ledger.revoke_dsa(&id("doc"), &accepted).unwrap();

    let cancelled = created_id(&ledger.create_dsa(&id("pat"), &id("doc"), "1 week", "b").unwrap());
    ledger.cancel_dsa(&id("pat"), &cancelled).unwrap();
    assert!(matches!(
        ledger.cancel_dsa(&id("pat"), &cancelled).unwrap_err(),
        LedgerError::NotFound(_)
    ));

    let rejected = created_id(&ledger.create_dsa(&id("pat"), &id("doc"), "1 week", "c").unwrap());
    ledger.reject_dsa(&id("doc"), &rejected).unwrap();
    assert!(matches!(
        ledger.reject_dsa(&id("doc"), &rejected).unwrap_err(),
        LedgerError::NotFound(_)
    ));
}

#[test]
fn full_workflow_pagination_and_filters() {
    let mut ledger = clinic();
    ledger
        .create_dsa(&id("pat"), &id("doc"), "6 months", "notes")
        .unwrap();

    let page = ledger
        .list_dsas(ParticipantRole::Provider, &id("pat"), "ALL", 1, 10)
        .unwrap();
    assert!(page.is_empty());

    let page = ledger
        .list_dsas(ParticipantRole::Provider, &id("pat"), "PENDING", 0, 10)
        .unwrap();
    assert_eq!(page.len(), 1);

    let err = ledger
        .list_dsas(ParticipantRole::Provider, &id("pat"), "pending", 0, 10)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidFilter(_)));
    assert_eq!(
        ledger
            .count_dsas(ParticipantRole::Observer, &id("pat"), "ALL")
            .unwrap(),
        0
    );
}

#[test]
fn full_workflow_proof_gated_agreement() {
    let mut ledger = clinic();
    let commitment = FieldElement::parse(
        "4267533774488295900887461483015112262021273608761099826938271132511348470966",
    )
    .unwrap();
    let patient = IdentityId::from_commitment(&commitment);
    ledger
        .add_role(&id("app"), Role::Patient, &patient)
        .unwrap();

    // Garbage proof: rejected, nothing recorded.
    let rejecting = ProofGate::new(FixedVerifier(false));
    let before = ledger.journal().len();
    let err = ledger
        .create_dsa_with_proof(
            &rejecting,
            &id("doc"),
            "1 week",
            "genome",
            &Groth16Proof::zeroed(),
            std::slice::from_ref(&commitment),
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidProof));
    assert!(ledger.data_sharing().is_empty());
    assert_eq!(ledger.journal().len(), before);

    // Two public inputs never reach the verifier.
    let accepting = ProofGate::new(FixedVerifier(true));
    let err = ledger
        .create_dsa_with_proof(
            &accepting,
            &id("doc"),
            "1 week",
            "genome",
            &Groth16Proof::zeroed(),
            &[commitment.clone(), commitment.clone()],
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidProof));

    // Valid proof: the provider is the commitment itself.
    let event = ledger
        .create_dsa_with_proof(
            &accepting,
            &id("doc"),
            "1 week",
            "genome",
            &Groth16Proof::zeroed(),
            std::slice::from_ref(&commitment),
        )
        .unwrap();
    let dsa_id = created_id(&event);
    assert_eq!(ledger.dsa(&dsa_id).unwrap().provider, patient);
    assert_eq!(ledger.dsa(&dsa_id).unwrap().provider.as_str(), commitment.as_str());
}

#[test]
fn full_workflow_persists_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let mut ledger = clinic();
    let rsa_id = created_id(&ledger.create_rsa(&id("pat"), two_resource_request()).unwrap());
    ledger.accept_rsa(&id("doc"), &rsa_id).unwrap();
    ledger
        .create_observer_assignment(&id("doc"), &rsa_id, Party::Identity(id("obs")))
        .unwrap();
    save_ledger(&ledger, &path).unwrap();

    let mut restored = load_ledger(&path).unwrap();
    assert_eq!(restored.journal().len(), ledger.journal().len());
    assert_eq!(
        restored
            .count_rsas(ParticipantRole::Observer, &id("obs"), "ACTIVE")
            .unwrap(),
        1
    );

    restored
        .accept_observer_assignment(&id("obs"), &rsa_id)
        .unwrap();
    restored.revoke_rsa(&id("doc"), &rsa_id).unwrap();
    assert_eq!(
        restored
            .count_rsas(ParticipantRole::Observer, &id("obs"), "ALL")
            .unwrap(),
        0
    );
    assert!(restored.journal().verify().is_ok());
}
