//! Volume tests: thousands of agreements, deep pagination, long journals,
//! and a ledger shared across threads.

use std::sync::{Arc, Mutex};
use std::thread;

use consent_ledger::storage::{load_ledger, save_ledger};
use consent_ledger::{
    AgreementId, AgreementState, IdentityId, Ledger, LedgerEvent, ParticipantRole,
    ResourceAgreementRequest, Role,
};

fn id(s: &str) -> IdentityId {
    IdentityId::from(s)
}

fn created_id(event: &LedgerEvent) -> AgreementId {
    event.agreement_id().cloned().expect("creation carries an id")
}

/// Registry with `patients` patients, `professionals` professionals and
/// one certified resource per patient.
fn populated(patients: usize, professionals: usize) -> Ledger {
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
    for p in 0..patients {
        let patient = id(&format!("patient-{p}"));
        ledger.add_role(&id("app"), Role::Patient, &patient).unwrap();
        ledger
            .certify(&id("org"), format!("record-{p}").as_str().into(), patient)
            .unwrap();
    }
    for d in 0..professionals {
        ledger
            .add_role(
                &id("org"),
                Role::HealthcareProfessional,
                &id(&format!("doc-{d}")),
            )
            .unwrap();
    }
    ledger
}

#[test]
fn stress_1k_resource_agreements_single_provider() {
    let mut ledger = populated(1, 1);
    let provider = id("patient-0");

    let mut ids = Vec::with_capacity(1_000);
    for _ in 0..1_000 {
        let request = ResourceAgreementRequest::new("1 week")
            .recipient(id("doc-0"))
            .resource("record-0".into());
        ids.push(created_id(&ledger.create_rsa(&provider, request).unwrap()));
    }
    for rsa_id in ids.iter().step_by(2) {
        ledger.accept_rsa(&id("doc-0"), rsa_id).unwrap();
    }

    assert_eq!(ledger.resource_sharing().len(), 1_000);
    assert_eq!(
        ledger
            .count_rsas(ParticipantRole::Provider, &provider, "ALL")
            .unwrap(),
        1_000
    );
    assert_eq!(
        ledger
            .count_rsas(ParticipantRole::Provider, &provider, "ACTIVE")
            .unwrap(),
        500
    );
    assert_eq!(
        ledger
            .count_rsas(ParticipantRole::Recipient, &id("doc-0"), "PENDING")
            .unwrap(),
        500
    );

    // Walk every page of active agreements.
    let mut seen = 0;
    let mut offset = 0;
    loop {
        let page = ledger
            .list_rsas(ParticipantRole::Provider, &provider, "ACTIVE", offset, 64)
            .unwrap();
        if page.is_empty() {
            break;
        }
        assert!(page.iter().all(|a| a.state == AgreementState::Active));
        seen += page.len();
        offset += page.len();
    }
    assert_eq!(seen, 500);

    for rsa_id in &ids {
        match ledger.rsa(rsa_id).unwrap().state {
            AgreementState::Active => ledger.revoke_rsa(&provider, rsa_id).unwrap(),
            AgreementState::Pending => ledger.cancel_rsa(&provider, rsa_id).unwrap(),
        };
    }
    assert!(ledger.resource_sharing().is_empty());
    assert_eq!(
        ledger
            .count_rsas(ParticipantRole::Recipient, &id("doc-0"), "ALL")
            .unwrap(),
        0
    );
}

#[test]
fn stress_100x20_data_sharing_pairs() {
    let mut ledger = populated(100, 20);

    for p in 0..100 {
        let patient = id(&format!("patient-{p}"));
        for d in 0..20 {
            ledger
                .create_dsa(&patient, &id(&format!("doc-{d}")), "3 months", "history")
                .unwrap();
        }
    }
    assert_eq!(ledger.data_sharing().len(), 2_000);

    for d in 0..20 {
        let doctor = id(&format!("doc-{d}"));
        assert_eq!(
            ledger
                .count_dsas(ParticipantRole::Recipient, &doctor, "PENDING")
                .unwrap(),
            100
        );
    }

    // Re-creating every pair keeps one record per pair.
    for p in 0..100 {
        ledger
            .create_dsa(&id(&format!("patient-{p}")), &id("doc-0"), "1 year", "again")
            .unwrap();
    }
    assert_eq!(ledger.data_sharing().len(), 2_000);
    assert_eq!(
        ledger
            .count_dsas(ParticipantRole::Recipient, &id("doc-0"), "ALL")
            .unwrap(),
        100
    );
}

#[test]
fn stress_journal_4k_events_verifies_after_reload() {
    let mut ledger = populated(10, 10);

    for round in 0..250 {
        let patient = id(&format!("patient-{}", round % 10));
        let doctor = id(&format!("doc-{}", round % 10));
        let dsa_id = created_id(
            &ledger
                .create_dsa(&patient, &doctor, "1 day", &format!("round {round}"))
                .unwrap(),
        );
        ledger.accept_dsa(&doctor, &dsa_id).unwrap();
        ledger.revoke_dsa(&patient, &dsa_id).unwrap();

        let request = ResourceAgreementRequest::new("1 day")
            .recipient(doctor.clone())
            .observers(true)
            .resource(format!("record-{}", round % 10).as_str().into());
        let rsa_id = created_id(&ledger.create_rsa(&patient, request).unwrap());
        ledger.accept_rsa(&doctor, &rsa_id).unwrap();
        for o in 0..10 {
            ledger
                .create_observer_assignment(
                    &doctor,
                    &rsa_id,
                    consent_ledger::Party::Contact(format!("o{o}@example.com").as_str().into()),
                )
                .unwrap();
        }
        ledger
            .authorize_and_log_access(
                &id("org"),
                &rsa_id,
                format!("record-{}", round % 10).as_str().into(),
                consent_ledger::Party::Identity(doctor.clone()),
            )
            .unwrap();
        ledger.revoke_rsa(&doctor, &rsa_id).unwrap();
    }

    assert!(ledger.journal().len() > 4_000);
    assert_eq!(ledger.access_log().len(), 250);
    assert!(ledger.journal().verify().is_ok());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    save_ledger(&ledger, &path).unwrap();
    let restored = load_ledger(&path).unwrap();
    assert_eq!(restored.journal().head_hash(), ledger.journal().head_hash());
    assert_eq!(restored.access_log().len(), 250);
}

#[test]
fn stress_20_threads_share_one_ledger() {
    let ledger = Arc::new(Mutex::new(populated(20, 5)));

    let mut handles = Vec::new();
    for t in 0..20 {
        let ledger = Arc::clone(&ledger);
        handles.push(thread::spawn(move || {
            let patient = id(&format!("patient-{t}"));
            for i in 0..50 {
                let request = ResourceAgreementRequest::new("1 month")
                    .recipient(id(&format!("doc-{}", i % 5)))
                    .resource(format!("record-{t}").as_str().into());
                ledger.lock().unwrap().create_rsa(&patient, request).unwrap();
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let ledger = ledger.lock().unwrap();
    assert_eq!(ledger.resource_sharing().len(), 1_000);
    for d in 0..5 {
        assert_eq!(
            ledger
                .count_rsas(ParticipantRole::Recipient, &id(&format!("doc-{d}")), "ALL")
                .unwrap(),
            200
        );
    }
    assert!(ledger.journal().verify().is_ok());
}
