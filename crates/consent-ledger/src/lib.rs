//! ConsentLedger: delegated trust roles, resource certificates and
//! patient consent agreements.
//!
//! Provides a role-delegation registry with provenance-scoped revocation,
//! issuer-attested resource certificates, data and resource sharing
//! agreements with observer access, paginated participant indices, and a
//! zero-knowledge proof gate for commitment-bound callers.

pub mod agreement;
pub mod certification;
pub mod error;
pub mod event;
pub mod identity;
pub mod index;
pub mod ledger;
pub mod proof;
pub mod registry;
pub mod storage;
pub mod time;

// Re-export primary types
pub use error::{LedgerError, Result};
pub use event::LedgerEvent;
pub use identity::{ContactRef, IdentityId, Party};
pub use ledger::{Journal, JournalEntry, Ledger};
pub use registry::{Membership, Role, TrustRegistry};

// Re-export certification types
pub use certification::{Certificate, ResourceCertification, ResourceId};

// Re-export agreement types
pub use agreement::{
    AccessLogEntry, AgreementDuration, AgreementId, AgreementKind, AgreementState,
    DataSharingAgreement, DataSharingAgreements, Disposition, ObserverAssignment,
    ResourceAgreementRequest, ResourceSharingAgreement, ResourceSharingAgreements,
};

// Re-export query types
pub use index::{AgreementIndex, Enumerable, Enumerator, ParticipantRole, StateFilter};

// Re-export proof types
pub use proof::{FieldElement, FixedVerifier, Groth16Proof, ProofGate, ProofVerifier};
