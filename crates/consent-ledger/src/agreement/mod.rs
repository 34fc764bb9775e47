//! Consent agreements between patients and healthcare professionals.
//!
//! Two shapes exist side by side:
//!
//! - [`DataSharingAgreements`]: one agreement per provider/recipient pair,
//!   general data access, no observers.
//! - [`ResourceSharingAgreements`]: any number of agreements per pair, each
//!   covering a bundle of certified resources, with optional observers and
//!   an audited access log.

pub mod access;
pub mod data_sharing;
pub mod observer;
pub mod resource_sharing;
pub mod types;

pub use access::AccessLogEntry;
pub use data_sharing::{DataSharingAgreement, DataSharingAgreements};
pub use observer::ObserverAssignment;
pub use resource_sharing::{
    ResourceAgreementRequest, ResourceSharingAgreement, ResourceSharingAgreements,
};
pub use types::{AgreementDuration, AgreementId, AgreementKind, AgreementState, Disposition};
