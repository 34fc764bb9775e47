//! Resource certification: issuer-attested bindings of resources to
//! subjects.
//!
//! Only trusted issuers may certify. A resource has at most one live
//! certificate; certifying again replaces it and makes the caller the
//! issuer. Only the recorded issuer may revoke.

pub mod certificate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::identity::IdentityId;
use crate::registry::{Role, TrustRegistry};

pub use certificate::{Certificate, ResourceId};

/// Certificate store keyed by resource id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceCertification {
    certificates: BTreeMap<ResourceId, Certificate>,
}

impl ResourceCertification {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue (or replace) the certificate for `resource_id`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is a trusted issuer in `registry`.
    pub fn certify(
        &mut self,
        registry: &TrustRegistry,
        caller: &IdentityId,
        resource_id: ResourceId,
        subject: IdentityId,
    ) -> Result<Certificate> {
        registry.require(Role::TrustedIssuer, caller)?;

        let certificate = Certificate {
            resource_id: resource_id.clone(),
            subject,
            issuer: caller.clone(),
            issued_at: crate::time::now_micros(),
        };
        self.certificates.insert(resource_id, certificate.clone());
        Ok(certificate)
    }

    /// Remove the certificate for `resource_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the resource is not certified, `Unauthorized` unless
    /// `caller` issued the certificate.
    pub fn revoke(&mut self, caller: &IdentityId, resource_id: &ResourceId) -> Result<Certificate> {
        let cert = self.verify(resource_id)?;
        if &cert.issuer != caller {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} did not issue the certificate for {resource_id}"
            )));
        }
        self.certificates
            .remove(resource_id)
            .ok_or_else(|| LedgerError::NotFound(format!("no certificate for {resource_id}")))
    }

    /// Read the live certificate for `resource_id`.
    pub fn verify(&self, resource_id: &ResourceId) -> Result<&Certificate> {
        self.certificates
            .get(resource_id)
            .ok_or_else(|| LedgerError::NotFound(format!("no certificate for {resource_id}")))
    }

    pub fn is_certified(&self, resource_id: &ResourceId) -> bool {
        self.certificates.contains_key(resource_id)
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}
