//! Proof-gated data sharing operations.

use crate::agreement::{AgreementId, DataSharingAgreements};
use crate::error::{LedgerError, Result};
use crate::event::LedgerEvent;
use crate::identity::IdentityId;
use crate::registry::TrustRegistry;

use super::types::{FieldElement, Groth16Proof};
use super::verifier::ProofVerifier;

/// Binds data sharing operations to a proven commitment.
///
/// The circuit has exactly one public input, the commitment. Anything else
/// is rejected before the verifier runs.
#[derive(Debug, Clone)]
pub struct ProofGate<V> {
    verifier: V,
}

impl<V: ProofVerifier> ProofGate<V> {
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    /// Check `proof` for `public_inputs`. Fails closed.
    pub fn verify(&self, proof: &Groth16Proof, public_inputs: &[FieldElement]) -> bool {
        if public_inputs.len() != 1 {
            log::debug!(
                "proof rejected: expected 1 public input, got {}",
                public_inputs.len()
            );
            return false;
        }
        if !proof.is_well_formed() || !public_inputs.iter().all(FieldElement::is_well_formed) {
            log::debug!("proof rejected: malformed encoding");
            return false;
        }
        self.verifier.verify(proof, public_inputs)
    }

    /// Verify and return the identity bound to the proven commitment.
    ///
    /// # Errors
    ///
    /// `InvalidProof` when verification fails.
    pub fn authenticate(
        &self,
        proof: &Groth16Proof,
        public_inputs: &[FieldElement],
    ) -> Result<IdentityId> {
        match public_inputs {
            [commitment] if self.verify(proof, public_inputs) => {
                Ok(IdentityId::from_commitment(commitment))
            }
            _ => {
                log::warn!("proof verification failed");
                Err(LedgerError::InvalidProof)
            }
        }
    }

    /// Create a data sharing agreement as the proven commitment.
    ///
    /// The commitment identity must hold the patient role.
    ///
    /// # Errors
    ///
    /// `InvalidProof` with no state change when verification fails,
    /// otherwise the errors of [`DataSharingAgreements::create`].
    #[allow(clippy::too_many_arguments)]
    pub fn create_with_proof(
        &self,
        dsas: &mut DataSharingAgreements,
        registry: &TrustRegistry,
        recipient: &IdentityId,
        duration: &str,
        description: &str,
        proof: &Groth16Proof,
        public_inputs: &[FieldElement],
    ) -> Result<LedgerEvent> {
        let caller = self.authenticate(proof, public_inputs)?;
        dsas.create(registry, &caller, recipient, duration, description)
    }

    /// Accept a data sharing agreement as the proven commitment.
    ///
    /// # Errors
    ///
    /// `InvalidProof` with no state change when verification fails,
    /// otherwise the errors of [`DataSharingAgreements::accept`].
    pub fn accept_with_proof(
        &self,
        dsas: &mut DataSharingAgreements,
        id: &AgreementId,
        proof: &Groth16Proof,
        public_inputs: &[FieldElement],
    ) -> Result<LedgerEvent> {
        let caller = self.authenticate(proof, public_inputs)?;
        dsas.accept(&caller, id)
    }
}
