//! The proof verification capability.

use super::types::{FieldElement, Groth16Proof};

/// Checks a proof against a fixed verification key.
///
/// Implementations return `true` only for a proof that is valid for
/// exactly `public_inputs`. Any decoding problem is a `false`.
pub trait ProofVerifier {
    fn verify(&self, proof: &Groth16Proof, public_inputs: &[FieldElement]) -> bool;
}

impl<V: ProofVerifier + ?Sized> ProofVerifier for &V {
    fn verify(&self, proof: &Groth16Proof, public_inputs: &[FieldElement]) -> bool {
        (**self).verify(proof, public_inputs)
    }
}

impl<V: ProofVerifier + ?Sized> ProofVerifier for Box<V> {
    fn verify(&self, proof: &Groth16Proof, public_inputs: &[FieldElement]) -> bool {
        (**self).verify(proof, public_inputs)
    }
}

/// A verifier with a fixed answer, for wiring and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedVerifier(pub bool);

impl ProofVerifier for FixedVerifier {
    fn verify(&self, _proof: &Groth16Proof, _public_inputs: &[FieldElement]) -> bool {
        self.0
    }
}
