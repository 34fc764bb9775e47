//! Zero-knowledge proof gate for commitment-bound callers.
//!
//! A caller proves knowledge of a secret whose arithmetic hash is a public
//! commitment. The gate checks the proof through an injected
//! [`ProofVerifier`] and, on success, acts on the ledger with the
//! commitment as the caller's identity. The gate never sees the secret.
//!
//! Enable the `groth16` feature for [`Groth16Verifier`], which checks
//! snarkjs-format Groth16 proofs over BN254.

pub mod gate;
#[cfg(feature = "groth16")]
pub mod groth16;
pub mod types;
pub mod verifier;

pub use gate::ProofGate;
#[cfg(feature = "groth16")]
pub use groth16::Groth16Verifier;
pub use types::{FieldElement, G1Point, G2Point, Groth16Proof};
pub use verifier::{FixedVerifier, ProofVerifier};
