//! Groth16 over BN254 with arkworks.
//!
//! Loads a snarkjs `verification_key.json` and checks snarkjs proofs
//! against it. Points are decoded unchecked and then tested for curve and
//! subgroup membership; anything that fails decoding does not verify.
//! Field elements must be in canonical form, so a value at or above the
//! field modulus never verifies in place of its reduction.

use std::path::Path;

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ff::PrimeField;
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use serde::Deserialize;

use crate::error::{LedgerError, Result};

use super::types::{FieldElement, G1Point, G2Point, Groth16Proof};
use super::verifier::ProofVerifier;

/// The parts of a snarkjs verification key the verifier needs.
#[derive(Debug, Deserialize)]
struct SnarkjsVerifyingKey {
    protocol: String,
    curve: String,
    #[serde(rename = "nPublic")]
    n_public: usize,
    vk_alpha_1: G1Point,
    vk_beta_2: G2Point,
    vk_gamma_2: G2Point,
    vk_delta_2: G2Point,
    #[serde(rename = "IC")]
    ic: Vec<G1Point>,
}

/// Groth16/BN254 verifier with a prepared key.
pub struct Groth16Verifier {
    pvk: PreparedVerifyingKey<Bn254>,
    n_public: usize,
}

impl std::fmt::Debug for Groth16Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Groth16Verifier")
            .field("n_public", &self.n_public)
            .finish_non_exhaustive()
    }
}

impl Groth16Verifier {
    /// Build a verifier from the JSON text of a snarkjs verification key.
    ///
    /// # Errors
    ///
    /// `SerializationError` for unreadable JSON, `InvalidFileFormat` when
    /// the key is not a BN254 Groth16 key or contains invalid points.
    pub fn from_snarkjs_json(json: &str) -> Result<Self> {
        let raw: SnarkjsVerifyingKey =
            serde_json::from_str(json).map_err(|e| LedgerError::SerializationError(e.to_string()))?;
        if raw.protocol != "groth16" || raw.curve != "bn128" {
            return Err(LedgerError::InvalidFileFormat(format!(
                "unsupported verification key: {} over {}",
                raw.protocol, raw.curve
            )));
        }
        if raw.ic.len() != raw.n_public + 1 {
            return Err(LedgerError::InvalidFileFormat(format!(
                "verification key has {} IC points for {} public inputs",
                raw.ic.len(),
                raw.n_public
            )));
        }

        let invalid = |what: &str| LedgerError::InvalidFileFormat(format!("invalid {what} point"));
        let gamma_abc_g1 = raw
            .ic
            .iter()
            .map(|p| g1(p).ok_or_else(|| invalid("IC")))
            .collect::<Result<Vec<_>>>()?;
        let vk = VerifyingKey::<Bn254> {
            alpha_g1: g1(&raw.vk_alpha_1).ok_or_else(|| invalid("alpha"))?,
            beta_g2: g2(&raw.vk_beta_2).ok_or_else(|| invalid("beta"))?,
            gamma_g2: g2(&raw.vk_gamma_2).ok_or_else(|| invalid("gamma"))?,
            delta_g2: g2(&raw.vk_delta_2).ok_or_else(|| invalid("delta"))?,
            gamma_abc_g1,
        };
        log::debug!("loaded groth16 verification key ({} public inputs)", raw.n_public);

        Ok(Self {
            pvk: prepare_verifying_key(&vk),
            n_public: raw.n_public,
        })
    }

    /// Read a snarkjs verification key from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_snarkjs_json(&json)
    }

    pub fn n_public(&self) -> usize {
        self.n_public
    }
}

impl ProofVerifier for Groth16Verifier {
    fn verify(&self, proof: &Groth16Proof, public_inputs: &[FieldElement]) -> bool {
        if public_inputs.len() != self.n_public {
            return false;
        }
        let Some(proof) = decode_proof(proof) else {
            return false;
        };
        let Some(inputs) = public_inputs
            .iter()
            .map(canonical::<Fr>)
            .collect::<Option<Vec<_>>>()
        else {
            return false;
        };
        match Groth16::<Bn254>::verify_proof(&self.pvk, &proof, &inputs) {
            Ok(valid) => valid,
            Err(e) => {
                log::debug!("groth16 verification error: {e}");
                false
            }
        }
    }
}

fn decode_proof(proof: &Groth16Proof) -> Option<Proof<Bn254>> {
    Some(Proof {
        a: g1(&proof.a)?,
        b: g2(&proof.b)?,
        c: g1(&proof.c)?,
    })
}

/// Decode `x` into `F`, rejecting anything that is not already reduced.
///
/// `from_str` reduces modulo the field order, so `c + p` would otherwise
/// decode to the same element as `c`.
fn canonical<F: PrimeField>(x: &FieldElement) -> Option<F> {
    let value = F::from_str(x.as_str()).ok()?;
    (value.into_bigint().to_string() == x.as_str()).then_some(value)
}

fn fq(x: &FieldElement) -> Option<Fq> {
    canonical(x)
}

/// Affine G1 point from `[x, y, "1"]`.
fn g1(p: &G1Point) -> Option<G1Affine> {
    match p.0.as_slice() {
        [x, y, z] if z.as_str() == "1" => {
            let point = G1Affine::new_unchecked(fq(x)?, fq(y)?);
            (point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve())
                .then_some(point)
        }
        _ => None,
    }
}

/// Affine G2 point from `[[x0, x1], [y0, y1], ["1", "0"]]`.
fn g2(p: &G2Point) -> Option<G2Affine> {
    let fq2 = |c: &[FieldElement]| match c {
        [c0, c1] => Some(Fq2::new(fq(c0)?, fq(c1)?)),
        _ => None,
    };
    match p.0.as_slice() {
        [x, y, z] if z.len() == 2 && z[0].as_str() == "1" && z[1].as_str() == "0" => {
            let point = G2Affine::new_unchecked(fq2(x)?, fq2(y)?);
            (point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve())
                .then_some(point)
        }
        _ => None,
    }
}
