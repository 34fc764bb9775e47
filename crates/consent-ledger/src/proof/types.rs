//! Proof and public input structures, in the JSON shape snarkjs writes.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// Upper bound on the decimal length of a BN254 field element.
const MAX_DIGITS: usize = 78;

/// A field element in canonical decimal form.
///
/// Deserialization accepts any string so that malformed proofs can reach
/// the gate and be rejected there; [`FieldElement::parse`] and
/// [`FieldElement::is_well_formed`] enforce the canonical form. Range
/// against the field modulus is left to the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldElement(String);

impl FieldElement {
    /// Parse a canonical decimal field element.
    ///
    /// # Errors
    ///
    /// `InvalidProof` for empty input, non-digits, leading zeros or
    /// oversized values.
    pub fn parse(s: &str) -> Result<Self> {
        let element = Self(s.to_string());
        if element.is_well_formed() {
            Ok(element)
        } else {
            Err(LedgerError::InvalidProof)
        }
    }

    pub fn zero() -> Self {
        Self("0".to_string())
    }

    pub fn is_well_formed(&self) -> bool {
        let s = self.0.as_str();
        !s.is_empty()
            && s.len() <= MAX_DIGITS
            && s.bytes().all(|b| b.is_ascii_digit())
            && (s == "0" || !s.starts_with('0'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A G1 point in projective form `[x, y, z]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct G1Point(pub Vec<FieldElement>);

impl G1Point {
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 3 && self.0.iter().all(FieldElement::is_well_formed)
    }
}

/// A G2 point in projective form `[[x0, x1], [y0, y1], [z0, z1]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct G2Point(pub Vec<Vec<FieldElement>>);

impl G2Point {
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 3
            && self
                .0
                .iter()
                .all(|c| c.len() == 2 && c.iter().all(FieldElement::is_well_formed))
    }
}

/// A Groth16 proof, field-compatible with snarkjs `proof.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16Proof {
    #[serde(rename = "pi_a")]
    pub a: G1Point,
    #[serde(rename = "pi_b")]
    pub b: G2Point,
    #[serde(rename = "pi_c")]
    pub c: G1Point,
}

impl Groth16Proof {
    /// All-zero proof with the right shape. Never verifies.
    pub fn zeroed() -> Self {
        let g1 = || G1Point(vec![FieldElement::zero(); 3]);
        Self {
            a: g1(),
            b: G2Point(vec![vec![FieldElement::zero(); 2]; 3]),
            c: g1(),
        }
    }

    /// Shape and encoding check. Says nothing about validity.
    pub fn is_well_formed(&self) -> bool {
        self.a.is_well_formed() && self.b.is_well_formed() && self.c.is_well_formed()
    }
}
