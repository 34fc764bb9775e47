//! Types shared by both agreement shapes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::LedgerError;

/// Unique identifier for an agreement.
///
/// Format: kind prefix (`dsa_` / `rsa_`) + base58 of the first 16 bytes of
/// SHA-256 over the agreement's identifying fields. Each field is hashed
/// with its length in front, so no two field lists share a digest input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgreementId(pub String);

impl AgreementId {
    pub(crate) fn derive(kind: AgreementKind, fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for field in fields {
            hasher.update((field.len() as u64).to_be_bytes());
            hasher.update(field.as_bytes());
        }
        let hash = hasher.finalize();
        let encoded = bs58::encode(&hash[..16]).into_string();
        Self(format!("{}_{encoded}", kind.prefix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgreementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgreementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which agreement engine a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementKind {
    /// Simple bilateral data sharing agreement.
    DataSharing,
    /// Multi-resource agreement with observers.
    ResourceSharing,
}

impl AgreementKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::DataSharing => "dsa",
            Self::ResourceSharing => "rsa",
        }
    }
}

/// Live lifecycle state. Terminated agreements are removed, not flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementState {
    Pending,
    Active,
}

impl AgreementState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }
}

impl std::fmt::Display for AgreementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an agreement ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Withdrawn by the provider while pending.
    Cancelled,
    /// Declined by the recipient while pending.
    Rejected,
    /// Ended by either party while active.
    Revoked,
}

impl Disposition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
            Self::Revoked => "revoked",
        }
    }
}

/// Agreement term, restricted to a fixed set of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgreementDuration {
    #[serde(rename = "1 day")]
    OneDay,
    #[serde(rename = "1 week")]
    OneWeek,
    #[serde(rename = "1 month")]
    OneMonth,
    #[serde(rename = "3 months")]
    ThreeMonths,
    #[serde(rename = "6 months")]
    SixMonths,
    #[serde(rename = "1 year")]
    OneYear,
}

impl AgreementDuration {
    pub const ALL: [AgreementDuration; 6] = [
        AgreementDuration::OneDay,
        AgreementDuration::OneWeek,
        AgreementDuration::OneMonth,
        AgreementDuration::ThreeMonths,
        AgreementDuration::SixMonths,
        AgreementDuration::OneYear,
    ];

    /// Return the label this duration is written as.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1 day",
            Self::OneWeek => "1 week",
            Self::OneMonth => "1 month",
            Self::ThreeMonths => "3 months",
            Self::SixMonths => "6 months",
            Self::OneYear => "1 year",
        }
    }
}

impl std::fmt::Display for AgreementDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgreementDuration {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgreementDuration::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| LedgerError::InvalidDuration(s.to_string()))
    }
}
