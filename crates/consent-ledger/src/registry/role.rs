//! Registry roles and the delegation table between them.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A trust role. Roles are a flat set; holding one implies nothing about
/// any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    HealthAuthority,
    TrustedIssuer,
    HealthcareOrganization,
    HealthcareProfessional,
    TrustedApplication,
    Patient,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::HealthAuthority,
        Role::TrustedIssuer,
        Role::HealthcareOrganization,
        Role::HealthcareProfessional,
        Role::TrustedApplication,
        Role::Patient,
    ];

    /// The role whose holders may grant and remove this role.
    pub fn granted_by(self) -> Role {
        match self {
            Self::HealthAuthority
            | Self::TrustedIssuer
            | Self::HealthcareOrganization
            | Self::TrustedApplication => Self::HealthAuthority,
            Self::HealthcareProfessional => Self::HealthcareOrganization,
            Self::Patient => Self::TrustedApplication,
        }
    }

    /// Whether removal is restricted to the identity that made the grant.
    pub fn tracks_provenance(self) -> bool {
        matches!(self, Self::Patient)
    }

    /// Return a stable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HealthAuthority => "health_authority",
            Self::TrustedIssuer => "trusted_issuer",
            Self::HealthcareOrganization => "healthcare_organization",
            Self::HealthcareProfessional => "healthcare_professional",
            Self::TrustedApplication => "trusted_application",
            Self::Patient => "patient",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| LedgerError::NotFound(format!("unknown role: {s}")))
    }
}
