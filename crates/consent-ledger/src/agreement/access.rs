//! Audited resource access records.

use serde::{Deserialize, Serialize};

use crate::certification::ResourceId;
use crate::identity::{IdentityId, Party};

use super::types::AgreementId;

/// One authorised access to a shared resource, logged by the gateway
/// organisation that served it. Entries are never removed, including when
/// the agreement later terminates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub agreement_id: AgreementId,
    pub resource_id: ResourceId,
    pub accessor: Party,
    /// Healthcare organisation that requested the authorisation.
    pub logged_by: IdentityId,
    /// Access timestamp (microseconds since epoch).
    pub timestamp: u64,
}
