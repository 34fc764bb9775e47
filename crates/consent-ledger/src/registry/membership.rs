//! Membership records.

use serde::{Deserialize, Serialize};

use crate::identity::IdentityId;

use super::role::Role;

/// One identity holding one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Member identity.
    pub identity: IdentityId,
    /// Role held.
    pub role: Role,
    /// Identity that granted the role. The registry owner grants itself.
    pub added_by: IdentityId,
    /// Grant timestamp (microseconds since epoch).
    pub added_at: u64,
}
