//! The role registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::identity::IdentityId;

use super::membership::Membership;
use super::role::Role;

/// Role membership store with delegated grant authority.
///
/// Memberships are keyed by `(role, identity)`. Every grant records who
/// made it so that provenance-tracked roles can only be removed by their
/// original granter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustRegistry {
    owner: IdentityId,
    members: BTreeMap<Role, BTreeMap<IdentityId, Membership>>,
}

impl TrustRegistry {
    /// Create a registry whose owner is the first health authority.
    pub fn new(owner: IdentityId) -> Self {
        let bootstrap = Membership {
            identity: owner.clone(),
            role: Role::HealthAuthority,
            added_by: owner.clone(),
            added_at: crate::time::now_micros(),
        };
        let mut members: BTreeMap<Role, BTreeMap<IdentityId, Membership>> = BTreeMap::new();
        members
            .entry(Role::HealthAuthority)
            .or_default()
            .insert(owner.clone(), bootstrap);
        Self { owner, members }
    }

    /// The identity that created the registry.
    pub fn owner(&self) -> &IdentityId {
        &self.owner
    }

    /// Return `true` if `identity` currently holds `role`.
    pub fn has_role(&self, role: Role, identity: &IdentityId) -> bool {
        self.membership(role, identity).is_some()
    }

    /// Look up a single membership record.
    pub fn membership(&self, role: Role, identity: &IdentityId) -> Option<&Membership> {
        self.members.get(&role).and_then(|m| m.get(identity))
    }

    /// All current holders of `role`, ordered by identity.
    pub fn members(&self, role: Role) -> Vec<&Membership> {
        self.members
            .get(&role)
            .map(|m| m.values().collect())
            .unwrap_or_default()
    }

    /// Fail with `Unauthorized` unless `identity` holds `role`.
    pub fn require(&self, role: Role, identity: &IdentityId) -> Result<()> {
        if self.has_role(role, identity) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(format!(
                "{identity} is not a {role}"
            )))
        }
    }

    /// Grant `role` to `identity` on behalf of `caller`.
    ///
    /// Granting a role the identity already holds succeeds without touching
    /// the existing record, so the original provenance is kept.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `caller` does not hold the role that grants `role`.
    pub fn add_role(
        &mut self,
        caller: &IdentityId,
        role: Role,
        identity: &IdentityId,
    ) -> Result<Membership> {
        self.require(role.granted_by(), caller)?;

        let bucket = self.members.entry(role).or_default();
        let membership = bucket
            .entry(identity.clone())
            .or_insert_with(|| Membership {
                identity: identity.clone(),
                role,
                added_by: caller.clone(),
                added_at: crate::time::now_micros(),
            })
            .clone();
        Ok(membership)
    }

    /// Remove `role` from `identity` on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `caller` does not hold the granting role, or if the
    /// role tracks provenance and `caller` did not make the grant.
    /// `NotFound` if `identity` does not hold `role`.
    pub fn remove_role(
        &mut self,
        caller: &IdentityId,
        role: Role,
        identity: &IdentityId,
    ) -> Result<Membership> {
        self.require(role.granted_by(), caller)?;

        let existing = self.membership(role, identity).ok_or_else(|| {
            LedgerError::NotFound(format!("{identity} does not hold {role}"))
        })?;

        if role.tracks_provenance() && &existing.added_by != caller {
            return Err(LedgerError::Unauthorized(format!(
                "{role} {identity} can only be removed by {}",
                existing.added_by
            )));
        }

        self.members
            .get_mut(&role)
            .and_then(|m| m.remove(identity))
            .ok_or_else(|| LedgerError::NotFound(format!("{identity} does not hold {role}")))
    }
}
