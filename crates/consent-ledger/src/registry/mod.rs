//! Trust registry: delegated role membership.
//!
//! The registry provides:
//! - A flat set of roles with a fixed delegation table
//! - Per-grant provenance (`added_by`)
//! - Provenance-scoped removal for patient memberships

pub mod membership;
pub mod role;
pub mod trust_registry;

pub use membership::Membership;
pub use role::Role;
pub use trust_registry::TrustRegistry;
