//! Enumeration indexes over agreements.
//!
//! This module provides:
//!
//! - [`AgreementIndex`]: per-participant buckets (by provider, recipient
//!   and observer) holding agreement ids in insertion order.
//! - [`Enumerator`]: the read view that filters a bucket by lifecycle
//!   state and paginates it, over any engine implementing [`Enumerable`].
//!
//! Buckets hold ids only; the owning engine holds the records and is the
//! only writer. Each engine updates its index inside the same method that
//! changes the record, so a bucket never holds a duplicate or a stale id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agreement::{AgreementId, AgreementState};
use crate::error::{LedgerError, Result};
use crate::identity::IdentityId;

// ── Query vocabulary ─────────────────────────────────────────────────────────

/// Which side of an agreement a bucket is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Provider,
    Recipient,
    Observer,
}

impl std::str::FromStr for ParticipantRole {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "provider" => Ok(Self::Provider),
            "recipient" => Ok(Self::Recipient),
            "observer" => Ok(Self::Observer),
            other => Err(LedgerError::InvalidFilter(format!(
                "unknown participant role: {other}"
            ))),
        }
    }
}

/// Lifecycle filter applied before pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateFilter {
    All,
    Pending,
    Active,
}

impl StateFilter {
    pub fn matches(self, state: AgreementState) -> bool {
        match self {
            Self::All => true,
            Self::Pending => state == AgreementState::Pending,
            Self::Active => state == AgreementState::Active,
        }
    }
}

impl std::str::FromStr for StateFilter {
    type Err = LedgerError;

    /// Accepts exactly `ALL`, `PENDING` or `ACTIVE`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ALL" => Ok(Self::All),
            "PENDING" => Ok(Self::Pending),
            "ACTIVE" => Ok(Self::Active),
            other => Err(LedgerError::InvalidFilter(other.to_string())),
        }
    }
}

// ── AgreementIndex ───────────────────────────────────────────────────────────

/// Per-participant buckets of agreement ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgreementIndex {
    by_provider: HashMap<IdentityId, Vec<AgreementId>>,
    by_recipient: HashMap<IdentityId, Vec<AgreementId>>,
    by_observer: HashMap<IdentityId, Vec<AgreementId>>,
}

impl AgreementIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&self, role: ParticipantRole) -> &HashMap<IdentityId, Vec<AgreementId>> {
        match role {
            ParticipantRole::Provider => &self.by_provider,
            ParticipantRole::Recipient => &self.by_recipient,
            ParticipantRole::Observer => &self.by_observer,
        }
    }

    fn bucket_mut(&mut self, role: ParticipantRole) -> &mut HashMap<IdentityId, Vec<AgreementId>> {
        match role {
            ParticipantRole::Provider => &mut self.by_provider,
            ParticipantRole::Recipient => &mut self.by_recipient,
            ParticipantRole::Observer => &mut self.by_observer,
        }
    }

    /// Append `id` to the participant's bucket unless it is already there.
    pub fn insert(&mut self, role: ParticipantRole, participant: &IdentityId, id: &AgreementId) {
        let ids = self
            .bucket_mut(role)
            .entry(participant.clone())
            .or_default();
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }

    /// Remove `id` from the participant's bucket, keeping the order of the
    /// remaining entries. Empty buckets are dropped.
    pub fn remove(&mut self, role: ParticipantRole, participant: &IdentityId, id: &AgreementId) {
        let bucket = self.bucket_mut(role);
        if let Some(ids) = bucket.get_mut(participant) {
            ids.retain(|existing| existing != id);
            if ids.is_empty() {
                bucket.remove(participant);
            }
        }
    }

    /// Agreement ids for a participant, in insertion order.
    pub fn ids(&self, role: ParticipantRole, participant: &IdentityId) -> &[AgreementId] {
        self.bucket(role)
            .get(participant)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of (participant, id) entries across all buckets.
    pub fn len(&self) -> usize {
        [&self.by_provider, &self.by_recipient, &self.by_observer]
            .iter()
            .flat_map(|b| b.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Enumerator ───────────────────────────────────────────────────────────────

/// An agreement store the [`Enumerator`] can read.
pub trait Enumerable {
    type Record;

    /// The store's index.
    fn index(&self) -> &AgreementIndex;

    /// Look up a live record by id.
    fn lookup(&self, id: &AgreementId) -> Option<&Self::Record>;

    /// Current lifecycle state of a record.
    fn state_of(record: &Self::Record) -> AgreementState;
}

/// Filtered, paginated read view over an [`Enumerable`] store.
pub struct Enumerator<'a, E> {
    source: &'a E,
}

impl<'a, E> Enumerator<'a, E>
where
    E: Enumerable,
    E::Record: 'a,
{
    pub fn new(source: &'a E) -> Self {
        Self { source }
    }

    fn matching(
        &self,
        role: ParticipantRole,
        participant: &IdentityId,
        filter: StateFilter,
    ) -> impl Iterator<Item = &'a E::Record> {
        let source = self.source;
        source
            .index()
            .ids(role, participant)
            .iter()
            .filter_map(move |id| source.lookup(id))
            .filter(move |record| filter.matches(E::state_of(record)))
    }

    /// Number of agreements in the participant's bucket matching `filter`.
    ///
    /// # Errors
    ///
    /// `InvalidFilter` unless `filter` is `ALL`, `PENDING` or `ACTIVE`.
    pub fn count(&self, role: ParticipantRole, participant: &IdentityId, filter: &str) -> Result<usize> {
        let filter: StateFilter = filter.parse()?;
        Ok(self.matching(role, participant, filter).count())
    }

    /// At most `limit` matching agreements starting at `offset`, in
    /// insertion order. An offset past the end yields an empty page.
    ///
    /// # Errors
    ///
    /// `InvalidFilter` unless `filter` is `ALL`, `PENDING` or `ACTIVE`.
    pub fn page(
        &self,
        role: ParticipantRole,
        participant: &IdentityId,
        filter: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<&'a E::Record>> {
        let filter: StateFilter = filter.parse()?;
        Ok(self
            .matching(role, participant, filter)
            .skip(offset)
            .take(limit)
            .collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
