//! Hash-chained event journal.
//!
//! Each entry commits to its predecessor's hash, so a journal that was
//! edited, truncated in the middle or reordered no longer verifies.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{LedgerError, Result};
use crate::event::LedgerEvent;

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal, starting at 0.
    pub sequence: u64,
    /// When the event was recorded (microseconds since epoch).
    pub recorded_at: u64,
    pub event: LedgerEvent,
    /// Hex SHA-256 of the previous entry; `None` for the first.
    pub previous_hash: Option<String>,
    /// Hex SHA-256 over this entry's other fields.
    pub entry_hash: String,
}

/// Fields covered by `entry_hash`, in a fixed order.
#[derive(Serialize)]
struct HashedFields<'a> {
    sequence: u64,
    recorded_at: u64,
    previous_hash: Option<&'a str>,
    event: &'a LedgerEvent,
}

fn compute_hash(
    sequence: u64,
    recorded_at: u64,
    previous_hash: Option<&str>,
    event: &LedgerEvent,
) -> Result<String> {
    let bytes = serde_json::to_vec(&HashedFields {
        sequence,
        recorded_at,
        previous_hash,
        event,
    })
    .map_err(|e| LedgerError::SerializationError(e.to_string()))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

impl JournalEntry {
    /// Recompute this entry's hash from its fields.
    pub fn compute_hash(&self) -> Result<String> {
        compute_hash(
            self.sequence,
            self.recorded_at,
            self.previous_hash.as_deref(),
            &self.event,
        )
    }
}

/// Append-only list of [`JournalEntry`] values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event` at the head of the journal.
    pub fn append(&mut self, event: LedgerEvent) -> Result<&JournalEntry> {
        let sequence = self.entries.len() as u64;
        let recorded_at = crate::time::now_micros();
        let previous_hash = self.head_hash().map(str::to_string);
        let entry_hash = compute_hash(sequence, recorded_at, previous_hash.as_deref(), &event)?;

        log::debug!("journal #{sequence}: {}", event.as_tag());
        self.entries.push(JournalEntry {
            sequence,
            recorded_at,
            event,
            previous_hash,
            entry_hash,
        });
        self.entries
            .last()
            .ok_or_else(|| LedgerError::InvalidJournal("append lost entry".into()))
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn events(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.entries.iter().map(|e| &e.event)
    }

    /// Hash of the newest entry.
    pub fn head_hash(&self) -> Option<&str> {
        self.entries.last().map(|e| e.entry_hash.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verify every link in the journal.
    pub fn verify(&self) -> Result<()> {
        verify_journal(&self.entries)
    }
}

/// Verify a journal ordered from oldest to newest.
///
/// # Errors
///
/// `InvalidJournal` naming the first entry whose sequence number, link or
/// hash does not match.
pub fn verify_journal(entries: &[JournalEntry]) -> Result<()> {
    let mut previous: Option<&str> = None;
    for (position, entry) in entries.iter().enumerate() {
        if entry.sequence != position as u64 {
            return Err(LedgerError::InvalidJournal(format!(
                "entry {position} has sequence {}",
                entry.sequence
            )));
        }
        if entry.previous_hash.as_deref() != previous {
            return Err(LedgerError::InvalidJournal(format!(
                "entry {position} is not linked to its predecessor"
            )));
        }
        if entry.compute_hash()? != entry.entry_hash {
            return Err(LedgerError::InvalidJournal(format!(
                "entry {position} hash mismatch"
            )));
        }
        previous = Some(entry.entry_hash.as_str());
    }
    Ok(())
}
