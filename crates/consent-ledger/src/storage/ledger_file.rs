//! Ledger snapshot file.
//!
//! File format (JSON):
//! ```json
//! { "version": 1, "ledger": { ... Ledger ... } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;

// ── File format constants ─────────────────────────────────────────────────────

const LEDGER_FILE_VERSION: u32 = 1;

/// Conventional file name inside a ledger home directory.
pub const LEDGER_FILE_NAME: &str = "ledger.json";

// ── On-disk structures ────────────────────────────────────────────────────────

/// Wrapper written to disk for a ledger snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerFile {
    /// Format version number.
    pub version: u32,
    /// The stored ledger.
    pub ledger: Ledger,
}

#[derive(Serialize)]
struct LedgerFileRef<'a> {
    version: u32,
    ledger: &'a Ledger,
}

/// Write `ledger` to `path`, creating parent directories as needed.
///
/// The file is written next to its destination first and then renamed
/// into place.
///
/// # Errors
///
/// `SerializationError` if the ledger cannot be encoded, `Io` for
/// filesystem errors.
pub fn save_ledger(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(&LedgerFileRef {
        version: LEDGER_FILE_VERSION,
        ledger,
    })
    .map_err(|e| LedgerError::SerializationError(e.to_string()))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    log::debug!("ledger saved to {}", path.display());
    Ok(())
}

/// Read a ledger snapshot and verify its journal.
///
/// # Errors
///
/// `NotFound` if `path` does not exist, `InvalidFileFormat` for malformed
/// files or an unsupported version, `InvalidJournal` if the journal fails
/// verification, `Io` for other filesystem errors.
pub fn load_ledger(path: &Path) -> Result<Ledger> {
    if !path.exists() {
        return Err(LedgerError::NotFound(format!(
            "ledger file not found: {}",
            path.display()
        )));
    }
    let bytes = std::fs::read(path)?;
    let file: LedgerFile = serde_json::from_slice(&bytes).map_err(|e| {
        LedgerError::InvalidFileFormat(format!("failed to parse ledger file: {e}"))
    })?;
    if file.version != LEDGER_FILE_VERSION {
        return Err(LedgerError::InvalidFileFormat(format!(
            "unsupported ledger file version={}",
            file.version
        )));
    }
    file.ledger.journal().verify()?;
    log::debug!(
        "ledger loaded from {} ({} journal entries)",
        path.display(),
        file.ledger.journal().len()
    );
    Ok(file.ledger)
}
