//! Storage layer for ledger snapshots.
//!
//! A ledger lives in a single versioned JSON file. By convention the file
//! is `ledger.json` inside the ledger home directory:
//!
//! ```text
//! ~/.consent-ledger/
//! └── ledger.json
//! ```

pub mod ledger_file;

pub use ledger_file::{load_ledger, save_ledger, LedgerFile, LEDGER_FILE_NAME};
