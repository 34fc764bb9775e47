//! Error types for the consent ledger.
//!
//! Every rejected operation surfaces one of these variants and leaves the
//! ledger untouched. Callers can match on the variant or on [`LedgerError::kind`],
//! which returns a stable reason string.

/// Ledger error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid state filter: {0}")]
    InvalidFilter(String),

    #[error("Either a recipient identity or a recipient contact must be provided")]
    MissingRecipient,

    #[error("An observer identity or contact must be provided")]
    MissingObserver,

    #[error("Resource is not certified: {0}")]
    UncertifiedResource(String),

    #[error("Observer already assigned: {0}")]
    DuplicateObserver(String),

    #[error("Observers are not enabled for agreement {0}")]
    ObserverDisabled(String),

    #[error("Proof verification failed")]
    InvalidProof,

    #[error("Invalid journal: {0}")]
    InvalidJournal(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// Stable, matchable reason for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::InvalidDuration(_) => "invalid_duration",
            Self::InvalidFilter(_) => "invalid_filter",
            Self::MissingRecipient => "missing_recipient",
            Self::MissingObserver => "missing_observer",
            Self::UncertifiedResource(_) => "uncertified_resource",
            Self::DuplicateObserver(_) => "duplicate_observer",
            Self::ObserverDisabled(_) => "observer_disabled",
            Self::InvalidProof => "invalid_proof",
            Self::InvalidJournal(_) => "invalid_journal",
            Self::StorageError(_) => "storage_error",
            Self::SerializationError(_) => "serialization_error",
            Self::InvalidFileFormat(_) => "invalid_file_format",
            Self::Io(_) => "io",
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, LedgerError>;
