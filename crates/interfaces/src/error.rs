use hearth_primitives::B256;
use std::path::PathBuf;

/// Errors produced by the chain store and state database backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Opening or rebuilding a store failed.
    #[error("failed to open store at {path}: {message}")]
    Open {
        /// Path of the store.
        path: PathBuf,
        /// Backend-specific description.
        message: String,
    },
    /// An underlying filesystem operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A stored record could not be decoded.
    #[error("corrupt store record: {0}")]
    Corrupt(String),
}

/// Errors produced when importing a block into the chain store.
///
/// Import errors are always local to the rejected block; they never
/// invalidate the store.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The block's parent is not known to the store.
    #[error("unknown parent {0}")]
    UnknownParent(B256),
    /// The block failed validation.
    #[error("invalid block: {0}")]
    Invalid(String),
    /// The block bytes could not be decoded.
    #[error("malformed block rlp: {0}")]
    Rlp(#[from] alloy_rlp::Error),
}

/// Errors produced when importing a transaction into the pool.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PoolError {
    /// The transaction bytes could not be decoded.
    #[error("malformed transaction rlp: {0}")]
    Rlp(#[from] alloy_rlp::Error),
    /// The transaction carries no valid signature.
    #[error("invalid signature")]
    InvalidSignature,
    /// The pool already contains this transaction.
    #[error("transaction already known")]
    AlreadyKnown,
}

/// Failure inside a simulated execution.
///
/// The orchestrator swallows these and reports an empty result; the message
/// exists for logging only.
#[derive(Debug, thiserror::Error)]
#[error("execution failed: {0}")]
pub struct CallError(pub String);
