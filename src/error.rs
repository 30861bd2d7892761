use solana_client::client_error::ClientError;
use solana_sdk::{message::CompileError, signer::SignerError};
use thiserror::Error;

/// Errors raised while resolving or executing a single item.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("{0} is required")]
    MissingParameter(&'static str),

    #[error("Invalid item parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid {field}: {reason}")]
    InvalidAddress { field: &'static str, reason: String },

    #[error("Invalid amount {0}: must be a finite, non-negative number")]
    InvalidAmount(f64),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to build instruction: {0}")]
    InstructionBuild(String),

    #[error("Failed to compile transaction message: {0}")]
    Compile(#[from] CompileError),

    #[error("Failed to sign transaction: {0}")]
    Signing(#[from] SignerError),

    #[error(transparent)]
    Chain(#[from] ClientError),
}

impl DispatchError {
    pub fn invalid_address(field: &'static str, reason: impl ToString) -> Self {
        DispatchError::InvalidAddress {
            field,
            reason: reason.to_string(),
        }
    }
}

/// A failure that aborted a run, tagged with the offending item.
#[derive(Debug, Error)]
#[error("item {item_index}: {source}")]
pub struct ExecutionError {
    pub item_index: usize,
    #[source]
    pub source: DispatchError,
}
