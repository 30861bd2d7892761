//! Solana wallet, transfer, staking and lookup operations run over a batch
//! of input items.
//!
//! A run is configured with one [`Operation`] and a set of [`Credentials`].
//! The [`Dispatcher`] walks the input items in order, resolves each one into
//! an [`OperationRequest`], performs it against a [`ChainClient`], and emits
//! one [`OutputRecord`] per item.

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod keys;
pub mod operation;
pub mod output;
pub mod request;
pub mod transaction;

#[cfg(test)]
mod testing;

pub use client::{ChainClient, RpcChainClient};
pub use config::Credentials;
pub use dispatcher::{Dispatcher, RunContext};
pub use error::{DispatchError, ExecutionError};
pub use operation::Operation;
pub use output::{OperationOutput, OperationResult, OutputRecord};
pub use request::{ItemParameters, OperationRequest};
