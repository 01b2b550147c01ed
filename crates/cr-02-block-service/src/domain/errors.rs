//! # Domain Errors

use shared_types::Cid;
use thiserror::Error;

/// Blockstore failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockstoreError {
    /// No block with this identifier is stored.
    #[error("Block not found: {0}")]
    NotFound(Cid),

    /// The underlying storage failed.
    #[error("Blockstore backend error: {0}")]
    Backend(String),
}

/// Exchange failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// No peer or local source could supply the block.
    #[error("Block not available from exchange: {0}")]
    NotFound(Cid),

    /// The exchange failed.
    #[error("Exchange error: {0}")]
    Backend(String),
}

/// Block service failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockServiceError {
    /// Local storage failed.
    #[error(transparent)]
    Blockstore(#[from] BlockstoreError),

    /// Remote retrieval failed.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}
