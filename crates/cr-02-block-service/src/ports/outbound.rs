//! # Outbound Ports
//!
//! Storage and exchange backends the block service drives.

use async_trait::async_trait;
use shared_types::{Block, Cid};

use crate::domain::{BlockstoreError, ExchangeError};

/// Local block storage.
///
/// Implementations synchronize internally; every method takes `&self`.
#[async_trait]
pub trait Blockstore: Send + Sync {
    /// Whether a block with this identifier is stored.
    async fn has(&self, cid: &Cid) -> Result<bool, BlockstoreError>;

    /// Fetch a stored block.
    async fn get(&self, cid: &Cid) -> Result<Block, BlockstoreError>;

    /// Store a block. Storing an already-present block is not an error.
    async fn put(&self, block: Block) -> Result<(), BlockstoreError>;

    /// Remove a block. Removing an absent block is `NotFound`.
    async fn delete_block(&self, cid: &Cid) -> Result<(), BlockstoreError>;
}

/// Block exchange with the network.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Tell the exchange a new block is available locally.
    async fn has_block(&self, block: &Block) -> Result<(), ExchangeError>;

    /// Retrieve a block the local store does not have.
    async fn get_block(&self, cid: &Cid) -> Result<Block, ExchangeError>;
}
