//! # Inbound Ports
//!
//! API the block service exposes.

use async_trait::async_trait;
use shared_types::{Block, Cid};

use crate::domain::BlockServiceError;

/// Block service API - inbound port.
#[async_trait]
pub trait BlockServiceApi: Send + Sync {
    /// Add one block, returning its identifier.
    async fn add_block(&self, block: Block) -> Result<Cid, BlockServiceError>;

    /// Add several blocks, in order; stops at the first failure.
    async fn add_blocks(&self, blocks: Vec<Block>) -> Result<Vec<Cid>, BlockServiceError>;

    /// Fetch a block locally, falling back to the exchange.
    async fn get_block(&self, cid: &Cid) -> Result<Block, BlockServiceError>;

    /// Remove a block from the local store.
    async fn delete_block(&self, cid: &Cid) -> Result<(), BlockServiceError>;
}
