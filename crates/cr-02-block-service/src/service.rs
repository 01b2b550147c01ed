//! # Block Service
//!
//! Wires a local `Blockstore` to an `Exchange`.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{Block, Cid};
use tracing::{debug, warn};

use crate::domain::{BlockServiceError, BlockstoreError};
use crate::ports::{BlockServiceApi, Blockstore, Exchange};

/// Block service over a local store and an exchange.
///
/// # Example
///
/// ```rust,ignore
/// let store = Arc::new(MemoryBlockstore::new());
/// let exchange = Arc::new(OfflineExchange::new(Arc::new(MemoryBlockstore::new())));
/// let service = BlockService::new_write_through(store, exchange);
/// let cid = service.add_block(Block::new(b"hello".to_vec())).await?;
/// ```
pub struct BlockService {
    blockstore: Arc<dyn Blockstore>,
    exchange: Arc<dyn Exchange>,
    /// Check the store before writing and skip known blocks.
    check_first: bool,
}

impl BlockService {
    /// Standard service: writes are skipped for blocks already stored.
    pub fn new(blockstore: Arc<dyn Blockstore>, exchange: Arc<dyn Exchange>) -> Self {
        Self {
            blockstore,
            exchange,
            check_first: true,
        }
    }

    /// Write-through service: every add is forwarded to the store.
    pub fn new_write_through(blockstore: Arc<dyn Blockstore>, exchange: Arc<dyn Exchange>) -> Self {
        Self {
            blockstore,
            exchange,
            check_first: false,
        }
    }

    /// Whether this service is in write-through mode.
    #[must_use]
    pub fn is_write_through(&self) -> bool {
        !self.check_first
    }

    /// The local store.
    #[must_use]
    pub fn blockstore(&self) -> Arc<dyn Blockstore> {
        Arc::clone(&self.blockstore)
    }
}

#[async_trait]
impl BlockServiceApi for BlockService {
    async fn add_block(&self, block: Block) -> Result<Cid, BlockServiceError> {
        let cid = *block.cid();

        if self.check_first && self.blockstore.has(&cid).await? {
            debug!(cid = %cid, "Block already stored, skipping write");
            return Ok(cid);
        }

        self.blockstore.put(block.clone()).await?;

        // Exchange notification failures do not undo the local write.
        if let Err(e) = self.exchange.has_block(&block).await {
            warn!(cid = %cid, error = %e, "Exchange rejected new block");
        }
        Ok(cid)
    }

    async fn add_blocks(&self, blocks: Vec<Block>) -> Result<Vec<Cid>, BlockServiceError> {
        let mut cids = Vec::with_capacity(blocks.len());
        for block in blocks {
            cids.push(self.add_block(block).await?);
        }
        Ok(cids)
    }

    async fn get_block(&self, cid: &Cid) -> Result<Block, BlockServiceError> {
        match self.blockstore.get(cid).await {
            Ok(block) => Ok(block),
            Err(BlockstoreError::NotFound(_)) => {
                debug!(cid = %cid, "Block not stored locally, asking exchange");
                Ok(self.exchange.get_block(cid).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_block(&self, cid: &Cid) -> Result<(), BlockServiceError> {
        Ok(self.blockstore.delete_block(cid).await?)
    }
}
