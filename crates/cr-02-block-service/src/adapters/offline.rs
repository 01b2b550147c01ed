//! Offline exchange: serves only what a local store already holds.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{Block, Cid};
use tracing::debug;

use crate::domain::{BlockstoreError, ExchangeError};
use crate::ports::{Blockstore, Exchange};

/// Exchange that never talks to the network.
///
/// `has_block` records the block in the backing store; `get_block` succeeds
/// only for blocks that store already holds.
pub struct OfflineExchange {
    store: Arc<dyn Blockstore>,
}

impl OfflineExchange {
    /// Back the exchange with `store`.
    pub fn new(store: Arc<dyn Blockstore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Exchange for OfflineExchange {
    async fn has_block(&self, block: &Block) -> Result<(), ExchangeError> {
        debug!(cid = %block.cid(), "Offline exchange recording block");
        self.store
            .put(block.clone())
            .await
            .map_err(|e| ExchangeError::Backend(e.to_string()))
    }

    async fn get_block(&self, cid: &Cid) -> Result<Block, ExchangeError> {
        match self.store.get(cid).await {
            Ok(block) => Ok(block),
            Err(BlockstoreError::NotFound(cid)) => Err(ExchangeError::NotFound(cid)),
            Err(e) => Err(ExchangeError::Backend(e.to_string())),
        }
    }
}
