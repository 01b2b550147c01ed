//! In-memory blockstores.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Block, Cid};

use crate::domain::BlockstoreError;
use crate::ports::Blockstore;

/// Blockstore backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryBlockstore {
    blocks: RwLock<HashMap<Cid, Block>>,
}

impl MemoryBlockstore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }
}

#[async_trait]
impl Blockstore for MemoryBlockstore {
    async fn has(&self, cid: &Cid) -> Result<bool, BlockstoreError> {
        Ok(self.blocks.read().contains_key(cid))
    }

    async fn get(&self, cid: &Cid) -> Result<Block, BlockstoreError> {
        self.blocks
            .read()
            .get(cid)
            .cloned()
            .ok_or(BlockstoreError::NotFound(*cid))
    }

    async fn put(&self, block: Block) -> Result<(), BlockstoreError> {
        self.blocks.write().insert(*block.cid(), block);
        Ok(())
    }

    async fn delete_block(&self, cid: &Cid) -> Result<(), BlockstoreError> {
        self.blocks
            .write()
            .remove(cid)
            .map(|_| ())
            .ok_or(BlockstoreError::NotFound(*cid))
    }
}

/// Decorator that counts `put` calls reaching the wrapped store.
pub struct PutCountingBlockstore<B> {
    inner: B,
    puts: AtomicUsize,
}

impl<B: Blockstore> PutCountingBlockstore<B> {
    /// Wrap `inner`.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            puts: AtomicUsize::new(0),
        }
    }

    /// Number of `put` calls so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<B: Blockstore> Blockstore for PutCountingBlockstore<B> {
    async fn has(&self, cid: &Cid) -> Result<bool, BlockstoreError> {
        self.inner.has(cid).await
    }

    async fn get(&self, cid: &Cid) -> Result<Block, BlockstoreError> {
        self.inner.get(cid).await
    }

    async fn put(&self, block: Block) -> Result<(), BlockstoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(block).await
    }

    async fn delete_block(&self, cid: &Cid) -> Result<(), BlockstoreError> {
        self.inner.delete_block(cid).await
    }
}
