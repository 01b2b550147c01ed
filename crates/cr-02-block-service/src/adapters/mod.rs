//! # Adapters
//!
//! In-memory storage and an offline exchange.

pub mod memory;
pub mod offline;

pub use memory::{MemoryBlockstore, PutCountingBlockstore};
pub use offline::OfflineExchange;
