//! # CR-02 Block Service
//!
//! Adds and fetches blocks through a local [`Blockstore`], notifying an
//! [`Exchange`] of every block added.
//!
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Modes
//!
//! | Mode | `add_block` behavior |
//! |------|----------------------|
//! | standard | skip the store write when the block is already present |
//! | write-through | forward every write to the store, unconditionally |
//!
//! Write-through never buffers, batches or deduplicates: each `add_block`
//! issues exactly one `Blockstore::put`.
//!
//! ## Module Structure
//!
//! ```text
//! cr-02-block-service/
//! ├── domain/      # Error types
//! ├── ports/       # BlockServiceApi (inbound), Blockstore + Exchange (outbound)
//! ├── adapters/    # MemoryBlockstore, PutCountingBlockstore, OfflineExchange
//! └── service.rs   # BlockService
//! ```

#![warn(missing_docs)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{MemoryBlockstore, OfflineExchange, PutCountingBlockstore};
pub use domain::{BlockServiceError, BlockstoreError, ExchangeError};
pub use ports::{BlockServiceApi, Blockstore, Exchange};
pub use service::BlockService;
