//! # Adapters
//!
//! In-memory implementations of the outbound ports, for tests and demos.

pub mod memory;
pub mod resolver;
pub mod routing;

pub use memory::{MemoryDag, StaticPeerHost};
pub use resolver::{DagPathResolver, DirectPathResolver};
pub use routing::{MockDht, OfflineRouting};
