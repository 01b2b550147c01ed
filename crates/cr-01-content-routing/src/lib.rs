//! # CR-01 Content Routing
//!
//! Peer lookup, provider discovery and provider announcement on top of a
//! routing backend.
//!
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Operations
//!
//! | Operation | Returns | Fails fast with |
//! |-----------|---------|-----------------|
//! | `find_peer` | stream of `Multiaddr` | `NotDht` |
//! | `find_providers` | stream of `PeerId` | `NotDht`, `InvalidArgument`, `Resolve` |
//! | `provide` | `()` | `Offline`, `NoConnectedPeers`, `Resolve`, `BlockNotLocal` |
//!
//! Lookups run as a driver task publishing events into a per-operation
//! channel and a consumer task forwarding results to the caller's
//! [`ResultStream`]. Routing failures inside a lookup end the stream early;
//! they are logged, never yielded.
//!
//! Recursive `provide` enumerates the DAG below the resolved root with a
//! bounded number of fetches in flight, then announces each distinct
//! identifier exactly once.
//!
//! ## Module Structure
//!
//! ```text
//! cr-01-content-routing/
//! ├── domain/      # Errors, options, CidSet, DAG traversal, provide phases
//! ├── ports/       # DhtApi (inbound); routing, DAG, resolver, host (outbound)
//! ├── adapters/    # MockDht, OfflineRouting, MemoryDag, resolvers, StaticPeerHost
//! ├── bridge.rs    # ResultStream and the driver/consumer tasks
//! ├── service.rs   # ContentRoutingService
//! └── config.rs    # ContentRoutingConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod bridge;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{DagPathResolver, DirectPathResolver, MemoryDag, MockDht, OfflineRouting, StaticPeerHost};
pub use bridge::ResultStream;
pub use config::ContentRoutingConfig;
pub use domain::{
    enumerate_children_async, CidSet, ConfigError, ContentRoutingError, DagError,
    FindProvidersOptions, ProvideOptions, ProvidePhase, ResolveError, RoutingError,
    DEFAULT_NUM_PROVIDERS, DEFAULT_TRAVERSAL_CONCURRENCY,
};
pub use ports::{ContentRouting, DagService, DhtApi, DhtRouting, PathResolver, PeerHost, RoutingBackend};
pub use service::ContentRoutingService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
