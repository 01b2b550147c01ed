//! # Domain Errors
//!
//! Error types for content routing.

use shared_types::{Cid, PathError};
use thiserror::Error;

pub use cr_02_block_service::BlockstoreError;

/// Errors from the routing backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The peer or record could not be found.
    #[error("routing: not found")]
    NotFound,

    /// The operation's context was cancelled.
    #[error("routing: context cancelled")]
    Cancelled,

    /// Any other backend failure.
    #[error("routing: {0}")]
    Backend(String),
}

/// Errors from the DAG service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DagError {
    /// The node is not available.
    #[error("dag node {0} not found")]
    NotFound(Cid),

    /// Any other backend failure.
    #[error("dag backend: {0}")]
    Backend(String),
}

/// Errors from path resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The path text is malformed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A segment names a link its parent node does not have.
    #[error("no link named {name:?} under {parent}")]
    NoLink {
        /// The missing link name.
        name: String,
        /// The node that was searched.
        parent: Cid,
    },

    /// Loading a node along the path failed.
    #[error(transparent)]
    Dag(#[from] DagError),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML was malformed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Content routing error types.
#[derive(Debug, Error)]
pub enum ContentRoutingError {
    /// The routing backend cannot look up peers or providers.
    #[error("routing service is not a DHT")]
    NotDht,

    /// A caller-supplied argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No routing backend is configured.
    #[error("cannot provide in offline mode")]
    Offline,

    /// The node has no live peer connections.
    #[error("cannot provide, no connected peers")]
    NoConnectedPeers,

    /// The resolved content is not in the local block store.
    #[error("block {0} not found locally, cannot provide")]
    BlockNotLocal(Cid),

    /// Path resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// An announcement failed.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Walking the DAG failed.
    #[error(transparent)]
    Dag(#[from] DagError),

    /// The local block store failed.
    #[error(transparent)]
    Blockstore(#[from] BlockstoreError),

    /// The operation's context was cancelled.
    #[error("operation cancelled")]
    Cancelled,
}

impl ContentRoutingError {
    /// Short label used as the `reason` of failure metrics.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotDht => "not_dht",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Offline => "offline",
            Self::NoConnectedPeers => "no_peers",
            Self::BlockNotLocal(_) => "not_local",
            Self::Resolve(_) => "resolve",
            Self::Routing(_) => "routing",
            Self::Dag(_) => "traversal",
            Self::Blockstore(_) => "blockstore",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the caller may retry once the node's state changes.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::Offline | Self::NoConnectedPeers | Self::BlockNotLocal(_)
        )
    }
}
