//! # Inbound Ports (Driving Side)
//!
//! The DHT API this crate offers to its callers.

use async_trait::async_trait;
use shared_bus::QueryContext;
use shared_types::{ContentPath, Multiaddr, PeerId};

use crate::bridge::ResultStream;
use crate::domain::{ContentRoutingError, FindProvidersOptions, ProvideOptions};

/// Peer lookup, provider discovery and provider announcement.
///
/// The two lookups return immediately with a stream that is fed by background
/// tasks; errors detected before those tasks start are returned directly.
/// Streams end when the lookup finishes, fails, or `ctx` is cancelled.
#[async_trait]
pub trait DhtApi: Send + Sync {
    /// Stream the addresses of `peer`.
    ///
    /// # Errors
    ///
    /// - `NotDht` - The routing backend cannot look up peers
    async fn find_peer(
        &self,
        ctx: &QueryContext,
        peer: PeerId,
    ) -> Result<ResultStream<Multiaddr>, ContentRoutingError>;

    /// Stream the identities of peers providing the content at `path`.
    ///
    /// `None` uses the configured provider count.
    ///
    /// # Errors
    ///
    /// - `NotDht` - The routing backend cannot look up providers
    /// - `InvalidArgument` - `num_providers` is zero
    /// - `Resolve` - `path` does not resolve
    async fn find_providers(
        &self,
        ctx: &QueryContext,
        path: &ContentPath,
        options: Option<FindProvidersOptions>,
    ) -> Result<ResultStream<PeerId>, ContentRoutingError>;

    /// Announce this node as a provider of the content at `path`.
    ///
    /// # Errors
    ///
    /// - `Offline` - No routing backend is configured
    /// - `NoConnectedPeers` - The node has no live connections
    /// - `Resolve` - `path` does not resolve
    /// - `BlockNotLocal` - The content is not in the local block store
    /// - `Dag` / `Routing` - Traversal or announcement failed part way
    /// - `Cancelled` - `ctx` was cancelled
    async fn provide(
        &self,
        ctx: &QueryContext,
        path: &ContentPath,
        options: ProvideOptions,
    ) -> Result<(), ContentRoutingError>;
}
