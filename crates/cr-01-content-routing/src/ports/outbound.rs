//! # Outbound Ports (Driven Side)
//!
//! Dependencies the content-routing service calls into.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use shared_bus::QueryContext;
use shared_types::{Cid, ContentPath, Link, PeerId, PeerInfo};

use crate::domain::{DagError, ResolveError, RoutingError};

/// Announcement capability every routing backend has.
#[async_trait]
pub trait ContentRouting: Send + Sync {
    /// Announce that this node provides `cid`.
    ///
    /// With `announce` unset the record is only kept locally.
    async fn provide(&self, ctx: &QueryContext, cid: &Cid, announce: bool) -> Result<(), RoutingError>;
}

/// Full DHT routing: announcement plus peer and provider lookup.
///
/// Implementations may publish intermediate progress (`SendingQuery`,
/// `PeerResponse`) through a `QueryEventRegistry` using the context they are
/// handed; those events are observed but never surface as results.
#[async_trait]
pub trait DhtRouting: ContentRouting {
    /// Resolve `peer` to its known addresses.
    async fn find_peer(&self, ctx: &QueryContext, peer: PeerId) -> Result<PeerInfo, RoutingError>;

    /// Stream up to `limit` distinct providers of `cid`.
    ///
    /// The stream ends when the search is exhausted, the limit is reached or
    /// `ctx` is cancelled.
    fn find_providers_async(
        &self,
        ctx: &QueryContext,
        cid: Cid,
        limit: usize,
    ) -> BoxStream<'static, PeerInfo>;
}

/// The routing backend a node is configured with.
///
/// Only the `Dht` variant supports lookups; both support `provide`.
#[derive(Clone)]
pub enum RoutingBackend {
    /// Distributed hash table routing.
    Dht(Arc<dyn DhtRouting>),
    /// Announcement-only routing (delegated or offline providers).
    Basic(Arc<dyn ContentRouting>),
}

impl RoutingBackend {
    /// The lookup capability, if this backend has one.
    #[must_use]
    pub fn as_dht(&self) -> Option<&Arc<dyn DhtRouting>> {
        match self {
            Self::Dht(dht) => Some(dht),
            Self::Basic(_) => None,
        }
    }

    /// Announce `cid` through whichever backend is configured.
    pub async fn provide(&self, ctx: &QueryContext, cid: &Cid, announce: bool) -> Result<(), RoutingError> {
        match self {
            Self::Dht(dht) => dht.provide(ctx, cid, announce).await,
            Self::Basic(routing) => routing.provide(ctx, cid, announce).await,
        }
    }

    /// Label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Dht(_) => "dht",
            Self::Basic(_) => "basic",
        }
    }
}

impl std::fmt::Debug for RoutingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RoutingBackend").field(&self.kind()).finish()
    }
}

/// Read access to linked content.
#[async_trait]
pub trait DagService: Send + Sync {
    /// Links of the node `cid`, in node order.
    async fn get_links(&self, ctx: &QueryContext, cid: &Cid) -> Result<Vec<Link>, DagError>;

    /// Link targets of the node `cid`, in node order.
    async fn get_direct_children(&self, ctx: &QueryContext, cid: &Cid) -> Result<Vec<Cid>, DagError> {
        let links = self.get_links(ctx, cid).await?;
        Ok(links.into_iter().map(|link| link.cid).collect())
    }
}

/// Turns a content path into the identifier it names.
#[async_trait]
pub trait PathResolver: Send + Sync {
    /// Resolve `path` to a single [`Cid`].
    async fn resolve_path(&self, ctx: &QueryContext, path: &ContentPath) -> Result<Cid, ResolveError>;
}

/// The node's network host.
pub trait PeerHost: Send + Sync {
    /// Number of live peer connections.
    fn connected_peers(&self) -> usize;
}
