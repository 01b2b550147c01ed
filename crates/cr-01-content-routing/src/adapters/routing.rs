//! In-memory routing backends.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::{Mutex, RwLock};
use shared_bus::{QueryContext, QueryEvent, QueryEventRegistry};
use shared_types::{Cid, PeerId, PeerInfo};

use crate::domain::RoutingError;
use crate::ports::{ContentRouting, DhtRouting};

/// DHT backed by in-memory peer and provider tables.
///
/// Records every announcement it receives. When given a registry it
/// publishes `SendingQuery`/`PeerResponse` progress the way a networked DHT
/// would while walking the keyspace.
#[derive(Default)]
pub struct MockDht {
    peers: RwLock<HashMap<PeerId, PeerInfo>>,
    providers: RwLock<HashMap<Cid, Vec<PeerInfo>>>,
    announced: Mutex<Vec<(Cid, bool)>>,
    rejected: RwLock<HashSet<Cid>>,
    lookup_delay: Option<Duration>,
    provider_delay: Option<Duration>,
    events: Option<Arc<QueryEventRegistry>>,
}

impl MockDht {
    /// Empty tables, no delays.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish progress events through `registry` during lookups.
    #[must_use]
    pub fn with_event_registry(mut self, registry: Arc<QueryEventRegistry>) -> Self {
        self.events = Some(registry);
        self
    }

    /// Delay every `find_peer` by `delay`.
    #[must_use]
    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = Some(delay);
        self
    }

    /// Delay each provider yielded by `find_providers_async` by `delay`.
    #[must_use]
    pub fn with_provider_delay(mut self, delay: Duration) -> Self {
        self.provider_delay = Some(delay);
        self
    }

    /// Make `peer` resolvable.
    pub fn add_peer(&self, peer: PeerInfo) {
        self.peers.write().insert(peer.id, peer);
    }

    /// Record `provider` as providing `cid`.
    ///
    /// Repeated records are kept, as when several DHT nodes return the same
    /// provider; lookups yield each id once.
    pub fn add_provider(&self, cid: Cid, provider: PeerInfo) {
        self.providers.write().entry(cid).or_default().push(provider);
    }

    /// Fail every announcement of `cid`.
    pub fn reject_provide(&self, cid: Cid) {
        self.rejected.write().insert(cid);
    }

    /// Identifiers announced so far, in call order.
    #[must_use]
    pub fn announced(&self) -> Vec<Cid> {
        self.announced.lock().iter().map(|(cid, _)| *cid).collect()
    }

    /// Announcements with their announce-to-network flag.
    #[must_use]
    pub fn announcements(&self) -> Vec<(Cid, bool)> {
        self.announced.lock().clone()
    }

    /// Number of announcement calls that succeeded.
    #[must_use]
    pub fn announce_count(&self) -> usize {
        self.announced.lock().len()
    }
}

#[async_trait]
impl ContentRouting for MockDht {
    async fn provide(&self, ctx: &QueryContext, cid: &Cid, announce: bool) -> Result<(), RoutingError> {
        if ctx.is_cancelled() {
            return Err(RoutingError::Cancelled);
        }
        if self.rejected.read().contains(cid) {
            return Err(RoutingError::Backend(format!("no peers accepted record for {cid}")));
        }
        self.announced.lock().push((*cid, announce));
        Ok(())
    }
}

#[async_trait]
impl DhtRouting for MockDht {
    async fn find_peer(&self, ctx: &QueryContext, peer: PeerId) -> Result<PeerInfo, RoutingError> {
        if let Some(registry) = &self.events {
            registry.publish(ctx, QueryEvent::sending_query(peer)).await;
            registry
                .publish(ctx, QueryEvent::peer_response(peer, Vec::new()))
                .await;
        }

        if let Some(delay) = self.lookup_delay {
            tokio::select! {
                () = ctx.cancelled() => return Err(RoutingError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
        }

        self.peers
            .read()
            .get(&peer)
            .cloned()
            .ok_or(RoutingError::NotFound)
    }

    fn find_providers_async(
        &self,
        ctx: &QueryContext,
        cid: Cid,
        limit: usize,
    ) -> BoxStream<'static, PeerInfo> {
        let mut seen = HashSet::new();
        let found: Vec<PeerInfo> = self
            .providers
            .read()
            .get(&cid)
            .map(|providers| {
                providers
                    .iter()
                    .filter(|p| seen.insert(p.id))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let providers = stream::iter(found).boxed();
        let providers = match self.provider_delay {
            Some(delay) => providers
                .then(move |provider| async move {
                    tokio::time::sleep(delay).await;
                    provider
                })
                .boxed(),
            None => providers,
        };

        let token = ctx.token().clone();
        providers
            .take_until(async move { token.cancelled().await })
            .boxed()
    }
}

/// Announcement-only routing with no lookup capability.
///
/// Keeps announced records locally, as a node does when it provides without
/// a DHT.
#[derive(Debug, Default)]
pub struct OfflineRouting {
    records: Mutex<Vec<Cid>>,
}

impl OfflineRouting {
    /// No records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers recorded so far.
    #[must_use]
    pub fn records(&self) -> Vec<Cid> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl ContentRouting for OfflineRouting {
    async fn provide(&self, _ctx: &QueryContext, cid: &Cid, _announce: bool) -> Result<(), RoutingError> {
        self.records.lock().push(*cid);
        Ok(())
    }
}
