//! In-memory DAG and peer host.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::QueryContext;
use shared_types::{Cid, Link};

use crate::domain::DagError;
use crate::ports::{DagService, PeerHost};

/// DAG held in a map from node to its links.
#[derive(Debug, Default)]
pub struct MemoryDag {
    nodes: RwLock<HashMap<Cid, Vec<Link>>>,
    failing: RwLock<HashSet<Cid>>,
    fetches: RwLock<HashMap<Cid, usize>>,
    latency: Option<Duration>,
}

impl MemoryDag {
    /// Empty DAG.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every `get_links` call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Insert or replace a node.
    pub fn add_node(&self, cid: Cid, links: Vec<Link>) {
        self.nodes.write().insert(cid, links);
    }

    /// Make every fetch of `cid` fail with a backend error.
    pub fn fail_on(&self, cid: Cid) {
        self.failing.write().insert(cid);
    }

    /// How many times `cid` was fetched.
    #[must_use]
    pub fn fetch_count(&self, cid: &Cid) -> usize {
        self.fetches.read().get(cid).copied().unwrap_or(0)
    }

    /// Total fetches across all nodes.
    #[must_use]
    pub fn total_fetches(&self) -> usize {
        self.fetches.read().values().sum()
    }
}

#[async_trait]
impl DagService for MemoryDag {
    async fn get_links(&self, _ctx: &QueryContext, cid: &Cid) -> Result<Vec<Link>, DagError> {
        *self.fetches.write().entry(*cid).or_insert(0) += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.read().contains(cid) {
            return Err(DagError::Backend(format!("injected failure for {cid}")));
        }
        self.nodes
            .read()
            .get(cid)
            .cloned()
            .ok_or(DagError::NotFound(*cid))
    }
}

/// Peer host reporting a settable connection count.
#[derive(Debug, Default)]
pub struct StaticPeerHost {
    connected: AtomicUsize,
}

impl StaticPeerHost {
    /// Host with `connected` live connections.
    #[must_use]
    pub fn new(connected: usize) -> Self {
        Self {
            connected: AtomicUsize::new(connected),
        }
    }

    /// Change the connection count.
    pub fn set_connected(&self, connected: usize) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl PeerHost for StaticPeerHost {
    fn connected_peers(&self) -> usize {
        self.connected.load(Ordering::SeqCst)
    }
}
