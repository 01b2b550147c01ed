//! # Test Fixtures
//!
//! A single node wired from the in-memory adapters of every crate.

use std::sync::Arc;

use cr_01_content_routing::{
    ContentRoutingConfig, ContentRoutingService, DagPathResolver, MemoryDag, MockDht,
    RoutingBackend, StaticPeerHost,
};
use cr_02_block_service::{
    BlockService, BlockServiceApi, MemoryBlockstore, OfflineExchange,
};
use shared_bus::QueryEventRegistry;
use shared_types::{Block, Cid, Codec, Link, PeerId};

/// In-memory node: block service, DAG, DHT and routing service.
pub struct TestNode {
    /// Local blocks.
    pub store: Arc<MemoryBlockstore>,
    /// Block service over `store`.
    pub blocks: BlockService,
    /// DAG structure of stored nodes.
    pub dag: Arc<MemoryDag>,
    /// DHT the routing service is wired to.
    pub dht: Arc<MockDht>,
    /// Connection count.
    pub host: Arc<StaticPeerHost>,
    /// Registry shared by the service and the DHT.
    pub registry: Arc<QueryEventRegistry>,
}

impl TestNode {
    /// Node with one live connection and a DHT that publishes progress events.
    pub fn new() -> Self {
        Self::with_dht(|registry| MockDht::new().with_event_registry(registry))
    }

    /// Node whose DHT is built by `make` from the shared registry.
    pub fn with_dht(make: impl FnOnce(Arc<QueryEventRegistry>) -> MockDht) -> Self {
        let store = Arc::new(MemoryBlockstore::new());
        let exchange = Arc::new(OfflineExchange::new(Arc::new(MemoryBlockstore::new())));
        let registry = Arc::new(QueryEventRegistry::new());
        Self {
            blocks: BlockService::new(store.clone(), exchange),
            store,
            dag: Arc::new(MemoryDag::new()),
            dht: Arc::new(make(Arc::clone(&registry))),
            host: Arc::new(StaticPeerHost::new(1)),
            registry,
        }
    }

    /// Content routing service over this node's adapters.
    pub fn routing(&self) -> ContentRoutingService {
        ContentRoutingService::new(
            ContentRoutingConfig::default(),
            self.host.clone(),
            Arc::new(DagPathResolver::new(self.dag.clone())),
            self.dag.clone(),
            self.store.clone(),
        )
        .with_routing(RoutingBackend::Dht(self.dht.clone()))
        .with_event_registry(Arc::clone(&self.registry))
    }

    /// Add a DAG node through the block service and record its links.
    pub async fn add_node(&self, tag: &str, links: Vec<Link>) -> Cid {
        let block = Block::with_codec(Codec::DagProtobuf, tag.as_bytes().to_vec());
        let cid = self
            .blocks
            .add_block(block)
            .await
            .expect("memory block service");
        self.dag.add_node(cid, links);
        cid
    }

    /// Add a leaf node.
    pub async fn add_leaf(&self, tag: &str) -> Cid {
        self.add_node(tag, Vec::new()).await
    }
}

impl Default for TestNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic peer id.
pub fn peer(n: u8) -> PeerId {
    PeerId::new([n; 32])
}
