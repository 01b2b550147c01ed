//! # Integration Test Flows
//!
//! Drives `ContentRoutingService` end to end over the block service, the
//! in-memory DAG and the mock DHT.
//!
//! ## Flows Tested:
//!
//! 1. **Block service → Provide**: blocks added through `BlockService` are
//!    announced, once each, including shared subgraphs
//! 2. **Lookups**: `find_peer` / `find_providers` streams over the shared
//!    event registry, with progress events filtered out
//! 3. **Write-through**: every add reaches the underlying store

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use futures::StreamExt;
    use proptest::prelude::*;
    use tokio::time::timeout;

    use cr_01_content_routing::{
        ContentRoutingError, DhtApi, FindProvidersOptions, OfflineRouting, ProvideOptions,
        RoutingBackend,
    };
    use cr_02_block_service::{
        BlockService, BlockServiceApi, MemoryBlockstore, OfflineExchange, PutCountingBlockstore,
    };
    use shared_bus::QueryContext;
    use shared_types::{Block, Cid, ContentPath, Link, Multiaddr, PeerId, PeerInfo};

    use crate::fixtures::{peer, TestNode};

    // =============================================================================
    // PROVIDE
    // =============================================================================

    /// Single local block, one connection: exactly one announcement.
    #[tokio::test]
    async fn test_provide_single_block() {
        let node = TestNode::new();
        let cid = node.add_leaf("hello world").await;

        node.routing()
            .provide(&QueryContext::new(), &ContentPath::new(cid), ProvideOptions::default())
            .await
            .unwrap();

        assert_eq!(node.dht.announcements(), vec![(cid, true)]);
    }

    /// Root with two children sharing a grandchild: four distinct announcements.
    #[tokio::test]
    async fn test_provide_recursive_diamond() {
        let node = TestNode::new();
        let shared = node.add_leaf("shared").await;
        let a = node.add_node("a", vec![Link::named("s", shared)]).await;
        let b = node.add_node("b", vec![Link::named("s", shared)]).await;
        let root = node
            .add_node("root", vec![Link::named("a", a), Link::named("b", b)])
            .await;

        node.routing()
            .provide(
                &QueryContext::new(),
                &ContentPath::new(root),
                ProvideOptions::default().recursive(true),
            )
            .await
            .unwrap();

        let announced = node.dht.announced();
        assert_eq!(announced.len(), 4);
        let distinct: HashSet<Cid> = announced.iter().copied().collect();
        assert_eq!(distinct, HashSet::from([root, a, b, shared]));
    }

    /// Provide through a named path announces the resolved target only.
    #[tokio::test]
    async fn test_provide_resolves_path() {
        let node = TestNode::new();
        let file = node.add_leaf("file body").await;
        let dir = node.add_node("dir", vec![Link::named("file.txt", file)]).await;

        let path: ContentPath = format!("/ipfs/{dir}/file.txt").parse().unwrap();
        node.routing()
            .provide(&QueryContext::new(), &path, ProvideOptions::default())
            .await
            .unwrap();

        assert_eq!(node.dht.announced(), vec![file]);
    }

    /// Connectivity loss is reported before any path work.
    #[tokio::test]
    async fn test_provide_requires_connection() {
        let node = TestNode::new();
        let cid = node.add_leaf("orphan").await;
        node.host.set_connected(0);

        let err = node
            .routing()
            .provide(&QueryContext::new(), &ContentPath::new(cid), ProvideOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot provide, no connected peers");

        node.host.set_connected(2);
        node.routing()
            .provide(&QueryContext::new(), &ContentPath::new(cid), ProvideOptions::default())
            .await
            .unwrap();
        assert_eq!(node.dht.announce_count(), 1);
    }

    // =============================================================================
    // LOOKUPS
    // =============================================================================

    #[tokio::test]
    async fn test_find_peer_streams_addresses() {
        let node = TestNode::new();
        let addrs: Vec<Multiaddr> = ["/ip4/192.0.2.7/tcp/4001", "/ip6/2001:db8::7/tcp/4001"]
            .iter()
            .map(|a| a.parse().unwrap())
            .collect();
        node.dht.add_peer(PeerInfo::with_addrs(peer(7), addrs.clone()));

        let stream = node
            .routing()
            .find_peer(&QueryContext::new(), peer(7))
            .await
            .unwrap();
        let found: Vec<Multiaddr> = timeout(Duration::from_secs(1), stream.collect())
            .await
            .unwrap();

        assert_eq!(found, addrs);
        assert_eq!(node.registry.active_operations(), 0);
    }

    #[tokio::test]
    async fn test_find_peer_unknown_is_empty() {
        let node = TestNode::new();
        let stream = node
            .routing()
            .find_peer(&QueryContext::new(), peer(99))
            .await
            .unwrap();
        let found: Vec<Multiaddr> = timeout(Duration::from_secs(1), stream.collect())
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_find_peer_needs_dht() {
        let node = TestNode::new();
        let service = node
            .routing()
            .with_routing(RoutingBackend::Basic(Arc::new(OfflineRouting::new())));

        assert!(matches!(
            service.find_peer(&QueryContext::new(), peer(1)).await,
            Err(ContentRoutingError::NotDht)
        ));
        assert!(matches!(
            service
                .find_providers(
                    &QueryContext::new(),
                    &ContentPath::new(Cid::from_data(shared_types::Codec::Raw, b"x")),
                    Some(FindProvidersOptions::default()),
                )
                .await,
            Err(ContentRoutingError::NotDht)
        ));
    }

    #[tokio::test]
    async fn test_find_providers_bounded() {
        let node = TestNode::new();
        let cid = node.add_leaf("popular").await;
        for n in 0..30 {
            node.dht.add_provider(cid, PeerInfo::new(peer(n)));
        }

        let stream = node
            .routing()
            .find_providers(
                &QueryContext::new(),
                &ContentPath::new(cid),
                Some(FindProvidersOptions::default()),
            )
            .await
            .unwrap();
        let ids: Vec<PeerId> = timeout(Duration::from_secs(1), stream.collect())
            .await
            .unwrap();

        assert_eq!(ids.len(), 20);
        let distinct: HashSet<PeerId> = ids.iter().copied().collect();
        assert_eq!(distinct.len(), 20);
    }

    /// Providers reported several times are streamed once, and the limit
    /// counts distinct providers.
    #[tokio::test]
    async fn test_find_providers_repeated_records_are_distinct() {
        let node = TestNode::new();
        let cid = node.add_leaf("replicated").await;
        for _ in 0..3 {
            for n in 0..8 {
                node.dht.add_provider(cid, PeerInfo::new(peer(n)));
            }
        }
        let service = node.routing();

        let limited = service
            .find_providers(
                &QueryContext::new(),
                &ContentPath::new(cid),
                Some(FindProvidersOptions::default().num_providers(5)),
            )
            .await
            .unwrap();
        let ids: Vec<PeerId> = timeout(Duration::from_secs(1), limited.collect())
            .await
            .unwrap();
        assert_eq!(ids, (0..5).map(peer).collect::<Vec<_>>());

        let all = service
            .find_providers(&QueryContext::new(), &ContentPath::new(cid), None)
            .await
            .unwrap();
        let ids: Vec<PeerId> = timeout(Duration::from_secs(1), all.collect())
            .await
            .unwrap();
        assert_eq!(ids, (0..8).map(peer).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_concurrent_lookups_do_not_cross_talk() {
        let node = TestNode::new();
        let (x, y) = (node.add_leaf("x").await, node.add_leaf("y").await);
        node.dht.add_provider(x, PeerInfo::new(peer(1)));
        node.dht.add_provider(y, PeerInfo::new(peer(2)));
        let service = node.routing();
        let ctx = QueryContext::new();

        let sx = service
            .find_providers(&ctx, &ContentPath::new(x), Some(FindProvidersOptions::default()))
            .await
            .unwrap();
        let sy = service
            .find_providers(&ctx, &ContentPath::new(y), Some(FindProvidersOptions::default()))
            .await
            .unwrap();

        let (ix, iy): (Vec<PeerId>, Vec<PeerId>) = timeout(
            Duration::from_secs(1),
            futures::future::join(sx.collect(), sy.collect()),
        )
        .await
        .unwrap();
        assert_eq!(ix, vec![peer(1)]);
        assert_eq!(iy, vec![peer(2)]);
    }

    // =============================================================================
    // BLOCK SERVICE
    // =============================================================================

    /// Two adds of the same block through a write-through service: two puts.
    #[tokio::test]
    async fn test_write_through_puts_every_block() {
        let store = Arc::new(PutCountingBlockstore::new(MemoryBlockstore::new()));
        let exchange = Arc::new(OfflineExchange::new(Arc::new(MemoryBlockstore::new())));
        let service = BlockService::new_write_through(store.clone(), exchange);
        let block = Block::new(b"write me twice".to_vec());

        service.add_block(block.clone()).await.unwrap();
        service.add_block(block).await.unwrap();

        assert_eq!(store.put_count(), 2);
    }

    // =============================================================================
    // PROPERTIES
    // =============================================================================

    /// Random DAG over `n` nodes: edges only point to higher indices.
    fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (2usize..24).prop_flat_map(|n| {
            let edges = proptest::collection::vec((0..n, 0..n), 0..(n * 3)).prop_map(|pairs| {
                pairs
                    .into_iter()
                    .filter(|(a, b)| a < b)
                    .collect::<Vec<_>>()
            });
            (Just(n), edges)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_recursive_provide_announces_each_reachable_node_once((n, edges) in dag_strategy()) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                let node = TestNode::new();

                // Build from the highest index down so links point at known cids.
                let mut cids: Vec<Option<Cid>> = vec![None; n];
                for i in (0..n).rev() {
                    let links: Vec<Link> = edges
                        .iter()
                        .filter(|(from, _)| *from == i)
                        .filter_map(|(_, to)| cids[*to])
                        .map(Link::unnamed)
                        .collect();
                    cids[i] = Some(node.add_node(&format!("node-{i}"), links).await);
                }
                let root = cids[0].unwrap();

                node.routing()
                    .provide(
                        &QueryContext::new(),
                        &ContentPath::new(root),
                        ProvideOptions::default().recursive(true),
                    )
                    .await
                    .unwrap();

                // Reachability from node 0 over the generated edges.
                let mut reachable = HashSet::from([0usize]);
                for i in 0..n {
                    if reachable.contains(&i) {
                        for (_, to) in edges.iter().filter(|(from, _)| *from == i) {
                            reachable.insert(*to);
                        }
                    }
                }

                let announced = node.dht.announced();
                let distinct: HashSet<Cid> = announced.iter().copied().collect();
                assert_eq!(distinct.len(), announced.len(), "duplicate announcement");
                assert_eq!(announced.len(), reachable.len());
                assert_eq!(announced[0], root);
            });
        }
    }
}
