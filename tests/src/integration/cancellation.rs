//! # Cancellation Flows
//!
//! Cancelling an operation context at any point must close the caller's
//! stream promptly and release the operation's registration.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures::StreamExt;
    use rand::Rng;
    use tokio::time::timeout;

    use cr_01_content_routing::{DhtApi, FindProvidersOptions, MockDht, ProvideOptions};
    use shared_bus::QueryContext;
    use shared_types::{ContentPath, Link, PeerInfo};

    use crate::fixtures::{peer, TestNode};

    const LIVENESS: Duration = Duration::from_secs(2);

    async fn wait_until_released(node: &TestNode) {
        timeout(LIVENESS, async {
            while node.registry.active_operations() > 0 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("operation registration must be released");
    }

    #[tokio::test]
    async fn test_cancel_before_first_provider() {
        let node = TestNode::with_dht(|_| MockDht::new().with_provider_delay(Duration::from_secs(3600)));
        let cid = node.add_leaf("slow").await;
        node.dht.add_provider(cid, PeerInfo::new(peer(1)));
        let ctx = QueryContext::new();

        let mut stream = node
            .routing()
            .find_providers(&ctx, &ContentPath::new(cid), Some(FindProvidersOptions::default()))
            .await
            .unwrap();
        ctx.cancel();

        assert!(timeout(LIVENESS, stream.recv()).await.unwrap().is_none());
        wait_until_released(&node).await;
    }

    #[tokio::test]
    async fn test_cancel_at_random_points_mid_stream() {
        for _ in 0..10 {
            let node = TestNode::with_dht(|_| MockDht::new().with_provider_delay(Duration::from_millis(1)));
            let cid = node.add_leaf("many providers").await;
            for n in 0..50 {
                node.dht.add_provider(cid, PeerInfo::new(peer(n)));
            }
            let ctx = QueryContext::new();
            let cancel_after = rand::thread_rng().gen_range(0..10usize);

            let mut stream = node
                .routing()
                .find_providers(
                    &ctx,
                    &ContentPath::new(cid),
                    Some(FindProvidersOptions::default().num_providers(50)),
                )
                .await
                .unwrap();

            let mut received = 0;
            while received < cancel_after {
                if stream.recv().await.is_none() {
                    break;
                }
                received += 1;
            }
            ctx.cancel();

            let rest = timeout(LIVENESS, async {
                let mut rest = 0;
                while stream.next().await.is_some() {
                    rest += 1;
                }
                rest
            })
            .await
            .expect("stream must close after cancellation");

            assert!(received + rest < 50);
            assert!(stream.is_terminated());
            wait_until_released(&node).await;
        }
    }

    #[tokio::test]
    async fn test_cancel_hung_peer_lookup() {
        let node = TestNode::with_dht(|registry| {
            MockDht::new()
                .with_event_registry(registry)
                .with_lookup_delay(Duration::from_secs(3600))
        });
        let ctx = QueryContext::new();

        let mut stream = node.routing().find_peer(&ctx, peer(3)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        ctx.cancel();

        assert!(timeout(LIVENESS, stream.recv()).await.unwrap().is_none());
        wait_until_released(&node).await;
    }

    #[tokio::test]
    async fn test_dropped_stream_releases_operation() {
        let node = TestNode::new();
        let cid = node.add_leaf("unread").await;
        for n in 0..20 {
            node.dht.add_provider(cid, PeerInfo::new(peer(n)));
        }

        let stream = node
            .routing()
            .find_providers(&QueryContext::new(), &ContentPath::new(cid), Some(FindProvidersOptions::default()))
            .await
            .unwrap();
        drop(stream);

        wait_until_released(&node).await;
    }

    #[tokio::test]
    async fn test_timeout_context_ends_lookup() {
        let node = TestNode::with_dht(|_| MockDht::new().with_lookup_delay(Duration::from_secs(3600)));
        let ctx = QueryContext::new().with_timeout(Duration::from_millis(20));

        let stream = node.routing().find_peer(&ctx, peer(4)).await.unwrap();
        let found: Vec<_> = timeout(LIVENESS, stream.collect()).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_recursive_provide() {
        let node = TestNode::new();
        let leaf = node.add_leaf("leaf").await;
        let root = node.add_node("root", vec![Link::unnamed(leaf)]).await;
        let ctx = QueryContext::new();
        ctx.cancel();

        let result = node
            .routing()
            .provide(&ctx, &ContentPath::new(root), ProvideOptions::default().recursive(true))
            .await;
        assert!(result.is_err());
        assert_eq!(node.dht.announce_count(), 0);
    }
}
