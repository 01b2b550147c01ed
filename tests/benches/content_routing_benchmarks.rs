//! # Content Routing Benchmarks
//!
//! | Area | Measured |
//! |------|----------|
//! | CidSet | insertion with duplicates |
//! | Traversal | wide and deep DAG enumeration at several concurrency levels |
//! | Recursive provide | end-to-end announce of a shared-subgraph DAG |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use tokio::runtime::Runtime;

use cr_01_content_routing::{
    enumerate_children_async, CidSet, ContentRoutingConfig, ContentRoutingService, DagPathResolver,
    DagService, MemoryDag, MockDht, RoutingBackend, StaticPeerHost,
};
use cr_02_block_service::MemoryBlockstore;
use shared_bus::QueryContext;
use shared_types::{Cid, Codec, Link};

fn cid(n: u32) -> Cid {
    Cid::from_data(Codec::DagProtobuf, &n.to_be_bytes())
}

/// Root fanning out to `width` children, each linking to every node of a
/// shared `depth`-long chain.
fn build_dag(width: u32, depth: u32) -> (Arc<MemoryDag>, Cid) {
    let dag = MemoryDag::new();
    let chain: Vec<Cid> = (0..depth).map(|i| cid(1_000_000 + i)).collect();
    for (i, node) in chain.iter().enumerate() {
        let next = chain.get(i + 1).map(|c| vec![Link::unnamed(*c)]).unwrap_or_default();
        dag.add_node(*node, next);
    }
    let children: Vec<Link> = (1..=width).map(|i| Link::unnamed(cid(i))).collect();
    for i in 1..=width {
        dag.add_node(cid(i), chain.first().map(|c| vec![Link::unnamed(*c)]).unwrap_or_default());
    }
    let root = cid(0);
    dag.add_node(root, children);
    (Arc::new(dag), root)
}

fn bench_cid_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("cid-set");
    let mut rng = rand::thread_rng();

    for size in [100u32, 1_000, 10_000] {
        let input: Vec<Cid> = (0..size).map(|_| cid(rng.gen_range(0..size / 2))).collect();
        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::new("visit_with_duplicates", size), &input, |b, input| {
            b.iter(|| {
                let mut set = CidSet::new();
                for c in input {
                    black_box(set.visit(*c));
                }
                set.len()
            })
        });
    }
    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let (memory, root) = build_dag(256, 64);
    let dag: Arc<dyn DagService> = memory;

    let mut group = c.benchmark_group("traversal");
    for concurrency in [1usize, 8, 32] {
        group.bench_with_input(
            BenchmarkId::new("enumerate_children_async", concurrency),
            &concurrency,
            |b, &concurrency| {
                b.to_async(&runtime).iter(|| {
                    let dag = Arc::clone(&dag);
                    async move {
                        let mut set = CidSet::new();
                        enumerate_children_async(&QueryContext::new(), &dag, root, &mut set, concurrency)
                            .await
                            .expect("in-memory traversal");
                        set.len()
                    }
                })
            },
        );
    }
    group.finish();
}

fn bench_recursive_provide(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let (dag, root) = build_dag(64, 16);
    let store = Arc::new(MemoryBlockstore::new());

    let mut group = c.benchmark_group("provide");
    group.bench_function("recursive_shared_subgraph", |b| {
        b.to_async(&runtime).iter(|| {
            let service = ContentRoutingService::new(
                ContentRoutingConfig::default(),
                Arc::new(StaticPeerHost::new(1)),
                Arc::new(DagPathResolver::new(dag.clone())),
                dag.clone(),
                store.clone(),
            )
            .with_routing(RoutingBackend::Dht(Arc::new(MockDht::new())));
            async move {
                service
                    .provide_keys_recursive(&QueryContext::new(), &[root])
                    .await
                    .expect("in-memory provide")
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_cid_set, bench_traversal, bench_recursive_provide);
criterion_main!(benches);
