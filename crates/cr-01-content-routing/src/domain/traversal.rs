//! # DAG Traversal
//!
//! Enumerates every identifier reachable from a root, root included, with a
//! bounded number of child fetches in flight.

use std::collections::VecDeque;
use std::sync::Arc;

use cr_telemetry::NODES_TRAVERSED;
use futures::stream::{FuturesUnordered, StreamExt};
use shared_bus::QueryContext;
use shared_types::Cid;
use tracing::{debug, trace};

use crate::domain::{CidSet, ContentRoutingError};
use crate::ports::DagService;

/// Child fetches allowed in flight by default.
pub const DEFAULT_TRAVERSAL_CONCURRENCY: usize = 8;

/// Add `root` and everything reachable from it to `set`.
///
/// Nodes already in `set` are neither fetched nor descended into, so each
/// node's children are requested at most once even in diamond-shaped DAGs.
/// At most `concurrency` fetches run at once; zero is treated as one.
///
/// # Errors
///
/// - `Dag` - A child fetch failed; `set` keeps what was found so far
/// - `Cancelled` - `ctx` was cancelled
pub async fn enumerate_children_async(
    ctx: &QueryContext,
    dag: &Arc<dyn DagService>,
    root: Cid,
    set: &mut CidSet,
    concurrency: usize,
) -> Result<(), ContentRoutingError> {
    let concurrency = concurrency.max(1);
    if !set.visit(root) {
        return Ok(());
    }

    let mut pending = VecDeque::from([root]);
    let mut in_flight = FuturesUnordered::new();

    loop {
        while in_flight.len() < concurrency {
            let Some(cid) = pending.pop_front() else {
                break;
            };
            let dag = Arc::clone(dag);
            let ctx = ctx.clone();
            in_flight.push(async move {
                let children = dag.get_direct_children(&ctx, &cid).await;
                (cid, children)
            });
        }

        if in_flight.is_empty() {
            debug!(root = %root, nodes = set.len(), "Traversal complete");
            return Ok(());
        }

        let next = tokio::select! {
            biased;
            () = ctx.cancelled() => return Err(ContentRoutingError::Cancelled),
            next = in_flight.next() => next,
        };
        let Some((parent, children)) = next else {
            continue;
        };

        let children = children?;
        NODES_TRAVERSED.inc();
        trace!(cid = %parent, children = children.len(), "Node expanded");
        for child in children {
            if set.visit(child) {
                pending.push_back(child);
            }
        }
    }
}
