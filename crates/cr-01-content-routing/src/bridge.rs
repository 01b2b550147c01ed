//! # Result Stream Bridge
//!
//! Turns a push-style routing query into a pull-style result stream.
//!
//! ```text
//!  routing call ──▶ driver task ──publish──▶ event channel ──▶ consumer task ──send──▶ ResultStream
//!                   (owns Registration)                       (filters by kind)
//! ```
//!
//! The driver is the only task that closes the event channel, by dropping its
//! `Registration`. The consumer notices completion only through that closure
//! and then drops the output sender, which ends the caller's stream. Both
//! tasks stop promptly once the operation context is cancelled.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use cr_telemetry::{log_cid_event, log_peer_event, ActiveQueryGuard, QUERY_EVENTS, RESULTS_STREAMED};
use futures::stream::{BoxStream, Stream, StreamExt};
use shared_bus::{EventFilter, EventReceiver, QueryContext, QueryEvent, QueryEventRegistry, QueryEventType, Registration};
use shared_types::{Cid, Multiaddr, PeerId, PeerInfo};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::ports::DhtRouting;

/// Pull side of a running lookup.
///
/// Yields results in the order the lookup produced them and ends once the
/// lookup is finished, has failed or was cancelled. Dropping the stream
/// stops the lookup's consumer.
#[derive(Debug)]
pub struct ResultStream<T> {
    receiver: mpsc::Receiver<T>,
    terminated: bool,
}

impl<T> ResultStream<T> {
    fn new(receiver: mpsc::Receiver<T>) -> Self {
        Self {
            receiver,
            terminated: false,
        }
    }

    /// Next result, or `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<T> {
        if self.terminated {
            return None;
        }
        let item = self.receiver.recv().await;
        self.terminated = item.is_none();
        item
    }

    /// Whether the end of the stream has been observed.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl<T> Stream for ResultStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        if self.terminated {
            return Poll::Ready(None);
        }
        let polled = self.receiver.poll_recv(cx);
        if let Poll::Ready(None) = polled {
            self.terminated = true;
        }
        polled
    }
}

fn kind_label(kind: QueryEventType) -> &'static str {
    match kind {
        QueryEventType::SendingQuery => "sending_query",
        QueryEventType::PeerResponse => "peer_response",
        QueryEventType::FinalPeer => "final_peer",
        QueryEventType::Provider => "provider",
        QueryEventType::QueryError => "query_error",
    }
}

/// Start a peer lookup and return the stream of the peer's addresses.
pub(crate) fn spawn_find_peer(
    registry: &Arc<QueryEventRegistry>,
    ctx: &QueryContext,
    dht: Arc<dyn DhtRouting>,
    peer: PeerId,
    output_capacity: usize,
) -> ResultStream<Multiaddr> {
    let (op_ctx, registration, events) = registry.register(ctx);
    let (output, receiver) = mpsc::channel(output_capacity.max(1));

    log_peer_event!(info, "find_peer", "Lookup started", peer);
    tokio::spawn(forward_results(
        op_ctx.clone(),
        events,
        output,
        QueryEventType::FinalPeer,
        |info: &PeerInfo| info.addrs.clone(),
        "find_peer",
    ));
    tokio::spawn(drive_find_peer(
        Arc::clone(registry),
        op_ctx,
        registration,
        dht,
        peer,
    ));

    ResultStream::new(receiver)
}

/// Start a provider lookup for `cid` and return the stream of provider ids.
pub(crate) fn spawn_find_providers(
    registry: &Arc<QueryEventRegistry>,
    ctx: &QueryContext,
    dht: Arc<dyn DhtRouting>,
    cid: Cid,
    limit: usize,
    output_capacity: usize,
) -> ResultStream<PeerId> {
    let (op_ctx, registration, events) = registry.register(ctx);
    let (output, receiver) = mpsc::channel(output_capacity.max(1));

    log_cid_event!(info, "find_providers", "Lookup started", cid, limit);
    let providers = dht.find_providers_async(&op_ctx, cid, limit);
    tokio::spawn(forward_results(
        op_ctx.clone(),
        events,
        output,
        QueryEventType::Provider,
        |info: &PeerInfo| vec![info.id],
        "find_providers",
    ));
    tokio::spawn(drive_find_providers(
        Arc::clone(registry),
        op_ctx,
        registration,
        providers,
    ));

    ResultStream::new(receiver)
}

async fn drive_find_peer(
    registry: Arc<QueryEventRegistry>,
    ctx: QueryContext,
    registration: Registration,
    dht: Arc<dyn DhtRouting>,
    peer: PeerId,
) {
    let _active = ActiveQueryGuard::enter();

    let outcome = tokio::select! {
        biased;
        () = ctx.cancelled() => None,
        found = dht.find_peer(&ctx, peer) => Some(found),
    };

    match outcome {
        Some(Ok(info)) => {
            log_peer_event!(debug, "find_peer", "Peer resolved", peer, addrs = info.addrs.len());
            registry.publish(&ctx, QueryEvent::final_peer(info)).await;
        }
        Some(Err(e)) => {
            registry.publish(&ctx, QueryEvent::query_error(e.to_string())).await;
        }
        None => log_peer_event!(debug, "find_peer", "Peer lookup cancelled", peer),
    }

    registration.close();
}

async fn drive_find_providers(
    registry: Arc<QueryEventRegistry>,
    ctx: QueryContext,
    registration: Registration,
    mut providers: BoxStream<'static, PeerInfo>,
) {
    let _active = ActiveQueryGuard::enter();
    let mut found = 0usize;

    loop {
        let next = tokio::select! {
            biased;
            () = ctx.cancelled() => None,
            next = providers.next() => next,
        };
        let Some(provider) = next else {
            break;
        };
        if !registry.publish(&ctx, QueryEvent::provider(provider)).await {
            break;
        }
        found += 1;
    }

    debug!(found, cancelled = ctx.is_cancelled(), "Provider search finished");
    registration.close();
}

/// Drain `events`, sending the results extracted from `wanted` events.
///
/// Only `wanted` and `QueryError` events reach this loop; progress events
/// are discarded by the receiver's filter. Returns when the event channel
/// closes, the caller drops its stream, or the context is cancelled during a
/// send. Dropping `output` ends the stream.
async fn forward_results<T, F>(
    ctx: QueryContext,
    events: EventReceiver,
    output: mpsc::Sender<T>,
    wanted: QueryEventType,
    extract: F,
    operation: &'static str,
) where
    T: Send + 'static,
    F: Fn(&PeerInfo) -> Vec<T> + Send + 'static,
{
    let mut events = events.with_filter(EventFilter::kinds(vec![wanted, QueryEventType::QueryError]));
    let mut streamed = 0usize;

    while let Some(event) = events.recv().await {
        QUERY_EVENTS.with_label_values(&[kind_label(event.event_type)]).inc();

        if event.event_type == QueryEventType::QueryError {
            warn!(operation, error = %event.extra, "Routing query failed");
            continue;
        }

        for response in &event.responses {
            for item in extract(response) {
                tokio::select! {
                    biased;
                    () = ctx.cancelled() => {
                        debug!(operation, streamed, "Result stream cancelled");
                        return;
                    }
                    sent = output.send(item) => {
                        if sent.is_err() {
                            debug!(operation, streamed, "Result stream dropped by caller");
                            return;
                        }
                        streamed += 1;
                        RESULTS_STREAMED.with_label_values(&[operation]).inc();
                    }
                }
            }
        }
    }

    info!(operation, streamed, "Lookup finished");
}
