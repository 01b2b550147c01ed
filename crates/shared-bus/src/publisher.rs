//! # Query Event Registry
//!
//! The publishing side of the bus: maps operation ids to their event channels.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::context::{OperationId, QueryContext};
use crate::events::QueryEvent;
use crate::subscriber::EventReceiver;
use crate::DEFAULT_CHANNEL_CAPACITY;

type ChannelMap = Arc<RwLock<HashMap<OperationId, mpsc::Sender<QueryEvent>>>>;

/// Registry of in-flight query operations.
///
/// Holds the only long-lived sender of every registered channel. Removing an
/// entry drops that sender, which is what closes the subscriber's channel.
pub struct QueryEventRegistry {
    /// Sender per registered operation.
    channels: ChannelMap,

    /// Total events delivered.
    events_published: AtomicU64,

    /// Per-operation channel capacity.
    capacity: usize,
}

impl QueryEventRegistry {
    /// Create a registry with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a registry whose channels buffer `capacity` events.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Register a new operation derived from `ctx`.
    ///
    /// Returns the operation's context, the registration handle the driver
    /// task must own, and the receiving end for the consumer task.
    pub fn register(&self, ctx: &QueryContext) -> (QueryContext, Registration, EventReceiver) {
        let operation = OperationId::new();
        let (sender, receiver) = mpsc::channel(self.capacity);

        self.channels.write().insert(operation, sender);
        debug!(operation = %operation, "Query operation registered");

        let registration = Registration {
            operation,
            channels: Arc::clone(&self.channels),
        };
        (
            ctx.registered(operation),
            registration,
            EventReceiver::new(receiver, operation),
        )
    }

    /// Publish `event` to the operation `ctx` belongs to.
    ///
    /// Waits while the subscriber's buffer is full. Returns `false` without
    /// delivering when the context is unregistered, its registration is gone,
    /// the subscriber went away, or the context is cancelled.
    pub async fn publish(&self, ctx: &QueryContext, event: QueryEvent) -> bool {
        let Some(operation) = ctx.operation_id() else {
            trace!("Publish on unregistered context ignored");
            return false;
        };

        // Clone the sender so no lock is held across the await below.
        let Some(sender) = self.channels.read().get(&operation).cloned() else {
            trace!(operation = %operation, "Publish on closed operation ignored");
            return false;
        };

        let kind = event.event_type;
        tokio::select! {
            biased;
            () = ctx.cancelled() => {
                debug!(operation = %operation, kind = ?kind, "Publish abandoned (cancelled)");
                false
            }
            sent = sender.send(event) => match sent {
                Ok(()) => {
                    self.events_published.fetch_add(1, Ordering::Relaxed);
                    trace!(operation = %operation, kind = ?kind, "Query event published");
                    true
                }
                Err(_) => {
                    debug!(operation = %operation, kind = ?kind, "Publish dropped (subscriber gone)");
                    false
                }
            },
        }
    }

    /// Number of operations currently registered.
    #[must_use]
    pub fn active_operations(&self) -> usize {
        self.channels.read().len()
    }

    /// Total events delivered to subscribers.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Per-operation channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for QueryEventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Ownership of one registered operation's channel.
///
/// Dropping it removes the registry entry, closing the channel once any
/// in-flight publish finishes. Removal happens exactly once.
pub struct Registration {
    operation: OperationId,
    channels: ChannelMap,
}

impl Registration {
    /// The registered operation.
    #[must_use]
    pub fn operation_id(&self) -> OperationId {
        self.operation
    }

    /// Close the channel now.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if self.channels.write().remove(&self.operation).is_some() {
            debug!(operation = %self.operation, "Query operation closed");
        }
    }
}
