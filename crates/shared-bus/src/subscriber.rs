//! # Event Receiver
//!
//! The subscribing side of one registered operation.

use tokio::sync::mpsc;
use tracing::trace;

use crate::context::OperationId;
use crate::events::{EventFilter, QueryEvent};

/// Receiving end of one operation's event channel.
///
/// Completion is detected only by the channel closing, which happens when
/// the driver task drops its `Registration`.
pub struct EventReceiver {
    receiver: mpsc::Receiver<QueryEvent>,
    operation: OperationId,
    filter: EventFilter,
}

impl EventReceiver {
    pub(crate) fn new(receiver: mpsc::Receiver<QueryEvent>, operation: OperationId) -> Self {
        Self {
            receiver,
            operation,
            filter: EventFilter::all(),
        }
    }

    /// Only yield events accepted by `filter`; others are discarded.
    #[must_use]
    pub fn with_filter(mut self, filter: EventFilter) -> Self {
        self.filter = filter;
        self
    }

    /// The operation this receiver belongs to.
    #[must_use]
    pub fn operation_id(&self) -> OperationId {
        self.operation
    }

    /// The active filter.
    #[must_use]
    pub fn event_filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Receive the next matching event.
    ///
    /// # Returns
    ///
    /// - `Some(event)` - The next matching event, in publish order
    /// - `None` - The registration was closed and the buffer is empty
    pub async fn recv(&mut self) -> Option<QueryEvent> {
        loop {
            let event = self.receiver.recv().await?;
            if self.filter.matches(&event) {
                return Some(event);
            }
            trace!(operation = %self.operation, kind = ?event.event_type, "Event filtered out");
        }
    }
}
