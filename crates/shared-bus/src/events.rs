//! # Query Events
//!
//! Progress events a routing operation publishes while it runs.

use serde::{Deserialize, Serialize};
use shared_types::{PeerId, PeerInfo};

/// Kind of a query event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryEventType {
    /// A query message was sent to a peer.
    SendingQuery,
    /// A peer answered with closer peers.
    PeerResponse,
    /// The lookup resolved the target peer.
    FinalPeer,
    /// A peer claims to provide the requested content.
    Provider,
    /// The lookup failed.
    QueryError,
}

/// One event published on an operation's channel.
///
/// Immutable after construction. `responses` carries peer records for
/// `FinalPeer`, `Provider` and `PeerResponse`; `extra` carries the error text
/// for `QueryError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEvent {
    /// The responding or queried peer, where known.
    pub id: Option<PeerId>,
    /// Event kind.
    pub event_type: QueryEventType,
    /// Peer records carried by the event.
    pub responses: Vec<PeerInfo>,
    /// Free-form detail (error description for `QueryError`).
    pub extra: String,
}

impl QueryEvent {
    /// The lookup resolved `peer`.
    #[must_use]
    pub fn final_peer(peer: PeerInfo) -> Self {
        Self {
            id: Some(peer.id),
            event_type: QueryEventType::FinalPeer,
            responses: vec![peer],
            extra: String::new(),
        }
    }

    /// `peer` claims to provide the content.
    #[must_use]
    pub fn provider(peer: PeerInfo) -> Self {
        Self {
            id: Some(peer.id),
            event_type: QueryEventType::Provider,
            responses: vec![peer],
            extra: String::new(),
        }
    }

    /// The lookup failed with `error`.
    #[must_use]
    pub fn query_error(error: impl Into<String>) -> Self {
        Self {
            id: None,
            event_type: QueryEventType::QueryError,
            responses: Vec::new(),
            extra: error.into(),
        }
    }

    /// A query was sent to `peer`.
    #[must_use]
    pub fn sending_query(peer: PeerId) -> Self {
        Self {
            id: Some(peer),
            event_type: QueryEventType::SendingQuery,
            responses: Vec::new(),
            extra: String::new(),
        }
    }

    /// `from` answered with `closer` peers.
    #[must_use]
    pub fn peer_response(from: PeerId, closer: Vec<PeerInfo>) -> Self {
        Self {
            id: Some(from),
            event_type: QueryEventType::PeerResponse,
            responses: closer,
            extra: String::new(),
        }
    }
}

/// Filter for receiving specific event kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Kinds to include. Empty means all kinds.
    pub kinds: Vec<QueryEventType>,
}

impl EventFilter {
    /// Accept every event.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept only the given kinds.
    #[must_use]
    pub fn kinds(kinds: Vec<QueryEventType>) -> Self {
        Self { kinds }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &QueryEvent) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&event.event_type)
    }
}
