//! # Ports
//!
//! - **Inbound**: [`DhtApi`], the operations this crate offers
//! - **Outbound**: routing, DAG, path resolution and connectivity
//!   dependencies the service is wired to

pub mod inbound;
pub mod outbound;

pub use inbound::DhtApi;
pub use outbound::{ContentRouting, DagService, DhtRouting, PathResolver, PeerHost, RoutingBackend};
