//! # Shared Types Crate
//!
//! Content-addressing primitives used across the content-routing workspace.
//!
//! ## Design Principles
//!
//! - **Structural identity**: two `Cid`s are equal iff codec and digest match.
//!   No ordering is defined; collections that need one keep insertion order.
//! - **Opaque addresses**: `Multiaddr` is carried verbatim. Encoding and
//!   transport semantics belong to the transport layer.
//! - **Read-only records**: `PeerInfo` and `Block` are never mutated after
//!   construction.

pub mod entities;
pub mod errors;
pub mod path;

pub use entities::*;
pub use errors::*;
pub use path::ContentPath;
