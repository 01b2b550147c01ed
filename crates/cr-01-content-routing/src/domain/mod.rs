//! # Domain Layer
//!
//! Pure types for content routing: errors, call options, the CID set and the
//! DAG traversal built on it.

pub mod cid_set;
pub mod errors;
pub mod options;
pub mod phase;
pub mod traversal;

pub use cid_set::CidSet;
pub use errors::{
    BlockstoreError, ConfigError, ContentRoutingError, DagError, ResolveError, RoutingError,
};
pub use options::{FindProvidersOptions, ProvideOptions, DEFAULT_NUM_PROVIDERS};
pub use phase::ProvidePhase;
pub use traversal::{enumerate_children_async, DEFAULT_TRAVERSAL_CONCURRENCY};
