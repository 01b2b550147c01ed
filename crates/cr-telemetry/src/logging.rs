//! Structured log macros.
//!
//! Every content-routing log line about a specific identifier or peer carries
//! the same field names, so log queries can join on them:
//! - `operation`: `find_peer`, `find_providers` or `provide`
//! - `cid`: content identifier
//! - `peer_id`: peer identity

/// Log an event about a content identifier.
#[macro_export]
macro_rules! log_cid_event {
    ($level:ident, $operation:expr, $msg:expr, $cid:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            operation = $operation,
            cid = %$cid,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log an event about a peer.
#[macro_export]
macro_rules! log_peer_event {
    ($level:ident, $operation:expr, $msg:expr, $peer_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            operation = $operation,
            peer_id = %$peer_id,
            $($($field)*,)?
            $msg
        )
    };
}
