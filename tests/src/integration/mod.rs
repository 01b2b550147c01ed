//! Cross-crate integration flows.

mod cancellation;
mod flows;
