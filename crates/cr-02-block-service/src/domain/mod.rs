//! # Domain Module
//!
//! Error types for the block service.

pub mod errors;

pub use errors::*;
