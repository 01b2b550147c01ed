//! # Error Types
//!
//! Parse errors for the shared primitives.

use thiserror::Error;

/// Errors decoding a content identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidError {
    /// The text form is not valid hex.
    #[error("Invalid CID: not a hex string")]
    InvalidHex,

    /// The binary form has the wrong length.
    #[error("Invalid CID length: {got} bytes")]
    InvalidLength { got: usize },

    /// Unknown identifier version.
    #[error("Unsupported CID version: {0}")]
    UnsupportedVersion(u8),

    /// Unknown codec table code.
    #[error("Unknown codec: 0x{0:02x}")]
    UnknownCodec(u8),
}

/// Errors parsing a network address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultiaddrError {
    /// The address is not a `/`-prefixed multiaddr.
    #[error("Invalid multiaddr: {0:?}")]
    Invalid(String),
}

/// Errors parsing a content path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Nothing to parse.
    #[error("Empty path")]
    Empty,

    /// The path uses a namespace other than `/ipfs/`.
    #[error("Unsupported path namespace: {0}")]
    UnsupportedNamespace(String),

    /// The root segment is not a CID.
    #[error("Invalid path root: {0}")]
    InvalidRoot(#[from] CidError),
}
