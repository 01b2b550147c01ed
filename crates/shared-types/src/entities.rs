//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Content**: `Cid`, `Codec`, `Block`, `Link`
//! - **Networking**: `PeerId`, `Multiaddr`, `PeerInfo`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{CidError, MultiaddrError};

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

// =============================================================================
// CLUSTER A: CONTENT
// =============================================================================

/// Content encoding of the data a `Cid` addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Codec {
    /// Opaque bytes with no links.
    Raw,
    /// Protobuf-encoded DAG node.
    DagProtobuf,
    /// CBOR-encoded DAG node.
    DagCbor,
}

impl Codec {
    /// Multicodec table code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Raw => 0x55,
            Self::DagProtobuf => 0x70,
            Self::DagCbor => 0x71,
        }
    }

    /// Look up a codec by its table code.
    pub fn from_code(code: u8) -> Result<Self, CidError> {
        match code {
            0x55 => Ok(Self::Raw),
            0x70 => Ok(Self::DagProtobuf),
            0x71 => Ok(Self::DagCbor),
            other => Err(CidError::UnknownCodec(other)),
        }
    }
}

/// Content identifier.
///
/// Addresses either a raw block or a DAG node. Equality and hashing are
/// structural: the same codec and digest always produce the same `Cid`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cid {
    codec: Codec,
    hash: Hash,
}

impl Cid {
    /// The only identifier version produced and accepted.
    pub const VERSION: u8 = 1;

    /// Length of the binary form: version, codec, digest.
    pub const ENCODED_LEN: usize = 2 + 32;

    /// Build a `Cid` from an existing digest.
    #[must_use]
    pub const fn new(codec: Codec, hash: Hash) -> Self {
        Self { codec, hash }
    }

    /// Hash `data` with SHA-256 and address it under `codec`.
    #[must_use]
    pub fn from_data(codec: Codec, data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        Self { codec, hash }
    }

    /// The content codec.
    #[must_use]
    pub const fn codec(&self) -> Codec {
        self.codec
    }

    /// The SHA-256 digest.
    #[must_use]
    pub const fn hash(&self) -> &Hash {
        &self.hash
    }

    /// Binary form: `[version, codec, digest..]`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::ENCODED_LEN);
        out.push(Self::VERSION);
        out.push(self.codec.code());
        out.extend_from_slice(&self.hash);
        out
    }

    /// Parse the binary form produced by [`Cid::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CidError> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(CidError::InvalidLength { got: bytes.len() });
        }
        if bytes[0] != Self::VERSION {
            return Err(CidError::UnsupportedVersion(bytes[0]));
        }
        let codec = Codec::from_code(bytes[1])?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..]);
        Ok(Self { codec, hash })
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({:?}, {})", self.codec, hex::encode(&self.hash[..6]))
    }
}

impl FromStr for Cid {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| CidError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }
}

/// A named link from one DAG node to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link name, used by path resolution. May be empty.
    pub name: String,
    /// Target of the link.
    pub cid: Cid,
    /// Cumulative size of the target subtree in bytes, if known.
    pub size: u64,
}

impl Link {
    /// Create an unnamed link.
    #[must_use]
    pub fn unnamed(cid: Cid) -> Self {
        Self {
            name: String::new(),
            cid,
            size: 0,
        }
    }

    /// Create a named link.
    #[must_use]
    pub fn named(name: impl Into<String>, cid: Cid) -> Self {
        Self {
            name: name.into(),
            cid,
            size: 0,
        }
    }
}

/// A block of data together with its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    cid: Cid,
    data: Vec<u8>,
}

impl Block {
    /// Address `data` as a raw block.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_codec(Codec::Raw, data)
    }

    /// Address `data` under the given codec.
    #[must_use]
    pub fn with_codec(codec: Codec, data: Vec<u8>) -> Self {
        let cid = Cid::from_data(codec, &data);
        Self { cid, data }
    }

    /// The block's identifier.
    #[must_use]
    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    /// The raw bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

// =============================================================================
// CLUSTER B: NETWORKING
// =============================================================================

/// Unique identifier for a peer in the network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PeerId(pub [u8; 32]);

impl PeerId {
    /// Wrap raw identity bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw identity bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", hex::encode(&self.0[..6]))
    }
}

/// A self-describing network address, e.g. `/ip4/10.0.0.1/tcp/4001`.
///
/// Carried verbatim; only the leading `/` is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Multiaddr(String);

impl Multiaddr {
    /// Validate and wrap an address string.
    pub fn new(addr: impl Into<String>) -> Result<Self, MultiaddrError> {
        let addr = addr.into();
        if addr.len() < 2 || !addr.starts_with('/') {
            return Err(MultiaddrError::Invalid(addr));
        }
        Ok(Self(addr))
    }

    /// The address text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Multiaddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Multiaddr {
    type Err = MultiaddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A peer identity plus every address it is known to listen on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    /// The peer's identity.
    pub id: PeerId,
    /// Known network addresses.
    pub addrs: Vec<Multiaddr>,
}

impl PeerInfo {
    /// A peer with no known addresses.
    #[must_use]
    pub fn new(id: PeerId) -> Self {
        Self {
            id,
            addrs: Vec::new(),
        }
    }

    /// A peer with the given addresses.
    #[must_use]
    pub fn with_addrs(id: PeerId, addrs: Vec<Multiaddr>) -> Self {
        Self { id, addrs }
    }
}
