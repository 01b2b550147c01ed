//! # Content Paths
//!
//! A path names content as a root identifier followed by zero or more link
//! names: `/ipfs/<cid>/docs/readme`. A bare `<cid>` is accepted as well.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::Cid;
use crate::errors::PathError;

/// Namespace prefix for immutable content paths.
pub const IPFS_NAMESPACE: &str = "ipfs";

/// A root `Cid` plus the link names to follow from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentPath {
    root: Cid,
    segments: Vec<String>,
}

impl ContentPath {
    /// A path that names `root` itself.
    #[must_use]
    pub fn new(root: Cid) -> Self {
        Self {
            root,
            segments: Vec::new(),
        }
    }

    /// Append a link name.
    #[must_use]
    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// The root identifier.
    #[must_use]
    pub fn root(&self) -> &Cid {
        &self.root
    }

    /// Link names after the root.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when the path names its root directly.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<Cid> for ContentPath {
    fn from(root: Cid) -> Self {
        Self::new(root)
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", IPFS_NAMESPACE, self.root)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ContentPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PathError::Empty);
        }

        let mut parts = s.split('/').filter(|p| !p.is_empty());
        if s.starts_with('/') {
            match parts.next() {
                Some(IPFS_NAMESPACE) => {}
                Some(other) => return Err(PathError::UnsupportedNamespace(other.to_string())),
                None => return Err(PathError::Empty),
            }
        }

        let root = parts.next().ok_or(PathError::Empty)?.parse::<Cid>()?;
        Ok(Self {
            root,
            segments: parts.map(str::to_string).collect(),
        })
    }
}
