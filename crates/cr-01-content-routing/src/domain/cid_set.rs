//! # CID Set
//!
//! Duplicate-free collection of content identifiers that remembers the order
//! in which identifiers were first added.

use std::collections::HashSet;

use shared_types::Cid;

/// Insertion-ordered set of [`Cid`]s.
///
/// Owned by exactly one operation; not shared across tasks.
#[derive(Debug, Clone, Default)]
pub struct CidSet {
    members: HashSet<Cid>,
    order: Vec<Cid>,
}

impl CidSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `cid` is a member.
    #[must_use]
    pub fn has(&self, cid: &Cid) -> bool {
        self.members.contains(cid)
    }

    /// Insert `cid`. Adding an existing member changes nothing.
    pub fn add(&mut self, cid: Cid) {
        self.visit(cid);
    }

    /// Insert `cid` if absent.
    ///
    /// Returns `true` when `cid` was newly added, which is the signal a
    /// traversal uses to decide whether to descend into it.
    pub fn visit(&mut self, cid: Cid) -> bool {
        if self.members.insert(cid) {
            self.order.push(cid);
            true
        } else {
            false
        }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Members in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Cid> + '_ {
        self.order.iter()
    }

    /// Members in first-insertion order, copied out.
    #[must_use]
    pub fn keys(&self) -> Vec<Cid> {
        self.order.clone()
    }
}

impl FromIterator<Cid> for CidSet {
    fn from_iter<I: IntoIterator<Item = Cid>>(iter: I) -> Self {
        let mut set = Self::new();
        for cid in iter {
            set.add(cid);
        }
        set
    }
}

impl IntoIterator for CidSet {
    type Item = Cid;
    type IntoIter = std::vec::IntoIter<Cid>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}
