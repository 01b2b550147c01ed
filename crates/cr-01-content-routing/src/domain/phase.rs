//! Progress of one `provide` call.

use std::fmt;

/// `Validating → (Announcing | Traversing → Announcing) → Done | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvidePhase {
    /// Checking routing, connectivity, path and local presence.
    Validating,
    /// Enumerating the DAG below the root.
    Traversing,
    /// Issuing announcements.
    Announcing,
    /// Every announcement succeeded.
    Done,
    /// A precondition, traversal or announcement failed.
    Failed,
}

impl ProvidePhase {
    /// Whether `next` may follow `self`.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        use ProvidePhase::*;
        matches!(
            (self, next),
            (Validating, Traversing)
                | (Validating, Announcing)
                | (Traversing, Announcing)
                | (Announcing, Done)
                | (Validating | Traversing | Announcing, Failed)
        )
    }

    /// Whether the call has finished.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for ProvidePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Traversing => "traversing",
            Self::Announcing => "announcing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
