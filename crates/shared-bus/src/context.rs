//! # Query Context
//!
//! The cancellation authority for one routing operation, plus the operation
//! id that `QueryEventRegistry::register` attaches to it.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use uuid::Uuid;

/// Identifier of one registered query operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(Uuid);

impl OperationId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Cancellable operation context.
///
/// Cloning shares the same token. [`QueryContext::child`] derives a context
/// that is cancelled with its parent but can also be cancelled on its own.
/// Derived contexts keep the parent's operation id, so publishes made deep
/// inside a routing backend still reach the registered subscriber.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    token: CancellationToken,
    operation: Option<OperationId>,
}

impl QueryContext {
    /// A fresh, unregistered, uncancelled context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing cancellation token.
    #[must_use]
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            operation: None,
        }
    }

    /// Derive a child context.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            operation: self.operation,
        }
    }

    /// Derive a child context that cancels itself after `timeout`.
    ///
    /// Spawns a timer task on the current tokio runtime. The timer exits as
    /// soon as the context is cancelled by any other means.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let ctx = self.child();
        let token = ctx.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(timeout) => token.cancel(),
                () = token.cancelled() => {}
            }
        });
        ctx
    }

    /// Cancel this context and every context derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the context is cancelled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// The underlying token.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The registered operation, if any.
    #[must_use]
    pub fn operation_id(&self) -> Option<OperationId> {
        self.operation
    }

    pub(crate) fn registered(&self, operation: OperationId) -> Self {
        Self {
            token: self.token.child_token(),
            operation: Some(operation),
        }
    }
}
