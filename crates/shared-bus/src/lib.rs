//! # Shared Bus - Per-Operation Query Events
//!
//! Lets an in-flight routing operation publish typed progress events to the
//! one subscriber that started it.
//!
//! ## Registration Model
//!
//! ```text
//! ┌──────────────┐  register(ctx)   ┌────────────────────┐
//! │   Caller     │ ───────────────▶ │ QueryEventRegistry │
//! │              │ ◀─────────────── │  op-id → Sender    │
//! └──────────────┘ (ctx', reg, rx)  └────────────────────┘
//!        │                                   ▲
//!        │ ctx'                              │ publish(ctx', event)
//!        ▼                                   │
//! ┌──────────────┐                    ┌──────────────┐
//! │ Driver task  │ ──── owns reg ───▶ │ routing call │
//! └──────────────┘                    └──────────────┘
//! ```
//!
//! - Every `register` creates exactly one channel keyed by a fresh operation id.
//! - The driver task owns the `Registration`; dropping it closes the channel.
//! - `publish` on an unregistered, closed or cancelled context is a no-op.
//! - Operations never share channels, so concurrent queries cannot cross-talk.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod context;
pub mod events;
pub mod publisher;
pub mod subscriber;

pub use context::{OperationId, QueryContext};
pub use events::{EventFilter, QueryEvent, QueryEventType};
pub use publisher::{QueryEventRegistry, Registration};
pub use subscriber::EventReceiver;

/// Events buffered per operation before `publish` starts to wait.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;
