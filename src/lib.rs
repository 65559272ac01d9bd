//! Reactive responder for OneBot v11 group chats.
//!
//! The crate inspects inbound platform events (group messages and "poke"
//! notify notices) and emits scripted replies through an abstract
//! [`GroupBot`] collaborator. Two pieces of per-group state persist across
//! events:
//!
//! - a continuous token bucket bounding how often the poke reaction fires
//!   ([`rate_limit`]),
//! - a small on/off + temperature state machine for the simulated group
//!   "air conditioner" ([`aircon`]).
//!
//! # Event flow
//!
//! ```text
//! raw payload ──▶ classify() ──▶ Dispatcher
//!                                  ├── poke reaction      (non-blocking claim)
//!                                  ├── mention reaction   (blocking claim)
//!                                  └── aircon commands    (blocking claim)
//! ```
//!
//! Handlers are tried in that fixed order; the first one that claims the
//! event sends a reply and stops the chain. The [`DispatchOutcome`] tells
//! the surrounding runtime whether propagation to unrelated handlers should
//! also stop.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cascade_chat::{Dispatcher, RawEvent};
//!
//! let dispatcher = Dispatcher::new(bot);
//! let raw = RawEvent::from_json_str(payload)?;
//! let outcome = dispatcher.dispatch(&raw).await;
//! if outcome.should_stop() {
//!     return;
//! }
//! ```
//!
//! Replies are fire-and-forget: a failed send is logged and never retried,
//! and rate-limit tokens consumed before the failure are not refunded.

pub mod aircon;
pub mod bot;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod rate_limit;

pub use aircon::{AirconCommand, AirconState, AirconStore, DEFAULT_TEMPERATURE};
pub use bot::{BoxedGroupBot, GroupBot};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::{ApiError, ApiResult};
pub use model::event::{InboundEvent, RawEvent, classify};
pub use rate_limit::{PokeLimiter, TokenBucket};
