//! The outbound collaborator seam.
//!
//! The dispatcher never talks to a transport directly; it sends replies
//! through the [`GroupBot`] trait. Concrete implementations wrap whatever
//! connection the surrounding runtime maintains (WebSocket, HTTP, ...);
//! tests use an in-memory mock that records sent messages.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ApiResult;

/// An active bot instance capable of sending group messages.
///
/// # Contract
///
/// - [`self_id`](GroupBot::self_id) is stable for the process lifetime.
/// - [`send_group_msg`](GroupBot::send_group_msg) is fire-and-forget from
///   the dispatcher's point of view: failures are logged by the caller and
///   never retried.
#[async_trait]
pub trait GroupBot: Send + Sync {
    /// Returns the bot's own platform user ID.
    fn self_id(&self) -> i64;

    /// Sends a plain-text message to a group.
    ///
    /// Returns the platform message ID on success.
    async fn send_group_msg(&self, group_id: i64, message: &str) -> ApiResult<i64>;
}

/// A shared, type-erased [`GroupBot`].
pub type BoxedGroupBot = Arc<dyn GroupBot>;
