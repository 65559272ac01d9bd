//! The response dispatcher.
//!
//! One [`Dispatcher`] instance owns all process-wide mutable state (poke
//! buckets, aircon states) and evaluates handlers in a fixed priority
//! order per inbound event:
//!
//! 1. **Poke reaction** — `Poke` events targeting the bot. Rate limited by
//!    the per-group token bucket with escalating cost tiers: a cost-3
//!    acquire buys the soft reply, the cost-1 fallback the annoyed one,
//!    and an exhausted bucket drops the poke silently.
//! 2. **Mention reaction** — group messages that @-mention the bot with no
//!    further content get one of four fixed replies, chosen uniformly.
//! 3. **Aircon commands** — `空调开` / `空调关` / `群温度` /
//!    `设置温度<digits>` drive the per-group aircon state.
//!
//! The first handler that claims the event sends a reply and stops the
//! chain. A claim by the poke handler leaves [`DispatchOutcome::block_propagation`]
//! unset — a poke is a passive notice and must not suppress unrelated
//! downstream handlers — while the two message handlers set it.
//!
//! Handlers 1 and 2 sleep for one second before acting, modeling a
//! human-like reaction latency. The sleep suspends only the task driving
//! that event; events for other groups proceed concurrently.

use std::time::Duration;

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::aircon::{AirconCommand, AirconStore, status_reply};
use crate::bot::BoxedGroupBot;
use crate::model::event::{InboundEvent, RawEvent, classify};
use crate::model::message::strip_leading_mention;
use crate::rate_limit::PokeLimiter;

/// Delay before the poke and mention reactions act.
pub const REACTION_DELAY: Duration = Duration::from_secs(1);

/// Token cost of the first-tier poke reply.
const POKE_COST_SOFT: f64 = 3.0;
/// Token cost of the fallback poke reply.
const POKE_COST_ANNOYED: f64 = 1.0;

const POKE_REPLY_SOFT: &str = "请不要戳我 >_<";
const POKE_REPLY_ANNOYED: &str = "喂(#`O′) 戳我干嘛！";

/// Fixed reply pool for a bare mention.
const CALL_NAME_REPLIES: [&str; 4] = [
    "在此，有何贵干~",
    "(っ●ω●)っ在~",
    "这里是我(っ●ω●)っ",
    "不在呢~",
];

/// The result of dispatching one event.
///
/// `claimed` says a handler reacted (and replied, send failures aside);
/// `block_propagation` says whether handlers outside this responder
/// should be suppressed as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Whether any handler claimed the event.
    pub claimed: bool,
    /// Whether downstream propagation should stop.
    pub block_propagation: bool,
}

impl DispatchOutcome {
    /// No handler reacted; the event flows on untouched.
    pub const PASS: Self = Self {
        claimed: false,
        block_propagation: false,
    };

    const fn claimed(block_propagation: bool) -> Self {
        Self {
            claimed: true,
            block_propagation,
        }
    }

    /// True when the event was claimed by a propagation-blocking handler.
    pub fn should_stop(&self) -> bool {
        self.claimed && self.block_propagation
    }
}

/// The reactive response dispatcher.
///
/// `Send + Sync`; share one instance behind an `Arc` and call
/// [`dispatch`](Dispatcher::dispatch) from one task per inbound event.
pub struct Dispatcher {
    bot: BoxedGroupBot,
    poke_limiter: PokeLimiter,
    aircon: AirconStore,
    rng: Mutex<SmallRng>,
}

impl Dispatcher {
    /// Creates a dispatcher with entropy-seeded reply selection.
    pub fn new(bot: BoxedGroupBot) -> Self {
        Self::with_rng(bot, SmallRng::from_entropy())
    }

    /// Creates a dispatcher with a deterministic reply selection seed.
    pub fn with_rng_seed(bot: BoxedGroupBot, seed: u64) -> Self {
        Self::with_rng(bot, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(bot: BoxedGroupBot, rng: SmallRng) -> Self {
        Self {
            bot,
            poke_limiter: PokeLimiter::new(),
            aircon: AirconStore::new(),
            rng: Mutex::new(rng),
        }
    }

    /// Classifies a raw payload and runs the handler chain.
    pub async fn dispatch(&self, raw: &RawEvent) -> DispatchOutcome {
        match classify(raw, self.bot.self_id()) {
            InboundEvent::Poke {
                group_id,
                target_id,
            } => {
                if self.handle_poke(group_id, target_id).await {
                    // A poke never co-occurs with command text; its claim
                    // must not suppress downstream handlers.
                    return DispatchOutcome::claimed(false);
                }
                DispatchOutcome::PASS
            }
            InboundEvent::GroupMessage {
                group_id,
                text,
                mentions_bot,
                message,
            } => {
                if self.handle_mention(group_id, &text, mentions_bot, &message).await {
                    return DispatchOutcome::claimed(true);
                }
                if self.handle_aircon(group_id, &text).await {
                    return DispatchOutcome::claimed(true);
                }
                DispatchOutcome::PASS
            }
            InboundEvent::Unclassified => DispatchOutcome::PASS,
        }
    }

    /// Handler A: reacts to pokes aimed at the bot, rate limited per group.
    async fn handle_poke(&self, group_id: i64, target_id: Option<i64>) -> bool {
        if target_id.is_some_and(|target| target != self.bot.self_id()) {
            debug!(group_id, ?target_id, "poke targets someone else, ignoring");
            return false;
        }

        sleep(REACTION_DELAY).await;

        if self.poke_limiter.acquire(group_id, POKE_COST_SOFT) {
            self.send(group_id, POKE_REPLY_SOFT).await;
            return true;
        }
        if self.poke_limiter.acquire(group_id, POKE_COST_ANNOYED) {
            self.send(group_id, POKE_REPLY_ANNOYED).await;
            return true;
        }

        // Backpressure policy: excess pokes are dropped, not queued.
        debug!(group_id, "poke bucket exhausted, staying silent");
        false
    }

    /// Handler B: replies when the bot is mentioned with no further content.
    async fn handle_mention(
        &self,
        group_id: i64,
        text: &str,
        mentions_bot: bool,
        message: &Value,
    ) -> bool {
        if !mentions_bot {
            return false;
        }
        if !strip_leading_mention(message, self.bot.self_id(), text).is_empty() {
            return false;
        }

        sleep(REACTION_DELAY).await;

        let reply = {
            let mut rng = self.rng.lock();
            CALL_NAME_REPLIES[rng.gen_range(0..CALL_NAME_REPLIES.len())]
        };
        self.send(group_id, reply).await;
        true
    }

    /// Handler C: drives the per-group aircon state machine.
    async fn handle_aircon(&self, group_id: i64, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(command) = AirconCommand::parse(text) else {
            return false;
        };

        let reply = match command {
            AirconCommand::On => {
                self.aircon.set_enabled(group_id, true);
                "❄️哔~".to_string()
            }
            AirconCommand::Off => {
                self.aircon.set_enabled(group_id, false);
                "💤哔~".to_string()
            }
            AirconCommand::Query => {
                let temperature = self.aircon.temperature(group_id);
                status_reply(self.aircon.is_enabled(group_id), temperature)
            }
            AirconCommand::SetTemp(temperature) => {
                let temperature = self.aircon.set_temperature(group_id, temperature);
                status_reply(self.aircon.is_enabled(group_id), temperature)
            }
        };

        self.send(group_id, &reply).await;
        true
    }

    /// Fire-and-forget send. Failures are logged, never retried; state
    /// already mutated (tokens consumed, aircon switched) stays mutated.
    async fn send(&self, group_id: i64, message: &str) {
        if let Err(err) = self.bot.send_group_msg(group_id, message).await {
            warn!(group_id, error = %err, "failed to send group message");
        }
    }
}
