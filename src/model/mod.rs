//! OneBot v11 payload model: raw events, classification, segment helpers.

pub mod event;
pub mod message;

pub use event::{InboundEvent, RawEvent, classify};
