//! The simulated group "air conditioner".
//!
//! Each group owns an independent `{enabled, temperature}` state. The
//! temperature is not validated (any digit string the command pattern
//! matches is accepted) and materializes to [`DEFAULT_TEMPERATURE`] the
//! first time it is read or written while unset — not when the group
//! state is created. Turning the aircon off clears the temperature;
//! the switch itself persists for the process lifetime.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Temperature a group starts at when queried or set for the first time.
pub const DEFAULT_TEMPERATURE: i64 = 26;

/// Per-group aircon state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AirconState {
    /// Whether the aircon is running.
    pub enabled: bool,
    /// Configured temperature; `None` until first materialized.
    pub temperature: Option<i64>,
}

/// Per-group aircon states, created with defaults on first access.
#[derive(Debug, Default)]
pub struct AirconStore {
    groups: Mutex<HashMap<i64, AirconState>>,
}

impl AirconStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the aircon on or off. Switching off clears the
    /// temperature back to unset.
    pub fn set_enabled(&self, group_id: i64, enabled: bool) {
        let mut groups = self.groups.lock();
        let state = groups.entry(group_id).or_default();
        state.enabled = enabled;
        if !enabled {
            state.temperature = None;
        }
    }

    /// Whether the aircon is on for the group.
    pub fn is_enabled(&self, group_id: i64) -> bool {
        self.groups
            .lock()
            .get(&group_id)
            .is_some_and(|state| state.enabled)
    }

    /// Returns the group temperature, materializing the default first if
    /// the temperature is unset.
    pub fn temperature(&self, group_id: i64) -> i64 {
        let mut groups = self.groups.lock();
        let state = groups.entry(group_id).or_default();
        *state.temperature.get_or_insert(DEFAULT_TEMPERATURE)
    }

    /// Overwrites the group temperature and returns the new value.
    pub fn set_temperature(&self, group_id: i64, temperature: i64) -> i64 {
        let mut groups = self.groups.lock();
        let state = groups.entry(group_id).or_default();
        // Materialize-then-overwrite, matching the lazy-default contract.
        state.temperature.get_or_insert(DEFAULT_TEMPERATURE);
        state.temperature = Some(temperature);
        temperature
    }

    /// Copy of the group's current state.
    pub fn snapshot(&self, group_id: i64) -> AirconState {
        self.groups
            .lock()
            .get(&group_id)
            .copied()
            .unwrap_or_default()
    }
}

/// A parsed aircon command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirconCommand {
    /// `空调开` — switch on.
    On,
    /// `空调关` — switch off, resetting the temperature.
    Off,
    /// `群温度` — report the current state.
    Query,
    /// `设置温度<digits>` — set the temperature.
    SetTemp(i64),
}

impl AirconCommand {
    /// Parses trimmed message text into a command.
    ///
    /// The set-temperature form accepts one or more ASCII digits and
    /// nothing else after the prefix; a value that overflows `i64` is
    /// treated as not matching. Any other text returns `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "空调开" => Some(Self::On),
            "空调关" => Some(Self::Off),
            "群温度" => Some(Self::Query),
            _ => {
                let digits = text.strip_prefix("设置温度")?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse().ok().map(Self::SetTemp)
            }
        }
    }
}

/// Formats the two-line status reply.
pub fn status_reply(enabled: bool, temperature: i64) -> String {
    if enabled {
        format!("❄️风速中\n群温度 {temperature}℃")
    } else {
        format!("💤\n群温度 {temperature}℃")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_commands() {
        assert_eq!(AirconCommand::parse("空调开"), Some(AirconCommand::On));
        assert_eq!(AirconCommand::parse("空调关"), Some(AirconCommand::Off));
        assert_eq!(AirconCommand::parse("群温度"), Some(AirconCommand::Query));
        assert_eq!(
            AirconCommand::parse("设置温度18"),
            Some(AirconCommand::SetTemp(18))
        );
    }

    #[test]
    fn test_parse_rejects_near_misses() {
        assert_eq!(AirconCommand::parse("空调开了"), None);
        assert_eq!(AirconCommand::parse("设置温度"), None);
        assert_eq!(AirconCommand::parse("设置温度abc"), None);
        assert_eq!(AirconCommand::parse("设置温度18度"), None);
        assert_eq!(AirconCommand::parse("设置温度-5"), None);
        assert_eq!(AirconCommand::parse("请设置温度18"), None);
        assert_eq!(AirconCommand::parse(""), None);
    }

    #[test]
    fn test_parse_overflow_declines() {
        assert_eq!(AirconCommand::parse("设置温度99999999999999999999"), None);
    }

    #[test]
    fn test_temperature_materializes_lazily() {
        let store = AirconStore::new();
        store.set_enabled(100, true);
        // Enabling alone does not materialize the temperature.
        assert_eq!(store.snapshot(100).temperature, None);
        // First read does.
        assert_eq!(store.temperature(100), DEFAULT_TEMPERATURE);
        assert_eq!(store.snapshot(100).temperature, Some(DEFAULT_TEMPERATURE));
    }

    #[test]
    fn test_query_is_idempotent() {
        let store = AirconStore::new();
        assert_eq!(store.temperature(100), store.temperature(100));
    }

    #[test]
    fn test_set_then_query_round_trip() {
        let store = AirconStore::new();
        assert_eq!(store.set_temperature(100, 37), 37);
        assert_eq!(store.temperature(100), 37);
    }

    #[test]
    fn test_disable_clears_temperature() {
        let store = AirconStore::new();
        store.set_enabled(100, true);
        store.set_temperature(100, 18);
        store.set_enabled(100, false);

        let state = store.snapshot(100);
        assert!(!state.enabled);
        assert_eq!(state.temperature, None);
        // The next query falls back to the default.
        assert_eq!(store.temperature(100), DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_groups_are_independent() {
        let store = AirconStore::new();
        store.set_enabled(1, true);
        store.set_temperature(1, 16);
        assert!(!store.is_enabled(2));
        assert_eq!(store.temperature(2), DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_status_reply_phrasing() {
        assert_eq!(status_reply(true, 26), "❄️风速中\n群温度 26℃");
        assert_eq!(status_reply(false, 18), "💤\n群温度 18℃");
    }
}
