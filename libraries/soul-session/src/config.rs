//! Session configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Auto-advances tolerated inside one window (default: 5)
    pub max_auto_advances: usize,

    /// Sliding window for counting auto-advances, in ms (default: 2000)
    pub auto_advance_window_ms: u64,

    /// Buffered events per subscriber before it starts lagging (default: 256)
    pub event_capacity: usize,

    /// Client allowed to browse the library (default: "soul-player")
    pub trusted_client: String,
}

impl SessionConfig {
    pub fn auto_advance_window(&self) -> Duration {
        Duration::from_millis(self.auto_advance_window_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_auto_advances: 5,
            auto_advance_window_ms: 2000,
            event_capacity: 256,
            trusted_client: "soul-player".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.max_auto_advances, 5);
        assert_eq!(config.auto_advance_window(), Duration::from_secs(2));
        assert_eq!(config.event_capacity, 256);
        assert_eq!(config.trusted_client, "soul-player");
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{ "max_auto_advances": 2 }"#).unwrap();
        assert_eq!(config.max_auto_advances, 2);
        assert_eq!(config.auto_advance_window_ms, 2000);
    }
}
