//! Virtual adapter configuration.

use serde::Deserialize;

/// Configuration for the simulated relay board and counters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Name used in logs and errors.
    pub board_name: String,
    /// Number of relays on the simulated board.
    pub relay_count: u8,
    /// Simulated flow counters.
    pub counters: Vec<VirtualCounterConfig>,
}

/// One simulated flow counter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VirtualCounterConfig {
    /// Counter id faucets reference.
    pub id: String,
    /// Constant flow reported by the counter.
    #[serde(default)]
    pub flow: f64,
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            board_name: "virtual".to_string(),
            relay_count: 16,
            counters: Vec::new(),
        }
    }
}
