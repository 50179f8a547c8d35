//! Relay addressing: which physical relay on a controller a faucet drives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one relay on a relay controller.
///
/// Boards label their relays with a single character: `0`–`9` and then
/// `A`, `B`, … for relays 10 and above. Numeric indices are converted to that
/// label on construction, textual ones are upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRelayIndex", into = "String")]
pub struct RelayIndex(String);

impl RelayIndex {
    /// The relay label as sent to the controller.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the label is empty (an invalid configuration).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RelayIndex {
    fn default() -> Self {
        Self("0".to_string())
    }
}

impl From<u8> for RelayIndex {
    fn from(num: u8) -> Self {
        let label = char::from_digit(u32::from(num), 36)
            .map_or_else(|| num.to_string(), |c| c.to_ascii_uppercase().to_string());
        Self(label)
    }
}

impl From<&str> for RelayIndex {
    fn from(label: &str) -> Self {
        Self(label.trim().to_ascii_uppercase())
    }
}

impl From<String> for RelayIndex {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<RelayIndex> for String {
    fn from(index: RelayIndex) -> Self {
        index.0
    }
}

impl fmt::Display for RelayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration files carry the relay either as a number or as a label.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRelayIndex {
    Number(u8),
    Label(String),
}

impl From<RawRelayIndex> for RelayIndex {
    fn from(raw: RawRelayIndex) -> Self {
        match raw {
            RawRelayIndex::Number(num) => Self::from(num),
            RawRelayIndex::Label(label) => Self::from(label),
        }
    }
}

/// Action requested from a relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayAction {
    On,
    Off,
}

impl fmt::Display for RelayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}
