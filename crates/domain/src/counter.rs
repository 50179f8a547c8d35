//! Flow counter identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of the shared flow counter a faucet's line is metered by.
///
/// The sentinel `"none"` marks an unmetered faucet; such a faucet never
/// reports a median flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterId(String);

impl CounterId {
    /// Sentinel value for an unmetered line.
    pub const NONE: &'static str = "none";

    /// Create a counter id from its configured name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The unmetered sentinel.
    #[must_use]
    pub fn none() -> Self {
        Self(Self::NONE.to_string())
    }

    /// Whether this faucet is metered by a real counter.
    #[must_use]
    pub fn is_metered(&self) -> bool {
        self.0 != Self::NONE
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CounterId {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for CounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
