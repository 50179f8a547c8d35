//! Flow statistics over the samples of one open interval.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of asking a faucet for its median flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MedianFlow {
    /// The faucet is not metered by any counter.
    NoCounter,
    /// No samples were collected during the interval.
    ///
    /// Fires on an empty sample list whatever the cause; shared counters are
    /// the usual one, since samples are only pushed to a faucet open alone.
    NotAlone,
    /// Median of the collected samples.
    Value(f64),
}

impl MedianFlow {
    /// The median value, if one was computed.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NoCounter | Self::NotAlone => None,
        }
    }
}

impl fmt::Display for MedianFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCounter => f.write_str("no counter"),
            Self::NotAlone => f.write_str("not alone"),
            Self::Value(v) => write!(f, "{v:.2}"),
        }
    }
}

/// Standard statistical median; the two middle values are averaged for even
/// counts. Returns `None` for an empty slice.
#[must_use]
pub fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        Some(f64::midpoint(sorted[mid - 1], sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}
