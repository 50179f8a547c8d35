//! Virtual adapter error types.

use irrigator_domain::error::HardwareError;
use irrigator_domain::relay::{RelayAction, RelayIndex};

/// Errors specific to the simulated hardware.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VirtualError {
    /// The simulated device was switched offline.
    #[error("virtual device {0} is offline")]
    Offline(String),

    /// The relay label does not address a relay on the board.
    #[error("board has {relay_count} relays, no relay {relay}")]
    NoSuchRelay {
        /// Requested relay.
        relay: RelayIndex,
        /// Number of relays on the board.
        relay_count: u8,
    },
}

impl VirtualError {
    /// Convert into a [`HardwareError`] for propagation across the relay
    /// driver port.
    #[must_use]
    pub fn into_hardware(self, relay: RelayIndex, action: RelayAction) -> HardwareError {
        HardwareError::new(relay, action, self)
    }
}
