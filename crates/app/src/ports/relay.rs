//! Relay driver port: switching relays on a relay controller.
//!
//! A driver owns the connection to one controller (a USB relay board, a GPIO
//! header, a simulated board …). Hardware-backed faucet variants call it
//! before committing their state change.

use std::sync::Arc;

use irrigator_domain::error::HardwareError;
use irrigator_domain::relay::RelayIndex;

/// Switches the relays of one relay controller.
///
/// Implementations must be safe to share between faucets: several faucets
/// usually drive different relays of the same board.
pub trait RelayDriver: Send + Sync {
    /// Energise the relay (water on).
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError`] if the controller did not accept the command.
    fn open_relay(&self, relay: &RelayIndex) -> Result<(), HardwareError>;

    /// Release the relay (water off).
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError`] if the controller did not accept the command.
    fn close_relay(&self, relay: &RelayIndex) -> Result<(), HardwareError>;
}

impl<D: RelayDriver + ?Sized> RelayDriver for Arc<D> {
    fn open_relay(&self, relay: &RelayIndex) -> Result<(), HardwareError> {
        (**self).open_relay(relay)
    }

    fn close_relay(&self, relay: &RelayIndex) -> Result<(), HardwareError> {
        (**self).close_relay(relay)
    }
}
