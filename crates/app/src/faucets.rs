//! Faucet variants: the uniform capability every relay backend provides.
//!
//! | Variant | Type name | Behaviour |
//! |---------|-----------|-----------|
//! | [`GenericFaucet`] | `generic` | State only, no hardware behind it |
//! | [`RelayBoardFaucet`] | chosen at registration | Switches a relay through a [`RelayDriver`](crate::ports::RelayDriver) |
//!
//! Variants embed the domain [`Faucet`] state and only decide what happens
//! physically around its transitions.

mod generic;
mod relay_board;

pub use generic::GenericFaucet;
pub use relay_board::RelayBoardFaucet;

use irrigator_domain::error::IrrigatorError;
use irrigator_domain::faucet::Faucet;
use irrigator_domain::flow::MedianFlow;

/// A faucet whose water can be switched on and off.
pub trait RelayFaucet: Send {
    /// Shared faucet state.
    fn faucet(&self) -> &Faucet;

    /// Mutable faucet state, used by collaborators such as the counter
    /// monitor to flip the solo flag.
    fn faucet_mut(&mut self) -> &mut Faucet;

    /// Water on. `is_open` only changes once the backend confirmed it.
    ///
    /// # Errors
    ///
    /// Returns [`IrrigatorError::Hardware`] if the relay could not be switched.
    fn open(&mut self) -> Result<(), IrrigatorError>;

    /// Water off. `is_open` only changes once the backend confirmed it.
    ///
    /// # Errors
    ///
    /// Returns [`IrrigatorError::Hardware`] if the relay could not be switched.
    fn close(&mut self) -> Result<(), IrrigatorError>;

    /// See [`Faucet::median_flow`].
    fn median_flow(&self) -> MedianFlow {
        self.faucet().median_flow()
    }

    /// See [`Faucet::record_flow_sample`].
    fn record_flow_sample(&mut self, value: f64) {
        self.faucet_mut().record_flow_sample(value);
    }
}
