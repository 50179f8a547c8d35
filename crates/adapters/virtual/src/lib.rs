//! # irrigator-adapter-virtual
//!
//! Virtual/demo backend that simulates irrigation hardware for testing and
//! demonstration purposes.
//!
//! ## Provided devices
//!
//! | Device | Port | Behaviour |
//! |--------|------|-----------|
//! | [`VirtualRelayBoard`] | `RelayDriver` | In-memory relays, can be taken offline |
//! | [`VirtualFlowCounter`] | `FlowCounter` | Reports a settable flow, can be taken offline |
//!
//! Faucets of type `virtual` are switched through a shared
//! [`VirtualRelayBoard`]; see [`register`].
//!
//! ## Dependency rule
//!
//! Depends on `irrigator-app` (port traits) and `irrigator-domain` only.

mod config;
mod error;
mod flow_counter;
mod relay_board;

use std::sync::Arc;

use irrigator_app::registry::FaucetTypeRegistry;

pub use config::{VirtualConfig, VirtualCounterConfig};
pub use error::VirtualError;
pub use flow_counter::VirtualFlowCounter;
pub use relay_board::VirtualRelayBoard;

/// Faucet type name served by this adapter.
pub const FAUCET_TYPE: &str = "virtual";

/// Simulated hardware built from a [`VirtualConfig`].
pub struct VirtualHardware {
    pub board: Arc<VirtualRelayBoard>,
    pub counters: Vec<VirtualFlowCounter>,
}

impl VirtualHardware {
    #[must_use]
    pub fn from_config(config: &VirtualConfig) -> Self {
        let board = Arc::new(VirtualRelayBoard::new(
            config.board_name.clone(),
            config.relay_count,
        ));
        let counters = config
            .counters
            .iter()
            .map(|c| VirtualFlowCounter::new(c.id.clone(), c.flow))
            .collect();
        Self { board, counters }
    }
}

/// Register the `virtual` faucet type, switched through `board`.
pub fn register(registry: &mut FaucetTypeRegistry, board: Arc<VirtualRelayBoard>) {
    registry.register_relay_board(FAUCET_TYPE, board);
}
