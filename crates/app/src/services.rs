//! Application services: use-case implementations.
//!
//! Services work on faucets through the [`RelayFaucet`](crate::faucets::RelayFaucet)
//! trait and on counters through the [`FlowCounter`](crate::ports::FlowCounter)
//! port, keeping this layer decoupled from concrete adapters.

pub mod counter_monitor;
pub mod faucet_bank;
