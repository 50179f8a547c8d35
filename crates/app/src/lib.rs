//! # irrigator-app
//!
//! Application layer: faucet variants, type resolution and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RelayDriver`: switch one relay of a relay controller on or off
//!   - `FlowCounter`: read the current flow of a shared water counter
//! - Define the `RelayFaucet` capability and its built-in variants
//! - Provide the `FaucetTypeRegistry` mapping type names to constructors
//! - Provide use-case services:
//!   - `FaucetBank`: the faucets of one computer, each behind its own lock
//!   - `CounterMonitor`: contention detection and flow sampling per counter
//!
//! ## Dependency rule
//! Depends on `irrigator-domain` only (plus `tracing`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod faucets;
pub mod ports;
pub mod registry;
pub mod services;
