//! # irrigatord: irrigator daemon
//!
//! Composition root that wires the faucet bank, relay backends and counter
//! monitor together.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Build the faucet type registry and register the available backends
//! - Construct every configured faucet through the registry
//! - Sample the flow counters on an interval
//! - Close every faucet on startup and on graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

pub mod config;

use std::sync::Arc;

use irrigator_adapter_virtual::{VirtualFlowCounter, VirtualHardware, VirtualRelayBoard};
use irrigator_app::registry::FaucetTypeRegistry;
use irrigator_app::services::counter_monitor::CounterMonitor;
use irrigator_app::services::faucet_bank::FaucetBank;
use irrigator_domain::error::IrrigatorError;

use crate::config::Config;

/// The wired application.
pub struct Irrigator {
    pub bank: FaucetBank,
    pub monitor: CounterMonitor<VirtualFlowCounter>,
    pub board: Arc<VirtualRelayBoard>,
}

impl Irrigator {
    /// Build every component from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IrrigatorError`] if a configured faucet cannot be built
    /// (unknown type, invalid configuration).
    pub fn from_config(config: &Config) -> Result<Self, IrrigatorError> {
        let hardware = VirtualHardware::from_config(&config.virtual_hardware);

        let mut registry = FaucetTypeRegistry::default();
        irrigator_adapter_virtual::register(&mut registry, Arc::clone(&hardware.board));
        tracing::debug!(faucet_types = ?registry.faucet_types(), "faucet types available");

        let bank = FaucetBank::load(&registry, config.faucets.clone(), &config.computer.name)?;
        if config.computer.disabled {
            bank.set_disabled(true);
        }
        tracing::info!(
            computer = %config.computer.name,
            faucets = bank.len(),
            local = bank.local_names().len(),
            counters = hardware.counters.len(),
            "irrigator ready"
        );

        Ok(Self {
            bank,
            monitor: CounterMonitor::new(hardware.counters),
            board: hardware.board,
        })
    }

    /// Close every faucet, logging the ones that failed.
    ///
    /// Returns the number of faucets that could not be closed.
    pub fn close_all(&self) -> usize {
        let failures = self.bank.close_all();
        for (name, err) in &failures {
            tracing::error!(faucet = %name, error = %err, "faucet left open");
        }
        failures.len()
    }

    /// One sampling round of the counter monitor.
    pub fn tick(&self) -> usize {
        self.monitor.sample(&self.bank)
    }

    /// Current state of every faucet as JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error (not expected for plain faucet state).
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.bank.snapshot())
    }
}
