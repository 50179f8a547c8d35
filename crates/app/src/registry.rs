//! Faucet type registry: maps faucet type names to constructors.
//!
//! Types are registered explicitly at startup (the `generic` type is always
//! present) and looked up case-insensitively, so a configuration may say
//! `Generic`, `generic` or `GENERIC`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use irrigator_domain::error::{IrrigatorError, UnknownFaucetTypeError};
use irrigator_domain::faucet::{DEFAULT_FAUCET_TYPE, Faucet, FaucetConfig};

use crate::faucets::{GenericFaucet, RelayBoardFaucet, RelayFaucet};
use crate::ports::RelayDriver;

/// Builds one faucet variant from its configuration and the local computer
/// name.
pub type FaucetConstructor = Arc<
    dyn Fn(FaucetConfig, &str) -> Result<Box<dyn RelayFaucet>, IrrigatorError> + Send + Sync,
>;

/// Runtime table of the faucet variants this process knows about.
#[derive(Clone)]
pub struct FaucetTypeRegistry {
    constructors: HashMap<String, FaucetConstructor>,
}

impl Default for FaucetTypeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(DEFAULT_FAUCET_TYPE, |config, local_computer_name| {
            let faucet = Faucet::from_config(config, local_computer_name)?;
            Ok(Box::new(GenericFaucet::new(faucet)) as Box<dyn RelayFaucet>)
        });
        registry
    }
}

impl FaucetTypeRegistry {
    /// A registry without any type, not even `generic`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) the constructor for `faucet_type`.
    pub fn register<F>(&mut self, faucet_type: &str, constructor: F)
    where
        F: Fn(FaucetConfig, &str) -> Result<Box<dyn RelayFaucet>, IrrigatorError>
            + Send
            + Sync
            + 'static,
    {
        let key = faucet_type.to_lowercase();
        if self
            .constructors
            .insert(key.clone(), Arc::new(constructor))
            .is_some()
        {
            tracing::warn!(faucet_type = %key, "replaced faucet type constructor");
        } else {
            tracing::debug!(faucet_type = %key, "registered faucet type");
        }
    }

    /// Register `faucet_type` as a [`RelayBoardFaucet`] switched by `driver`.
    pub fn register_relay_board<D>(&mut self, faucet_type: &str, driver: D)
    where
        D: RelayDriver + Clone + 'static,
    {
        self.register(faucet_type, move |config, local_computer_name| {
            let faucet = Faucet::from_config(config, local_computer_name)?;
            Ok(Box::new(RelayBoardFaucet::new(faucet, driver.clone())) as Box<dyn RelayFaucet>)
        });
    }

    /// Look up the constructor for `faucet_type`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFaucetTypeError`] if nothing is registered under that
    /// name.
    pub fn resolve(&self, faucet_type: &str) -> Result<FaucetConstructor, UnknownFaucetTypeError> {
        self.constructors
            .get(&faucet_type.to_lowercase())
            .cloned()
            .ok_or_else(|| UnknownFaucetTypeError {
                faucet_type: faucet_type.to_string(),
            })
    }

    /// Resolve the configured type and construct the faucet.
    ///
    /// # Errors
    ///
    /// Returns [`IrrigatorError::UnknownFaucetType`] for an unregistered type,
    /// or [`IrrigatorError::Validation`] for an invalid configuration.
    pub fn build(
        &self,
        config: FaucetConfig,
        local_computer_name: &str,
    ) -> Result<Box<dyn RelayFaucet>, IrrigatorError> {
        let constructor = self.resolve(&config.faucet_type)?;
        constructor(config, local_computer_name)
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn faucet_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl fmt::Debug for FaucetTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaucetTypeRegistry")
            .field("faucet_types", &self.faucet_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use irrigator_domain::error::HardwareError;
    use irrigator_domain::relay::RelayIndex;

    #[derive(Clone, Default)]
    struct CountingDriver {
        switched: Arc<Mutex<usize>>,
    }

    impl RelayDriver for CountingDriver {
        fn open_relay(&self, _relay: &RelayIndex) -> Result<(), HardwareError> {
            *self.switched.lock().unwrap() += 1;
            Ok(())
        }

        fn close_relay(&self, _relay: &RelayIndex) -> Result<(), HardwareError> {
            *self.switched.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[test]
    fn should_register_generic_by_default() {
        let registry = FaucetTypeRegistry::default();
        assert_eq!(registry.faucet_types(), vec!["generic"]);
    }

    #[test]
    fn should_resolve_case_insensitively() {
        let registry = FaucetTypeRegistry::default();
        assert!(registry.resolve("Generic").is_ok());
        assert!(registry.resolve("GENERIC").is_ok());
    }

    #[test]
    fn should_fail_for_unregistered_type() {
        let registry = FaucetTypeRegistry::default();
        let err = registry.resolve("Numato").err().unwrap();
        assert_eq!(
            err,
            UnknownFaucetTypeError {
                faucet_type: "Numato".to_string()
            }
        );
    }

    #[test]
    fn should_not_build_faucet_of_unknown_type() {
        let registry = FaucetTypeRegistry::default();
        let result = registry.build(
            FaucetConfig::new("lawn").with_faucet_type("numato"),
            "host1",
        );
        assert!(matches!(result, Err(IrrigatorError::UnknownFaucetType(_))));
    }

    #[test]
    fn should_build_closed_generic_faucet() {
        let registry = FaucetTypeRegistry::default();
        let faucet = registry.build(FaucetConfig::new("roses"), "host1").unwrap();
        assert_eq!(faucet.faucet().name(), "roses");
        assert_eq!(faucet.faucet().local_computer_name(), "host1");
        assert!(!faucet.faucet().is_open());
    }

    #[test]
    fn should_propagate_validation_errors() {
        let registry = FaucetTypeRegistry::default();
        let result = registry.build(FaucetConfig::new(""), "host1");
        assert!(matches!(result, Err(IrrigatorError::Validation(_))));
    }

    #[test]
    fn should_build_relay_board_faucet_for_registered_type() {
        let driver = CountingDriver::default();
        let mut registry = FaucetTypeRegistry::default();
        registry.register_relay_board("Numato", driver.clone());

        let mut faucet = registry
            .build(FaucetConfig::new("lawn").with_faucet_type("numato"), "host1")
            .unwrap();
        faucet.open().unwrap();
        faucet.close().unwrap();

        assert_eq!(*driver.switched.lock().unwrap(), 2);
        assert_eq!(registry.faucet_types(), vec!["generic", "numato"]);
    }

    #[test]
    fn should_replace_existing_registration() {
        let mut registry = FaucetTypeRegistry::default();
        registry.register_relay_board("generic", CountingDriver::default());
        assert_eq!(registry.faucet_types(), vec!["generic"]);
    }
}
