//! Faucet bank: every faucet known to this computer, by name.
//!
//! Each faucet sits behind its own mutex: the scheduler switching it and the
//! counter monitor feeding it samples may run on different threads, and the
//! faucet state itself does no locking.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use irrigator_domain::counter::CounterId;
use irrigator_domain::error::{ComputerDisabledError, IrrigatorError, NotFoundError};
use irrigator_domain::faucet::{Faucet, FaucetConfig};
use irrigator_domain::flow::MedianFlow;

use crate::faucets::RelayFaucet;
use crate::registry::FaucetTypeRegistry;

/// A faucet shared between the scheduler and the counter monitor.
pub type SharedFaucet = Arc<Mutex<Box<dyn RelayFaucet>>>;

/// Lock a shared faucet, recovering the state if a holder panicked.
pub fn lock_faucet(faucet: &SharedFaucet) -> MutexGuard<'_, Box<dyn RelayFaucet>> {
    faucet.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The faucets of one irrigation computer.
pub struct FaucetBank {
    local_computer_name: String,
    disabled: AtomicBool,
    faucets: BTreeMap<String, SharedFaucet>,
}

impl FaucetBank {
    /// An empty bank for the given computer.
    pub fn new(local_computer_name: impl Into<String>) -> Self {
        Self {
            local_computer_name: local_computer_name.into(),
            disabled: AtomicBool::new(false),
            faucets: BTreeMap::new(),
        }
    }

    /// Build every configured faucet through `registry`.
    ///
    /// A second faucet with an already used name is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns the first construction error (unknown type, invalid
    /// configuration); no bank is created in that case.
    #[tracing::instrument(skip(registry, configs))]
    pub fn load(
        registry: &FaucetTypeRegistry,
        configs: impl IntoIterator<Item = FaucetConfig>,
        local_computer_name: &str,
    ) -> Result<Self, IrrigatorError> {
        let mut bank = Self::new(local_computer_name);
        for config in configs {
            if bank.faucets.contains_key(&config.name) {
                tracing::warn!(faucet = %config.name, "faucet already defined, skipping");
                continue;
            }
            let faucet = registry.build(config, local_computer_name)?;
            tracing::info!(faucet = %faucet.faucet(), "added faucet");
            bank.insert(faucet);
        }
        Ok(bank)
    }

    /// Add a faucet. Returns `false` (and keeps the existing one) if the name
    /// is taken.
    pub fn insert(&mut self, faucet: Box<dyn RelayFaucet>) -> bool {
        let name = faucet.faucet().name().to_string();
        if self.faucets.contains_key(&name) {
            return false;
        }
        self.faucets.insert(name, Arc::new(Mutex::new(faucet)));
        true
    }

    #[must_use]
    pub fn local_computer_name(&self) -> &str {
        &self.local_computer_name
    }

    /// Stop (or resume) opening the faucets of this computer.
    ///
    /// Faucets already open are left as they are.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
        tracing::info!(
            computer = %self.local_computer_name,
            disabled,
            "computer irrigation toggled"
        );
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.faucets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faucets.is_empty()
    }

    /// Faucet names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.faucets.keys().map(String::as_str)
    }

    /// Shared handle to a faucet.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SharedFaucet> {
        self.faucets.get(name).cloned()
    }

    /// Every faucet with its name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SharedFaucet)> {
        self.faucets.iter().map(|(name, f)| (name.as_str(), f))
    }

    fn find(&self, name: &str) -> Result<&SharedFaucet, NotFoundError> {
        self.faucets.get(name).ok_or_else(|| NotFoundError {
            entity: "Faucet",
            id: name.to_string(),
        })
    }

    /// Open the named faucet.
    ///
    /// # Errors
    ///
    /// Returns [`IrrigatorError::NotFound`] for an unknown name,
    /// [`IrrigatorError::Disabled`] for a local faucet while this computer is
    /// disabled, or the faucet's own failure.
    #[tracing::instrument(skip(self))]
    pub fn open(&self, name: &str) -> Result<(), IrrigatorError> {
        let faucet = self.find(name)?;
        let mut guard = lock_faucet(faucet);
        if self.is_disabled() && guard.faucet().is_local() {
            tracing::debug!("computer disabled, not opening faucet");
            return Err(ComputerDisabledError {
                computer: self.local_computer_name.clone(),
                faucet: name.to_string(),
            }
            .into());
        }
        guard.open()?;
        tracing::info!("opened faucet");
        Ok(())
    }

    /// Close the named faucet and return the median flow of the interval.
    ///
    /// # Errors
    ///
    /// Returns [`IrrigatorError::NotFound`] for an unknown name, or the
    /// faucet's own failure.
    #[tracing::instrument(skip(self))]
    pub fn close(&self, name: &str) -> Result<MedianFlow, IrrigatorError> {
        let faucet = self.find(name)?;
        let mut guard = lock_faucet(faucet);
        guard.close()?;
        let median = guard.median_flow();
        tracing::info!(flow = %median, "closed faucet");
        Ok(median)
    }

    /// Close every faucet, carrying on past failures.
    ///
    /// Returns the faucets that could not be closed.
    #[tracing::instrument(skip(self))]
    pub fn close_all(&self) -> Vec<(String, IrrigatorError)> {
        let mut failures = Vec::new();
        for (name, faucet) in &self.faucets {
            if let Err(err) = lock_faucet(faucet).close() {
                tracing::warn!(faucet = %name, error = %err, "failed to close faucet");
                failures.push((name.clone(), err));
            }
        }
        tracing::debug!(failed = failures.len(), "closed all faucets");
        failures
    }

    /// Names of the faucets whose relay is on this computer.
    #[must_use]
    pub fn local_names(&self) -> Vec<String> {
        self.faucets
            .iter()
            .filter(|(_, f)| lock_faucet(f).faucet().is_local())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Names of the open faucets metered by `counter`.
    #[must_use]
    pub fn open_on_counter(&self, counter: &CounterId) -> Vec<String> {
        self.faucets
            .iter()
            .filter(|(_, f)| {
                let guard = lock_faucet(f);
                guard.faucet().is_open() && guard.faucet().counter() == counter
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Copy of every faucet's state, for diagnostics.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Faucet> {
        self.faucets
            .values()
            .map(|f| lock_faucet(f).faucet().clone())
            .collect()
    }
}
