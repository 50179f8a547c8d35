//! Virtual relay board: a fixed number of relays held in memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use irrigator_app::ports::RelayDriver;
use irrigator_domain::error::HardwareError;
use irrigator_domain::relay::{RelayAction, RelayIndex};

use crate::error::VirtualError;

/// A simulated relay board that can be taken offline to exercise failures.
pub struct VirtualRelayBoard {
    name: String,
    relays: Mutex<Vec<bool>>,
    offline: AtomicBool,
}

impl Default for VirtualRelayBoard {
    fn default() -> Self {
        Self::new("virtual", 16)
    }
}

impl VirtualRelayBoard {
    /// A board with `relay_count` relays, all released.
    pub fn new(name: impl Into<String>, relay_count: u8) -> Self {
        Self {
            name: name.into(),
            relays: Mutex::new(vec![false; usize::from(relay_count)]),
            offline: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn relay_count(&self) -> u8 {
        u8::try_from(self.lock_relays().len()).unwrap_or(u8::MAX)
    }

    /// Make every following relay action fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
        tracing::info!(board = %self.name, offline, "virtual relay board availability changed");
    }

    /// Whether the relay is currently energised. Unknown relays are off.
    #[must_use]
    pub fn is_on(&self, relay: &RelayIndex) -> bool {
        let relays = self.lock_relays();
        slot(relay, relays.len()).is_some_and(|i| relays[i])
    }

    /// Labels of every energised relay, in board order.
    #[must_use]
    pub fn energised(&self) -> Vec<RelayIndex> {
        self.lock_relays()
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .filter_map(|(i, _)| u8::try_from(i).ok().map(RelayIndex::from))
            .collect()
    }

    fn switch(&self, relay: &RelayIndex, action: RelayAction) -> Result<(), HardwareError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(
                VirtualError::Offline(self.name.clone()).into_hardware(relay.clone(), action)
            );
        }
        let mut relays = self.lock_relays();
        let Some(i) = slot(relay, relays.len()) else {
            return Err(VirtualError::NoSuchRelay {
                relay: relay.clone(),
                relay_count: u8::try_from(relays.len()).unwrap_or(u8::MAX),
            }
            .into_hardware(relay.clone(), action));
        };
        relays[i] = action == RelayAction::On;
        tracing::debug!(board = %self.name, %relay, %action, "switched virtual relay");
        Ok(())
    }

    fn lock_relays(&self) -> MutexGuard<'_, Vec<bool>> {
        self.relays.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RelayDriver for VirtualRelayBoard {
    fn open_relay(&self, relay: &RelayIndex) -> Result<(), HardwareError> {
        self.switch(relay, RelayAction::On)
    }

    fn close_relay(&self, relay: &RelayIndex) -> Result<(), HardwareError> {
        self.switch(relay, RelayAction::Off)
    }
}

/// Position of a relay label on a board with `relay_count` relays.
///
/// Single characters are board labels (`0`–`9`, `A`…); longer labels are
/// read as decimal numbers.
fn slot(relay: &RelayIndex, relay_count: usize) -> Option<usize> {
    let label = relay.as_str();
    let index = if label.len() == 1 {
        u32::from_str_radix(label, 36).ok()?
    } else {
        label.parse().ok()?
    };
    usize::try_from(index).ok().filter(|i| *i < relay_count)
}
