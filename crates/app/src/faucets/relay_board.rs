//! Relay-board faucet: a faucet wired to one relay of a relay controller.

use irrigator_domain::error::IrrigatorError;
use irrigator_domain::faucet::Faucet;

use super::RelayFaucet;
use crate::ports::RelayDriver;

/// A faucet switched through a [`RelayDriver`].
///
/// The relay is only driven when the faucet lives on this computer; faucets
/// of other computers are tracked so every computer agrees on which lines
/// are running.
pub struct RelayBoardFaucet<D> {
    faucet: Faucet,
    driver: D,
}

impl<D: RelayDriver> RelayBoardFaucet<D> {
    pub fn new(faucet: Faucet, driver: D) -> Self {
        Self { faucet, driver }
    }
}

impl<D: RelayDriver> RelayFaucet for RelayBoardFaucet<D> {
    fn faucet(&self) -> &Faucet {
        &self.faucet
    }

    fn faucet_mut(&mut self) -> &mut Faucet {
        &mut self.faucet
    }

    #[tracing::instrument(
        skip(self),
        fields(faucet = %self.faucet.name(), relay = %self.faucet.relay())
    )]
    fn open(&mut self) -> Result<(), IrrigatorError> {
        if self.faucet.is_local() {
            self.driver
                .open_relay(self.faucet.relay())
                .inspect_err(|err| tracing::warn!(error = %err, "failed to open faucet"))?;
        } else {
            tracing::debug!(
                computer = %self.faucet.computer_name(),
                "remote faucet, tracking state only"
            );
        }
        self.faucet.open();
        tracing::debug!("opened faucet");
        Ok(())
    }

    #[tracing::instrument(
        skip(self),
        fields(faucet = %self.faucet.name(), relay = %self.faucet.relay())
    )]
    fn close(&mut self) -> Result<(), IrrigatorError> {
        if self.faucet.is_local() {
            self.driver
                .close_relay(self.faucet.relay())
                .inspect_err(|err| tracing::warn!(error = %err, "failed to close faucet"))?;
        } else {
            tracing::debug!(
                computer = %self.faucet.computer_name(),
                "remote faucet, tracking state only"
            );
        }
        self.faucet.close();
        tracing::debug!("closed faucet");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use irrigator_domain::error::HardwareError;
    use irrigator_domain::faucet::FaucetConfig;
    use irrigator_domain::relay::{RelayAction, RelayIndex};

    #[derive(Default)]
    struct RecordingDriver {
        calls: Mutex<Vec<(String, RelayAction)>>,
        failing: AtomicBool,
    }

    impl RecordingDriver {
        fn record(&self, relay: &RelayIndex, action: RelayAction) -> Result<(), HardwareError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(HardwareError::new(relay.clone(), action, "board unplugged"));
            }
            self.calls
                .lock()
                .unwrap()
                .push((relay.as_str().to_string(), action));
            Ok(())
        }

        fn calls(&self) -> Vec<(String, RelayAction)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RelayDriver for RecordingDriver {
        fn open_relay(&self, relay: &RelayIndex) -> Result<(), HardwareError> {
            self.record(relay, RelayAction::On)
        }

        fn close_relay(&self, relay: &RelayIndex) -> Result<(), HardwareError> {
            self.record(relay, RelayAction::Off)
        }
    }

    fn board_faucet(
        config: FaucetConfig,
    ) -> (RelayBoardFaucet<Arc<RecordingDriver>>, Arc<RecordingDriver>) {
        let driver = Arc::new(RecordingDriver::default());
        let faucet = Faucet::from_config(config, "host1").unwrap();
        (RelayBoardFaucet::new(faucet, Arc::clone(&driver)), driver)
    }

    #[test]
    fn should_switch_relay_on_open_and_close() {
        let (mut f, driver) = board_faucet(FaucetConfig::new("lawn").with_relay(12_u8));
        f.open().unwrap();
        f.close().unwrap();
        assert_eq!(
            driver.calls(),
            vec![
                ("C".to_string(), RelayAction::On),
                ("C".to_string(), RelayAction::Off)
            ]
        );
    }

    #[test]
    fn should_apply_base_state_after_relay_switch() {
        let (mut f, _) = board_faucet(FaucetConfig::new("lawn").with_counter("c1"));
        f.open().unwrap();
        assert!(f.faucet().is_open());
        assert!(f.faucet().is_all_alone());
        f.record_flow_sample(3.0);
        f.close().unwrap();
        assert!(!f.faucet().is_open());
        assert_eq!(f.median_flow().value(), Some(3.0));
    }

    #[test]
    fn should_stay_closed_when_relay_fails_to_open() {
        let (mut f, driver) = board_faucet(FaucetConfig::new("lawn").with_counter("c1"));
        f.open().unwrap();
        f.record_flow_sample(3.0);
        f.close().unwrap();
        driver.failing.store(true, Ordering::SeqCst);

        let result = f.open();

        assert!(matches!(result, Err(IrrigatorError::Hardware(_))));
        assert!(!f.faucet().is_open());
        assert_eq!(f.faucet().flow_samples(), &[3.0]);
    }

    #[test]
    fn should_stay_open_when_relay_fails_to_close() {
        let (mut f, driver) = board_faucet(FaucetConfig::new("lawn"));
        f.open().unwrap();
        driver.failing.store(true, Ordering::SeqCst);

        let result = f.close();

        assert!(matches!(result, Err(IrrigatorError::Hardware(_))));
        assert!(f.faucet().is_open());
    }

    #[test]
    fn should_not_drive_relay_of_remote_faucet() {
        let (mut f, driver) = board_faucet(FaucetConfig::new("lawn").with_computer("shed"));
        f.open().unwrap();
        assert!(f.faucet().is_open());
        f.close().unwrap();
        assert!(driver.calls().is_empty());
    }
}
