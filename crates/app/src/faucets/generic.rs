//! Generic faucet: tracks state without any hardware behind it.

use irrigator_domain::error::IrrigatorError;
use irrigator_domain::faucet::Faucet;

use super::RelayFaucet;

/// A simulated faucet; every transition succeeds.
#[derive(Debug, Clone)]
pub struct GenericFaucet {
    faucet: Faucet,
}

impl GenericFaucet {
    #[must_use]
    pub fn new(faucet: Faucet) -> Self {
        Self { faucet }
    }
}

impl RelayFaucet for GenericFaucet {
    fn faucet(&self) -> &Faucet {
        &self.faucet
    }

    fn faucet_mut(&mut self) -> &mut Faucet {
        &mut self.faucet
    }

    fn open(&mut self) -> Result<(), IrrigatorError> {
        self.faucet.open();
        tracing::debug!(faucet = %self.faucet.name(), "opened faucet");
        Ok(())
    }

    fn close(&mut self) -> Result<(), IrrigatorError> {
        self.faucet.close();
        tracing::debug!(faucet = %self.faucet.name(), "closed faucet");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irrigator_domain::faucet::FaucetConfig;
    use irrigator_domain::flow::MedianFlow;

    fn generic(config: FaucetConfig) -> GenericFaucet {
        GenericFaucet::new(Faucet::from_config(config, "host1").unwrap())
    }

    #[test]
    fn should_report_no_counter_for_unmetered_faucet() {
        let f = generic(FaucetConfig::new("roses"));
        assert_eq!(f.median_flow(), MedianFlow::NoCounter);
    }

    #[test]
    fn should_report_not_alone_after_open_without_samples() {
        let mut f = generic(FaucetConfig::new("roses").with_counter("c1"));
        f.open().unwrap();
        assert_eq!(f.median_flow(), MedianFlow::NotAlone);
    }

    #[test]
    fn should_report_median_of_recorded_samples() {
        let mut f = generic(FaucetConfig::new("roses").with_counter("c1"));
        f.open().unwrap();
        f.record_flow_sample(2.0);
        f.record_flow_sample(4.0);
        f.record_flow_sample(6.0);
        assert_eq!(f.median_flow().to_string(), "4.00");
    }

    #[test]
    fn should_keep_flag_cleared_by_collaborator_through_close() {
        let mut f = generic(FaucetConfig::new("roses").with_counter("c1"));
        f.open().unwrap();
        assert!(f.faucet().is_all_alone());
        f.faucet_mut().set_all_alone(false);
        f.close().unwrap();
        assert!(!f.faucet().is_all_alone());
        assert!(!f.faucet().is_open());
    }

    #[test]
    fn should_discard_samples_on_reopen() {
        let mut f = generic(FaucetConfig::new("roses").with_counter("c1"));
        f.open().unwrap();
        f.record_flow_sample(1.0);
        f.open().unwrap();
        assert!(f.faucet().flow_samples().is_empty());
    }

    #[test]
    fn should_allow_close_when_already_closed() {
        let mut f = generic(FaucetConfig::new("roses"));
        assert!(f.close().is_ok());
        assert!(!f.faucet().is_open());
    }
}
