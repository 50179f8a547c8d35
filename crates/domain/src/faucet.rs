//! Faucet: a named water outlet driven by one relay.
//!
//! A [`Faucet`] is the state every faucet variant shares: whether the water
//! is on, whether it was the only consumer on its flow counter during the
//! current open interval, and the flow samples collected in that interval.
//! Hardware variants embed it and wrap the relay action around its
//! transitions.
//!
//! # Concurrency
//!
//! No method locks or blocks. A faucet is typically shared between a
//! scheduler (open/close) and a counter reader (samples, solo flag), so the
//! embedding system must serialize access, e.g. one mutex per faucet.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::counter::CounterId;
use crate::error::ValidationError;
use crate::flow::{self, MedianFlow};
use crate::relay::RelayIndex;

/// Faucet type used when the configuration does not name one.
pub const DEFAULT_FAUCET_TYPE: &str = "generic";

/// Open duration used by timers that do not specify their own.
pub const DEFAULT_DURATION_SECS: u32 = 30;

/// Static description of a faucet, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetConfig {
    /// Human-assigned name (e.g. `"roses drips"`).
    pub name: String,
    /// Computer the relay controller is attached to; `None` means local.
    #[serde(default)]
    pub computer: Option<String>,
    /// Relay backend variant, resolved through the faucet type registry.
    #[serde(default = "default_faucet_type")]
    pub faucet_type: String,
    /// Relay on the controller, as a number or a board label.
    #[serde(default)]
    pub relay: RelayIndex,
    /// Shared flow counter metering this line.
    #[serde(default)]
    pub counter: CounterId,
    /// Default open duration in seconds.
    #[serde(default = "default_duration")]
    pub default_duration: u32,
}

fn default_faucet_type() -> String {
    DEFAULT_FAUCET_TYPE.to_string()
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SECS
}

impl FaucetConfig {
    /// A local, generic, unmetered faucet on relay `0`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            computer: None,
            faucet_type: default_faucet_type(),
            relay: RelayIndex::default(),
            counter: CounterId::default(),
            default_duration: DEFAULT_DURATION_SECS,
        }
    }

    #[must_use]
    pub fn with_computer(mut self, computer: impl Into<String>) -> Self {
        self.computer = Some(computer.into());
        self
    }

    #[must_use]
    pub fn with_faucet_type(mut self, faucet_type: impl Into<String>) -> Self {
        self.faucet_type = faucet_type.into();
        self
    }

    #[must_use]
    pub fn with_relay(mut self, relay: impl Into<RelayIndex>) -> Self {
        self.relay = relay.into();
        self
    }

    #[must_use]
    pub fn with_counter(mut self, counter: impl Into<String>) -> Self {
        self.counter = CounterId::new(counter);
        self
    }

    #[must_use]
    pub fn with_default_duration(mut self, secs: u32) -> Self {
        self.default_duration = secs;
        self
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty name or relay label.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.relay.is_empty() {
            return Err(ValidationError::EmptyRelayIndex);
        }
        Ok(())
    }
}

/// Faucet state shared by every relay backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Faucet {
    name: String,
    computer_name: Option<String>,
    local_computer_name: String,
    faucet_type: String,
    relay: RelayIndex,
    counter: CounterId,
    default_duration_secs: u32,
    is_open: bool,
    all_alone: bool,
    flow_samples: Vec<f64>,
    timers: Vec<String>,
}

impl Faucet {
    /// Build a closed faucet from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the configuration is invalid.
    pub fn from_config(
        config: FaucetConfig,
        local_computer_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            name: config.name,
            computer_name: config.computer,
            local_computer_name: local_computer_name.into(),
            faucet_type: config.faucet_type,
            relay: config.relay,
            counter: config.counter,
            default_duration_secs: config.default_duration,
            is_open: false,
            all_alone: false,
            flow_samples: Vec::new(),
            timers: Vec::new(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Computer hosting the relay, with an unset name resolved to the local
    /// computer.
    #[must_use]
    pub fn computer_name(&self) -> &str {
        self.computer_name
            .as_deref()
            .unwrap_or(&self.local_computer_name)
    }

    /// Computer name exactly as configured.
    #[must_use]
    pub fn configured_computer_name(&self) -> Option<&str> {
        self.computer_name.as_deref()
    }

    #[must_use]
    pub fn local_computer_name(&self) -> &str {
        &self.local_computer_name
    }

    /// Whether the relay lives on the computer running this process.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.computer_name() == self.local_computer_name
    }

    #[must_use]
    pub fn faucet_type(&self) -> &str {
        &self.faucet_type
    }

    #[must_use]
    pub fn relay(&self) -> &RelayIndex {
        &self.relay
    }

    #[must_use]
    pub fn counter(&self) -> &CounterId {
        &self.counter
    }

    /// Duration a timer should use when it does not specify one.
    #[must_use]
    pub fn default_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.default_duration_secs))
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether this faucet has been the only consumer on its counter since
    /// it was last opened.
    #[must_use]
    pub fn is_all_alone(&self) -> bool {
        self.all_alone
    }

    /// Set by the counter monitor when it detects (or clears) contention.
    pub fn set_all_alone(&mut self, all_alone: bool) {
        self.all_alone = all_alone;
    }

    #[must_use]
    pub fn flow_samples(&self) -> &[f64] {
        &self.flow_samples
    }

    /// Identifiers of the timers driving this faucet.
    #[must_use]
    pub fn timers(&self) -> &[String] {
        &self.timers
    }

    pub fn attach_timer(&mut self, timer_id: impl Into<String>) {
        self.timers.push(timer_id.into());
    }

    pub fn detach_timer(&mut self, timer_id: &str) {
        self.timers.retain(|t| t != timer_id);
    }

    /// Water on. Starts a new interval: solo until proven otherwise, with
    /// the previous interval's samples discarded.
    pub fn open(&mut self) {
        self.is_open = true;
        self.all_alone = true;
        self.flow_samples.clear();
    }

    /// Water off. The solo flag and samples are kept so the median of the
    /// finished interval can still be read.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Append a flow reading for the current interval.
    ///
    /// Callers must only feed samples while the faucet is open; a sample
    /// recorded while closed is kept but makes the next median meaningless
    /// until the faucet is reopened.
    pub fn record_flow_sample(&mut self, value: f64) {
        self.flow_samples.push(value);
    }

    /// Median flow of the current (or last finished) interval.
    #[must_use]
    pub fn median_flow(&self) -> MedianFlow {
        if !self.counter.is_metered() {
            return MedianFlow::NoCounter;
        }
        flow::median(&self.flow_samples).map_or(MedianFlow::NotAlone, MedianFlow::Value)
    }
}

impl fmt::Display for Faucet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Faucet: name: {}, computer_name: {}, local_computer_name: {}, faucet_type: {}, \
             relay: {}, counter: {}, default_duration: {}, is_open: {}, all_alone: {}, \
             flow_samples: {:?}, timers: {:?}",
            self.name,
            self.computer_name.as_deref().unwrap_or("None"),
            self.local_computer_name,
            self.faucet_type,
            self.relay,
            self.counter,
            self.default_duration_secs,
            self.is_open,
            self.all_alone,
            self.flow_samples,
            self.timers,
        )
    }
}
