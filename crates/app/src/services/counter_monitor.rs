//! Counter monitor: solo detection and flow sampling on shared counters.
//!
//! Several faucets may be metered by the same counter. A flow reading can
//! only be attributed to a faucet while it is the single open consumer of its
//! counter, so the monitor:
//!
//! 1. reads each counter;
//! 2. clears the solo flag of every open faucet that shares its counter with
//!    another open faucet (the flag stays cleared until the faucet reopens);
//! 3. pushes each reading into the one open faucet on its counter, if that
//!    faucet has been alone for the whole interval.

use std::collections::HashMap;

use irrigator_domain::counter::CounterId;

use crate::ports::FlowCounter;
use crate::services::faucet_bank::{FaucetBank, lock_faucet};

/// Clear the solo flag of open faucets sharing a counter.
///
/// Returns the open faucet names per metered counter.
pub fn update_contention(bank: &FaucetBank) -> HashMap<CounterId, Vec<String>> {
    let mut open_per_counter: HashMap<CounterId, Vec<String>> = HashMap::new();
    for (name, faucet) in bank.iter() {
        let guard = lock_faucet(faucet);
        let state = guard.faucet();
        if state.is_open() && state.counter().is_metered() {
            open_per_counter
                .entry(state.counter().clone())
                .or_default()
                .push(name.to_string());
        }
    }

    for (counter, names) in &open_per_counter {
        if names.len() < 2 {
            continue;
        }
        tracing::info!(
            counter = %counter,
            faucets = ?names,
            "more than one faucet open on counter"
        );
        for name in names {
            if let Some(faucet) = bank.get(name) {
                lock_faucet(&faucet).faucet_mut().set_all_alone(false);
            }
        }
    }
    open_per_counter
}

/// Periodic sampler over a set of flow counters.
pub struct CounterMonitor<C> {
    counters: Vec<C>,
}

impl<C: FlowCounter> CounterMonitor<C> {
    pub fn new(counters: Vec<C>) -> Self {
        Self { counters }
    }

    #[must_use]
    pub fn counters(&self) -> &[C] {
        &self.counters
    }

    /// Read every counter, then update contention and attribute the readings.
    ///
    /// Contention is evaluated after the reads so a faucet opened on a
    /// counter while it was being read is accounted for.
    ///
    /// Returns the number of samples recorded.
    #[tracing::instrument(skip_all)]
    pub fn sample(&self, bank: &FaucetBank) -> usize {
        let readings: Vec<(&CounterId, f64)> = self
            .counters
            .iter()
            .filter_map(|counter| {
                let id = counter.counter_id();
                counter
                    .read_flow()
                    .inspect_err(|err| {
                        tracing::warn!(counter = %id, error = %err, "counter read failed");
                    })
                    .ok()
                    .map(|flow| (id, flow))
            })
            .collect();

        let open_per_counter = update_contention(bank);
        let mut recorded = 0;

        for (id, flow) in readings {
            let Some([name]) = open_per_counter.get(id).map(Vec::as_slice) else {
                tracing::debug!(counter = %id, "no single open faucet on counter");
                continue;
            };
            let Some(faucet) = bank.get(name) else {
                continue;
            };

            let mut guard = lock_faucet(&faucet);
            if guard.faucet().is_open() && guard.faucet().is_all_alone() {
                guard.record_flow_sample(flow);
                recorded += 1;
                tracing::debug!(counter = %id, faucet = %name, flow, "recorded flow sample");
            } else {
                tracing::debug!(
                    counter = %id,
                    faucet = %name,
                    "faucet not alone for this interval"
                );
            }
        }
        recorded
    }
}
