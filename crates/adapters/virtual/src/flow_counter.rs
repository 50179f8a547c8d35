//! Virtual flow counter: reports a settable flow.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, Ordering};

use irrigator_app::ports::{CounterReadError, FlowCounter};
use irrigator_domain::counter::CounterId;

use crate::error::VirtualError;

/// A simulated water meter.
pub struct VirtualFlowCounter {
    id: CounterId,
    flow: Mutex<f64>,
    offline: AtomicBool,
}

impl VirtualFlowCounter {
    pub fn new(id: impl Into<String>, flow: f64) -> Self {
        Self {
            id: CounterId::new(id),
            flow: Mutex::new(flow),
            offline: AtomicBool::new(false),
        }
    }

    /// Change the flow reported by following reads.
    pub fn set_flow(&self, flow: f64) {
        *self.flow.lock().unwrap_or_else(PoisonError::into_inner) = flow;
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl FlowCounter for VirtualFlowCounter {
    fn counter_id(&self) -> &CounterId {
        &self.id
    }

    fn read_flow(&self) -> Result<f64, CounterReadError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CounterReadError::new(
                self.id.clone(),
                VirtualError::Offline(self.id.to_string()),
            ));
        }
        Ok(*self.flow.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
