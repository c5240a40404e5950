use std::sync::Mutex;

use vigil_ledger::events::{LedgerEvent, Notify};
use vigil_ledger::verify::VerifyFailure;

/// Event sink that records everything for assertions.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<LedgerEvent>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<VerifyFailure> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                LedgerEvent::VerifyFailed { failure } => Some(failure),
                _ => None,
            })
            .collect()
    }
}

impl Notify for Recorder {
    fn emit(&self, event: &LedgerEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
