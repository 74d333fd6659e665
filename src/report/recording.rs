// Recording sink - keeps every event in memory

use super::EventSink;
use crate::error::SinkError;
use crate::events::LifecycleEvent;
use std::sync::{Mutex, PoisonError};

/// In-memory sink, for embedding hosts and tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events fired so far
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the recorded events
    pub fn take(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingSink {
    fn fire(&self, event: LifecycleEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CanceledEvent, FinishedEvent};

    #[test]
    fn test_records_in_order_and_drains() {
        let sink = RecordingSink::new();
        sink.fire(LifecycleEvent::TestCanceled(CanceledEvent::default()))
            .unwrap();
        sink.fire(LifecycleEvent::TestFinished(FinishedEvent::skipped()))
            .unwrap();

        let kinds: Vec<&str> = sink.events().iter().map(LifecycleEvent::kind).collect();
        assert_eq!(kinds, vec!["test_canceled", "test_finished"]);

        assert_eq!(sink.take().len(), 2);
        assert!(sink.is_empty());
    }
}
