// Report module - reporting sinks that receive lifecycle events

pub mod console;
pub mod recording;
pub mod streaming;

use crate::error::SinkError;
use crate::events::LifecycleEvent;
use std::sync::Arc;

pub use console::ConsoleSink;
pub use recording::RecordingSink;
pub use streaming::StreamingJsonSink;

/// Reporting sink trait
pub trait EventSink: Send + Sync {
    /// Accept one event; called in firing order
    fn fire(&self, event: LifecycleEvent) -> Result<(), SinkError>;
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn fire(&self, event: LifecycleEvent) -> Result<(), SinkError> {
        (**self).fire(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn fire(&self, event: LifecycleEvent) -> Result<(), SinkError> {
        (**self).fire(event)
    }
}
