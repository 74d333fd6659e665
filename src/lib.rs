pub mod annotations;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod listener;
pub mod logging;
pub mod replay;
pub mod report;
pub mod state;
pub mod suite;

pub use error::{ListenerError, Result, SinkError};
pub use events::LifecycleEvent;
pub use listener::{Listener, ListenerOptions};
pub use report::EventSink;
