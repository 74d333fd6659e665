// Streaming sink - JSON lines, one event per line

use crate::error::SinkError;
use crate::events::LifecycleEvent;
use serde_json::json;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::EventSink;

/// JSON-lines sink: one object per event
///
/// Each line carries `seq`, `thread` and `timestamp` next to the event's own
/// fields, e.g. `{"event":"test_started","suite_uid":"…","name":"f", "seq":0, …}`.
pub struct StreamingJsonSink<W: Write + Send> {
    writer: Mutex<W>,
    seq: AtomicU64,
}

impl StreamingJsonSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> StreamingJsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            seq: AtomicU64::new(0),
        }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, line: &serde_json::Value) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *writer, line)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> EventSink for StreamingJsonSink<W> {
    fn fire(&self, event: LifecycleEvent) -> Result<(), SinkError> {
        let mut line = serde_json::to_value(&event)?;

        let thread = std::thread::current();
        let thread_name = thread
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:?}", thread.id()));

        if let Some(fields) = line.as_object_mut() {
            fields.insert(
                "seq".to_string(),
                json!(self.seq.fetch_add(1, Ordering::SeqCst)),
            );
            fields.insert("thread".to_string(), json!(thread_name));
            fields.insert(
                "timestamp".to_string(),
                json!(chrono::Utc::now().to_rfc3339()),
            );
        }

        self.emit(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{AddParameterEvent, FinishedEvent};

    #[test]
    fn test_writes_one_line_per_event() {
        let sink = StreamingJsonSink::new(Vec::new());
        sink.fire(LifecycleEvent::AddParameter(AddParameterEvent::argument(
            Some("n".into()),
            "string",
        )))
        .unwrap();
        sink.fire(LifecycleEvent::TestFinished(FinishedEvent::passed()))
            .unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "add_parameter");
        assert_eq!(lines[0]["name"], "n");
        assert_eq!(lines[0]["kind"], "ARGUMENT");
        assert_eq!(lines[0]["seq"], 0);
        assert_eq!(lines[1]["event"], "test_finished");
        assert_eq!(lines[1]["status"], "pass");
        assert_eq!(lines[1]["seq"], 1);
        assert!(lines[1]["timestamp"].is_string());
        assert!(lines[1]["thread"].is_string());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let sink = StreamingJsonSink::new(BrokenPipe);
        let err = sink
            .fire(LifecycleEvent::TestFinished(FinishedEvent::passed()))
            .unwrap_err();
        // serde_json wraps writer errors as io-category json errors
        assert!(matches!(err, SinkError::Json(_) | SinkError::Io(_)));
    }
}
