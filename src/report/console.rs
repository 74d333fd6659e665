// Console sink - one readable line per event

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use console::style;

use super::EventSink;
use crate::error::SinkError;
use crate::events::LifecycleEvent;
use crate::state::TestStatus;

/// Console sink
pub struct ConsoleSink<W: Write + Send> {
    writer: Mutex<W>,
    color: bool,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn paint(&self, text: String, status: Option<TestStatus>) -> String {
        let styled = style(text).force_styling(self.color);
        match status {
            Some(TestStatus::Pass) => styled.green().to_string(),
            Some(TestStatus::Fail) => styled.red().to_string(),
            Some(TestStatus::Skip) => styled.yellow().to_string(),
            None => styled.to_string(),
        }
    }

    fn render(&self, event: &LifecycleEvent) -> String {
        match event {
            LifecycleEvent::SuiteStarted(e) => {
                self.paint(format!("▶ SUITE {} ({})", e.title, e.uid), None)
            }
            LifecycleEvent::SuiteFinished(e) => self.paint(format!("■ SUITE {}", e.uid), None),
            LifecycleEvent::TestStarted(e) => {
                let mut line = format!("  ▷ {}", e.name);
                if let Some(title) = &e.title {
                    line.push_str(&format!(" \"{}\"", title));
                }
                for label in &e.labels {
                    line.push_str(&format!(" {}={}", label.name, label.value));
                }
                self.paint(line, None)
            }
            LifecycleEvent::AddParameter(e) => self.paint(
                format!(
                    "    • {} = {}",
                    e.name.as_deref().unwrap_or("?"),
                    e.value
                ),
                None,
            ),
            LifecycleEvent::TestCanceled(e) => {
                let reason = e
                    .throwable
                    .as_ref()
                    .map(|t| format!(": {}", t))
                    .unwrap_or_default();
                self.paint(format!("    ⚠️  canceled{}", reason), Some(TestStatus::Skip))
            }
            LifecycleEvent::TestFinished(e) => {
                let (mark, status) = match e.status {
                    TestStatus::Pass => ("✅", "PASSED"),
                    TestStatus::Fail => ("❌", "FAILED"),
                    TestStatus::Skip => ("⏭️ ", "SKIPPED"),
                };
                let mut line = format!("  {} {}", mark, status);
                if let Some(throwable) = &e.throwable {
                    line.push_str(&format!(" ({})", throwable));
                }
                self.paint(line, Some(e.status))
            }
        }
    }
}

impl<W: Write + Send> EventSink for ConsoleSink<W> {
    fn fire(&self, event: LifecycleEvent) -> Result<(), SinkError> {
        let line = self.render(&event);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}
