// Replay - drive a listener from a recorded script of host callbacks
//
// One JSON object per line, tagged by "callback":
//   {"callback":"suite_start","context":{...}}
//   {"callback":"test_start","result":{...}}
// Blank lines and lines starting with '#' are skipped.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::debug;

use crate::listener::Listener;
use crate::state::{TestContext, TestResult, TestStatus};

/// A host framework callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "callback", rename_all = "snake_case")]
pub enum HostCallback {
    SuiteStart { context: TestContext },
    SuiteFinish { context: TestContext },
    TestStart { result: TestResult },
    TestSuccess { result: TestResult },
    TestFailure { result: TestResult },
    TestSkipped { result: TestResult },
}

impl HostCallback {
    /// Outcome reported by this callback, if it ends a test
    pub fn outcome(&self) -> Option<TestStatus> {
        match self {
            Self::TestSuccess { .. } => Some(TestStatus::Pass),
            Self::TestFailure { .. } => Some(TestStatus::Fail),
            Self::TestSkipped { .. } => Some(TestStatus::Skip),
            _ => None,
        }
    }
}

/// Deliver one callback to the listener
pub fn dispatch(listener: &Listener, callback: &HostCallback) -> crate::error::Result<()> {
    match callback {
        HostCallback::SuiteStart { context } => listener.on_start(context),
        HostCallback::SuiteFinish { context } => listener.on_finish(context),
        HostCallback::TestStart { result } => listener.on_test_start(result),
        HostCallback::TestSuccess { result } => listener.on_test_success(result),
        HostCallback::TestFailure { result } => listener.on_test_failure(result),
        HostCallback::TestSkipped { result } => listener.on_test_skipped(result),
    }
}

/// Counts of replayed test outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    callbacks: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
}

impl ReplaySummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a delivered callback
    pub fn add(&mut self, callback: &HostCallback) {
        self.callbacks += 1;
        match callback.outcome() {
            Some(TestStatus::Pass) => self.passed += 1,
            Some(TestStatus::Fail) => self.failed += 1,
            Some(TestStatus::Skip) => self.skipped += 1,
            None => {}
        }
    }

    pub fn callbacks(&self) -> usize {
        self.callbacks
    }

    /// Tests that reached an outcome
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Parse one script line; `None` for blank and comment lines
pub fn parse_line(line: &str) -> Result<Option<HostCallback>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

/// Replay every callback of `reader` through `listener`, stopping at the first error
pub fn replay<R: BufRead>(listener: &Listener, reader: R) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read script line {}", line_no))?;
        let Some(callback) = parse_line(&line)
            .with_context(|| format!("Invalid callback on line {}", line_no))?
        else {
            continue;
        };

        debug!("line {}: {:?}", line_no, callback);
        dispatch(listener, &callback)
            .with_context(|| format!("Listener failed on line {}", line_no))?;
        summary.add(&callback);
    }

    Ok(summary)
}
