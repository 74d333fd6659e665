// Listener - host lifecycle callbacks into ordered reporting events
// Each callback fires its events in one uninterrupted sequence; the suite uid
// cache is the only state shared between callbacks

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::annotations::{Annotation, AnnotationSource, NoAnnotations};
use crate::error::{ListenerError, Result};
use crate::events::{
    AddParameterEvent, CanceledEvent, FinishedEvent, Label, LifecycleEvent, StartedEvent,
    SuiteFinishedEvent, SuiteStartedEvent,
};
use crate::report::EventSink;
use crate::state::{TestContext, TestResult};
use crate::suite::{EmptyParameters, SuiteUidCache, suite_title};

/// Listener options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Attach a `thread` label to started test cases
    pub executor_labels: bool,
    pub empty_local_parameters: EmptyParameters,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            executor_labels: true,
            empty_local_parameters: EmptyParameters::Omit,
        }
    }
}

/// Lifecycle listener
pub struct Listener {
    sink: Arc<dyn EventSink>,
    annotations: Arc<dyn AnnotationSource>,
    suite_uids: Arc<SuiteUidCache>,
    options: ListenerOptions,
    emit_lock: Mutex<()>,
}

impl Listener {
    /// Create a listener firing into `sink`, with no annotation source
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            annotations: Arc::new(NoAnnotations),
            suite_uids: Arc::new(SuiteUidCache::new()),
            options: ListenerOptions::default(),
            emit_lock: Mutex::new(()),
        }
    }

    pub fn with_annotations(mut self, annotations: Arc<dyn AnnotationSource>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_suite_uids(mut self, suite_uids: Arc<SuiteUidCache>) -> Self {
        self.suite_uids = suite_uids;
        self
    }

    pub fn with_options(mut self, options: ListenerOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the reporting sink
    pub fn set_lifecycle(&mut self, sink: Arc<dyn EventSink>) {
        self.sink = sink;
    }

    pub fn options(&self) -> &ListenerOptions {
        &self.options
    }

    /// Suite started
    pub fn on_start(&self, context: &TestContext) -> Result<()> {
        let event = SuiteStartedEvent {
            uid: self.suite_uid(context),
            title: self.current_suite_title(context),
        };
        self.emit(vec![LifecycleEvent::SuiteStarted(event)])
    }

    /// Suite finished
    pub fn on_finish(&self, context: &TestContext) -> Result<()> {
        let event = SuiteFinishedEvent {
            uid: self.suite_uid(context),
        };
        self.emit(vec![LifecycleEvent::SuiteFinished(event)])
    }

    /// Test started: StartedEvent, then one AddParameterEvent per named argument
    pub fn on_test_start(&self, result: &TestResult) -> Result<()> {
        let started = self.started_event(result)?;
        let parameters = self.parameter_events(result)?;

        let mut events = Vec::with_capacity(1 + parameters.len());
        events.push(LifecycleEvent::TestStarted(started));
        events.extend(parameters.into_iter().map(LifecycleEvent::AddParameter));
        self.emit(events)
    }

    pub fn on_test_success(&self, _result: &TestResult) -> Result<()> {
        self.emit(vec![LifecycleEvent::TestFinished(FinishedEvent::passed())])
    }

    pub fn on_test_failure(&self, result: &TestResult) -> Result<()> {
        self.emit(vec![LifecycleEvent::TestFinished(FinishedEvent::failed(
            result.throwable.clone(),
        ))])
    }

    /// Test skipped. The host sends no start callback for skipped tests, so
    /// this fires StartedEvent, CanceledEvent and FinishedEvent itself.
    pub fn on_test_skipped(&self, result: &TestResult) -> Result<()> {
        let started = self.started_event(result)?;
        self.emit(vec![
            LifecycleEvent::TestStarted(started),
            LifecycleEvent::TestCanceled(CanceledEvent {
                throwable: result.throwable.clone(),
            }),
            LifecycleEvent::TestFinished(FinishedEvent::skipped()),
        ])
    }

    /// Uid shared by every callback of the suite `context` belongs to
    pub fn suite_uid(&self, context: &TestContext) -> String {
        self.suite_uids.uid_for(context)
    }

    pub fn current_suite_title(&self, context: &TestContext) -> String {
        suite_title(context, self.options.empty_local_parameters)
    }

    /// Annotations declared on the invoked test method
    pub fn method_annotations(&self, result: &TestResult) -> Result<Vec<Annotation>> {
        self.annotations.method_annotations(&result.method)
    }

    fn started_event(&self, result: &TestResult) -> Result<StartedEvent> {
        let annotations = self.method_annotations(result)?;
        let mut event = StartedEvent::new(self.suite_uid(&result.context), test_title(result));

        for annotation in annotations {
            match annotation {
                Annotation::Title(title) => event.title = Some(title),
                Annotation::Description(description) => event.description = Some(description),
                Annotation::Features(values) => push_labels(&mut event, "feature", values),
                Annotation::Stories(values) => push_labels(&mut event, "story", values),
                Annotation::Issues(values) => push_labels(&mut event, "issue", values),
                Annotation::Severity(severity) => {
                    event.labels.push(Label::new("severity", severity.as_str()))
                }
                Annotation::TestCaseId(id) => event.labels.push(Label::new("testId", id)),
            }
        }

        if self.options.executor_labels {
            event.labels.push(Label::new("thread", current_thread_name()));
        }

        Ok(event)
    }

    /// One event per runtime argument whose declared parameter has a name
    fn parameter_events(&self, result: &TestResult) -> Result<Vec<AddParameterEvent>> {
        let mut events = Vec::new();
        for (index, value) in result.parameters.iter().enumerate() {
            if let Some(name) = self.annotations.parameter_name(&result.method, index)? {
                events.push(AddParameterEvent::argument(Some(name), value.to_string()));
            }
        }
        Ok(events)
    }

    /// Fire `events` in order without interleaving other callbacks.
    /// A failing fire does not stop the rest; the first failure is returned.
    fn emit(&self, events: Vec<LifecycleEvent>) -> Result<()> {
        let _guard = self.emit_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut first_error: Option<ListenerError> = None;
        for event in events {
            let kind = event.kind();
            debug!("firing {}", kind);
            if let Err(e) = self.sink.fire(event) {
                warn!("reporting sink failed on {}: {}", kind, e);
                first_error.get_or_insert(e.into());
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// `name`, or `name[v1,v2,...]` when the invocation has arguments
pub fn test_title(result: &TestResult) -> String {
    if result.parameters.is_empty() {
        return result.name.clone();
    }

    let values = result
        .parameters
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{}[{}]", result.name, values)
}

fn push_labels(event: &mut StartedEvent, name: &str, values: Vec<String>) {
    event
        .labels
        .extend(values.into_iter().map(|value| Label::new(name, value)));
}

fn current_thread_name() -> String {
    let thread = std::thread::current();
    thread
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:?}", thread.id()))
}
