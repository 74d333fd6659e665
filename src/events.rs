// Lifecycle events - what the listener sends to the reporting sink
// Fire-and-forget: the listener builds and orders them, the sink stores them

use crate::state::{TestStatus, Throwable};
use serde::{Deserialize, Serialize};

/// Event fired to the reporting sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A suite (one XML test of a suite run) started
    SuiteStarted(SuiteStartedEvent),

    /// A suite finished
    SuiteFinished(SuiteFinishedEvent),

    /// A test case started
    TestStarted(StartedEvent),

    /// A named argument of the running test case
    AddParameter(AddParameterEvent),

    /// The running test case was skipped
    TestCanceled(CanceledEvent),

    /// The running test case finished; always its last event
    TestFinished(FinishedEvent),
}

impl LifecycleEvent {
    /// Short event name, matching the serialized tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SuiteStarted(_) => "suite_started",
            Self::SuiteFinished(_) => "suite_finished",
            Self::TestStarted(_) => "test_started",
            Self::AddParameter(_) => "add_parameter",
            Self::TestCanceled(_) => "test_canceled",
            Self::TestFinished(_) => "test_finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteStartedEvent {
    pub uid: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteFinishedEvent {
    pub uid: String,
}

/// Label attached to a started test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedEvent {
    pub suite_uid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

impl StartedEvent {
    pub fn new(suite_uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            suite_uid: suite_uid.into(),
            name: name.into(),
            title: None,
            description: None,
            labels: Vec::new(),
        }
    }

    /// First value of the label `name`, if any
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.value.as_str())
    }
}

/// Where a reported parameter came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterKind {
    /// A test method argument
    Argument,
}

impl ParameterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Argument => "ARGUMENT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddParameterEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: String,
    pub kind: ParameterKind,
}

impl AddParameterEvent {
    pub fn argument(name: Option<String>, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            kind: ParameterKind::Argument,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanceledEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throwable: Option<Throwable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedEvent {
    pub status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throwable: Option<Throwable>,
}

impl FinishedEvent {
    pub fn passed() -> Self {
        Self {
            status: TestStatus::Pass,
            throwable: None,
        }
    }

    pub fn failed(throwable: Option<Throwable>) -> Self {
        Self {
            status: TestStatus::Fail,
            throwable,
        }
    }

    pub fn skipped() -> Self {
        Self {
            status: TestStatus::Skip,
            throwable: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_parameter_serializes_kind() {
        let event =
            LifecycleEvent::AddParameter(AddParameterEvent::argument(Some("n".into()), "string"));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"event": "add_parameter", "name": "n", "value": "string", "kind": "ARGUMENT"})
        );
    }

    #[test]
    fn test_started_event_omits_empty_fields() {
        let event = LifecycleEvent::TestStarted(StartedEvent::new("uid-1", "test"));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"event": "test_started", "suite_uid": "uid-1", "name": "test"})
        );
    }

    #[test]
    fn test_kind_matches_serialized_tag() {
        let events = vec![
            LifecycleEvent::SuiteStarted(SuiteStartedEvent {
                uid: "u".into(),
                title: "t".into(),
            }),
            LifecycleEvent::SuiteFinished(SuiteFinishedEvent { uid: "u".into() }),
            LifecycleEvent::TestStarted(StartedEvent::new("u", "n")),
            LifecycleEvent::AddParameter(AddParameterEvent::argument(None, "v")),
            LifecycleEvent::TestCanceled(CanceledEvent::default()),
            LifecycleEvent::TestFinished(FinishedEvent::skipped()),
        ];
        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["event"], event.kind());
        }
    }

    #[test]
    fn test_finished_failed_carries_throwable() {
        let event = FinishedEvent::failed(Some(Throwable::new("AssertionError")));
        assert_eq!(event.status, TestStatus::Fail);
        assert_eq!(event.throwable.unwrap().class_name, "AssertionError");
    }

    #[test]
    fn test_started_event_label_lookup() {
        let mut event = StartedEvent::new("u", "n");
        event.labels.push(Label::new("feature", "login"));
        assert_eq!(event.label("feature"), Some("login"));
        assert_eq!(event.label("story"), None);
    }
}
