// State module - host-side view of a running test
// What the host framework hands to the listener on each callback

pub mod result;

pub use result::{ArgValue, MethodRef, TestResult, Throwable};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Active XML-test configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlTest {
    pub name: String,

    /// Local key/value parameters, iterated in key order
    #[serde(default)]
    pub local_parameters: BTreeMap<String, String>,
}

impl XmlTest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_parameters: BTreeMap::new(),
        }
    }
}

/// Context a test runs in: the owning suite and the active XML test
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestContext {
    pub suite_name: String,
    pub xml_test: XmlTest,
}

impl TestContext {
    /// Create a context with no local parameters
    pub fn new(suite_name: impl Into<String>, xml_test_name: impl Into<String>) -> Self {
        Self {
            suite_name: suite_name.into(),
            xml_test: XmlTest::new(xml_test_name),
        }
    }

    /// Add a local parameter to the active XML test
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.xml_test
            .local_parameters
            .insert(key.into(), value.into());
        self
    }
}

/// Test status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "passed",
            Self::Fail => "failed",
            Self::Skip => "skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_parameters_are_sorted() {
        let context = TestContext::new("suite", "xml")
            .with_parameter("zeta", "1")
            .with_parameter("alpha", "2");
        let keys: Vec<&str> = context
            .xml_test
            .local_parameters
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_context_deserialize_without_parameters() {
        let context: TestContext =
            serde_json::from_str(r#"{"suite_name":"s","xml_test":{"name":"x"}}"#).unwrap();
        assert_eq!(context, TestContext::new("s", "x"));
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(TestStatus::Pass.as_str(), "passed");
        assert_eq!(TestStatus::Fail.as_str(), "failed");
        assert_eq!(TestStatus::Skip.as_str(), "skipped");
    }
}
