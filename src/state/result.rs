// Test invocation structures

use crate::state::TestContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a test method
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    #[serde(default)]
    pub class_name: String,
    pub method_name: String,
}

impl MethodRef {
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
        }
    }

    /// `class.method`, or the bare method name when the class is unknown
    pub fn full_name(&self) -> String {
        if self.class_name.is_empty() {
            self.method_name.clone()
        } else {
            format!("{}.{}", self.class_name, self.method_name)
        }
    }
}

/// Runtime argument value passed to a test method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Arrays and objects, rendered as compact JSON
    Other(serde_json::Value),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            // Debug keeps the fractional part: 10.0 stays "10.0"
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Str(s) => f.write_str(s),
            Self::Other(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Error recorded against a test invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throwable {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stack_trace: Vec<String>,
}

impl Throwable {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            message: None,
            stack_trace: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.class_name, message),
            None => f.write_str(&self.class_name),
        }
    }
}

/// One test invocation as reported by the host framework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub method: MethodRef,
    #[serde(default)]
    pub parameters: Vec<ArgValue>,
    #[serde(default)]
    pub throwable: Option<Throwable>,
    pub context: TestContext,
}

impl TestResult {
    /// Create an invocation of `class.name` with no arguments
    pub fn new(
        context: TestContext,
        class_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            method: MethodRef::new(class_name, name.clone()),
            name,
            parameters: Vec::new(),
            throwable: None,
            context,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ArgValue>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_throwable(mut self, throwable: Throwable) -> Self {
        self.throwable = Some(throwable);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_value_display() {
        assert_eq!(ArgValue::Float(10.0).to_string(), "10.0");
        assert_eq!(ArgValue::Float(2.5).to_string(), "2.5");
        assert_eq!(ArgValue::Int(42).to_string(), "42");
        assert_eq!(ArgValue::Bool(true).to_string(), "true");
        assert_eq!(ArgValue::Null.to_string(), "null");
        assert_eq!(ArgValue::from("string").to_string(), "string");
        assert_eq!(
            ArgValue::Other(serde_json::json!(["a", 1])).to_string(),
            r#"["a",1]"#
        );
    }

    #[test]
    fn test_arg_value_large_float_uses_exponent() {
        // JVM toString would give "1.0E20"
        assert_eq!(ArgValue::Float(1e20).to_string(), "1e20");
        assert_eq!(ArgValue::Float(1e-7).to_string(), "1e-7");
    }

    #[test]
    fn test_arg_value_deserialize_untagged() {
        let values: Vec<ArgValue> =
            serde_json::from_str(r#"[null, true, 7, 10.0, "text", [1, 2], {"k": "v"}]"#)
                .unwrap();
        assert_eq!(
            values,
            vec![
                ArgValue::Null,
                ArgValue::Bool(true),
                ArgValue::Int(7),
                ArgValue::Float(10.0),
                ArgValue::Str("text".to_string()),
                ArgValue::Other(serde_json::json!([1, 2])),
                ArgValue::Other(serde_json::json!({"k": "v"})),
            ]
        );
    }

    #[test]
    fn test_method_full_name() {
        assert_eq!(MethodRef::new("pkg.Tests", "f").full_name(), "pkg.Tests.f");
        assert_eq!(MethodRef::new("", "f").full_name(), "f");
    }

    #[test]
    fn test_throwable_display() {
        let npe = Throwable::new("java.lang.NullPointerException");
        assert_eq!(npe.to_string(), "java.lang.NullPointerException");
        let with_message = Throwable::new("AssertionError").with_message("expected 1");
        assert_eq!(with_message.to_string(), "AssertionError: expected 1");
    }

    #[test]
    fn test_result_builder() {
        let result = TestResult::new(TestContext::new("s", "x"), "Tests", "test")
            .with_parameters(vec![ArgValue::Int(1)])
            .with_throwable(Throwable::new("E"));
        assert_eq!(result.name, "test");
        assert_eq!(result.method.full_name(), "Tests.test");
        assert_eq!(result.parameters.len(), 1);
        assert!(result.throwable.is_some());
    }
}
