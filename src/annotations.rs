// Annotation lookup for test methods
// Sources can be backed by reflection output, static analysis, or the
// [[methods]] section of the config file

use crate::error::{ListenerError, Result};
use crate::state::MethodRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Severity level of a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blocker,
    Critical,
    Normal,
    Minor,
    Trivial,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocker => "blocker",
            Self::Critical => "critical",
            Self::Normal => "normal",
            Self::Minor => "minor",
            Self::Trivial => "trivial",
        }
    }
}

/// Annotation declared on a test method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Title(String),
    Description(String),
    Features(Vec<String>),
    Stories(Vec<String>),
    Issues(Vec<String>),
    Severity(Severity),
    TestCaseId(String),
}

/// Capability to read what a test method declares
pub trait AnnotationSource: Send + Sync {
    /// Annotations declared on the method itself
    fn method_annotations(&self, method: &MethodRef) -> Result<Vec<Annotation>>;

    /// Declared name of parameter `index`, if it carries one
    fn parameter_name(&self, method: &MethodRef, index: usize) -> Result<Option<String>>;
}

/// Source that knows nothing: no annotations, every parameter unnamed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnnotations;

impl AnnotationSource for NoAnnotations {
    fn method_annotations(&self, _method: &MethodRef) -> Result<Vec<Annotation>> {
        Ok(Vec::new())
    }

    fn parameter_name(&self, _method: &MethodRef, _index: usize) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Declaration of one test method
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub annotations: Vec<Annotation>,
    /// One entry per declared parameter, `None` when unnamed
    pub parameters: Vec<Option<String>>,
}

impl MethodDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Declare the next parameter with an explicit name
    pub fn named_parameter(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(Some(name.into()));
        self
    }

    /// Declare the next parameter without a name
    pub fn parameter(mut self) -> Self {
        self.parameters.push(None);
        self
    }
}

/// Explicit registry of method declarations, keyed by `MethodRef::full_name`
///
/// Strict by default: an undeclared method is an error. A lenient registry
/// answers like [`NoAnnotations`] for undeclared methods instead.
#[derive(Debug, Clone, Default)]
pub struct DeclaredAnnotations {
    methods: HashMap<String, MethodDeclaration>,
    lenient: bool,
}

impl DeclaredAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry where undeclared methods have no annotations and no named parameters
    pub fn lenient() -> Self {
        Self {
            methods: HashMap::new(),
            lenient: true,
        }
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Register (or replace) the declaration for `method`
    pub fn declare(&mut self, method: &MethodRef, declaration: MethodDeclaration) {
        self.methods.insert(method.full_name(), declaration);
    }

    pub fn with(mut self, method: &MethodRef, declaration: MethodDeclaration) -> Self {
        self.declare(method, declaration);
        self
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// `None` only for an undeclared method in a lenient registry
    fn lookup(&self, method: &MethodRef) -> Result<Option<&MethodDeclaration>> {
        let name = method.full_name();
        match self.methods.get(&name) {
            Some(declaration) => Ok(Some(declaration)),
            None if self.lenient => Ok(None),
            None => Err(ListenerError::UnknownMethod(name)),
        }
    }
}

impl AnnotationSource for DeclaredAnnotations {
    fn method_annotations(&self, method: &MethodRef) -> Result<Vec<Annotation>> {
        Ok(self
            .lookup(method)?
            .map(|declaration| declaration.annotations.clone())
            .unwrap_or_default())
    }

    fn parameter_name(&self, method: &MethodRef, index: usize) -> Result<Option<String>> {
        let Some(declaration) = self.lookup(method)? else {
            return Ok(None);
        };
        let slot = declaration
            .parameters
            .get(index)
            .ok_or_else(|| ListenerError::ParameterOutOfRange {
                method: method.full_name(),
                index,
                declared: declaration.parameters.len(),
            })?;
        Ok(slot.as_ref().filter(|name| !name.is_empty()).cloned())
    }
}
