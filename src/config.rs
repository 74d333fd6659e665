// Configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::annotations::{
    Annotation, AnnotationSource, DeclaredAnnotations, MethodDeclaration, NoAnnotations, Severity,
};
use crate::listener::ListenerOptions;
use crate::state::MethodRef;
use crate::suite::EmptyParameters;

pub const CONFIG_FILE_NAME: &str = ".allurelistenerrc.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listener: ListenerConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Test method declarations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// Attach the worker thread name to started test cases
    #[serde(default = "default_executor_labels")]
    pub executor_labels: bool,

    /// Suite title suffix when the XML test has no local parameters
    #[serde(default)]
    pub empty_local_parameters: EmptyParameters,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            executor_labels: default_executor_labels(),
            empty_local_parameters: EmptyParameters::default(),
        }
    }
}

/// Output format of the replay command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Console,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Output file; stdout when absent
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Enable colored console output
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            path: None,
            color: default_color(),
        }
    }
}

/// Declaration of one test method
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodConfig {
    #[serde(default)]
    pub class: String,
    pub name: String,

    /// Declared parameter names in order; "" marks an unnamed parameter
    #[serde(default)]
    pub parameters: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_case_id: Option<String>,
}

impl MethodConfig {
    pub fn method_ref(&self) -> MethodRef {
        MethodRef::new(self.class.clone(), self.name.clone())
    }

    pub fn declaration(&self) -> MethodDeclaration {
        let mut annotations = Vec::new();
        if let Some(title) = &self.title {
            annotations.push(Annotation::Title(title.clone()));
        }
        if let Some(description) = &self.description {
            annotations.push(Annotation::Description(description.clone()));
        }
        if !self.features.is_empty() {
            annotations.push(Annotation::Features(self.features.clone()));
        }
        if !self.stories.is_empty() {
            annotations.push(Annotation::Stories(self.stories.clone()));
        }
        if !self.issues.is_empty() {
            annotations.push(Annotation::Issues(self.issues.clone()));
        }
        if let Some(severity) = self.severity {
            annotations.push(Annotation::Severity(severity));
        }
        if let Some(id) = &self.test_case_id {
            annotations.push(Annotation::TestCaseId(id.clone()));
        }

        MethodDeclaration {
            annotations,
            parameters: self
                .parameters
                .iter()
                .map(|name| (!name.is_empty()).then(|| name.clone()))
                .collect(),
        }
    }
}

fn default_executor_labels() -> bool {
    true
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // 1. ./.allurelistenerrc.toml
        // 2. ~/.allurelistenerrc.toml
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }

        for path in &paths {
            if path.exists() {
                match Self::load_from_file(path) {
                    Ok(config) => return Some(config),
                    Err(e) => tracing::warn!("Ignoring {}: {:#}", path.display(), e),
                }
            }
        }

        None
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn listener_options(&self) -> ListenerOptions {
        ListenerOptions {
            executor_labels: self.listener.executor_labels,
            empty_local_parameters: self.listener.empty_local_parameters,
        }
    }

    /// Annotation source built from the `[[methods]]` declarations
    ///
    /// Methods missing from the config have no annotations and unnamed
    /// parameters, so a config without `[[methods]]` behaves like none at all.
    pub fn annotations(&self) -> Arc<dyn AnnotationSource> {
        if self.methods.is_empty() {
            return Arc::new(NoAnnotations);
        }
        let mut annotations = DeclaredAnnotations::lenient();
        for method in &self.methods {
            annotations.declare(&method.method_ref(), method.declaration());
        }
        Arc::new(annotations)
    }
}
