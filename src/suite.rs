// Suite identity - uid memoization and suite titles

use crate::state::TestContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Key grouping callbacks of one suite execution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuiteKey {
    pub suite_name: String,
    pub xml_test_name: String,
}

impl From<&TestContext> for SuiteKey {
    fn from(context: &TestContext) -> Self {
        Self {
            suite_name: context.suite_name.clone(),
            xml_test_name: context.xml_test.name.clone(),
        }
    }
}

/// Thread-safe memo of suite uids
///
/// The first lookup for a key generates a random uid; every later lookup for
/// the same key returns it. Share one cache between listeners with `Arc` when
/// they must agree on uids.
#[derive(Debug, Default)]
pub struct SuiteUidCache {
    uids: RwLock<HashMap<SuiteKey, String>>,
}

impl SuiteUidCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uid for the suite `context` belongs to
    pub fn uid_for(&self, context: &TestContext) -> String {
        let key = SuiteKey::from(context);

        if let Some(uid) = self
            .uids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return uid.clone();
        }

        // Racing first lookups converge on whichever insert wins
        self.uids
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.uids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rendering of the suite title when the XML test has no local parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyParameters {
    /// `suite : xmlTest`
    #[default]
    Omit,
    /// `suite : xmlTest[]`
    Brackets,
}

/// `"<suite> : <xmlTest>[k1=v1, k2=v2]"`, parameters in key order
pub fn suite_title(context: &TestContext, empty: EmptyParameters) -> String {
    let mut title = format!("{} : {}", context.suite_name, context.xml_test.name);

    let parameters = &context.xml_test.local_parameters;
    if !parameters.is_empty() || empty == EmptyParameters::Brackets {
        let joined = parameters
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        title.push('[');
        title.push_str(&joined);
        title.push(']');
    }

    title
}
