use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vn_core::EngineOptions;

pub const TESTCASE_SCHEMA_V1: &str = "vn-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default = "default_entry_script")]
    pub entry_script: String,
    #[serde(default)]
    pub options: EngineOptions,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
}

fn default_entry_script() -> String {
    "main".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Choose { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExpectedEvent {
    Dialogue {
        #[serde(default)]
        speaker: Option<String>,
        text: String,
    },
    Choices {
        choices: Vec<String>,
    },
    End,
}
