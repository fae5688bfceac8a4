use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const SNAPSHOT_SCHEMA_V1: &str = "vn-snapshot.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScriptLine {
    Comment,
    Label {
        name: String,
    },
    Command {
        name: String,
        args: String,
    },
    Dialogue {
        speaker: Option<String>,
        text: String,
    },
    Unknown {
        raw: String,
    },
}

impl ScriptLine {
    pub fn command_name(&self) -> Option<&str> {
        match self {
            Self::Command { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Label { .. } => "label",
            Self::Command { .. } => "command",
            Self::Dialogue { .. } => "dialogue",
            Self::Unknown { .. } => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramLine {
    pub line: ScriptLine,
    pub raw: String,
    pub source_line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub script_name: String,
    pub lines: Vec<ProgramLine>,
    pub labels: BTreeMap<String, usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&ProgramLine> {
        self.lines.get(index)
    }

    pub fn label_index(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    Parse,
    Evaluation,
    Dispatch,
    Runtime,
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: String,
    pub message: String,
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        code: impl Into<String>,
        message: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EngineState {
    Idle,
    Running,
    WaitingForChoice,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceItem {
    pub index: usize,
    pub text: String,
    pub target_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCursor {
    pub script_name: String,
    pub line_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub schema_version: String,
    pub cursor: SaveCursor,
    pub waiting_for_choice: bool,
    pub choices: Vec<ChoiceItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogEntry {
    pub speaker: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EngineOutput {
    Idle,
    #[serde(rename_all = "camelCase")]
    AwaitingAdvance {
        speaker: Option<String>,
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    AwaitingChoice {
        items: Vec<ChoiceItem>,
    },
    #[serde(rename_all = "camelCase")]
    AwaitingEffect {
        command: String,
    },
    #[serde(rename_all = "camelCase")]
    AwaitingTimer {
        remaining_ms: u64,
    },
    Yielded,
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_line_serializes_with_kind_tag() {
        let line = ScriptLine::Dialogue {
            speaker: Some("Narrator".to_string()),
            text: "Hello".to_string(),
        };
        let json = serde_json::to_value(&line).expect("serialize");
        assert_eq!(json["kind"], "dialogue");
        assert_eq!(json["speaker"], "Narrator");
        assert_eq!(line.kind_name(), "dialogue");
        assert_eq!(line.command_name(), None);
    }

    #[test]
    fn output_uses_camel_case_fields() {
        let output = EngineOutput::AwaitingTimer { remaining_ms: 40 };
        let json = serde_json::to_string(&output).expect("serialize");
        assert_eq!(json, r#"{"kind":"awaitingTimer","remainingMs":40}"#);
    }

    #[test]
    fn program_lookup_helpers() {
        let mut program = Program {
            script_name: "main".to_string(),
            ..Program::default()
        };
        assert!(program.is_empty());
        program.lines.push(ProgramLine {
            line: ScriptLine::Label {
                name: "Start".to_string(),
            },
            raw: "[Start]".to_string(),
            source_line: 1,
        });
        program.labels.insert("Start".to_string(), 0);
        assert_eq!(program.len(), 1);
        assert_eq!(program.label_index("Start"), Some(0));
        assert_eq!(program.label_index("Missing"), None);
        assert!(program.line(1).is_none());
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let snapshot = EngineSnapshot {
            schema_version: SNAPSHOT_SCHEMA_V1.to_string(),
            cursor: SaveCursor {
                script_name: "main".to_string(),
                line_index: 4,
            },
            waiting_for_choice: true,
            choices: vec![ChoiceItem {
                index: 0,
                text: "Go".to_string(),
                target_label: "Forest".to_string(),
            }],
        };
        let json = serde_json::to_string(&snapshot).expect("serialize");
        assert!(json.contains("\"waitingForChoice\":true"));
        let decoded: EngineSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, snapshot);
    }
}
