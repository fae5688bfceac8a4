use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vn_core::{BacklogEntry, EngineOptions, EngineSnapshot};

pub(crate) const PLAYER_STATE_SCHEMA: &str = "player-state.v1";

#[derive(Debug, Clone)]
pub(crate) struct LoadedScenario {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) scripts: BTreeMap<String, String>,
    pub(crate) entry_script: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerState {
    pub(crate) schema_version: String,
    pub(crate) scenario_id: String,
    pub(crate) entry_script: String,
    pub(crate) snapshot: EngineSnapshot,
    #[serde(default)]
    pub(crate) variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundaryEvent {
    Choices,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TranscriptLine {
    Text(BacklogEntry),
    Effect(String),
}

pub(crate) const EFFECT_PREFIX: &str = "* ";

pub(crate) fn speaker_line(entry: &BacklogEntry) -> String {
    match &entry.speaker {
        Some(speaker) => format!("{}: {}", speaker, entry.text),
        None => entry.text.clone(),
    }
}

impl TranscriptLine {
    pub(crate) fn display(&self) -> String {
        match self {
            TranscriptLine::Text(entry) => speaker_line(entry),
            TranscriptLine::Effect(effect) => format!("{}{}", EFFECT_PREFIX, effect),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BoundaryResult {
    pub(crate) event: BoundaryEvent,
    pub(crate) transcript: Vec<TranscriptLine>,
    pub(crate) choices: Vec<(usize, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TuiCommandAction {
    NotHandled,
    Continue,
    RefreshBoundary,
    Quit,
}

pub(crate) struct TuiCommandContext<'a> {
    pub(crate) state_file: &'a str,
    pub(crate) scenario: &'a LoadedScenario,
    pub(crate) entry_script: &'a str,
    pub(crate) config: &'a EngineOptions,
}
