use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOOP_GUARD_LIMIT: usize = 1000;
pub const DEFAULT_BACKLOG_LIMIT: usize = 100;
pub const DEFAULT_DIAGNOSTICS_LIMIT: usize = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingServicePolicy {
    #[default]
    Skip,
    Fatal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackMode {
    #[default]
    Normal,
    Auto,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoPlayTiming {
    pub base_delay_ms: u64,
    pub per_char_delay_ms: u64,
}

impl Default for AutoPlayTiming {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            per_char_delay_ms: 50,
        }
    }
}

impl AutoPlayTiming {
    pub fn delay_for(&self, text: &str) -> Duration {
        let chars = text.chars().count() as u64;
        Duration::from_millis(
            self.base_delay_ms
                .saturating_add(self.per_char_delay_ms.saturating_mul(chars)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    pub loop_guard_limit: usize,
    pub missing_service: MissingServicePolicy,
    pub rich_text: bool,
    pub backlog_limit: usize,
    pub diagnostics_limit: usize,
    pub playback_mode: PlaybackMode,
    pub auto_play: AutoPlayTiming,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            loop_guard_limit: DEFAULT_LOOP_GUARD_LIMIT,
            missing_service: MissingServicePolicy::Skip,
            rich_text: true,
            backlog_limit: DEFAULT_BACKLOG_LIMIT,
            diagnostics_limit: DEFAULT_DIAGNOSTICS_LIMIT,
            playback_mode: PlaybackMode::Normal,
            auto_play: AutoPlayTiming::default(),
        }
    }
}
