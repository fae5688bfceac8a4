use log::info;
use vn_core::{EngineSnapshot, EngineState, SaveCursor, VnError, SNAPSHOT_SCHEMA_V1};

use super::ScriptEngine;
use crate::signal::CancelToken;

impl ScriptEngine {
    pub fn save_cursor(&self) -> SaveCursor {
        SaveCursor {
            script_name: self.flow.program.script_name.clone(),
            line_index: self.flow.cursor,
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            schema_version: SNAPSHOT_SCHEMA_V1.to_string(),
            cursor: self.save_cursor(),
            waiting_for_choice: self.flow.state == EngineState::WaitingForChoice,
            choices: self.flow.choices.clone(),
        }
    }

    pub fn resume(&mut self, snapshot: &EngineSnapshot) -> Result<(), VnError> {
        if snapshot.schema_version != SNAPSHOT_SCHEMA_V1 {
            return Err(VnError::new(
                "ENGINE_SNAPSHOT_SCHEMA",
                format!(
                    "Snapshot schema \"{}\" is not supported, expected \"{}\".",
                    snapshot.schema_version, SNAPSHOT_SCHEMA_V1
                ),
            ));
        }
        if snapshot.cursor.script_name != self.flow.program.script_name {
            return Err(VnError::new(
                "ENGINE_SNAPSHOT_SCRIPT",
                format!(
                    "Snapshot belongs to \"{}\" but \"{}\" is loaded.",
                    snapshot.cursor.script_name, self.flow.program.script_name
                ),
            ));
        }
        if snapshot.cursor.line_index > self.flow.program.len() {
            return Err(VnError::new(
                "ENGINE_SNAPSHOT_CURSOR",
                format!(
                    "Snapshot line {} is past the end of \"{}\".",
                    snapshot.cursor.line_index, self.flow.program.script_name
                ),
            ));
        }
        if snapshot.waiting_for_choice && snapshot.choices.is_empty() {
            return Err(VnError::new(
                "ENGINE_SNAPSHOT_CHOICES",
                "Snapshot waits for a choice but has no choice items.",
            ));
        }

        self.cancel.cancel();
        self.cancel = CancelToken::new();
        self.suspension = None;
        self.advance_pending = false;
        self.flow.cursor = snapshot.cursor.line_index;
        self.flow.redirected = false;
        self.flow.choices = snapshot.choices.clone();
        if snapshot.waiting_for_choice {
            self.flow.pause_for_choice(true);
            if let Some(presentation) = &self.services.presentation {
                presentation.show_choices(&self.flow.choices);
            }
        } else {
            self.flow.paused_on_line = false;
            self.flow.state = EngineState::Running;
        }
        info!(
            target: "vn::engine",
            "resumed \"{}\" at line {}",
            self.flow.program.script_name, self.flow.cursor
        );
        Ok(())
    }
}
