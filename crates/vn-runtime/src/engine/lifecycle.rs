use log::{debug, info, warn};
use vn_core::{EngineState, Program, SaveCursor, VnError};
use vn_parser::compile_program;

use super::ScriptEngine;
use crate::signal::CancelToken;

impl ScriptEngine {
    pub fn load_program(&mut self, script_name: &str, source: &str) {
        let program = compile_program(script_name, source);
        self.load_compiled(program);
    }

    pub fn load_compiled(&mut self, program: Program) {
        self.cancel.cancel();
        self.suspension = None;
        self.advance_pending = false;
        info!(
            target: "vn::engine",
            "loaded \"{}\" with {} lines",
            program.script_name,
            program.len()
        );

        self.flow.diagnostics.clear();
        for diagnostic in &program.diagnostics {
            self.flow.record(diagnostic.clone());
        }
        self.flow.program = program;
        self.flow.cursor = 0;
        self.flow.state = EngineState::Idle;
        self.flow.choices.clear();
        self.flow.redirected = false;
        self.flow.paused_on_line = false;
    }

    // Swaps in new text for the current script (e.g. after a language change) and
    // picks up where the interrupted playback was.
    pub fn reload_program(&mut self, source: &str) {
        let script_name = self.flow.program.script_name.clone();
        let cursor = self.flow.cursor;
        let state = self.flow.state;
        let choices = std::mem::take(&mut self.flow.choices);
        let paused_on_line = self.flow.paused_on_line;

        self.load_program(&script_name, source);
        self.flow.cursor = cursor.min(self.flow.program.len());

        match state {
            EngineState::Running => self.play(),
            EngineState::WaitingForChoice => {
                self.play();
                self.flow.choices = choices;
                self.flow.pause_for_choice(paused_on_line);
            }
            EngineState::Idle | EngineState::Finished => {}
        }
    }

    pub fn play(&mut self) {
        if self.flow.program.is_empty() {
            warn!(target: "vn::engine", "no script loaded, nothing to play");
            self.flow.state = EngineState::Finished;
            return;
        }
        if self.flow.state == EngineState::Finished {
            warn!(
                target: "vn::engine",
                "\"{}\" already finished; load or restore before playing again",
                self.flow.program.script_name
            );
            return;
        }

        if self.is_playing() {
            debug!(target: "vn::engine", "restarting playback, cancelling the previous run");
            self.cancel.cancel();
            self.suspension = None;
            self.advance_pending = false;
        }
        self.cancel = CancelToken::new();
        if self.flow.state != EngineState::WaitingForChoice {
            self.flow.state = EngineState::Running;
        }
        info!(
            target: "vn::engine",
            "playing \"{}\" from line {}",
            self.flow.program.script_name, self.flow.cursor
        );
    }

    pub fn stop(&mut self) {
        self.cancel.cancel();
        if self.flow.state != EngineState::Idle {
            self.finish("stopped");
        }
    }

    pub fn restore(&mut self, cursor: &SaveCursor) -> Result<(), VnError> {
        if cursor.script_name != self.flow.program.script_name {
            return Err(VnError::new(
                "ENGINE_CURSOR_SCRIPT",
                format!(
                    "Save cursor belongs to \"{}\" but \"{}\" is loaded.",
                    cursor.script_name, self.flow.program.script_name
                ),
            ));
        }
        if cursor.line_index >= self.flow.program.len() {
            return Err(VnError::new(
                "ENGINE_CURSOR_RANGE",
                format!("Line index {} is out of range.", cursor.line_index),
            ));
        }

        self.cancel.cancel();
        self.suspension = None;
        self.advance_pending = false;
        self.flow.choices.clear();
        self.flow.cursor = cursor.line_index;
        self.flow.redirected = false;
        self.flow.paused_on_line = false;
        self.flow.state = EngineState::Idle;
        Ok(())
    }
}
