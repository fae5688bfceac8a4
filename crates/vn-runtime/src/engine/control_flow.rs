use log::{debug, error};
use vn_core::{Diagnostic, DiagnosticKind, EngineState, VnError};

use super::{Flow, ScriptEngine};

impl Flow {
    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics_limit == 0 {
            return;
        }
        if self.diagnostics.len() >= self.diagnostics_limit {
            self.diagnostics.remove(0);
        }
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn jump_to_label(&mut self, label: &str) -> Result<(), VnError> {
        let Some(index) = self.program.label_index(label) else {
            let err = VnError::at_line(
                "ENGINE_LABEL_NOT_FOUND",
                format!(
                    "Label \"{}\" is not defined in \"{}\".",
                    label, self.program.script_name
                ),
                self.cursor,
            );
            error!(target: "vn::engine", "{}", err);
            self.record(Diagnostic::new(
                DiagnosticKind::Reference,
                err.code.clone(),
                err.message.clone(),
                Some(self.cursor),
            ));
            return Err(err);
        };
        self.cursor = index;
        self.redirected = true;
        Ok(())
    }

    pub(crate) fn jump_to_line(&mut self, index: usize) -> bool {
        if index >= self.program.len() {
            return false;
        }
        self.cursor = index;
        self.redirected = true;
        true
    }

    // Lands on the first target at nesting depth 0, or on the last line when none matches.
    pub(crate) fn skip_to_next_command(&mut self, targets: &[&str]) {
        let len = self.program.len();
        let mut depth = 0usize;
        while self.cursor + 1 < len {
            self.cursor += 1;
            let Some(name) = self.program.lines[self.cursor].line.command_name() else {
                continue;
            };
            if name == "if" {
                depth += 1;
            }
            if name == "endif" && depth > 0 {
                depth -= 1;
                continue;
            }
            if depth == 0 && targets.contains(&name) {
                return;
            }
        }
    }

    pub(crate) fn pause_for_choice(&mut self, on_line: bool) {
        self.state = EngineState::WaitingForChoice;
        self.paused_on_line = on_line;
    }
}

impl ScriptEngine {
    pub fn jump_to_label(&mut self, label: &str) -> Result<(), VnError> {
        self.flow.jump_to_label(label)?;
        self.interrupt_suspension();
        Ok(())
    }

    pub fn jump_to_line(&mut self, index: usize) -> bool {
        let moved = self.flow.jump_to_line(index);
        if moved {
            self.interrupt_suspension();
        }
        moved
    }

    pub fn skip_to_next_command(&mut self, targets: &[&str]) {
        self.flow.skip_to_next_command(targets);
        self.interrupt_suspension();
    }

    pub fn pause_for_choice(&mut self) -> Result<(), VnError> {
        if self.flow.state != EngineState::Running {
            return Err(VnError::new(
                "ENGINE_NOT_RUNNING",
                "Only a running engine can pause for a choice.",
            ));
        }
        self.flow.pause_for_choice(false);
        Ok(())
    }

    pub fn resume_from_choice(&mut self) -> Result<(), VnError> {
        if self.flow.state != EngineState::WaitingForChoice {
            return Err(VnError::new(
                "ENGINE_NO_PENDING_CHOICE",
                "No pending choice is available.",
            ));
        }
        self.resume_flow();
        Ok(())
    }

    pub fn choose(&mut self, index: usize) -> Result<(), VnError> {
        if self.flow.state != EngineState::WaitingForChoice {
            return Err(VnError::new(
                "ENGINE_NO_PENDING_CHOICE",
                "No pending choice is available.",
            ));
        }
        let Some(item) = self.flow.choices.get(index).cloned() else {
            return Err(VnError::new(
                "ENGINE_CHOICE_INDEX",
                format!("Choice index \"{}\" is out of range.", index),
            ));
        };

        debug!(
            target: "vn::engine",
            "choice {} \"{}\" -> {}",
            index, item.text, item.target_label
        );
        // An unknown target is reported by the jump; the script then continues after the stop.
        let _ = self.jump_to_label(&item.target_label);
        self.resume_flow();
        Ok(())
    }

    // A stop line is consumed unless a jump moved the cursor. A host pause keeps it.
    fn resume_flow(&mut self) {
        if self.flow.paused_on_line && !self.flow.redirected && self.suspension.is_none() {
            self.flow.cursor += 1;
        }
        self.flow.paused_on_line = false;
        self.flow.redirected = false;
        self.flow.choices.clear();
        self.flow.state = EngineState::Running;
        if let Some(presentation) = &self.services.presentation {
            presentation.hide_choices();
        }
    }

    fn interrupt_suspension(&mut self) {
        if let Some(suspension) = self.suspension.take() {
            debug!(target: "vn::engine", "dropping pending {:?}", suspension);
        }
        self.advance_pending = false;
    }
}
