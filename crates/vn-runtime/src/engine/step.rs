use log::{debug, error, info, warn};
use vn_core::{
    Diagnostic, DiagnosticKind, EngineOutput, EngineState, MissingServicePolicy, SaveCursor,
    ScriptLine, VnError,
};

use super::{ScriptEngine, Suspension};
use crate::commands::{CommandContext, CommandFlow};
use crate::format::format_rich_text;
use crate::services::SERVICE_MISSING;
use crate::variables::interpolate;

impl ScriptEngine {
    pub fn next_output(&mut self) -> Result<EngineOutput, VnError> {
        if self.cancel.is_cancelled() && self.is_playing() {
            self.finish("cancelled");
            return Ok(EngineOutput::Finished);
        }

        let mut guard = 0usize;
        loop {
            match self.flow.state {
                EngineState::Idle => return Ok(EngineOutput::Idle),
                EngineState::Finished => return Ok(EngineOutput::Finished),
                EngineState::WaitingForChoice => {
                    return Ok(EngineOutput::AwaitingChoice {
                        items: self.flow.choices.clone(),
                    })
                }
                EngineState::Running => {}
            }

            if let Some(output) = self.poll_suspension() {
                return Ok(output);
            }
            if self.flow.state != EngineState::Running {
                continue;
            }

            if self.flow.cursor >= self.flow.program.len() {
                self.finish("end of script");
                return Ok(EngineOutput::Finished);
            }

            guard += 1;
            if guard > self.options.loop_guard_limit {
                warn!(
                    target: "vn::engine",
                    "\"{}\" ran {} lines without suspending, yielding at line {}",
                    self.flow.program.script_name,
                    self.options.loop_guard_limit,
                    self.flow.cursor
                );
                return Ok(EngineOutput::Yielded);
            }

            match self.execute_current_line() {
                Ok(Some(suspension)) => self.suspension = Some(suspension),
                Ok(None) => self.finish_line(),
                Err(err) => {
                    self.finish("fatal error");
                    return Err(err);
                }
            }
        }
    }

    fn execute_current_line(&mut self) -> Result<Option<Suspension>, VnError> {
        let index = self.flow.cursor;
        let Some(line) = self.flow.program.line(index).cloned() else {
            return Ok(None);
        };
        if let Some(save) = &self.services.save {
            save.record(&SaveCursor {
                script_name: self.flow.program.script_name.clone(),
                line_index: index,
            });
        }
        self.flow.redirected = false;
        debug!(target: "vn::engine", "line {}: {}", index, line.raw);

        match line.line {
            ScriptLine::Comment | ScriptLine::Label { .. } | ScriptLine::Unknown { .. } => Ok(None),
            ScriptLine::Dialogue { speaker, text } => {
                let text = self.render_dialogue(&text);
                Ok(Some(self.begin_display("dialogue", speaker, text, true)))
            }
            ScriptLine::Command { name, args } => self.dispatch(index, &name, &args),
        }
    }

    fn dispatch(
        &mut self,
        index: usize,
        name: &str,
        args: &str,
    ) -> Result<Option<Suspension>, VnError> {
        let command = self.commands.resolve(name);
        let result = {
            let mut ctx = CommandContext {
                flow: &mut self.flow,
                services: &mut self.services,
                backlog: &mut self.backlog,
                options: &self.options,
                mode: self.mode,
                command: name,
                line_index: index,
            };
            command.execute(args, &mut ctx)
        };

        match result {
            Ok(CommandFlow::Continue) => Ok(None),
            Ok(CommandFlow::Await(wait)) => Ok(Some(self.suspend(name, wait))),
            Err(err) => {
                let err = err.with_line(index);
                if err.code == SERVICE_MISSING {
                    if self.options.missing_service == MissingServicePolicy::Fatal {
                        error!(target: "vn::engine", "line {} (@{}): {}", index, name, err);
                        self.record_runtime(&err, index);
                        return Err(err);
                    }
                    warn!(target: "vn::engine", "line {} (@{}): {}", index, name, err);
                } else {
                    error!(target: "vn::engine", "line {} (@{}): {}", index, name, err);
                }
                self.record_runtime(&err, index);
                Ok(None)
            }
        }
    }

    fn record_runtime(&mut self, err: &VnError, index: usize) {
        self.flow.record(Diagnostic::new(
            DiagnosticKind::Runtime,
            err.code.clone(),
            err.message.clone(),
            Some(index),
        ));
    }

    fn render_dialogue(&self, text: &str) -> String {
        let text = interpolate(self.services.variables.as_ref(), text);
        if self.options.rich_text {
            format_rich_text(&text)
        } else {
            text
        }
    }

    pub(super) fn finish_line(&mut self) {
        if self.flow.state != EngineState::Running {
            return;
        }
        if self.flow.redirected {
            self.flow.redirected = false;
            return;
        }
        self.flow.cursor += 1;
    }

    pub(super) fn finish(&mut self, reason: &str) {
        if self.flow.state == EngineState::WaitingForChoice {
            if let Some(presentation) = &self.services.presentation {
                presentation.hide_choices();
            }
        }
        self.flow.state = EngineState::Finished;
        self.suspension = None;
        self.advance_pending = false;
        info!(
            target: "vn::engine",
            "\"{}\" finished at line {} ({})",
            self.flow.program.script_name, self.flow.cursor, reason
        );
    }
}
