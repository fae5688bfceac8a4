mod boundary;
mod control_flow;
mod lifecycle;
mod snapshot;
mod step;

#[cfg(test)]
mod lifecycle_tests;
#[cfg(test)]
pub(crate) mod test_support;

use std::time::Duration;

use vn_core::{
    ChoiceItem, Diagnostic, EngineOptions, EngineState, PlaybackMode, Program,
};

use crate::backlog::Backlog;
use crate::commands::CommandRegistry;
use crate::services::Services;
use crate::signal::{CancelToken, Completion};
use crate::variables::VariableStore;

pub(crate) struct Flow {
    pub(crate) program: Program,
    pub(crate) cursor: usize,
    pub(crate) state: EngineState,
    pub(crate) choices: Vec<ChoiceItem>,
    pub(crate) redirected: bool,
    /// Set when the pause came from an executed line that resume must step past.
    pub(crate) paused_on_line: bool,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) diagnostics_limit: usize,
}

#[derive(Debug)]
enum Suspension {
    Effect {
        command: String,
        completion: Completion,
        result_var: Option<String>,
    },
    Timer {
        deadline: Duration,
    },
    Display {
        command: String,
        speaker: Option<String>,
        text: String,
        displayed: Completion,
        wait_for_advance: bool,
        shown_at: Option<Duration>,
    },
}

#[derive(Default)]
pub struct ScriptEngineOptions {
    pub config: EngineOptions,
    pub services: Services,
    pub commands: Option<CommandRegistry>,
}

pub struct ScriptEngine {
    flow: Flow,
    services: Services,
    commands: CommandRegistry,
    options: EngineOptions,
    mode: PlaybackMode,
    backlog: Backlog,
    suspension: Option<Suspension>,
    advance_pending: bool,
    cancel: CancelToken,
}

impl ScriptEngine {
    pub fn new(options: ScriptEngineOptions) -> Self {
        let config = options.config;
        Self {
            flow: Flow {
                program: Program::default(),
                cursor: 0,
                state: EngineState::Idle,
                choices: Vec::new(),
                redirected: false,
                paused_on_line: false,
                diagnostics: Vec::new(),
                diagnostics_limit: config.diagnostics_limit,
            },
            services: options.services,
            commands: options.commands.unwrap_or_default(),
            mode: config.playback_mode,
            backlog: Backlog::new(config.backlog_limit),
            options: config,
            suspension: None,
            advance_pending: false,
            cancel: CancelToken::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.flow.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(
            self.flow.state,
            EngineState::Running | EngineState::WaitingForChoice
        )
    }

    pub fn is_waiting_for_choice(&self) -> bool {
        self.flow.state == EngineState::WaitingForChoice
    }

    pub fn current_line_index(&self) -> usize {
        self.flow.cursor
    }

    pub fn program(&self) -> &Program {
        &self.flow.program
    }

    pub fn script_name(&self) -> &str {
        &self.flow.program.script_name
    }

    pub fn pending_choices(&self) -> &[ChoiceItem] {
        &self.flow.choices
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.flow.diagnostics
    }

    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn playback_mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn set_playback_mode(&mut self, mode: PlaybackMode) {
        self.mode = mode;
    }

    pub fn variables(&self) -> &dyn VariableStore {
        self.services.variables.as_ref()
    }

    pub fn variables_mut(&mut self) -> &mut dyn VariableStore {
        self.services.variables.as_mut()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }
}
