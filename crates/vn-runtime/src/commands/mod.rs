mod args;
mod control;
mod media;
mod stage;

pub use args::{split_args, unquote};

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use log::{error, warn};
use vn_core::{
    ChoiceItem, Diagnostic, DiagnosticKind, EngineOptions, PlaybackMode, Value, VnError,
};

use crate::backlog::Backlog;
use crate::engine::Flow;
use crate::services::{
    AudioService, Clock, EventSink, Localization, MediaService, MiniGameService, Presentation,
    ResourceService, Services, StageService, SERVICE_MISSING,
};
use crate::signal::Completion;
use crate::variables::{interpolate, VariableStore};

#[derive(Debug)]
pub enum Wait {
    Effect {
        completion: Completion,
        result_var: Option<String>,
    },
    Timer(Duration),
    Display {
        speaker: Option<String>,
        text: String,
        wait_for_advance: bool,
    },
}

#[derive(Debug)]
pub enum CommandFlow {
    Continue,
    Await(Wait),
}

impl CommandFlow {
    pub fn effect(completion: Completion) -> Self {
        Self::Await(Wait::Effect {
            completion,
            result_var: None,
        })
    }
}

pub trait ScriptCommand: Send + Sync {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError>;
}

pub struct CommandContext<'a> {
    pub(crate) flow: &'a mut Flow,
    pub(crate) services: &'a mut Services,
    pub(crate) backlog: &'a mut Backlog,
    pub(crate) options: &'a EngineOptions,
    pub(crate) mode: PlaybackMode,
    pub(crate) command: &'a str,
    pub(crate) line_index: usize,
}

impl<'a> CommandContext<'a> {
    pub fn command_name(&self) -> &str {
        self.command
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn script_name(&self) -> &str {
        &self.flow.program.script_name
    }

    pub fn playback_mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn options(&self) -> &EngineOptions {
        self.options
    }

    pub fn backlog(&self) -> &Backlog {
        self.backlog
    }

    pub fn variables(&mut self) -> &mut dyn VariableStore {
        self.services.variables.as_mut()
    }

    pub fn interpolate(&self, text: &str) -> String {
        interpolate(self.services.variables.as_ref(), text)
    }

    // Interpolates then evaluates; failures are reported and read as numeric 0.
    pub fn evaluate(&mut self, expression: &str) -> Value {
        let resolved = self.interpolate(expression);
        match vn_expr::try_evaluate(&resolved) {
            Ok(value) => value,
            Err(err) => {
                error!(
                    target: "vn::command",
                    "line {}: failed to evaluate '{}': {}",
                    self.line_index, resolved, err
                );
                self.report(
                    DiagnosticKind::Evaluation,
                    "EXPR_EVALUATION",
                    format!("Failed to evaluate '{}': {}", resolved, err),
                );
                Value::Number(0.0)
            }
        }
    }

    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.flow.record(Diagnostic::new(
            kind,
            code,
            message,
            Some(self.line_index),
        ));
    }

    pub fn jump_to_label(&mut self, label: &str) -> Result<(), VnError> {
        self.flow.jump_to_label(label)
    }

    pub fn skip_to_next_command(&mut self, targets: &[&str]) {
        self.flow.skip_to_next_command(targets);
    }

    pub fn add_choice(&mut self, text: &str, target_label: &str) {
        let index = self.flow.choices.len();
        self.flow.choices.push(ChoiceItem {
            index,
            text: text.to_string(),
            target_label: target_label.to_string(),
        });
    }

    pub fn choices(&self) -> &[ChoiceItem] {
        &self.flow.choices
    }

    pub fn pause_for_choice(&mut self) {
        self.flow.pause_for_choice(true);
    }

    pub fn clock(&self) -> &dyn Clock {
        self.services.clock.as_ref()
    }

    pub fn presentation(&self) -> Option<Arc<dyn Presentation>> {
        self.services.presentation.clone()
    }

    pub fn localization(&self) -> Option<Arc<dyn Localization>> {
        self.services.localization.clone()
    }

    pub fn audio(&self) -> Result<Arc<dyn AudioService>, VnError> {
        self.require(self.services.audio.clone(), "audio")
    }

    pub fn stage(&self) -> Result<Arc<dyn StageService>, VnError> {
        self.require(self.services.stage.clone(), "stage")
    }

    pub fn media(&self) -> Result<Arc<dyn MediaService>, VnError> {
        self.require(self.services.media.clone(), "media")
    }

    pub fn resources(&self) -> Result<Arc<dyn ResourceService>, VnError> {
        self.require(self.services.resources.clone(), "resources")
    }

    pub fn events(&self) -> Result<Arc<dyn EventSink>, VnError> {
        self.require(self.services.events.clone(), "events")
    }

    pub fn minigames(&self) -> Result<Arc<dyn MiniGameService>, VnError> {
        self.require(self.services.minigames.clone(), "minigames")
    }

    fn require<T: ?Sized>(&self, service: Option<Arc<T>>, name: &str) -> Result<Arc<T>, VnError> {
        service.ok_or_else(|| {
            VnError::new(
                SERVICE_MISSING,
                format!("@{} needs the {} service, which is not installed.", self.command, name),
            )
        })
    }
}

struct UnknownCommand;

impl ScriptCommand for UnknownCommand {
    fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        warn!(
            target: "vn::command",
            "line {}: unknown command @{}",
            ctx.line_index(),
            ctx.command_name()
        );
        let message = format!("Unknown command \"@{}\".", ctx.command_name());
        ctx.report(DiagnosticKind::Dispatch, "ENGINE_UNKNOWN_COMMAND", message);
        Ok(CommandFlow::Continue)
    }
}

#[derive(Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn ScriptCommand>>,
    unknown: Arc<dyn ScriptCommand>,
}

impl CommandRegistry {
    pub fn empty() -> Self {
        Self {
            commands: BTreeMap::new(),
            unknown: Arc::new(UnknownCommand),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        control::register(&mut registry);
        stage::register(&mut registry);
        media::register(&mut registry);
        registry
    }

    pub fn register(
        &mut self,
        name: &str,
        command: Arc<dyn ScriptCommand>,
    ) -> Option<Arc<dyn ScriptCommand>> {
        self.commands.insert(name.to_lowercase(), command)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ScriptCommand>> {
        self.commands.get(&name.to_lowercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_lowercase())
    }

    // Unregistered names resolve to a command that reports and does nothing.
    pub fn resolve(&self, name: &str) -> Arc<dyn ScriptCommand> {
        self.get(name).unwrap_or_else(|| self.unknown.clone())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
