use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use vn_core::{PlaybackMode, VnError};

use super::{unquote, CommandContext, CommandFlow, CommandRegistry, ScriptCommand, Wait};

pub(super) fn register(registry: &mut CommandRegistry) {
    let set: Arc<dyn ScriptCommand> = Arc::new(SetCommand);
    registry.register("wait", Arc::new(WaitCommand));
    registry.register("log", Arc::new(LogCommand));
    registry.register("goto", Arc::new(GotoCommand));
    registry.register("set", set.clone());
    registry.register("let", set);
    registry.register("if", Arc::new(IfCommand));
    registry.register("else", Arc::new(ElseCommand));
    registry.register("endif", Arc::new(EndIfCommand));
    registry.register("choice", Arc::new(ChoiceCommand));
    registry.register("stop", Arc::new(StopCommand));
}

// `@wait 1.5` blocks for the duration; skip mode ignores it.
struct WaitCommand;

impl ScriptCommand for WaitCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let duration = args
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok());
        let Some(duration) = duration else {
            warn!(
                target: "vn::command",
                "invalid @wait duration \"{}\", continuing without waiting",
                args.trim()
            );
            return Ok(CommandFlow::Continue);
        };
        if ctx.playback_mode() == PlaybackMode::Skip {
            debug!(target: "vn::command", "skip mode: ignoring @wait {:?}", duration);
            return Ok(CommandFlow::Continue);
        }
        Ok(CommandFlow::Await(Wait::Timer(duration)))
    }
}

struct LogCommand;

impl ScriptCommand for LogCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        info!(target: "vn::script", "{}", ctx.interpolate(unquote(args)));
        Ok(CommandFlow::Continue)
    }
}

struct GotoCommand;

impl ScriptCommand for GotoCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let label = args.trim();
        if label.is_empty() {
            return Err(VnError::new("CMD_GOTO_SYNTAX", "@goto needs a label name."));
        }
        // Unknown labels are reported by the jump and leave the cursor in place.
        if ctx.jump_to_label(label).is_err() {
            debug!(target: "vn::command", "@goto {} did not move the cursor", label);
        }
        Ok(CommandFlow::Continue)
    }
}

// `@set $name = expression`; numbers and booleans are stored in their text form.
struct SetCommand;

impl ScriptCommand for SetCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let syntax_error = || {
            VnError::new(
                "CMD_SET_SYNTAX",
                format!("Expected `$name = expression`, got \"{}\".", args),
            )
        };
        let (name, expression) = args.split_once('=').ok_or_else(syntax_error)?;
        let name = name.trim();
        if name.trim_start_matches('$').is_empty() {
            return Err(syntax_error());
        }

        let value = ctx.evaluate(expression.trim());
        let stored = value.to_string();
        ctx.variables().set(name, &stored);
        debug!(target: "vn::command", "set {} = {}", name, stored);
        Ok(CommandFlow::Continue)
    }
}

struct IfCommand;

impl ScriptCommand for IfCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let condition = ctx.evaluate(args);
        if !condition.is_truthy() {
            ctx.skip_to_next_command(&["else", "endif"]);
        }
        Ok(CommandFlow::Continue)
    }
}

// Reached only at the end of a taken branch.
struct ElseCommand;

impl ScriptCommand for ElseCommand {
    fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        ctx.skip_to_next_command(&["endif"]);
        Ok(CommandFlow::Continue)
    }
}

struct EndIfCommand;

impl ScriptCommand for EndIfCommand {
    fn execute(&self, _args: &str, _ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        Ok(CommandFlow::Continue)
    }
}

// `@choice "Text" -> Label` registers an option for the next `@stop`.
struct ChoiceCommand;

impl ScriptCommand for ChoiceCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let syntax_error = || {
            VnError::new(
                "CMD_CHOICE_SYNTAX",
                format!("Expected `\"Text\" -> Label`, got \"{}\".", args),
            )
        };
        let (text, label) = args.split_once("->").ok_or_else(syntax_error)?;
        let label = label.trim();
        if label.is_empty() {
            return Err(syntax_error());
        }
        let text = ctx.interpolate(&text.trim().replace('"', ""));
        ctx.add_choice(&text, label);
        Ok(CommandFlow::Continue)
    }
}

struct StopCommand;

impl ScriptCommand for StopCommand {
    fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        if ctx.choices().is_empty() {
            return Err(VnError::new(
                "CMD_STOP_WITHOUT_CHOICES",
                "@stop has no registered choices to show.",
            ));
        }
        if let Some(presentation) = ctx.presentation() {
            presentation.show_choices(ctx.choices());
        }
        ctx.pause_for_choice();
        Ok(CommandFlow::Continue)
    }
}
