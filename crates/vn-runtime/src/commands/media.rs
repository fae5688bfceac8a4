use std::sync::Arc;

use log::info;
use vn_core::VnError;

use super::{
    split_args, unquote, CommandContext, CommandFlow, CommandRegistry, ScriptCommand, Wait,
};
use crate::format::format_rich_text;

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register("bgm", Arc::new(AudioCommand { sfx: false }));
    registry.register("sfx", Arc::new(AudioCommand { sfx: true }));
    registry.register("movie", Arc::new(MovieCommand));
    registry.register("preload", Arc::new(PreloadCommand));
    registry.register("event", Arc::new(EventCommand));
    registry.register("trans", Arc::new(TransCommand));
    registry.register("minigame", Arc::new(MiniGameCommand));
}

// Fire-and-forget.
struct AudioCommand {
    sfx: bool,
}

impl ScriptCommand for AudioCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let name = unquote(args);
        if name.is_empty() {
            return Err(VnError::new(
                "CMD_AUDIO_SYNTAX",
                format!("@{} needs a clip name.", ctx.command_name()),
            ));
        }
        let audio = ctx.audio()?;
        if self.sfx {
            audio.play_sfx(name);
        } else {
            audio.play_bgm(name);
        }
        Ok(CommandFlow::Continue)
    }
}

// `@movie "file" "mode"`: only `blocking` (the default) waits; `background` loops.
struct MovieCommand;

impl ScriptCommand for MovieCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let parts = split_args(args);
        let file = parts
            .first()
            .map(|part| unquote(part))
            .filter(|file| !file.is_empty())
            .ok_or_else(|| VnError::new("CMD_MOVIE_SYNTAX", "@movie needs a file name."))?;
        let mode = parts
            .get(1)
            .map(|part| unquote(part).to_lowercase())
            .unwrap_or_else(|| "blocking".to_string());
        let blocking = mode == "blocking";
        let looped = mode == "background";

        let completion = ctx.media()?.play_video(file, blocking, looped);
        if blocking {
            Ok(CommandFlow::effect(completion))
        } else {
            Ok(CommandFlow::Continue)
        }
    }
}

struct PreloadCommand;

impl ScriptCommand for PreloadCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let path = unquote(args);
        if path.is_empty() {
            return Ok(CommandFlow::Continue);
        }
        let resources = ctx.resources()?;
        Ok(CommandFlow::effect(resources.preload(path)))
    }
}

// `@event "Object" "Method" "Param"`, fire-and-forget.
struct EventCommand;

impl ScriptCommand for EventCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let parts = split_args(args);
        let object = parts.first().map(|part| unquote(part)).unwrap_or_default();
        let method = parts.get(1).map(|part| unquote(part)).unwrap_or_default();
        if object.is_empty() || method.is_empty() {
            return Err(VnError::new(
                "CMD_EVENT_SYNTAX",
                "@event needs `\"Object\" \"Method\" \"Param\"`.",
            ));
        }
        let parameter = parts.get(2).map(|part| unquote(part));

        ctx.events()?.send(object, method, parameter);
        info!(target: "vn::command", "sent '{}' to '{}'", method, object);
        Ok(CommandFlow::Continue)
    }
}

// `@trans "Key" "Default"` shows the translated line without a speaker.
struct TransCommand;

impl ScriptCommand for TransCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let parts = split_args(args);
        let key = parts.first().map(|part| unquote(part)).unwrap_or_default();
        let default_text = parts.get(1).map(|part| unquote(part)).unwrap_or_default();
        if key.is_empty() && default_text.is_empty() {
            return Err(VnError::new(
                "CMD_TRANS_SYNTAX",
                "@trans needs `\"Key\" \"Default\"`.",
            ));
        }

        let translated = match ctx.localization() {
            Some(localization) => localization.translate(key, default_text),
            None => default_text.to_string(),
        };
        let text = ctx.interpolate(&translated);
        let text = if ctx.options().rich_text {
            format_rich_text(&text)
        } else {
            text
        };
        Ok(CommandFlow::Await(Wait::Display {
            speaker: None,
            text,
            wait_for_advance: false,
        }))
    }
}

// `@minigame "Scene" win_var:$var` blocks until the game reports its result.
struct MiniGameCommand;

impl ScriptCommand for MiniGameCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let parts = split_args(args);
        let scene = parts
            .first()
            .map(|part| unquote(part))
            .filter(|scene| !scene.is_empty())
            .ok_or_else(|| VnError::new("CMD_MINIGAME_SYNTAX", "@minigame needs a scene name."))?;
        let result_var = parts
            .iter()
            .find_map(|part| part.strip_prefix("win_var:"))
            .map(|var| var.trim_start_matches('$').to_string())
            .filter(|var| !var.is_empty());

        let completion = ctx.minigames()?.play(scene);
        Ok(CommandFlow::Await(Wait::Effect {
            completion,
            result_var,
        }))
    }
}
