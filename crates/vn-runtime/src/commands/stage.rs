use std::sync::Arc;

use vn_core::VnError;

use super::{split_args, unquote, CommandContext, CommandFlow, CommandRegistry, ScriptCommand};
use crate::services::SpawnRequest;

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register("char", Arc::new(CharCommand));
    registry.register("motion", Arc::new(MotionCommand));
    registry.register("bg", Arc::new(BackgroundCommand));
    registry.register("spawn", Arc::new(SpawnCommand));
    registry.register("despawn", Arc::new(DespawnCommand));
}

// `@char Name:Emotion:Position`, blocks until the character is shown.
struct CharCommand;

impl ScriptCommand for CharCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let parts = args.split(':').map(str::trim).collect::<Vec<_>>();
        let name = parts.first().copied().unwrap_or_default();
        if name.is_empty() {
            return Err(VnError::new(
                "CMD_CHAR_SYNTAX",
                "@char needs `Name:Emotion:Position`.",
            ));
        }
        let emotion = parts
            .get(1)
            .copied()
            .filter(|value| !value.is_empty())
            .unwrap_or("Default");
        let position = parts
            .get(2)
            .copied()
            .filter(|value| !value.is_empty())
            .unwrap_or("Center");

        let stage = ctx.stage()?;
        Ok(CommandFlow::effect(
            stage.show_character(name, emotion, position),
        ))
    }
}

// Fire-and-forget.
struct MotionCommand;

impl ScriptCommand for MotionCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let parts = split_args(args);
        let [character, motion, ..] = parts.as_slice() else {
            return Err(VnError::new(
                "CMD_MOTION_SYNTAX",
                "@motion needs `\"CharId\" \"Motion\"`.",
            ));
        };
        ctx.stage()?.play_motion(unquote(character), unquote(motion));
        Ok(CommandFlow::Continue)
    }
}

struct BackgroundCommand;

impl ScriptCommand for BackgroundCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let image = args.trim().replace('"', "");
        if image.is_empty() {
            return Err(VnError::new("CMD_BG_SYNTAX", "@bg needs an image name."));
        }
        let stage = ctx.stage()?;
        Ok(CommandFlow::effect(stage.set_background(&image)))
    }
}

// `@spawn "Prefab" pos:x,y scale:s alias:"Name"`, blocks until spawned.
struct SpawnCommand;

impl ScriptCommand for SpawnCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let request = parse_spawn(args)?;
        let stage = ctx.stage()?;
        Ok(CommandFlow::effect(stage.spawn(&request)))
    }
}

fn parse_spawn(args: &str) -> Result<SpawnRequest, VnError> {
    let parts = split_args(args);
    let prefab = parts
        .first()
        .map(|part| unquote(part).to_string())
        .filter(|prefab| !prefab.is_empty())
        .ok_or_else(|| VnError::new("CMD_SPAWN_SYNTAX", "@spawn needs a prefab name."))?;

    let mut request = SpawnRequest {
        prefab,
        position: (0.0, 0.0),
        scale: 1.0,
        alias: None,
    };
    for part in parts.iter().skip(1) {
        if let Some(coords) = part.strip_prefix("pos:") {
            let mut coords = coords.split(',').map(|value| value.trim().parse::<f64>());
            if let (Some(x), Some(y)) = (coords.next(), coords.next()) {
                request.position = (x.unwrap_or(0.0), y.unwrap_or(0.0));
            }
        } else if let Some(scale) = part.strip_prefix("scale:") {
            if let Ok(scale) = scale.trim().parse::<f64>() {
                request.scale = scale;
            }
        } else if let Some(alias) = part.strip_prefix("alias:") {
            request.alias = Some(unquote(alias).to_string()).filter(|alias| !alias.is_empty());
        }
    }
    Ok(request)
}

// Fire-and-forget.
struct DespawnCommand;

impl ScriptCommand for DespawnCommand {
    fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandFlow, VnError> {
        let key = unquote(args);
        if key.is_empty() {
            return Err(VnError::new("CMD_DESPAWN_SYNTAX", "@despawn needs a key."));
        }
        ctx.stage()?.despawn(key);
        Ok(CommandFlow::Continue)
    }
}
