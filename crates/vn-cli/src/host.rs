use std::sync::{Arc, Mutex};

use log::info;
use vn_runtime::{
    AudioService, Completion, EventSink, ManualClock, MediaService, MiniGameService,
    ResourceService, Services, SpawnRequest, StageService,
};

/// Console stand-in for a game host. Every effect completes at once and is
/// queued as a note for the boundary transcript.
#[derive(Debug, Default)]
pub(crate) struct ConsoleHost {
    effects: Mutex<Vec<String>>,
}

impl ConsoleHost {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn drain(&self) -> Vec<String> {
        self.effects
            .lock()
            .map(|mut effects| std::mem::take(&mut *effects))
            .unwrap_or_default()
    }

    fn note(&self, effect: String) {
        info!(target: "vn::host", "{}", effect);
        if let Ok(mut effects) = self.effects.lock() {
            effects.push(effect);
        }
    }
}

impl AudioService for ConsoleHost {
    fn play_bgm(&self, name: &str) {
        self.note(format!("bgm {}", name));
    }

    fn play_sfx(&self, name: &str) {
        self.note(format!("sfx {}", name));
    }
}

impl StageService for ConsoleHost {
    fn show_character(&self, name: &str, emotion: &str, position: &str) -> Completion {
        self.note(format!("char {} {} {}", name, emotion, position));
        Completion::ready()
    }

    fn play_motion(&self, character: &str, motion: &str) {
        self.note(format!("motion {} {}", character, motion));
    }

    fn set_background(&self, image: &str) -> Completion {
        self.note(format!("bg {}", image));
        Completion::ready()
    }

    fn spawn(&self, request: &SpawnRequest) -> Completion {
        let alias = request
            .alias
            .as_deref()
            .map(|alias| format!(" as {}", alias))
            .unwrap_or_default();
        self.note(format!(
            "spawn {} at ({}, {}) scale {}{}",
            request.prefab, request.position.0, request.position.1, request.scale, alias
        ));
        Completion::ready()
    }

    fn despawn(&self, key: &str) {
        self.note(format!("despawn {}", key));
    }
}

impl MediaService for ConsoleHost {
    fn play_video(&self, file: &str, blocking: bool, looped: bool) -> Completion {
        let mode = match (blocking, looped) {
            (true, _) => "blocking",
            (false, true) => "looped",
            (false, false) => "background",
        };
        self.note(format!("movie {} ({})", file, mode));
        Completion::ready()
    }
}

impl ResourceService for ConsoleHost {
    fn preload(&self, path: &str) -> Completion {
        self.note(format!("preload {}", path));
        Completion::ready()
    }
}

impl EventSink for ConsoleHost {
    fn send(&self, object: &str, method: &str, parameter: Option<&str>) {
        self.note(format!(
            "event {}.{}({})",
            object,
            method,
            parameter.unwrap_or_default()
        ));
    }
}

impl MiniGameService for ConsoleHost {
    fn play(&self, scene: &str) -> Completion {
        self.note(format!("minigame {}", scene));
        Completion::ready_with("0")
    }
}

pub(crate) fn host_services(host: &Arc<ConsoleHost>, clock: &ManualClock) -> Services {
    Services::default()
        .with_clock(Arc::new(clock.clone()))
        .with_audio(host.clone())
        .with_stage(host.clone())
        .with_media(host.clone())
        .with_resources(host.clone())
        .with_events(host.clone())
        .with_minigames(host.clone())
}
