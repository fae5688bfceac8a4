use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use vn_core::{ChoiceItem, EngineOptions, EngineOutput, SaveCursor};

use super::{ScriptEngine, ScriptEngineOptions};
use crate::services::{
    AudioService, EventSink, Localization, ManualClock, MediaService, MiniGameService,
    Presentation, ResourceService, SaveSink, Services, SpawnRequest, StageService,
};
use crate::signal::Completion;

#[derive(Default)]
pub(crate) struct Recorder {
    calls: Mutex<Vec<String>>,
    held: Mutex<Vec<Completion>>,
    hold_effects: AtomicBool,
    advance: AtomicBool,
    translations: Mutex<BTreeMap<String, String>>,
    saves: Mutex<Vec<SaveCursor>>,
}

impl Recorder {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn saves(&self) -> Vec<SaveCursor> {
        self.saves.lock().expect("saves lock").clone()
    }

    pub(crate) fn hold_effects(&self, hold: bool) {
        self.hold_effects.store(hold, Ordering::SeqCst);
    }

    pub(crate) fn request_advance(&self, value: bool) {
        self.advance.store(value, Ordering::SeqCst);
    }

    pub(crate) fn release_all(&self, outcome: Option<&str>) {
        for completion in self.held.lock().expect("held lock").drain(..) {
            match outcome {
                Some(outcome) => completion.complete_with(outcome),
                None => completion.complete(),
            };
        }
    }

    pub(crate) fn translate_as(&self, key: &str, text: &str) {
        self.translations
            .lock()
            .expect("translations lock")
            .insert(key.to_string(), text.to_string());
    }

    fn note(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn effect(&self, call: String) -> Completion {
        self.note(call);
        if self.hold_effects.load(Ordering::SeqCst) {
            let completion = Completion::pending();
            self.held
                .lock()
                .expect("held lock")
                .push(completion.clone());
            completion
        } else {
            Completion::ready()
        }
    }
}

impl Presentation for Recorder {
    fn display(&self, speaker: Option<&str>, text: &str) -> Completion {
        self.effect(format!("display {}|{}", speaker.unwrap_or("-"), text))
    }

    fn advance_requested(&self) -> bool {
        self.advance.load(Ordering::SeqCst)
    }

    fn show_choices(&self, items: &[ChoiceItem]) {
        let texts = items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>();
        self.note(format!("choices {}", texts.join("/")));
    }

    fn hide_choices(&self) {
        self.note("hide choices".to_string());
    }
}

impl AudioService for Recorder {
    fn play_bgm(&self, name: &str) {
        self.note(format!("bgm {}", name));
    }

    fn play_sfx(&self, name: &str) {
        self.note(format!("sfx {}", name));
    }
}

impl StageService for Recorder {
    fn show_character(&self, name: &str, emotion: &str, position: &str) -> Completion {
        self.effect(format!("char {} {} {}", name, emotion, position))
    }

    fn play_motion(&self, character: &str, motion: &str) {
        self.note(format!("motion {} {}", character, motion));
    }

    fn set_background(&self, image: &str) -> Completion {
        self.effect(format!("bg {}", image))
    }

    fn spawn(&self, request: &SpawnRequest) -> Completion {
        self.effect(format!(
            "spawn {} {:?} {} {:?}",
            request.prefab, request.position, request.scale, request.alias
        ))
    }

    fn despawn(&self, key: &str) {
        self.note(format!("despawn {}", key));
    }
}

impl MediaService for Recorder {
    fn play_video(&self, file: &str, blocking: bool, looped: bool) -> Completion {
        self.effect(format!("movie {} blocking={} looped={}", file, blocking, looped))
    }
}

impl ResourceService for Recorder {
    fn preload(&self, path: &str) -> Completion {
        self.effect(format!("preload {}", path))
    }
}

impl Localization for Recorder {
    fn translate(&self, key: &str, default_text: &str) -> String {
        self.translations
            .lock()
            .expect("translations lock")
            .get(key)
            .cloned()
            .unwrap_or_else(|| default_text.to_string())
    }
}

impl EventSink for Recorder {
    fn send(&self, object: &str, method: &str, parameter: Option<&str>) {
        self.note(format!("event {}.{}({})", object, method, parameter.unwrap_or("")));
    }
}

impl MiniGameService for Recorder {
    fn play(&self, scene: &str) -> Completion {
        self.effect(format!("minigame {}", scene))
    }
}

impl SaveSink for Recorder {
    fn record(&self, cursor: &SaveCursor) {
        self.saves.lock().expect("saves lock").push(cursor.clone());
    }
}

pub(crate) fn full_services(recorder: &Arc<Recorder>, clock: &ManualClock) -> Services {
    Services::default()
        .with_clock(Arc::new(clock.clone()))
        .with_presentation(recorder.clone())
        .with_audio(recorder.clone())
        .with_stage(recorder.clone())
        .with_media(recorder.clone())
        .with_resources(recorder.clone())
        .with_localization(recorder.clone())
        .with_events(recorder.clone())
        .with_minigames(recorder.clone())
        .with_save_sink(recorder.clone())
}

pub(crate) fn engine_with(source: &str, services: Services, config: EngineOptions) -> ScriptEngine {
    let mut engine = ScriptEngine::new(ScriptEngineOptions {
        config,
        services,
        commands: None,
    });
    engine.load_program("main", source);
    engine
}

pub(crate) fn recorded(
    source: &str,
    config: EngineOptions,
) -> (ScriptEngine, Arc<Recorder>, ManualClock) {
    let recorder = Recorder::new();
    let clock = ManualClock::new();
    let mut engine = engine_with(source, full_services(&recorder, &clock), config);
    engine.play();
    (engine, recorder, clock)
}

pub(crate) fn engine_from_source(source: &str) -> ScriptEngine {
    let services = Services::default().with_clock(Arc::new(ManualClock::new()));
    engine_with(source, services, EngineOptions::default())
}

pub(crate) fn playing(source: &str) -> ScriptEngine {
    let mut engine = engine_from_source(source);
    engine.play();
    engine
}

// Advances dialogue and takes the first option until the script finishes.
pub(crate) fn drive_to_end(engine: &mut ScriptEngine) -> Vec<EngineOutput> {
    let mut outputs = Vec::new();
    for _ in 0..5_000usize {
        let output = engine.next_output().expect("next should pass");
        outputs.push(output.clone());
        match output {
            EngineOutput::AwaitingAdvance { .. } => engine.advance().expect("advance"),
            EngineOutput::AwaitingChoice { .. } => engine.choose(0).expect("choose"),
            EngineOutput::Finished | EngineOutput::Idle => return outputs,
            EngineOutput::AwaitingEffect { .. }
            | EngineOutput::AwaitingTimer { .. }
            | EngineOutput::Yielded => {}
        }
    }
    panic!("script did not finish within 5000 outputs");
}

pub(crate) fn dialogue_texts(outputs: &[EngineOutput]) -> Vec<String> {
    outputs
        .iter()
        .filter_map(|output| match output {
            EngineOutput::AwaitingAdvance { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}
