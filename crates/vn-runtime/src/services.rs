use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use vn_core::{ChoiceItem, SaveCursor};

use crate::signal::Completion;
use crate::variables::{MemoryVariables, VariableStore};

pub const SERVICE_MISSING: &str = "ENGINE_SERVICE_MISSING";

pub trait Presentation: Send + Sync {
    // The returned completion resolves once the line is fully displayed.
    fn display(&self, speaker: Option<&str>, text: &str) -> Completion;
    fn advance_requested(&self) -> bool;
    fn show_choices(&self, items: &[ChoiceItem]);
    fn hide_choices(&self) {}
}

pub trait AudioService: Send + Sync {
    fn play_bgm(&self, name: &str);
    fn play_sfx(&self, name: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub prefab: String,
    pub position: (f64, f64),
    pub scale: f64,
    pub alias: Option<String>,
}

pub trait StageService: Send + Sync {
    fn show_character(&self, name: &str, emotion: &str, position: &str) -> Completion;
    fn play_motion(&self, character: &str, motion: &str);
    fn set_background(&self, image: &str) -> Completion;
    fn spawn(&self, request: &SpawnRequest) -> Completion;
    fn despawn(&self, key: &str);
}

pub trait MediaService: Send + Sync {
    fn play_video(&self, file: &str, blocking: bool, looped: bool) -> Completion;
}

pub trait ResourceService: Send + Sync {
    fn preload(&self, path: &str) -> Completion;
}

pub trait Localization: Send + Sync {
    fn translate(&self, key: &str, default_text: &str) -> String;
}

pub trait EventSink: Send + Sync {
    fn send(&self, object: &str, method: &str, parameter: Option<&str>);
}

pub trait MiniGameService: Send + Sync {
    // The completion outcome is the game's result, stored into `win_var` when given.
    fn play(&self, scene: &str) -> Completion;
}

pub trait SaveSink: Send + Sync {
    fn record(&self, cursor: &SaveCursor);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

pub struct Services {
    pub variables: Box<dyn VariableStore>,
    pub clock: Arc<dyn Clock>,
    pub presentation: Option<Arc<dyn Presentation>>,
    pub audio: Option<Arc<dyn AudioService>>,
    pub stage: Option<Arc<dyn StageService>>,
    pub media: Option<Arc<dyn MediaService>>,
    pub resources: Option<Arc<dyn ResourceService>>,
    pub localization: Option<Arc<dyn Localization>>,
    pub events: Option<Arc<dyn EventSink>>,
    pub minigames: Option<Arc<dyn MiniGameService>>,
    pub save: Option<Arc<dyn SaveSink>>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            variables: Box::new(MemoryVariables::new()),
            clock: Arc::new(SystemClock::new()),
            presentation: None,
            audio: None,
            stage: None,
            media: None,
            resources: None,
            localization: None,
            events: None,
            minigames: None,
            save: None,
        }
    }
}

impl Services {
    pub fn with_variables(mut self, variables: impl VariableStore + 'static) -> Self {
        self.variables = Box::new(variables);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_presentation(mut self, presentation: Arc<dyn Presentation>) -> Self {
        self.presentation = Some(presentation);
        self
    }

    pub fn with_audio(mut self, audio: Arc<dyn AudioService>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn with_stage(mut self, stage: Arc<dyn StageService>) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_media(mut self, media: Arc<dyn MediaService>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_resources(mut self, resources: Arc<dyn ResourceService>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn with_localization(mut self, localization: Arc<dyn Localization>) -> Self {
        self.localization = Some(localization);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_minigames(mut self, minigames: Arc<dyn MiniGameService>) -> Self {
        self.minigames = Some(minigames);
        self
    }

    pub fn with_save_sink(mut self, save: Arc<dyn SaveSink>) -> Self {
        self.save = Some(save);
        self
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("variables", &self.variables.entries())
            .field("presentation", &self.presentation.is_some())
            .field("audio", &self.audio.is_some())
            .field("stage", &self.stage.is_some())
            .field("media", &self.media.is_some())
            .field("resources", &self.resources.is_some())
            .field("localization", &self.localization.is_some())
            .field("events", &self.events.is_some())
            .field("minigames", &self.minigames.is_some())
            .field("save", &self.save.is_some())
            .finish()
    }
}
