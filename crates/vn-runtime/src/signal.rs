use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Default)]
pub struct Completion {
    inner: Arc<OnceLock<Option<String>>>,
}

impl Completion {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn ready() -> Self {
        let completion = Self::default();
        completion.complete();
        completion
    }

    pub fn ready_with(outcome: impl Into<String>) -> Self {
        let completion = Self::default();
        completion.complete_with(outcome);
        completion
    }

    // Returns false when the effect had already completed.
    pub fn complete(&self) -> bool {
        self.inner.set(None).is_ok()
    }

    pub fn complete_with(&self, outcome: impl Into<String>) -> bool {
        self.inner.set(Some(outcome.into())).is_ok()
    }

    pub fn is_complete(&self) -> bool {
        self.inner.get().is_some()
    }

    pub fn outcome(&self) -> Option<String> {
        self.inner.get().cloned().flatten()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
