use std::collections::VecDeque;

use vn_core::BacklogEntry;

#[derive(Debug, Clone)]
pub struct Backlog {
    entries: VecDeque<BacklogEntry>,
    limit: usize,
}

impl Backlog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    pub fn push(&mut self, speaker: Option<&str>, text: &str) {
        if self.limit == 0 {
            return;
        }
        while self.entries.len() >= self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(BacklogEntry {
            speaker: speaker.map(str::to_string),
            text: text.to_string(),
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &BacklogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
