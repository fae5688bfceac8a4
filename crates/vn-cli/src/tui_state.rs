use vn_core::BacklogEntry;

use crate::models::speaker_line;
use crate::{BoundaryEvent, BoundaryResult};

#[derive(Debug, Clone)]
pub(crate) struct ChoiceRow {
    pub(crate) index: usize,
    pub(crate) text: String,
}

#[derive(Debug, Default)]
pub(crate) struct TuiUiState {
    pub(crate) rendered_lines: Vec<String>,
    pub(crate) pending_lines: Vec<String>,
    pub(crate) typing_line: Option<String>,
    pub(crate) typing_chars: usize,
    pub(crate) choices: Vec<ChoiceRow>,
    pub(crate) selected_choice_index: usize,
    pub(crate) choice_scroll_offset: usize,
    pub(crate) ended: bool,
    pub(crate) help_visible: bool,
    pub(crate) backlog_visible: bool,
    pub(crate) backlog_lines: Vec<String>,
    pub(crate) status: String,
}

impl TuiUiState {
    pub(crate) fn typing_in_progress(&self) -> bool {
        self.typing_line.is_some() || !self.pending_lines.is_empty()
    }

    pub(crate) fn set_boundary_state(&mut self, boundary: BoundaryResult) {
        self.choices = boundary
            .choices
            .into_iter()
            .map(|(index, text)| ChoiceRow { index, text })
            .collect();
        self.ended = boundary.event == BoundaryEvent::End;
        self.selected_choice_index = 0;
        self.choice_scroll_offset = 0;
    }

    pub(crate) fn append_boundary(&mut self, boundary: BoundaryResult) {
        self.pending_lines
            .extend(boundary.transcript.iter().map(|line| line.display()));
        self.set_boundary_state(boundary);
    }

    pub(crate) fn replace_boundary(&mut self, boundary: BoundaryResult) {
        self.rendered_lines.clear();
        self.pending_lines = boundary
            .transcript
            .iter()
            .map(|line| line.display())
            .collect();
        self.typing_line = None;
        self.typing_chars = 0;
        self.set_boundary_state(boundary);
    }

    // Dialogue only; stage effects never reach the engine backlog.
    pub(crate) fn set_backlog<'a>(&mut self, entries: impl Iterator<Item = &'a BacklogEntry>) {
        self.backlog_lines = entries.map(speaker_line).collect();
    }

    // Finishes the current line at once and flushes everything queued.
    pub(crate) fn skip_typewriter(&mut self) {
        if let Some(line) = self.typing_line.take() {
            self.rendered_lines.push(line);
        }
        self.rendered_lines.append(&mut self.pending_lines);
        self.typing_chars = 0;
    }

    pub(crate) fn advance_typewriter(&mut self) -> bool {
        let Some(line) = self.typing_line.as_ref() else {
            if self.pending_lines.is_empty() {
                return false;
            }
            let next_line = self.pending_lines.remove(0);
            if next_line.is_empty() {
                self.rendered_lines.push(next_line);
                return true;
            }
            self.typing_line = Some(next_line);
            self.typing_chars = 1;
            return true;
        };

        if self.typing_chars >= line.chars().count() {
            self.rendered_lines.push(line.clone());
            self.typing_line = None;
            self.typing_chars = 0;
            return true;
        }
        self.typing_chars += 1;
        true
    }
}
