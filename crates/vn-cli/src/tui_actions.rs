use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use vn_core::VnError;

use crate::session_ops::{
    create_session_for_scenario, load_session_from_state_for_scenario, save_session_state,
    Session,
};
use crate::tui_state::TuiUiState;
use crate::{run_to_boundary, BoundaryResult, TuiCommandContext};

pub(crate) const CHOICE_VIEWPORT_ROWS: usize = 5;

pub(crate) fn handle_key(
    key: KeyEvent,
    context: &TuiCommandContext<'_>,
    session: &mut Session,
    ui: &mut TuiUiState,
) -> Result<bool, VnError> {
    if key.code == KeyCode::Esc || matches!(key.code, KeyCode::Char('q')) {
        return Ok(true);
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match key.code {
        KeyCode::Char('h') => {
            ui.help_visible = !ui.help_visible;
            return Ok(false);
        }
        KeyCode::Char('b') => {
            ui.backlog_visible = !ui.backlog_visible;
            ui.status = if ui.backlog_visible {
                format!("backlog: {} line(s)", ui.backlog_lines.len())
            } else {
                "story".to_string()
            };
            return Ok(false);
        }
        KeyCode::Char('r') => {
            *session =
                create_session_for_scenario(context.scenario, context.entry_script, context.config)?;
            let boundary = run_to_boundary(session)?;
            ui.replace_boundary(boundary);
            ui.set_backlog(session.engine.backlog().entries());
            ui.status = "restarted".to_string();
            return Ok(false);
        }
        KeyCode::Char('s') => {
            save_session_state(
                Path::new(context.state_file),
                session,
                &context.scenario.id,
                context.entry_script,
            )?;
            ui.status = format!("saved to {}", context.state_file);
            return Ok(false);
        }
        KeyCode::Char('l') => {
            let (_state, resumed) = load_session_from_state_for_scenario(
                Path::new(context.state_file),
                context.scenario,
                context.config,
            )?;
            *session = resumed;
            let boundary = run_to_boundary(session)?;
            ui.append_boundary(boundary);
            ui.set_backlog(session.engine.backlog().entries());
            ui.status = format!("loaded from {}", context.state_file);
            return Ok(false);
        }
        _ => {}
    }

    let typing_in_progress = ui.typing_in_progress();

    match key.code {
        KeyCode::Up => {
            if typing_in_progress {
                ui.status = "text streaming...".to_string();
                return Ok(false);
            }
            if ui.choices.is_empty() {
                ui.status = "no pending choice".to_string();
                return Ok(false);
            }
            ui.selected_choice_index = ui.selected_choice_index.saturating_sub(1);
            if ui.selected_choice_index < ui.choice_scroll_offset {
                ui.choice_scroll_offset = ui.selected_choice_index;
            }
        }
        KeyCode::Down => {
            if typing_in_progress {
                ui.status = "text streaming...".to_string();
                return Ok(false);
            }
            if ui.choices.is_empty() {
                ui.status = "no pending choice".to_string();
                return Ok(false);
            }
            let last = ui.choices.len().saturating_sub(1);
            ui.selected_choice_index = (ui.selected_choice_index + 1).min(last);
            if ui.choices.len() > CHOICE_VIEWPORT_ROWS
                && ui.selected_choice_index >= ui.choice_scroll_offset + CHOICE_VIEWPORT_ROWS
            {
                ui.choice_scroll_offset = ui.selected_choice_index - CHOICE_VIEWPORT_ROWS + 1;
            }
        }
        KeyCode::Char(' ') => {
            if typing_in_progress {
                ui.skip_typewriter();
            }
        }
        KeyCode::Enter => {
            if typing_in_progress {
                ui.skip_typewriter();
                return Ok(false);
            }
            if ui.choices.is_empty() {
                ui.status = "no pending choice".to_string();
                return Ok(false);
            }
            let selected = ui
                .choices
                .get(ui.selected_choice_index)
                .ok_or_else(|| VnError::new("TUI_CHOICE_PARSE", "No choices available"))?;
            let status = format!("chose {}", selected.text);
            let boundary = choose_current(session, selected.index)?;
            ui.append_boundary(boundary);
            ui.set_backlog(session.engine.backlog().entries());
            ui.status = status;
            return Ok(false);
        }
        _ => {}
    }

    Ok(false)
}

fn choose_current(session: &mut Session, choice_index: usize) -> Result<BoundaryResult, VnError> {
    session.engine.choose(choice_index)?;
    run_to_boundary(session)
}
