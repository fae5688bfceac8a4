use vn_core::VnError;

use crate::session_ops::Session;
use crate::TuiCommandContext;

#[cfg(coverage)]
pub(super) fn run_tui_ratatui_mode(
    context: &TuiCommandContext<'_>,
    session: &mut Session,
) -> Result<i32, VnError> {
    super::run_tui_line_mode(context, session)
}

#[cfg(not(coverage))]
mod rich {
    use std::io;
    use std::time::{Duration, Instant};

    use crossterm::event::{self, Event, KeyEventKind};
    use crossterm::terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    };
    use crossterm::ExecutableCommand;
    use log::debug;
    use ratatui::backend::CrosstermBackend;
    use ratatui::Terminal;
    use vn_core::VnError;

    use crate::session_ops::Session;
    use crate::tui_actions::handle_key;
    use crate::tui_render::render_tui;
    use crate::tui_state::TuiUiState;
    use crate::{map_tui_io, run_to_boundary, TuiCommandContext};

    const TYPEWRITER_CHARS_PER_SECOND: u64 = 60;
    const TYPEWRITER_TICK_MS: u64 = 1000 / TYPEWRITER_CHARS_PER_SECOND;

    struct TuiTerminal {
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
    }

    impl TuiTerminal {
        fn new() -> Result<Self, VnError> {
            enable_raw_mode().map_err(map_tui_io)?;
            io::stdout()
                .execute(EnterAlternateScreen)
                .map_err(map_tui_io)?;
            let backend = CrosstermBackend::new(io::stdout());
            let terminal = Terminal::new(backend).map_err(map_tui_io)?;
            Ok(Self { terminal })
        }
    }

    impl Drop for TuiTerminal {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
    }

    pub(super) fn run_tui_ratatui_mode(
        context: &TuiCommandContext<'_>,
        session: &mut Session,
    ) -> Result<i32, VnError> {
        let mut terminal = TuiTerminal::new()?;
        let mut ui = TuiUiState {
            status: "ready".to_string(),
            ..TuiUiState::default()
        };
        let boundary = run_to_boundary(session)?;
        ui.replace_boundary(boundary);
        ui.set_backlog(session.engine.backlog().entries());

        let tick = Duration::from_millis(TYPEWRITER_TICK_MS);
        let mut last_tick = Instant::now();

        loop {
            terminal
                .terminal
                .draw(|frame| render_tui(frame, &ui, context.scenario, context.state_file))
                .map_err(map_tui_io)?;

            if last_tick.elapsed() >= tick && ui.advance_typewriter() {
                last_tick = Instant::now();
            }

            let timeout = tick.saturating_sub(last_tick.elapsed());
            if !event::poll(timeout).map_err(map_tui_io)? {
                continue;
            }

            if let Event::Key(key) = event::read().map_err(map_tui_io)? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(key, context, session, &mut ui) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(error) => {
                        debug!(target: "vn::cli", "{}: {}", error.code, error.message);
                        ui.status = error.message;
                    }
                }
            }
        }

        Ok(0)
    }
}

#[cfg(not(coverage))]
pub(super) fn run_tui_ratatui_mode(
    context: &TuiCommandContext<'_>,
    session: &mut Session,
) -> Result<i32, VnError> {
    use std::io::IsTerminal;

    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return super::run_tui_line_mode(context, session);
    }
    rich::run_tui_ratatui_mode(context, session)
}
