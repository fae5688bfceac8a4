use std::io::{self, BufRead, Write};
use std::path::Path;

use vn_core::VnError;

use crate::session_ops::{
    create_session_for_scenario, load_session_from_state_for_scenario, save_session_state,
    Session,
};
use crate::{map_tui_io, run_to_boundary, BoundaryEvent, TuiCommandAction, TuiCommandContext};

pub(crate) const LINE_COMMANDS_HELP: &str = "commands: :help :save :load :restart :quit";

pub(crate) fn run_tui_line_mode(
    context: &TuiCommandContext<'_>,
    session: &mut Session,
) -> Result<i32, VnError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_tui_line_mode_with_io(context, session, &mut reader, &mut writer)
}

pub(crate) fn run_tui_line_mode_with_io(
    context: &TuiCommandContext<'_>,
    session: &mut Session,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, VnError> {
    writeln!(writer, "VN Player").map_err(map_tui_io)?;
    writeln!(writer, "{}", LINE_COMMANDS_HELP).map_err(map_tui_io)?;

    loop {
        let boundary = run_to_boundary(session)?;
        for line in &boundary.transcript {
            writeln!(writer, "{}", line.display()).map_err(map_tui_io)?;
        }

        if boundary.event == BoundaryEvent::End {
            writeln!(writer).map_err(map_tui_io)?;
            writeln!(writer, "[END]").map_err(map_tui_io)?;
            return Ok(0);
        }

        writeln!(writer).map_err(map_tui_io)?;
        for (index, text) in &boundary.choices {
            writeln!(writer, "  [{}] {}", index, text).map_err(map_tui_io)?;
        }

        loop {
            let Some(raw) = prompt_input_from("> ", reader, writer)? else {
                return Ok(0);
            };
            let mut messages = Vec::new();
            let action = handle_tui_command(raw.as_str(), context, session, &mut |message| {
                messages.push(message)
            })?;
            for message in messages {
                writeln!(writer, "{}", message).map_err(map_tui_io)?;
            }
            match action {
                TuiCommandAction::Continue => continue,
                TuiCommandAction::RefreshBoundary => break,
                TuiCommandAction::Quit => return Ok(0),
                TuiCommandAction::NotHandled => {}
            }
            let choice = raw.trim().parse::<usize>().map_err(|_| {
                VnError::new(
                    "TUI_CHOICE_PARSE",
                    format!("Invalid choice index: {}", raw),
                )
            })?;
            session.engine.choose(choice)?;
            break;
        }
    }
}

pub(crate) fn handle_tui_command(
    raw: &str,
    context: &TuiCommandContext<'_>,
    session: &mut Session,
    emit: &mut dyn FnMut(String),
) -> Result<TuiCommandAction, VnError> {
    match raw.trim() {
        ":help" => {
            emit(LINE_COMMANDS_HELP.to_string());
            Ok(TuiCommandAction::Continue)
        }
        ":save" => {
            save_session_state(
                Path::new(context.state_file),
                session,
                &context.scenario.id,
                context.entry_script,
            )?;
            emit(format!("saved: {}", context.state_file));
            Ok(TuiCommandAction::Continue)
        }
        ":load" => {
            let (_state, resumed) = load_session_from_state_for_scenario(
                Path::new(context.state_file),
                context.scenario,
                context.config,
            )?;
            *session = resumed;
            emit(format!("loaded: {}", context.state_file));
            Ok(TuiCommandAction::RefreshBoundary)
        }
        ":restart" => {
            *session =
                create_session_for_scenario(context.scenario, context.entry_script, context.config)?;
            emit("restarted".to_string());
            Ok(TuiCommandAction::RefreshBoundary)
        }
        ":quit" => {
            emit("bye".to_string());
            Ok(TuiCommandAction::Quit)
        }
        _ => Ok(TuiCommandAction::NotHandled),
    }
}

// None once the reader is exhausted.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, VnError> {
    write!(writer, "{}", prefix).map_err(map_tui_io)?;
    writer.flush().map_err(map_tui_io)?;
    let mut input = String::new();
    if reader.read_line(&mut input).map_err(map_tui_io)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
