use std::ffi::OsString;

use clap::Parser;
use log::LevelFilter;
use vn_core::{EngineOptions, VnError};

mod agent;
mod boundary_runner;
mod cli_args;
mod config;
mod error_map;
mod host;
mod line_tui;
mod models;
mod session_ops;
mod source_loader;
mod state_store;
mod tui;
mod tui_actions;
mod tui_render;
mod tui_state;

pub(crate) use boundary_runner::{emit_boundary, run_to_boundary};
pub(crate) use cli_args::{AgentArgs, AgentCommand, ChooseArgs, Cli, Mode, StartArgs, TuiArgs};
pub(crate) use config::load_engine_options;
pub(crate) use error_map::{
    emit_error, map_cli_config_invalid, map_cli_config_read, map_cli_source_path,
    map_cli_source_read, map_cli_source_scan, map_cli_state_invalid, map_cli_state_read,
    map_cli_state_write, map_tui_io,
};
pub(crate) use line_tui::run_tui_line_mode;
pub(crate) use models::{
    BoundaryEvent, BoundaryResult, LoadedScenario, PlayerState, TranscriptLine, TuiCommandAction,
    TuiCommandContext, PLAYER_STATE_SCHEMA,
};
pub(crate) use session_ops::create_session_for_scenario;
pub(crate) use source_loader::{load_source_by_ref, load_source_by_scripts_dir};
pub(crate) use state_store::{load_player_state, save_player_state};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // RUST_LOG still wins over the flag. Repeat calls keep the first logger.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<i32, VnError> {
    init_logging(cli.verbose);
    let config = load_engine_options(cli.config.as_deref())?;
    match cli.command {
        Mode::Agent(args) => agent::run_agent(args, &config),
        Mode::Tui(args) => run_tui(args, &config),
    }
}

fn run_tui(args: TuiArgs, config: &EngineOptions) -> Result<i32, VnError> {
    let entry_script = args.entry_script.unwrap_or_else(|| "main".to_string());
    let state_file = args
        .state_file
        .unwrap_or_else(|| ".vn/save.json".to_string());
    let scenario = load_source_by_scripts_dir(&args.scripts_dir, &entry_script)?;
    let mut session = create_session_for_scenario(&scenario, &entry_script, config)?;
    let context = TuiCommandContext {
        state_file: &state_file,
        scenario: &scenario,
        entry_script: &entry_script,
        config,
    };

    tui::run_tui_ratatui_mode(&context, &mut session)
}

#[cfg(test)]
mod cli_test_support;
