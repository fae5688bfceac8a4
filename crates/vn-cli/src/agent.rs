use std::path::Path;

use vn_core::{EngineOptions, VnError};

use crate::session_ops::{
    create_session_for_scenario, emit_boundary_with_saved_state, load_session_from_state_for_ref,
};
use crate::{load_source_by_scripts_dir, run_to_boundary, AgentArgs, AgentCommand, ChooseArgs, StartArgs};

pub(super) fn run_agent(args: AgentArgs, config: &EngineOptions) -> Result<i32, VnError> {
    match args.command {
        AgentCommand::Start(args) => run_start(args, config),
        AgentCommand::Choose(args) => run_choose(args, config),
    }
}

pub(super) fn run_start(args: StartArgs, config: &EngineOptions) -> Result<i32, VnError> {
    let scenario = load_source_by_scripts_dir(
        &args.scripts_dir,
        args.entry_script.as_deref().unwrap_or("main"),
    )?;
    let mut session = create_session_for_scenario(&scenario, &scenario.entry_script, config)?;

    let boundary = run_to_boundary(&mut session)?;
    emit_boundary_with_saved_state(
        &session,
        boundary,
        &args.state_out,
        &scenario.id,
        &scenario.entry_script,
    )
}

pub(super) fn run_choose(args: ChooseArgs, config: &EngineOptions) -> Result<i32, VnError> {
    let (_scenario, state, mut session) =
        load_session_from_state_for_ref(Path::new(&args.state_in), config)?;
    session.engine.choose(args.choice)?;
    let boundary = run_to_boundary(&mut session)?;
    emit_boundary_with_saved_state(
        &session,
        boundary,
        &args.state_out,
        &state.scenario_id,
        &state.entry_script,
    )
}
