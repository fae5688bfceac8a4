use std::path::Path;
use std::sync::Arc;

use vn_api::{create_engine, resume_engine, CreateEngineOptions, ResumeEngineOptions};
use vn_core::{EngineOptions, VnError};
use vn_runtime::{ManualClock, ScriptEngine};

use crate::host::{host_services, ConsoleHost};
use crate::{
    emit_boundary, load_player_state, load_source_by_ref, save_player_state, BoundaryEvent,
    BoundaryResult, LoadedScenario, PlayerState, PLAYER_STATE_SCHEMA,
};

/// An engine wired to the console host. The clock only moves when the
/// boundary runner fast-forwards a timer.
pub(crate) struct Session {
    pub(crate) engine: ScriptEngine,
    pub(crate) clock: ManualClock,
    pub(crate) host: Arc<ConsoleHost>,
}

pub(crate) fn create_session_for_scenario(
    scenario: &LoadedScenario,
    entry_script: &str,
    config: &EngineOptions,
) -> Result<Session, VnError> {
    let clock = ManualClock::new();
    let host = ConsoleHost::new();
    let engine = create_engine(CreateEngineOptions {
        scripts: scenario.scripts.clone(),
        entry_script: Some(entry_script.to_string()),
        config: config.clone(),
        services: host_services(&host, &clock),
        ..CreateEngineOptions::default()
    })?;
    Ok(Session {
        engine,
        clock,
        host,
    })
}

pub(crate) fn resume_session_for_state(
    scenario: &LoadedScenario,
    state: &PlayerState,
    config: &EngineOptions,
) -> Result<Session, VnError> {
    let clock = ManualClock::new();
    let host = ConsoleHost::new();
    let engine = resume_engine(ResumeEngineOptions {
        scripts: scenario.scripts.clone(),
        snapshot: state.snapshot.clone(),
        variables: Some(state.variables.clone()),
        config: config.clone(),
        services: host_services(&host, &clock),
        commands: None,
    })?;
    Ok(Session {
        engine,
        clock,
        host,
    })
}

pub(crate) fn save_session_state(
    path: &Path,
    session: &Session,
    scenario_id: &str,
    entry_script: &str,
) -> Result<(), VnError> {
    let state = PlayerState {
        schema_version: PLAYER_STATE_SCHEMA.to_string(),
        scenario_id: scenario_id.to_string(),
        entry_script: entry_script.to_string(),
        snapshot: session.engine.snapshot(),
        variables: session.engine.variables().entries(),
    };
    save_player_state(path, &state)
}

pub(crate) fn load_session_from_state_for_ref(
    path: &Path,
    config: &EngineOptions,
) -> Result<(LoadedScenario, PlayerState, Session), VnError> {
    let state = load_player_state(path)?;
    let scenario = load_source_by_ref(&state.scenario_id, &state.entry_script)?;
    let session = resume_session_for_state(&scenario, &state, config)?;
    Ok((scenario, state, session))
}

pub(crate) fn load_session_from_state_for_scenario(
    path: &Path,
    scenario: &LoadedScenario,
    config: &EngineOptions,
) -> Result<(PlayerState, Session), VnError> {
    let state = load_player_state(path)?;
    if state.scenario_id != scenario.id {
        return Err(VnError::new(
            "TUI_STATE_SCENARIO_MISMATCH",
            format!(
                "State scenario mismatch. expected={} actual={}",
                scenario.id, state.scenario_id
            ),
        ));
    }
    let session = resume_session_for_state(scenario, &state, config)?;
    Ok((state, session))
}

pub(crate) fn emit_boundary_with_saved_state(
    session: &Session,
    boundary: BoundaryResult,
    state_out: &str,
    scenario_id: &str,
    entry_script: &str,
) -> Result<i32, VnError> {
    if boundary.event == BoundaryEvent::Choices {
        save_session_state(Path::new(state_out), session, scenario_id, entry_script)?;
        emit_boundary(boundary, Some(state_out.to_string()));
        return Ok(0);
    }

    emit_boundary(boundary, None);
    Ok(0)
}
