use std::collections::BTreeMap;
use std::path::Path;

use log::info;
use vn_core::{EngineOptions, EngineSnapshot, Program, VnError};
use vn_parser::compile_program;
use vn_runtime::{CommandRegistry, ScriptEngine, ScriptEngineOptions, Services};

pub const SCRIPT_EXTENSION: &str = ".vn";

#[derive(Default)]
pub struct CreateEngineOptions {
    pub scripts: BTreeMap<String, String>,
    pub entry_script: Option<String>,
    pub variables: Option<BTreeMap<String, String>>,
    pub config: EngineOptions,
    pub services: Services,
    pub commands: Option<CommandRegistry>,
}

pub struct ResumeEngineOptions {
    pub scripts: BTreeMap<String, String>,
    pub snapshot: EngineSnapshot,
    pub variables: Option<BTreeMap<String, String>>,
    pub config: EngineOptions,
    pub services: Services,
    pub commands: Option<CommandRegistry>,
}

pub fn script_name_from_path(path: &str) -> String {
    let file_name = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path);
    file_name
        .strip_suffix(SCRIPT_EXTENSION)
        .unwrap_or(file_name)
        .to_string()
}

pub fn compile_scripts(
    sources: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, Program>, VnError> {
    let mut programs = BTreeMap::new();
    for (path, source) in sources {
        let name = script_name_from_path(path);
        if name.is_empty() {
            return Err(VnError::new(
                "API_SCRIPT_NAME",
                format!("Cannot derive a script name from \"{}\".", path),
            ));
        }
        if programs.contains_key(&name) {
            return Err(VnError::new(
                "API_DUPLICATE_SCRIPT",
                format!("Script \"{}\" is defined more than once (\"{}\").", name, path),
            ));
        }
        let program = compile_program(&name, source);
        programs.insert(name, program);
    }
    Ok(programs)
}

pub fn create_engine(options: CreateEngineOptions) -> Result<ScriptEngine, VnError> {
    let mut programs = compile_scripts(&options.scripts)?;
    let entry_script = resolve_entry_script(&programs, options.entry_script)?;
    let Some(program) = programs.remove(&entry_script) else {
        return Err(entry_not_found(&entry_script));
    };

    let mut engine = build_engine(
        program,
        options.config,
        options.services,
        options.commands,
        options.variables,
    );
    engine.play();
    info!(target: "vn::engine", "created engine for \"{}\"", entry_script);
    Ok(engine)
}

pub fn resume_engine(options: ResumeEngineOptions) -> Result<ScriptEngine, VnError> {
    let mut programs = compile_scripts(&options.scripts)?;
    let script_name = &options.snapshot.cursor.script_name;
    let Some(program) = programs.remove(script_name) else {
        return Err(VnError::new(
            "API_SNAPSHOT_SCRIPT_NOT_FOUND",
            format!("Snapshot script \"{}\" is not registered.", script_name),
        ));
    };

    let mut engine = build_engine(
        program,
        options.config,
        options.services,
        options.commands,
        options.variables,
    );
    engine.resume(&options.snapshot)?;
    Ok(engine)
}

fn build_engine(
    program: Program,
    config: EngineOptions,
    services: Services,
    commands: Option<CommandRegistry>,
    variables: Option<BTreeMap<String, String>>,
) -> ScriptEngine {
    let mut engine = ScriptEngine::new(ScriptEngineOptions {
        config,
        services,
        commands,
    });
    engine.load_compiled(program);
    for (name, value) in variables.unwrap_or_default() {
        engine.variables_mut().set(&name, &value);
    }
    engine
}

fn resolve_entry_script(
    programs: &BTreeMap<String, Program>,
    explicit: Option<String>,
) -> Result<String, VnError> {
    if let Some(entry) = explicit {
        if !programs.contains_key(&entry) {
            return Err(entry_not_found(&entry));
        }
        return Ok(entry);
    }

    if programs.contains_key("main") {
        return Ok("main".to_string());
    }

    Err(VnError::new(
        "API_ENTRY_MAIN_NOT_FOUND",
        "Expected a script named \"main\" as default entry.",
    ))
}

fn entry_not_found(entry: &str) -> VnError {
    VnError::new(
        "API_ENTRY_SCRIPT_NOT_FOUND",
        format!("Entry script \"{}\" is not registered.", entry),
    )
}
