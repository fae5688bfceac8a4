use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use vn_api::SCRIPT_EXTENSION;
use vn_core::VnError;
use walkdir::WalkDir;

use crate::{map_cli_source_path, map_cli_source_read, map_cli_source_scan, LoadedScenario};

const SCENARIO_REF_PREFIX: &str = "scripts-dir:";

pub(crate) fn load_source_by_scripts_dir(
    scripts_dir: &str,
    entry_script: &str,
) -> Result<LoadedScenario, VnError> {
    let scripts_root = resolve_scripts_dir(scripts_dir)?;
    let scripts = read_scripts_from_dir(&scripts_root)?;
    let scenario_id = make_scripts_dir_scenario_id(&scripts_root);
    let title = format!(
        "Scripts {}",
        scripts_root
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
    );
    debug!(
        target: "vn::cli",
        "loaded {} script(s) from {}",
        scripts.len(),
        scripts_root.display()
    );

    Ok(LoadedScenario {
        id: scenario_id,
        title,
        scripts,
        entry_script: entry_script.to_string(),
    })
}

pub(crate) fn load_source_by_ref(
    scenario_ref: &str,
    entry_script: &str,
) -> Result<LoadedScenario, VnError> {
    let Some(raw) = scenario_ref.strip_prefix(SCENARIO_REF_PREFIX) else {
        return Err(VnError::new(
            "CLI_SOURCE_REF_INVALID",
            format!("Unsupported scenario ref: {}", scenario_ref),
        ));
    };
    load_source_by_scripts_dir(raw, entry_script)
}

pub(crate) fn resolve_scripts_dir(scripts_dir: &str) -> Result<PathBuf, VnError> {
    let path = PathBuf::from(scripts_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(VnError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("scripts-dir does not exist: {}", absolute.display()),
        ));
    }

    if !absolute.is_dir() {
        return Err(VnError::new(
            "CLI_SOURCE_NOT_DIR",
            format!("scripts-dir is not a directory: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

pub(crate) fn read_scripts_from_dir(scripts_dir: &Path) -> Result<BTreeMap<String, String>, VnError> {
    let mut scripts = BTreeMap::new();

    for entry in WalkDir::new(scripts_dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(map_cli_source_scan)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !path.to_string_lossy().ends_with(SCRIPT_EXTENSION) {
            continue;
        }

        let relative = path
            .strip_prefix(scripts_dir)
            .map_err(map_cli_source_scan)?
            .to_string_lossy()
            .replace('\\', "/");

        let content = fs::read_to_string(path).map_err(map_cli_source_read)?;
        scripts.insert(relative, content);
    }

    if scripts.is_empty() {
        return Err(VnError::new(
            "CLI_SOURCE_EMPTY",
            format!("No {} files under {}", SCRIPT_EXTENSION, scripts_dir.display()),
        ));
    }

    Ok(scripts)
}

pub(crate) fn make_scripts_dir_scenario_id(scripts_dir: &Path) -> String {
    format!("{}{}", SCENARIO_REF_PREFIX, scripts_dir.display())
}
