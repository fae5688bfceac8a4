use std::fs;
use std::path::Path;

use log::debug;
use vn_core::{EngineOptions, VnError};

use crate::{map_cli_config_invalid, map_cli_config_read};

pub(crate) fn load_engine_options(path: Option<&str>) -> Result<EngineOptions, VnError> {
    let Some(path) = path else {
        return Ok(EngineOptions::default());
    };
    let path = Path::new(path);
    let raw = fs::read_to_string(path).map_err(map_cli_config_read)?;
    let options: EngineOptions = serde_json::from_str(&raw).map_err(map_cli_config_invalid)?;
    debug!(target: "vn::cli", "engine options from {}: {:?}", path.display(), options);
    Ok(options)
}
