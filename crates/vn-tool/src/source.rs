use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use vn_api::SCRIPT_EXTENSION;
use walkdir::WalkDir;

use crate::{TestCase, VnToolError, TESTCASE_SCHEMA_V1};

pub fn read_scripts_from_dir(example_dir: &Path) -> Result<BTreeMap<String, String>, VnToolError> {
    let mut scripts = BTreeMap::new();

    for entry in WalkDir::new(example_dir).follow_links(false) {
        let entry = entry.map_err(|source| VnToolError::Walk {
            path: example_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !path.to_string_lossy().ends_with(SCRIPT_EXTENSION) {
            continue;
        }

        let relative = path
            .strip_prefix(example_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        let content = fs::read_to_string(path).map_err(|source| VnToolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        scripts.insert(relative, content);
    }

    if scripts.is_empty() {
        return Err(VnToolError::NoScripts {
            path: example_dir.to_path_buf(),
        });
    }

    Ok(scripts)
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, VnToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| VnToolError::Io {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| VnToolError::CaseJson {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(VnToolError::CaseSchema {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}
