use std::path::{Path, PathBuf};

use vn_tool::{assert_case, VnToolError};

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn demos_root() -> PathBuf {
    workspace_root().join("demos")
}

pub fn demo_dir(name: &str) -> PathBuf {
    demos_root().join(name)
}

pub fn testcase_path(name: &str) -> PathBuf {
    demo_dir(name).join("testcase.json")
}

/// Every demo directory, sorted by name.
pub fn demo_dirs() -> Vec<PathBuf> {
    let mut directories = std::fs::read_dir(demos_root())
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    directories.sort();
    directories
}

pub fn assert_demo(dir: &Path) -> Result<(), VnToolError> {
    assert_case(dir, &dir.join("testcase.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_points_to_workspace() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn demos_root_points_to_demos_directory() {
        assert!(demos_root().is_dir());
    }

    #[test]
    fn demo_dir_joins_name() {
        assert!(demo_dir("01-dialogue").is_dir());
    }

    #[test]
    fn testcase_path_joins_default_filename() {
        let path = testcase_path("01-dialogue");
        assert!(path.ends_with("testcase.json"));
        assert!(path.exists());
    }

    #[test]
    fn demo_dirs_are_sorted() {
        let dirs = demo_dirs();
        assert!(dirs.len() >= 6);
        assert!(dirs[0].ends_with("01-dialogue"));
    }
}
