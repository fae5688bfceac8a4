use std::fs;
use std::process::Command;

#[test]
fn agent_start_runs_all_demos() {
    let bin = env!("CARGO_BIN_EXE_vn-cli");
    let demos_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos");

    let mut directories = fs::read_dir(&demos_root)
        .expect("demos root must exist")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();
    directories.sort();

    assert!(!directories.is_empty(), "expected demo scenarios");

    for directory in directories {
        let state_out = std::env::temp_dir().join(format!(
            "vn-cli-smoke-{}.json",
            directory.file_name().unwrap_or_default().to_string_lossy()
        ));

        let output = Command::new(bin)
            .arg("agent")
            .arg("start")
            .arg("--scripts-dir")
            .arg(&directory)
            .arg("--state-out")
            .arg(&state_out)
            .output()
            .expect("cli should execute");

        if !output.status.success() {
            panic!(
                "demo {} failed\nstdout:\n{}\nstderr:\n{}",
                directory.display(),
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.starts_with("RESULT:OK\nEVENT:"),
            "unexpected header for {}:\n{}",
            directory.display(),
            stdout
        );
        assert!(
            stdout.contains("TEXT_JSON:"),
            "stdout missing dialogue for {}",
            directory.display()
        );
        assert!(
            stdout.trim_end().lines().last().unwrap_or_default().starts_with("STATE_OUT:"),
            "stdout missing STATE_OUT for {}",
            directory.display()
        );
    }
}
