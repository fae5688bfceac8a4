use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use vn_api::{create_engine, CreateEngineOptions};
use vn_core::EngineOutput;
use vn_runtime::{ManualClock, Services};

use crate::source::{read_scripts_from_dir, read_test_case};
use crate::{ExpectedEvent, TestAction, TestCase, VnToolError};

pub const MAX_STEPS: usize = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub observed_events: Vec<ExpectedEvent>,
    pub consumed_actions: usize,
    pub steps: usize,
    pub diagnostics: Vec<String>,
}

/// Plays a demo directory headless: no host services, timers fast-forwarded,
/// every dialogue line advanced as soon as it is shown.
pub fn run_case(example_dir: &Path, case: &TestCase) -> Result<RunReport, VnToolError> {
    let scripts = read_scripts_from_dir(example_dir)?;
    let clock = ManualClock::new();
    let mut engine = create_engine(CreateEngineOptions {
        scripts,
        entry_script: Some(case.entry_script.clone()),
        variables: Some(case.variables.clone()),
        config: case.options.clone(),
        services: Services::default().with_clock(Arc::new(clock.clone())),
        commands: None,
    })?;

    let mut observed_events = Vec::new();
    let mut action_index = 0usize;

    for step in 1..=MAX_STEPS {
        match engine.next_output()? {
            EngineOutput::AwaitingAdvance { speaker, text } => {
                observed_events.push(ExpectedEvent::Dialogue { speaker, text });
                engine.advance()?;
            }
            EngineOutput::AwaitingChoice { items } => {
                let options = items.len();
                let choices = items.into_iter().map(|item| item.text).collect();
                observed_events.push(ExpectedEvent::Choices { choices });
                let event_index = observed_events.len() - 1;
                let action = case.actions.get(action_index).ok_or(
                    VnToolError::NoChoiceScripted {
                        event_index,
                        options,
                    },
                )?;
                match action {
                    TestAction::Choose { index } => engine.choose(*index)?,
                }
                action_index += 1;
            }
            EngineOutput::AwaitingTimer { remaining_ms } => {
                clock.advance(Duration::from_millis(remaining_ms));
            }
            EngineOutput::AwaitingEffect { .. } | EngineOutput::Yielded => {}
            EngineOutput::Finished | EngineOutput::Idle => {
                observed_events.push(ExpectedEvent::End);
                if action_index != case.actions.len() {
                    return Err(VnToolError::UnplayedChoices {
                        played: action_index,
                        scripted: case.actions.len(),
                    });
                }
                let diagnostics = engine
                    .diagnostics()
                    .iter()
                    .map(|diagnostic| diagnostic.code.clone())
                    .collect::<Vec<_>>();
                debug!(
                    target: "vn::tool",
                    "{} finished in {} steps with {} diagnostic(s)",
                    example_dir.display(),
                    step,
                    diagnostics.len()
                );
                return Ok(RunReport {
                    observed_events,
                    consumed_actions: action_index,
                    steps: step,
                    diagnostics,
                });
            }
        }
    }

    Err(VnToolError::StepLimit {
        max_steps: MAX_STEPS,
    })
}

pub fn assert_case(example_dir: &Path, case_path: &Path) -> Result<(), VnToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(example_dir, &case)?;

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(VnToolError::TranscriptJson)?;
        return Err(VnToolError::TranscriptLength {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected = serde_json::to_string(expected).map_err(VnToolError::TranscriptJson)?;
            let actual = serde_json::to_string(actual).map_err(VnToolError::TranscriptJson)?;
            return Err(VnToolError::TranscriptMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod runner_tests {
    use super::*;

    use std::collections::BTreeMap;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should move forward")
            .as_nanos();
        std::env::temp_dir().join(format!("vn-tool-runner-{}-{}", name, nanos))
    }

    fn write_file(path: &Path, content: &str) {
        let parent = path.parent().expect("path should have parent");
        fs::create_dir_all(parent).expect("parent dir should be created");
        fs::write(path, content).expect("file should be written");
    }

    fn simple_case(actions: Vec<TestAction>, expected_events: Vec<ExpectedEvent>) -> TestCase {
        TestCase {
            schema_version: crate::TESTCASE_SCHEMA_V1.to_string(),
            entry_script: "main".to_string(),
            options: Default::default(),
            variables: BTreeMap::new(),
            actions,
            expected_events,
        }
    }

    fn dialogue(speaker: Option<&str>, text: &str) -> ExpectedEvent {
        ExpectedEvent::Dialogue {
            speaker: speaker.map(str::to_string),
            text: text.to_string(),
        }
    }

    const PICK: &str = "@choice \"A\" -> a\n@stop\n[a]\nX: picked";

    #[test]
    fn run_case_executes_dialogue_only_script() {
        let root = temp_dir("dialogue-only");
        write_file(&root.join("main.vn"), "Narrator: Hello\n\"Quiet\"\n@wait 2");

        let case = simple_case(
            Vec::new(),
            vec![
                dialogue(Some("Narrator"), "Hello"),
                dialogue(None, "Quiet"),
                ExpectedEvent::End,
            ],
        );
        let report = run_case(&root, &case).expect("run should pass");

        assert_eq!(report.consumed_actions, 0);
        assert_eq!(report.observed_events, case.expected_events);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn run_case_consumes_choose_actions() {
        let root = temp_dir("choices");
        write_file(&root.join("main.vn"), PICK);

        let case = simple_case(
            vec![TestAction::Choose { index: 0 }],
            vec![
                ExpectedEvent::Choices {
                    choices: vec!["A".to_string()],
                },
                dialogue(Some("X"), "picked"),
                ExpectedEvent::End,
            ],
        );
        let report = run_case(&root, &case).expect("run should pass");
        assert_eq!(report.consumed_actions, 1);
        assert_eq!(report.observed_events, case.expected_events);
    }

    #[test]
    fn run_case_seeds_variables_and_reports_diagnostics() {
        let root = temp_dir("variables");
        write_file(&root.join("main.vn"), "@bg \"room\"\nA: Hi {$name}");

        let mut case = simple_case(Vec::new(), Vec::new());
        case.variables.insert("name".to_string(), "Ren".to_string());
        let report = run_case(&root, &case).expect("run should pass");
        assert_eq!(report.observed_events[0], dialogue(Some("A"), "Hi Ren"));
        assert_eq!(report.diagnostics, vec!["ENGINE_SERVICE_MISSING"]);
    }

    #[test]
    fn run_case_reports_missing_and_unused_actions() {
        let root = temp_dir("missing-action");
        write_file(&root.join("main.vn"), PICK);

        let missing = simple_case(Vec::new(), Vec::new());
        let error = run_case(&root, &missing).expect_err("missing action should fail");
        assert!(matches!(error, VnToolError::NoChoiceScripted { .. }));

        let unused_root = temp_dir("unused-action");
        write_file(&unused_root.join("main.vn"), "A: x");
        let unused = simple_case(vec![TestAction::Choose { index: 0 }], Vec::new());
        let error = run_case(&unused_root, &unused).expect_err("unused action should fail");
        assert!(matches!(error, VnToolError::UnplayedChoices { played: 0, scripted: 1 }));
    }

    #[test]
    fn run_case_reports_engine_errors() {
        let root = temp_dir("bad-choose");
        write_file(&root.join("main.vn"), PICK);
        let case = simple_case(vec![TestAction::Choose { index: 99 }], Vec::new());
        let error = run_case(&root, &case).expect_err("invalid choose should fail");
        assert!(matches!(error, VnToolError::Engine(_)));

        let entry_case = TestCase {
            entry_script: "missing".to_string(),
            ..simple_case(Vec::new(), Vec::new())
        };
        let error = run_case(&root, &entry_case).expect_err("missing entry should fail");
        assert!(matches!(error, VnToolError::Engine(_)));
    }

    #[test]
    fn run_case_reports_guard_exceeded() {
        let root = temp_dir("guard");
        write_file(&root.join("main.vn"), "[top]\nA: tick\n@goto top");

        let error = run_case(&root, &simple_case(Vec::new(), Vec::new()))
            .expect_err("guard should fail");
        assert!(matches!(error, VnToolError::StepLimit { .. }));
    }

    #[test]
    fn assert_case_reports_count_and_value_mismatches() {
        let root = temp_dir("assert");
        write_file(&root.join("main.vn"), "A: Hello");

        let count_case = root.join("count.json");
        write_file(
            &count_case,
            r#"{
  "schemaVersion":"vn-tool-case.v1",
  "expectedEvents":[{"kind":"end"}]
}"#,
        );
        let count_error = assert_case(&root, &count_case).expect_err("count mismatch should fail");
        assert!(matches!(
            count_error,
            VnToolError::TranscriptLength { .. }
        ));

        let value_case = root.join("value.json");
        write_file(
            &value_case,
            r#"{
  "schemaVersion":"vn-tool-case.v1",
  "expectedEvents":[{"kind":"dialogue","speaker":"A","text":"Wrong"},{"kind":"end"}]
}"#,
        );
        let value_error = assert_case(&root, &value_case).expect_err("value mismatch should fail");
        assert!(matches!(value_error, VnToolError::TranscriptMismatch { index: 0, .. }));
    }

    #[test]
    fn assert_case_passes_with_matching_expected_events() {
        let root = temp_dir("assert-pass");
        write_file(&root.join("main.vn"), "A: Hello");

        let case_path = root.join("testcase.json");
        write_file(
            &case_path,
            r#"{
  "schemaVersion":"vn-tool-case.v1",
  "expectedEvents":[{"kind":"dialogue","speaker":"A","text":"Hello"},{"kind":"end"}]
}"#,
        );

        assert_case(&root, &case_path).expect("assert should pass");
    }
}
