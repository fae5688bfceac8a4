mod case;
mod runner;
mod source;

pub use case::{ExpectedEvent, TestAction, TestCase, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, run_case, RunReport, MAX_STEPS};
pub use source::{read_scripts_from_dir, read_test_case};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VnToolError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot walk demo directory {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("{path} is not a valid testcase: {source}")]
    CaseJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("testcase schema is \"{found}\" but this runner reads \"{expected}\"")]
    CaseSchema { expected: String, found: String },
    #[error("demo directory {path} holds no scripts")]
    NoScripts { path: PathBuf },
    #[error(transparent)]
    Engine(#[from] vn_core::VnError),
    #[error("choice menu #{event_index} ({options} options) has no scripted `choose` action")]
    NoChoiceScripted { event_index: usize, options: usize },
    #[error("story ended after {played} of {scripted} scripted choices")]
    UnplayedChoices { played: usize, scripted: usize },
    #[error("story still running after {max_steps} engine steps")]
    StepLimit { max_steps: usize },
    #[error("transcript has {actual} events, testcase expects {expected}; got {observed}")]
    TranscriptLength {
        expected: usize,
        actual: usize,
        observed: String,
    },
    #[error("transcript event {index} differs: expected {expected}, got {actual}")]
    TranscriptMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("cannot render transcript event: {0}")]
    TranscriptJson(serde_json::Error),
}
