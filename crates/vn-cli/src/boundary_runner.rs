use std::time::Duration;

use log::debug;
use vn_core::{BacklogEntry, EngineOutput, VnError};

use crate::error_map::json_string;
use crate::session_ops::Session;
use crate::{BoundaryEvent, BoundaryResult, TranscriptLine};

pub(crate) const MAX_BOUNDARY_STEPS: usize = 10_000;

pub(crate) fn run_to_boundary(session: &mut Session) -> Result<BoundaryResult, VnError> {
    let mut transcript = Vec::new();

    for _ in 0..MAX_BOUNDARY_STEPS {
        let output = session.engine.next_output();
        transcript.extend(session.host.drain().into_iter().map(TranscriptLine::Effect));
        match output? {
            EngineOutput::AwaitingAdvance { speaker, text } => {
                transcript.push(TranscriptLine::Text(BacklogEntry { speaker, text }));
                session.engine.advance()?;
            }
            EngineOutput::AwaitingTimer { remaining_ms } => {
                debug!(target: "vn::cli", "fast-forwarding timer by {}ms", remaining_ms);
                session.clock.advance(Duration::from_millis(remaining_ms));
            }
            EngineOutput::AwaitingEffect { .. } | EngineOutput::Yielded => {}
            EngineOutput::AwaitingChoice { items } => {
                return Ok(BoundaryResult {
                    event: BoundaryEvent::Choices,
                    transcript,
                    choices: items
                        .into_iter()
                        .map(|item| (item.index, item.text))
                        .collect(),
                });
            }
            EngineOutput::Finished | EngineOutput::Idle => {
                return Ok(BoundaryResult {
                    event: BoundaryEvent::End,
                    transcript,
                    choices: Vec::new(),
                });
            }
        }
    }

    Err(VnError::new(
        "CLI_BOUNDARY_STEPS",
        format!(
            "No choice or end reached within {} steps.",
            MAX_BOUNDARY_STEPS
        ),
    ))
}

pub(crate) fn emit_boundary(boundary: BoundaryResult, state_out: Option<String>) {
    println!("RESULT:OK");
    match boundary.event {
        BoundaryEvent::Choices => println!("EVENT:CHOICES"),
        BoundaryEvent::End => println!("EVENT:END"),
    }

    for line in boundary.transcript {
        match line {
            TranscriptLine::Text(entry) => println!(
                "TEXT_JSON:{}",
                serde_json::to_string(&entry).unwrap_or_else(|_| json_string(&entry.text))
            ),
            TranscriptLine::Effect(effect) => println!("EFFECT_JSON:{}", json_string(&effect)),
        }
    }

    for (index, text) in boundary.choices {
        println!("CHOICE:{}|{}", index, json_string(&text));
    }

    println!(
        "STATE_OUT:{}",
        state_out.unwrap_or_else(|| "NONE".to_string())
    );
}
