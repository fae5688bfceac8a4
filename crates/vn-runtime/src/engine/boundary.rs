use std::time::Duration;

use log::debug;
use vn_core::{EngineOutput, PlaybackMode, VnError};

use super::{ScriptEngine, Suspension};
use crate::commands::Wait;
use crate::signal::Completion;

impl ScriptEngine {
    pub fn advance(&mut self) -> Result<(), VnError> {
        match &self.suspension {
            Some(Suspension::Display {
                wait_for_advance: true,
                ..
            }) => {
                self.advance_pending = true;
                Ok(())
            }
            _ => Err(VnError::new(
                "ENGINE_NO_PENDING_DIALOGUE",
                "No dialogue is waiting to be advanced.",
            )),
        }
    }

    pub(super) fn suspend(&mut self, command: &str, wait: Wait) -> Suspension {
        match wait {
            Wait::Effect {
                completion,
                result_var,
            } => Suspension::Effect {
                command: command.to_string(),
                completion,
                result_var,
            },
            Wait::Timer(duration) => Suspension::Timer {
                deadline: self.services.clock.now().saturating_add(duration),
            },
            Wait::Display {
                speaker,
                text,
                wait_for_advance,
            } => self.begin_display(command, speaker, text, wait_for_advance),
        }
    }

    pub(super) fn begin_display(
        &mut self,
        command: &str,
        speaker: Option<String>,
        text: String,
        wait_for_advance: bool,
    ) -> Suspension {
        self.backlog.push(speaker.as_deref(), &text);
        self.advance_pending = false;
        let displayed = match &self.services.presentation {
            Some(presentation) => presentation.display(speaker.as_deref(), &text),
            None => {
                debug!(
                    target: "vn::engine",
                    "[{}] {}: {}",
                    command,
                    speaker.as_deref().unwrap_or(""),
                    text
                );
                Completion::ready()
            }
        };
        Suspension::Display {
            command: command.to_string(),
            speaker,
            text,
            displayed,
            wait_for_advance,
            shown_at: None,
        }
    }

    // Returns the output to hand back while the suspended line is still pending.
    pub(super) fn poll_suspension(&mut self) -> Option<EngineOutput> {
        let mut suspension = self.suspension.take()?;
        let now = self.services.clock.now();
        if let Some(output) = self.pending_output(&mut suspension, now) {
            self.suspension = Some(suspension);
            return Some(output);
        }

        if let Suspension::Effect {
            completion,
            result_var: Some(var),
            ..
        } = &suspension
        {
            let outcome = completion.outcome().unwrap_or_else(|| "0".to_string());
            debug!(target: "vn::engine", "effect result {} = {}", var, outcome);
            self.services.variables.set(var, &outcome);
        }
        self.finish_line();
        None
    }

    fn pending_output(&mut self, suspension: &mut Suspension, now: Duration) -> Option<EngineOutput> {
        match suspension {
            Suspension::Effect {
                command,
                completion,
                ..
            } => (!completion.is_complete()).then(|| EngineOutput::AwaitingEffect {
                command: command.clone(),
            }),
            Suspension::Timer { deadline } => {
                if self.mode == PlaybackMode::Skip || now >= *deadline {
                    None
                } else {
                    Some(EngineOutput::AwaitingTimer {
                        remaining_ms: u64::try_from((*deadline - now).as_millis())
                            .unwrap_or(u64::MAX),
                    })
                }
            }
            Suspension::Display {
                command,
                speaker,
                text,
                displayed,
                wait_for_advance,
                shown_at,
            } => {
                let waiting = EngineOutput::AwaitingAdvance {
                    speaker: speaker.clone(),
                    text: text.clone(),
                };
                if !displayed.is_complete() {
                    return Some(if *wait_for_advance {
                        waiting
                    } else {
                        EngineOutput::AwaitingEffect {
                            command: command.clone(),
                        }
                    });
                }
                if !*wait_for_advance {
                    return None;
                }

                let shown = *shown_at.get_or_insert(now);
                let advanced = std::mem::take(&mut self.advance_pending)
                    || self
                        .services
                        .presentation
                        .as_ref()
                        .is_some_and(|presentation| presentation.advance_requested())
                    || self.mode == PlaybackMode::Skip
                    || (self.mode == PlaybackMode::Auto
                        && now.saturating_sub(shown) >= self.options.auto_play.delay_for(text.as_str()));
                (!advanced).then_some(waiting)
            }
        }
    }
}
