use std::time::Duration;

use vn_core::{
    AutoPlayTiming, EngineOptions, EngineOutput, EngineState, PlaybackMode, SaveCursor,
};

use super::test_support::{
    dialogue_texts, drive_to_end, engine_from_source, playing, recorded,
};

#[test]
fn engine_starts_idle_until_played() {
    let mut engine = engine_from_source("A: hi");
    assert_eq!(engine.state(), EngineState::Idle);
    assert!(!engine.is_playing());
    assert_eq!(engine.next_output().expect("next"), EngineOutput::Idle);

    engine.play();
    assert!(engine.is_playing());
    assert_eq!(engine.script_name(), "main");
    assert_eq!(engine.program().len(), 1);
}

#[test]
fn playing_an_empty_program_finishes_immediately() {
    let mut engine = engine_from_source("\n\r\n");
    assert!(engine.program().is_empty());
    engine.play();
    assert_eq!(engine.state(), EngineState::Finished);
    assert_eq!(engine.next_output().expect("next"), EngineOutput::Finished);
}

#[test]
fn play_restarts_from_the_current_line() {
    let mut engine = playing("A: one\nA: two");
    let first_token = engine.cancel_token();
    engine.next_output().expect("one");
    engine.advance().expect("advance");
    engine.next_output().expect("two");

    engine.play();
    assert!(first_token.is_cancelled());
    assert!(!engine.cancel_token().is_cancelled());
    assert_eq!(engine.current_line_index(), 1);
    let outputs = drive_to_end(&mut engine);
    assert_eq!(dialogue_texts(&outputs), vec!["two"]);
}

#[test]
fn cancelling_the_token_finishes_playback() {
    let mut engine = playing("A: one\nA: two");
    engine.next_output().expect("one");
    engine.cancel_token().cancel();
    assert_eq!(engine.next_output().expect("next"), EngineOutput::Finished);
    assert_eq!(engine.state(), EngineState::Finished);
}

#[test]
fn stop_hides_choices_and_finishes() {
    let (mut engine, recorder, _clock) =
        recorded("@choice \"Go\" -> end\n@stop\n[end]", EngineOptions::default());
    assert!(matches!(
        engine.next_output().expect("next"),
        EngineOutput::AwaitingChoice { .. }
    ));
    engine.stop();
    assert_eq!(engine.state(), EngineState::Finished);
    assert_eq!(recorder.calls(), vec!["choices Go", "hide choices"]);
}

#[test]
fn finished_playback_stays_finished_until_restored() {
    let mut engine = playing("A: one\nA: two");
    engine.next_output().expect("one");
    engine.stop();
    engine.play();
    assert_eq!(engine.state(), EngineState::Finished);
    assert_eq!(engine.next_output().expect("next"), EngineOutput::Finished);

    engine
        .restore(&SaveCursor {
            script_name: "main".to_string(),
            line_index: 1,
        })
        .expect("restore");
    engine.play();
    assert_eq!(engine.state(), EngineState::Running);
    let outputs = drive_to_end(&mut engine);
    assert_eq!(dialogue_texts(&outputs), vec!["two"]);
}

#[test]
fn loading_a_new_program_resets_the_engine() {
    let mut engine = playing("@foo\nA: hi");
    drive_to_end(&mut engine);
    assert_eq!(engine.diagnostics().len(), 1);

    engine.load_program("second", "B: again\nnot a line");
    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(engine.current_line_index(), 0);
    assert_eq!(engine.script_name(), "second");
    assert_eq!(engine.diagnostics().len(), 1);
    assert_eq!(engine.diagnostics()[0].code, "PARSE_UNKNOWN_LINE");
}

#[test]
fn reload_keeps_the_cursor_and_state() {
    let mut engine = playing("A: one\nA: two");
    engine.next_output().expect("one");
    engine.advance().expect("advance");
    engine.next_output().expect("two");

    engine.reload_program("A: uno\nA: dos");
    assert_eq!(engine.state(), EngineState::Running);
    assert_eq!(engine.current_line_index(), 1);
    assert_eq!(
        engine.next_output().expect("next"),
        EngineOutput::AwaitingAdvance {
            speaker: Some("A".to_string()),
            text: "dos".to_string(),
        }
    );
}

#[test]
fn reload_during_a_choice_keeps_the_choices() {
    let mut engine = playing("@choice \"Onward\" -> next\n@stop\n[next]\nX: done");
    engine.next_output().expect("choice");

    engine.reload_program("@choice \"Weiter\" -> next\n@stop\n[next]\nX: fertig");
    assert!(engine.is_waiting_for_choice());
    assert_eq!(engine.pending_choices()[0].text, "Onward");
    engine.choose(0).expect("choose");
    let outputs = drive_to_end(&mut engine);
    assert_eq!(dialogue_texts(&outputs), vec!["fertig"]);
}

#[test]
fn reload_of_a_shorter_script_clamps_the_cursor() {
    let mut engine = engine_from_source("A: one\nA: two\nA: three");
    engine
        .restore(&SaveCursor {
            script_name: "main".to_string(),
            line_index: 2,
        })
        .expect("restore");
    engine.reload_program("A: only");
    assert_eq!(engine.current_line_index(), 1);
    assert_eq!(engine.state(), EngineState::Idle);
}

#[test]
fn restore_moves_the_cursor_and_waits_for_play() {
    let mut engine = playing("A: one\nA: two");
    engine.next_output().expect("one");

    engine
        .restore(&SaveCursor {
            script_name: "main".to_string(),
            line_index: 1,
        })
        .expect("restore");
    assert_eq!(engine.state(), EngineState::Idle);
    engine.play();
    let outputs = drive_to_end(&mut engine);
    assert_eq!(dialogue_texts(&outputs), vec!["two"]);
}

#[test]
fn restore_rejects_foreign_or_out_of_range_cursors() {
    let mut engine = engine_from_source("A: one");
    let err = engine
        .restore(&SaveCursor {
            script_name: "other".to_string(),
            line_index: 0,
        })
        .expect_err("wrong script");
    assert_eq!(err.code, "ENGINE_CURSOR_SCRIPT");

    let err = engine
        .restore(&SaveCursor {
            script_name: "main".to_string(),
            line_index: 1,
        })
        .expect_err("out of range");
    assert_eq!(err.code, "ENGINE_CURSOR_RANGE");
}

#[test]
fn skip_mode_runs_through_dialogue_and_timers() {
    let mut engine = playing("A: one\n@wait 3\nA: two\n@choice \"Go\" -> end\n@stop\n[end]");
    engine.set_playback_mode(PlaybackMode::Skip);
    assert!(matches!(
        engine.next_output().expect("next"),
        EngineOutput::AwaitingChoice { .. }
    ));
    let texts = engine
        .backlog()
        .entries()
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["one", "two"]);
}

#[test]
fn auto_mode_advances_after_the_reading_delay() {
    let config = EngineOptions {
        playback_mode: PlaybackMode::Auto,
        auto_play: AutoPlayTiming {
            base_delay_ms: 1000,
            per_char_delay_ms: 50,
        },
        ..EngineOptions::default()
    };
    let (mut engine, _recorder, clock) = recorded("A: hi", config);
    assert_eq!(engine.playback_mode(), PlaybackMode::Auto);

    assert!(matches!(
        engine.next_output().expect("next"),
        EngineOutput::AwaitingAdvance { .. }
    ));
    clock.advance(Duration::from_millis(1099));
    assert!(matches!(
        engine.next_output().expect("next"),
        EngineOutput::AwaitingAdvance { .. }
    ));
    clock.advance(Duration::from_millis(1));
    assert_eq!(engine.next_output().expect("next"), EngineOutput::Finished);
}

#[test]
fn backlog_is_bounded_by_the_configured_limit() {
    let config = EngineOptions {
        backlog_limit: 2,
        playback_mode: PlaybackMode::Skip,
        ..EngineOptions::default()
    };
    let (mut engine, _recorder, _clock) = recorded("A: one\nB: two\n@trans \"k\" \"three\"", config);
    assert_eq!(engine.next_output().expect("next"), EngineOutput::Finished);
    let entries = engine.backlog().entries().cloned().collect::<Vec<_>>();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].speaker.as_deref(), Some("B"));
    assert_eq!(entries[1].speaker, None);
    assert_eq!(entries[1].text, "three");
}
