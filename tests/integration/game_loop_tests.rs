//! Integration tests for the GameLoop driver: adapter ownership, input
//! polling order, and panel cleanup on every exit path.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use whackamole::Error;
use whackamole::config::GameConfig;
use whackamole::fsm::GamePhase;
use whackamole::game_loop::GameLoop;
use whackamole::input::KeyEvent;

use crate::mock_hw::{LogSink, ManualClock, MockPanel, PanelCall, RecordingPublisher, ScriptedInput};

type TestLoop = GameLoop<ScriptedInput, MockPanel, RecordingPublisher, LogSink, ManualClock>;

fn make_loop(input: ScriptedInput, panel: MockPanel, clock: ManualClock) -> TestLoop {
    let config = GameConfig {
        rng_seed: Some(1),
        ..GameConfig::default()
    };
    GameLoop::new(
        config,
        input,
        panel,
        RecordingPublisher::new(),
        LogSink::new(),
        clock,
    )
}

#[test]
fn step_feeds_polled_keys_to_the_game() {
    let mut input = ScriptedInput::new();
    input.push(vec![]);
    input.push(vec![KeyEvent::down(6)]);
    let clock = ManualClock::new();
    let mut game = make_loop(input, MockPanel::new(), clock.clone());

    game.start().unwrap();
    clock.set(Duration::from_millis(10));
    game.step().unwrap();
    assert_eq!(game.service().state(), GamePhase::StartScreen);

    clock.set(Duration::from_millis(20));
    game.step().unwrap();
    assert_eq!(game.service().state(), GamePhase::Countdown);

    clock.set(Duration::from_secs(5));
    game.step().unwrap();
    assert_eq!(game.service().state(), GamePhase::Playing);
}

#[test]
fn run_clears_lights_when_stopped() {
    let mut game = make_loop(ScriptedInput::new(), MockPanel::new(), ManualClock::new());
    let stop = AtomicBool::new(true);
    game.run(&stop).unwrap();
    assert_eq!(game.panel().last_call(), Some(&PanelCall::ClearAll));
    assert!(!game.panel().is_lit(4));
}

#[test]
fn input_fault_stops_the_loop_and_clears_lights() {
    let mut input = ScriptedInput::new();
    input.fail = true;
    let mut game = make_loop(input, MockPanel::new(), ManualClock::new());
    let stop = AtomicBool::new(false);

    let err = game.run(&stop).unwrap_err();
    assert!(matches!(err, Error::Device { .. }));
    assert_eq!(game.panel().last_call(), Some(&PanelCall::ClearAll));
}

#[test]
fn panel_fault_is_returned() {
    let mut panel = MockPanel::new();
    panel.fail_after = Some(0);
    let mut game = make_loop(ScriptedInput::new(), panel, ManualClock::new());
    let stop = AtomicBool::new(false);

    let err = game.run(&stop).unwrap_err();
    assert!(matches!(err, Error::Panel(_)));
    assert!(game.panel().calls.is_empty());
}
