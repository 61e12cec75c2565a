//! Integration tests for the GameService → FSM → ports pipeline.
//!
//! Each test drives a full round with a seeded RNG and a hand-set clock,
//! asserting on what reached the panel, the state file and the event log.

use std::time::Duration;

use whackamole::app::events::AppEvent;
use whackamole::app::service::GameService;
use whackamole::config::GameConfig;
use whackamole::fsm::GamePhase;
use whackamole::fsm::context::{COLOUR_DONE, COLOUR_MOLE, COLOUR_PENALTY, COLOUR_START};
use whackamole::input::KeyEvent;
use whackamole::session::Score;
use whackamole::snapshot::StateSnapshot;

use crate::mock_hw::{LogSink, MockPanel, PanelCall, RecordingPublisher};

struct Rig {
    svc: GameService,
    panel: MockPanel,
    publisher: RecordingPublisher,
    sink: LogSink,
}

impl Rig {
    fn new(config: GameConfig) -> Self {
        let mut rig = Self {
            svc: GameService::new(config),
            panel: MockPanel::new(),
            publisher: RecordingPublisher::new(),
            sink: LogSink::new(),
        };
        rig.svc
            .start(Duration::ZERO, &mut rig.panel, &mut rig.publisher, &mut rig.sink)
            .unwrap();
        rig
    }

    fn tick(&mut self, secs: f64, events: &[KeyEvent]) {
        self.svc
            .tick(
                Duration::from_secs_f64(secs),
                events,
                &mut self.panel,
                &mut self.publisher,
                &mut self.sink,
            )
            .unwrap();
    }

    fn press(&mut self, secs: f64, light: usize) {
        let code = self.svc.config().keymap[light];
        self.tick(secs, &[KeyEvent::down(code)]);
    }

    fn mole(&self) -> usize {
        self.svc.active_mole().expect("a mole should be up")
    }
}

fn seeded() -> GameConfig {
    GameConfig {
        rng_seed: Some(42),
        ..GameConfig::default()
    }
}

/// Start a round and run the countdown out.  Playing begins at t = 5 s.
fn into_playing(rig: &mut Rig) {
    let start = rig.svc.config().start_light;
    rig.press(0.01, start);
    assert_eq!(rig.svc.state(), GamePhase::Countdown);
    rig.tick(5.0, &[]);
    assert_eq!(rig.svc.state(), GamePhase::Playing);
}

// ── Start screen ──────────────────────────────────────────────

#[test]
fn start_screen_lights_the_start_key_white() {
    let rig = Rig::new(seeded());
    assert_eq!(rig.svc.state(), GamePhase::StartScreen);
    assert_eq!(rig.panel.colour_of(4), Some(COLOUR_START));
    assert!(!rig.panel.is_lit(0));
    assert_eq!(rig.publisher.snapshots, vec![StateSnapshot::StartScreen]);
    assert_eq!(rig.sink.events, vec![AppEvent::Started(GamePhase::StartScreen)]);
}

#[test]
fn other_keys_do_not_start_a_round() {
    let mut rig = Rig::new(seeded());
    rig.press(0.1, 0);
    rig.press(0.2, 8);
    assert_eq!(rig.svc.state(), GamePhase::StartScreen);
}

#[test]
fn key_release_does_not_start_a_round() {
    let mut rig = Rig::new(seeded());
    rig.tick(0.1, &[KeyEvent::up(6)]);
    assert_eq!(rig.svc.state(), GamePhase::StartScreen);
}

// ── Countdown ─────────────────────────────────────────────────

#[test]
fn countdown_publishes_three_two_one_and_ignores_input() {
    let mut rig = Rig::new(seeded());
    rig.press(0.01, 4);
    assert!(rig.sink.events.contains(&AppEvent::PhaseChanged {
        from: GamePhase::StartScreen,
        to: GamePhase::Countdown,
    }));

    rig.press(1.0, 0);
    rig.press(2.0, 4);
    assert_eq!(rig.svc.state(), GamePhase::Countdown);
    assert_eq!(rig.svc.score(), Score::ZERO);

    rig.tick(5.0, &[]);
    assert_eq!(rig.publisher.countdown_values(), vec![3, 2, 1]);
    assert_eq!(rig.svc.state(), GamePhase::Playing);
    assert!(matches!(
        rig.publisher.last(),
        Some(StateSnapshot::Playing { mole_index: Some(_), score, time_left })
            if *score == Score::ZERO && *time_left == 30.0
    ));
}

#[test]
fn countdown_without_ready_flash_is_three_seconds() {
    let mut rig = Rig::new(GameConfig {
        ready_flash: false,
        ..seeded()
    });
    rig.press(0.0, 4);
    rig.tick(2.9, &[]);
    assert_eq!(rig.svc.state(), GamePhase::Countdown);
    rig.tick(3.0, &[]);
    assert_eq!(rig.svc.state(), GamePhase::Playing);
    assert_eq!(rig.publisher.countdown_values(), vec![3, 2, 1]);
}

// ── Playing ───────────────────────────────────────────────────

#[test]
fn mole_spawns_as_playing_begins() {
    let mut rig = Rig::new(seeded());
    into_playing(&mut rig);
    let mole = rig.mole();
    assert!(mole < 9);
    assert_eq!(rig.panel.colour_of(mole), Some(COLOUR_MOLE));
    assert!(rig.sink.events.contains(&AppEvent::MoleSpawned { index: mole }));
    assert!(matches!(
        rig.publisher.last(),
        Some(StateSnapshot::Playing { mole_index: Some(m), .. }) if *m == mole
    ));
}

#[test]
fn hit_scores_a_point_and_next_mole_follows() {
    let mut rig = Rig::new(seeded());
    into_playing(&mut rig);
    let mole = rig.mole();

    rig.press(5.01, mole);
    assert_eq!(rig.svc.state(), GamePhase::Hit);
    assert_eq!(rig.svc.score(), Score::from_half_points(2));
    assert_eq!(rig.svc.active_mole(), None);
    assert!(!rig.panel.is_lit(mole));
    assert_eq!(
        rig.publisher.last(),
        Some(&StateSnapshot::Hit {
            score: Score::from_half_points(2)
        })
    );

    // Zero hit feedback: the very next tick is back in Playing with a new
    // mole up.
    rig.tick(5.015, &[]);
    assert_eq!(rig.svc.state(), GamePhase::Playing);
    let next = rig.mole();
    assert_eq!(rig.panel.colour_of(next), Some(COLOUR_MOLE));
    assert!(matches!(
        rig.publisher.last(),
        Some(StateSnapshot::Playing { mole_index: Some(m), .. }) if *m == next
    ));
}

#[test]
fn wrong_key_costs_half_a_point_and_flashes_red() {
    let mut rig = Rig::new(seeded());
    into_playing(&mut rig);
    rig.tick(5.1, &[]);
    rig.press(5.2, rig.mole());
    rig.tick(5.3, &[]);
    rig.tick(5.4, &[]);
    let mole = rig.mole();

    rig.press(5.5, (mole + 1) % 9);
    assert_eq!(rig.svc.state(), GamePhase::Miss);
    assert_eq!(rig.svc.score(), Score::from_half_points(1));
    assert_eq!(rig.svc.score().points(), 0.5);
    assert_eq!(rig.panel.last_call(), Some(&PanelCall::LightAll(COLOUR_PENALTY)));
    assert!(rig
        .sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::Miss { mole: m, .. } if *m == mole)));

    // Still flashing; this press is thrown away.
    rig.press(5.6, 0);
    assert_eq!(rig.svc.state(), GamePhase::Miss);
    assert_eq!(rig.svc.score(), Score::from_half_points(1));

    let before = rig.panel.calls.len();
    rig.tick(5.71, &[]);
    assert_eq!(rig.svc.state(), GamePhase::Playing);
    let next = rig.mole();
    assert_eq!(
        &rig.panel.calls[before..],
        &[
            PanelCall::ClearAll,
            PanelCall::Light { index: next, colour: COLOUR_MOLE },
        ]
    );
}

#[test]
fn score_never_drops_below_zero() {
    let mut rig = Rig::new(seeded());
    into_playing(&mut rig);
    rig.tick(5.1, &[]);
    let mole = rig.mole();
    rig.press(5.2, (mole + 1) % 9);
    assert_eq!(rig.svc.state(), GamePhase::Miss);
    assert_eq!(rig.svc.score(), Score::ZERO);
}

#[test]
fn only_the_first_press_in_a_tick_is_judged() {
    let mut rig = Rig::new(seeded());
    into_playing(&mut rig);
    rig.tick(5.1, &[]);
    let mole = rig.mole();
    let keymap = rig.svc.config().keymap.clone();
    let wrong = keymap[(mole + 1) % 9];
    rig.tick(5.2, &[KeyEvent::down(keymap[mole]), KeyEvent::down(wrong)]);
    assert_eq!(rig.svc.state(), GamePhase::Hit);
    assert_eq!(rig.svc.score(), Score::from_half_points(2));
}

#[test]
fn unhit_mole_escapes_without_penalty() {
    let mut rig = Rig::new(seeded());
    into_playing(&mut rig);
    rig.tick(5.1, &[]);
    let first = rig.mole();

    rig.tick(6.0, &[]);
    assert_eq!(rig.svc.active_mole(), Some(first), "lifetime not yet exceeded");

    rig.tick(6.2, &[]);
    assert!(rig.sink.events.contains(&AppEvent::MoleEscaped { index: first }));
    assert!(rig.svc.active_mole().is_some());
    assert_eq!(rig.svc.score(), Score::ZERO);
    assert_eq!(rig.svc.state(), GamePhase::Playing);
}

// ── Game over ─────────────────────────────────────────────────

#[test]
fn round_ends_once_after_game_duration() {
    let mut rig = Rig::new(seeded());
    into_playing(&mut rig);
    rig.tick(5.1, &[]);
    rig.press(5.2, rig.mole());
    rig.tick(5.3, &[]);

    rig.tick(34.9, &[]);
    assert_ne!(rig.svc.state(), GamePhase::GameOver);

    rig.tick(35.0, &[]);
    assert_eq!(rig.svc.state(), GamePhase::GameOver);
    let final_score = Score::from_half_points(2);
    assert_eq!(
        rig.publisher.last(),
        Some(&StateSnapshot::GameOver { score: final_score })
    );
    assert_eq!(rig.panel.last_call(), Some(&PanelCall::LightAll(COLOUR_DONE)));

    // Presses no longer count and the round is not re-entered.
    rig.press(35.5, 0);
    rig.press(36.0, 4);
    rig.tick(37.0, &[]);
    assert_eq!(rig.svc.score(), final_score);
    assert_eq!(rig.publisher.count_game_over(), 1);
    let round_overs = rig
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::RoundOver { .. }))
        .count();
    assert_eq!(round_overs, 1);
}

#[test]
fn time_up_takes_down_a_live_mole() {
    let mut rig = Rig::new(seeded());
    into_playing(&mut rig);
    rig.press(5.1, rig.mole());
    rig.tick(5.2, &[]);
    let final_score = rig.svc.score();

    // Keep a mole up right to the limit: the last spawn is under a second old.
    rig.tick(34.5, &[]);
    rig.tick(34.99, &[]);
    let mole = rig.mole();
    assert_eq!(rig.svc.state(), GamePhase::Playing);

    let before = rig.panel.calls.len();
    rig.tick(35.0, &[]);
    assert_eq!(rig.svc.state(), GamePhase::GameOver);
    assert_eq!(rig.svc.active_mole(), None);
    assert_eq!(
        &rig.panel.calls[before..],
        &[PanelCall::Clear(mole), PanelCall::LightAll(COLOUR_DONE)]
    );
    assert_eq!(rig.svc.score(), final_score);
    assert_eq!(
        rig.publisher.last(),
        Some(&StateSnapshot::GameOver { score: final_score })
    );

    // The mole's key no longer scores.
    rig.press(35.5, mole);
    assert_eq!(rig.svc.score(), final_score);
}

#[test]
fn time_runs_out_during_miss_flash() {
    let mut rig = Rig::new(GameConfig {
        game_duration_secs: 1.0,
        ..seeded()
    });
    into_playing(&mut rig);
    rig.tick(5.9, &[]);
    let mole = rig.mole();
    rig.press(5.95, (mole + 1) % 9);
    assert_eq!(rig.svc.state(), GamePhase::Miss);
    rig.tick(6.0, &[]);
    assert_eq!(rig.svc.state(), GamePhase::GameOver);
}

#[test]
fn game_over_returns_to_a_fresh_start_screen() {
    let mut rig = Rig::new(seeded());
    into_playing(&mut rig);
    rig.tick(5.1, &[]);
    rig.press(5.2, rig.mole());
    rig.tick(35.0, &[]);
    assert_eq!(rig.svc.state(), GamePhase::GameOver);

    rig.tick(39.9, &[]);
    assert_eq!(rig.svc.state(), GamePhase::GameOver);

    let before = rig.panel.calls.len();
    rig.tick(40.0, &[]);
    assert_eq!(rig.svc.state(), GamePhase::StartScreen);
    assert_eq!(
        &rig.panel.calls[before..],
        &[
            PanelCall::ClearAll,
            PanelCall::Light { index: 4, colour: COLOUR_START },
        ],
        "one clear frame, then the start light"
    );
    assert_eq!(rig.svc.score(), Score::ZERO);
    assert_eq!(rig.svc.active_mole(), None);
    assert_eq!(rig.publisher.last(), Some(&StateSnapshot::StartScreen));
    assert_eq!(rig.panel.colour_of(4), Some(COLOUR_START));
    assert!(!rig.panel.is_lit(0));

    // And a second round can start.
    rig.press(40.5, 4);
    assert_eq!(rig.svc.state(), GamePhase::Countdown);
}

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn key_bounce_is_not_a_second_press() {
    let mut rig = Rig::new(seeded());
    into_playing(&mut rig);
    rig.tick(5.1, &[]);
    let mole = rig.mole();
    rig.press(5.2, mole);
    // A bounce of the same key 5 ms later would otherwise land on the
    // freshly spawned mole or count as a miss.
    rig.press(5.205, mole);
    rig.press(5.21, mole);
    assert_eq!(rig.svc.score(), Score::from_half_points(2));
}
