//! Concrete phase handler functions and table builder.
//!
//! Each phase is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch.
//!
//! ```text
//!  START_SCREEN ──[start key]──▶ COUNTDOWN ──[3, 2, 1]──▶ PLAYING ◀─────────┐
//!       ▲                                                  │  │             │
//!       │                                      [right key] │  │ [wrong key] │
//!       │                                                  ▼  ▼             │
//!       │                                                HIT  MISS ─[flash]─┤
//!       │                                                 └──[next tick]────┘
//!       │
//!       └──[delay]── GAME_OVER ◀──[time up]── PLAYING / HIT / MISS
//! ```

use log::{debug, info};
use rand::Rng;

use super::context::{
    COLOUR_COUNTDOWN, COLOUR_DONE, COLOUR_MOLE, COLOUR_PENALTY, COLOUR_READY, COLOUR_START,
    CountdownPlan, CountdownStep, FsmContext,
};
use super::{GamePhase, StateDescriptor};
use crate::app::events::AppEvent;
use crate::session::GameSession;
use crate::snapshot::StateSnapshot;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; GamePhase::COUNT] {
    [
        // Index 0: StartScreen
        StateDescriptor {
            id: GamePhase::StartScreen,
            name: "StartScreen",
            on_enter: Some(start_screen_enter),
            on_exit: None,
            on_update: start_screen_update,
        },
        // Index 1: Countdown
        StateDescriptor {
            id: GamePhase::Countdown,
            name: "Countdown",
            on_enter: Some(countdown_enter),
            on_exit: Some(countdown_exit),
            on_update: countdown_update,
        },
        // Index 2: Playing
        StateDescriptor {
            id: GamePhase::Playing,
            name: "Playing",
            on_enter: Some(playing_enter),
            on_exit: None,
            on_update: playing_update,
        },
        // Index 3: Hit
        StateDescriptor {
            id: GamePhase::Hit,
            name: "Hit",
            on_enter: Some(hit_enter),
            on_exit: None,
            on_update: feedback_update,
        },
        // Index 4: Miss
        StateDescriptor {
            id: GamePhase::Miss,
            name: "Miss",
            on_enter: Some(miss_enter),
            on_exit: Some(miss_exit),
            on_update: feedback_update,
        },
        // Index 5: GameOver
        StateDescriptor {
            id: GamePhase::GameOver,
            name: "GameOver",
            on_enter: Some(game_over_enter),
            on_exit: None,
            on_update: game_over_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  START SCREEN: waiting for the start key
// ═══════════════════════════════════════════════════════════════════════════

fn start_screen_enter(ctx: &mut FsmContext) {
    ctx.session = GameSession::new();
    ctx.clear_all();
    ctx.light(ctx.config.start_light, COLOUR_START);
    ctx.publish(StateSnapshot::StartScreen);
    info!(
        "START_SCREEN: press light {} to start",
        ctx.config.start_light + 1
    );
}

fn start_screen_update(ctx: &mut FsmContext) -> Option<GamePhase> {
    if ctx.presses.contains(&ctx.config.start_light) {
        info!("START_SCREEN: start pressed");
        return Some(GamePhase::Countdown);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  COUNTDOWN: ready flash, then 3, 2, 1; input ignored
// ═══════════════════════════════════════════════════════════════════════════

fn countdown_enter(ctx: &mut FsmContext) {
    ctx.clear_all();
    ctx.countdown = CountdownPlan::new(&ctx.config);
}

fn countdown_exit(ctx: &mut FsmContext) {
    ctx.session.started_at = Some(ctx.now);
    info!("COUNTDOWN: GO!");
}

fn countdown_update(ctx: &mut FsmContext) -> Option<GamePhase> {
    let elapsed = ctx.elapsed_in_state();
    while let Some(step) = ctx.countdown.next_due(elapsed) {
        match step {
            CountdownStep::ReadyOn => ctx.light_all(COLOUR_READY),
            CountdownStep::ReadyOff => ctx.clear_all(),
            CountdownStep::TickOn(value) => {
                let light = usize::from(value - 1);
                ctx.light(light, COLOUR_COUNTDOWN);
                ctx.publish(StateSnapshot::Countdown { time: value });
                info!("COUNTDOWN: {}...", value);
            }
            CountdownStep::TickOff(value) => ctx.clear(usize::from(value - 1)),
            CountdownStep::Go => return Some(GamePhase::Playing),
        }
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  PLAYING: moles pop up, presses are judged
// ═══════════════════════════════════════════════════════════════════════════

/// Entering play puts a mole up in the same tick.
fn playing_enter(ctx: &mut FsmContext) {
    if ctx.round_expired() || !spawn_if_due(ctx) {
        let snapshot = ctx.playing_snapshot();
        ctx.publish(snapshot);
    }
}

/// Retire an expired mole and spawn its replacement in the same tick.
/// Publishes the new board and returns `true` when a mole was spawned.
fn spawn_if_due(ctx: &mut FsmContext) -> bool {
    if !ctx.session.mole_due(ctx.now, ctx.config.mole_lifetime()) {
        return false;
    }
    let index = ctx.rng.gen_range(0..ctx.config.num_lights);
    if let Some(escaped) = ctx.session.spawn(index, ctx.now) {
        debug!("PLAYING: mole at light {} got away", escaped);
        ctx.clear(escaped);
        ctx.emit(AppEvent::MoleEscaped { index: escaped });
    }
    ctx.light(index, COLOUR_MOLE);
    ctx.emit(AppEvent::MoleSpawned { index });
    let snapshot = ctx.playing_snapshot();
    ctx.publish(snapshot);
    true
}

fn playing_update(ctx: &mut FsmContext) -> Option<GamePhase> {
    if ctx.round_expired() {
        return Some(GamePhase::GameOver);
    }

    spawn_if_due(ctx);

    let presses = std::mem::take(&mut ctx.presses);
    for pressed in presses {
        // Presses with no mole up are ignored.
        let Some(mole) = ctx.session.active_mole else {
            continue;
        };

        if pressed == mole {
            ctx.session.record_hit();
            ctx.clear(mole);
            ctx.emit(AppEvent::Hit {
                index: mole,
                score: ctx.session.score,
            });
            return Some(GamePhase::Hit);
        }

        ctx.session.record_miss();
        ctx.clear(mole);
        ctx.emit(AppEvent::Miss {
            pressed,
            mole,
            score: ctx.session.score,
        });
        return Some(GamePhase::Miss);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  HIT / MISS: timed feedback overlays; the loop keeps polling
// ═══════════════════════════════════════════════════════════════════════════

fn hit_enter(ctx: &mut FsmContext) {
    ctx.overlay_until = ctx.now + ctx.config.hit_feedback();
    ctx.publish(StateSnapshot::Hit {
        score: ctx.session.score,
    });
    info!("HIT! score: {}", ctx.session.score);
}

fn miss_enter(ctx: &mut FsmContext) {
    ctx.light_all(COLOUR_PENALTY);
    ctx.overlay_until = ctx.now + ctx.config.penalty_flash();
    ctx.publish(StateSnapshot::Miss {
        score: ctx.session.score,
    });
    info!("MISS! wrong button, score: {}", ctx.session.score);
}

fn miss_exit(ctx: &mut FsmContext) {
    ctx.clear_all();
}

fn feedback_update(ctx: &mut FsmContext) -> Option<GamePhase> {
    if ctx.round_expired() {
        return Some(GamePhase::GameOver);
    }
    // Presses during the overlay are dropped, not deferred.
    ctx.presses.clear();
    if ctx.now >= ctx.overlay_until {
        return Some(GamePhase::Playing);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  GAME OVER: final score held on the panel, then a new round
// ═══════════════════════════════════════════════════════════════════════════

fn game_over_enter(ctx: &mut FsmContext) {
    if let Some(mole) = ctx.session.active_mole.take() {
        ctx.clear(mole);
    }
    ctx.light_all(COLOUR_DONE);
    let score = ctx.session.score;
    ctx.publish(StateSnapshot::GameOver { score });
    ctx.emit(AppEvent::RoundOver { score });
    info!(
        "GAME_OVER: final score {}, restarting in {:.0}s",
        score, ctx.config.game_over_delay_secs
    );
}

fn game_over_update(ctx: &mut FsmContext) -> Option<GamePhase> {
    if ctx.elapsed_in_state() >= ctx.config.game_over_delay() {
        return Some(GamePhase::StartScreen);
    }
    None
}
