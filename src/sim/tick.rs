//! One frame of the game loop
//!
//! `step` advances the game by exactly one display frame. Physics is
//! per-frame (velocities are pixels per frame); elapsed time only drives the
//! clock that the delayed game-over checks are measured against.

use serde::{Deserialize, Serialize};

use super::collapse;
use super::collision::{falls_through, hits_ceiling, hits_paddle, hits_side_wall, resolve_brick_hits};
use super::input::KeyEvent;
use super::state::GameState;
use crate::scene::Scene;

/// Something notable that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BrickDestroyed { column: usize, row: usize },
    WallBounce,
    CeilingBounce,
    PaddleBounce,
    /// The ball got past the paddle; bricks start falling next frame
    CollapseStarted,
    GameOver,
}

/// Whether the loop should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Continue,
    Stop,
}

/// Result of one frame
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// What to draw this frame
    pub scene: Scene,
    pub status: StepStatus,
    pub events: Vec<GameEvent>,
}

/// Advance the game by one frame.
///
/// Order within a frame:
/// 1. buffered key events update the input flags
/// 2. pending game-over checks that are now due fire
/// 3. if falling, bricks sink (and a new check is armed)
/// 4. if the game is over, the end screen is captured and the loop stops
/// 5. otherwise the scene is captured, then brick hits, ball and paddle update
pub fn step(state: &mut GameState, events: &[KeyEvent], elapsed_ms: f64) -> StepOutcome {
    let mut out = Vec::new();

    for &event in events {
        state.input.apply(event);
    }

    if state.flags.is_game_over() {
        return stopped(state, out);
    }

    state.frame += 1;
    state.clock_ms += elapsed_ms.max(0.0);

    if collapse::fire_due_checks(state) {
        out.push(GameEvent::GameOver);
    }

    if state.flags.is_falling() && collapse::advance_collapse(state) {
        out.push(GameEvent::GameOver);
    }

    if state.flags.is_game_over() {
        return stopped(state, out);
    }

    let scene = Scene::capture(state);

    detect_brick_hits(state, &mut out);
    move_ball(state, &mut out);
    move_paddle(state);

    StepOutcome {
        scene,
        status: StepStatus::Continue,
        events: out,
    }
}

fn stopped(state: &mut GameState, events: Vec<GameEvent>) -> StepOutcome {
    collapse::cancel_checks(state);
    StepOutcome {
        scene: Scene::capture(state),
        status: StepStatus::Stop,
        events,
    }
}

/// Destroy every active brick the ball's center is inside
pub fn detect_brick_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let hits = resolve_brick_hits(
        &mut state.ball,
        &mut state.bricks,
        state.tuning.brick_width,
        state.tuning.brick_height,
    );
    for (column, row) in hits {
        log::debug!(
            "Brick ({column}, {row}) destroyed, {} left",
            state.bricks.active_count()
        );
        events.push(GameEvent::BrickDestroyed { column, row });
    }
}

/// Reflect off walls and paddle, arm the collapse on a miss, then translate.
///
/// Every check looks at the projected position; the (possibly flipped)
/// velocity is applied in the same frame.
pub fn move_ball(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let tuning = state.tuning;
    let ball = &mut state.ball;

    if hits_side_wall(ball, tuning.arena_width) {
        ball.vel.x = -ball.vel.x;
        events.push(GameEvent::WallBounce);
    }

    if hits_ceiling(ball) {
        ball.vel.y = -ball.vel.y;
        events.push(GameEvent::CeilingBounce);
    }

    if hits_paddle(ball, &state.paddle) {
        ball.vel.y = -ball.vel.y;
        events.push(GameEvent::PaddleBounce);
    } else if falls_through(ball, &state.paddle, tuning.arena_height) && state.flags.arm_falling() {
        log::info!(
            "Ball missed the paddle at frame {}, bricks collapsing ({} standing)",
            state.frame,
            state.bricks.active_count()
        );
        events.push(GameEvent::CollapseStarted);
    }

    ball.pos += ball.vel;
}

/// Move the paddle one notch.
///
/// Right wins whenever it is held, even against the right wall: holding both
/// keys there leaves the paddle where it is.
pub fn move_paddle(state: &mut GameState) {
    let max_x = state.tuning.paddle_max_x();
    let speed = state.tuning.paddle_sensitivity;
    let paddle = &mut state.paddle;

    if state.input.move_right {
        if paddle.x < max_x {
            paddle.x = (paddle.x + speed).min(max_x);
        }
    } else if state.input.move_left && paddle.x > 0.0 {
        paddle.x = (paddle.x - speed).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::input::GameKey;
    use crate::sim::state::BrickStatus;
    use crate::tuning::Tuning;

    /// Park the paddle in the far left corner so it can't interfere
    fn open_field(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.paddle.x = 0.0;
        state
    }

    #[test]
    fn test_free_flight() {
        let mut state = open_field(1);
        state.ball.pos = Vec2::new(224.0, 370.0);
        state.ball.vel = Vec2::new(2.0, -2.0);

        let outcome = step(&mut state, &[], FRAME_MS);
        assert_eq!(state.ball.pos, Vec2::new(226.0, 368.0));
        assert_eq!(state.ball.vel, Vec2::new(2.0, -2.0));
        assert_eq!(outcome.status, StepStatus::Continue);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_right_wall_reflects_same_frame() {
        let mut state = open_field(1);
        state.ball.pos = Vec2::new(443.0, 200.0);
        state.ball.vel = Vec2::new(2.0, -2.0);

        let outcome = step(&mut state, &[], FRAME_MS);
        assert_eq!(state.ball.vel.x, -2.0);
        assert_eq!(state.ball.pos.x, 441.0);
        assert_eq!(outcome.events, vec![GameEvent::WallBounce]);
    }

    #[test]
    fn test_ceiling_reflects() {
        let mut state = open_field(1);
        state.ball.pos = Vec2::new(20.0, 5.0);
        state.ball.vel = Vec2::new(2.0, -2.0);

        step(&mut state, &[], FRAME_MS);
        assert_eq!(state.ball.vel, Vec2::new(2.0, 2.0));
        assert_eq!(state.ball.pos, Vec2::new(22.0, 7.0));
    }

    #[test]
    fn test_paddle_bounce() {
        let mut state = GameState::new(1);
        state.ball.pos = Vec2::new(224.0, 378.0);
        state.ball.vel = Vec2::new(2.0, 2.0);

        let outcome = step(&mut state, &[], FRAME_MS);
        assert_eq!(state.ball.vel.y, -2.0);
        assert_eq!(state.ball.pos, Vec2::new(226.0, 376.0));
        assert!(outcome.events.contains(&GameEvent::PaddleBounce));
        assert!(!state.flags.is_falling());
    }

    #[test]
    fn test_miss_arms_collapse_but_ball_keeps_moving() {
        let mut state = open_field(1);
        state.ball.pos = Vec2::new(300.0, 389.0);
        state.ball.vel = Vec2::new(2.0, 2.0);

        let outcome = step(&mut state, &[], FRAME_MS);
        assert!(state.flags.is_falling());
        assert!(!state.flags.is_game_over());
        assert_eq!(state.ball.pos, Vec2::new(302.0, 391.0));
        assert_eq!(outcome.events, vec![GameEvent::CollapseStarted]);

        // Armed only once
        let outcome = step(&mut state, &[], FRAME_MS);
        assert!(!outcome.events.contains(&GameEvent::CollapseStarted));
    }

    #[test]
    fn test_brick_hit_flips_once() {
        let mut state = open_field(1);
        assert_eq!(state.bricks.active_count(), 72);
        state.ball.pos = Vec2::new(40.0, 86.0);
        state.ball.vel = Vec2::new(2.0, -2.0);

        let outcome = step(&mut state, &[], FRAME_MS);
        assert_eq!(
            outcome.events,
            vec![GameEvent::BrickDestroyed { column: 0, row: 0 }]
        );
        assert_eq!(state.ball.vel.y, 2.0);
        assert_eq!(state.ball.pos, Vec2::new(42.0, 88.0));
        assert_eq!(
            state.bricks.get(0, 0).map(|b| b.status),
            Some(BrickStatus::Destroyed)
        );
        assert_eq!(state.bricks.active_count(), 71);

        // Still inside the tombstone's box next frame: no second hit
        let outcome = step(&mut state, &[], FRAME_MS);
        assert!(outcome.events.is_empty());
        assert_eq!(state.ball.vel.y, 2.0);
    }

    #[test]
    fn test_paddle_priority_and_bounds() {
        let mut state = GameState::new(1);
        let both = [KeyEvent::Down(GameKey::Right), KeyEvent::Down(GameKey::Left)];
        step(&mut state, &both, FRAME_MS);
        assert_eq!(state.paddle.x, 207.0);

        for _ in 0..40 {
            step(&mut state, &[], FRAME_MS);
        }
        assert_eq!(state.paddle.x, 398.0);

        step(&mut state, &[KeyEvent::Up(GameKey::Right)], FRAME_MS);
        assert_eq!(state.paddle.x, 390.0);
        for _ in 0..60 {
            step(&mut state, &[], FRAME_MS);
        }
        assert_eq!(state.paddle.x, 0.0);
    }

    #[test]
    fn test_both_keys_at_right_wall_hold_position() {
        let mut state = GameState::new(1);
        state.paddle.x = state.tuning.paddle_max_x();
        let both = [KeyEvent::Down(GameKey::Right), KeyEvent::Down(GameKey::Left)];
        step(&mut state, &both, FRAME_MS);
        for _ in 0..5 {
            step(&mut state, &[], FRAME_MS);
            assert_eq!(state.paddle.x, 398.0);
        }

        // Right alone against the wall doesn't move either
        step(&mut state, &[KeyEvent::Up(GameKey::Left)], FRAME_MS);
        assert_eq!(state.paddle.x, 398.0);
    }

    #[test]
    fn test_ceiling_and_paddle_both_flip() {
        // Squashed arena: the paddle's top edge sits at y = 0
        let tuning = Tuning {
            arena_height: 20.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(1, tuning);
        assert_eq!(state.paddle.y, 0.0);
        state.ball.pos = Vec2::new(224.0, 5.0);
        state.ball.vel = Vec2::new(2.0, -2.0);

        let mut events = Vec::new();
        move_ball(&mut state, &mut events);

        assert_eq!(
            events,
            vec![GameEvent::CeilingBounce, GameEvent::PaddleBounce]
        );
        // Two flips cancel out
        assert_eq!(state.ball.vel, Vec2::new(2.0, -2.0));
        assert_eq!(state.ball.pos, Vec2::new(226.0, 3.0));
        assert!(!state.flags.is_falling());
    }

    #[test]
    fn test_scene_is_captured_before_physics() {
        let mut state = open_field(1);
        state.ball.pos = Vec2::new(224.0, 370.0);
        let outcome = step(&mut state, &[], FRAME_MS);
        match outcome.scene {
            Scene::Playing { ball, .. } => assert_eq!(ball.center, Vec2::new(224.0, 370.0)),
            Scene::GameOver { .. } => panic!("game should still be running"),
        }
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut state = open_field(1);
        state.flags.arm_falling();
        state.flags.end_game();
        let before = (state.ball, state.paddle, state.bricks.clone(), state.frame);

        let outcome = step(&mut state, &[KeyEvent::Down(GameKey::Right)], FRAME_MS);
        assert_eq!(outcome.status, StepStatus::Stop);
        assert!(matches!(outcome.scene, Scene::GameOver { .. }));
        assert_eq!((state.ball, state.paddle, state.bricks.clone(), state.frame), before);
    }

    #[test]
    fn test_collapse_runs_to_game_over() {
        let mut state = open_field(9);
        state.ball.pos = Vec2::new(300.0, 389.0);
        state.ball.vel = Vec2::new(2.0, 2.0);

        let mut frames = 0;
        let mut saw_game_over = false;
        while frames < 2_000 {
            let outcome = step(&mut state, &[], FRAME_MS);
            frames += 1;
            saw_game_over |= outcome.events.contains(&GameEvent::GameOver);
            if outcome.status == StepStatus::Stop {
                break;
            }
        }
        assert!(saw_game_over);
        assert!(state.flags.is_game_over());
        // The first check is armed on frame 2 and fires 180 frames later; by then
        // the sentinel (160 + 2 px/frame) is long past the floor.
        assert!((181..=184).contains(&frames), "{frames}");
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_in_arena(keys in prop::collection::vec((any::<bool>(), any::<bool>()), 1..300)) {
            let mut state = GameState::new(5);
            let max_x = state.tuning.paddle_max_x();
            for (right, left) in keys {
                state.input.move_right = right;
                state.input.move_left = left;
                let before = state.paddle.x;
                move_paddle(&mut state);
                prop_assert!(state.paddle.x >= 0.0 && state.paddle.x <= max_x);
                if right && left {
                    prop_assert!(state.paddle.x >= before);
                }
            }
        }

        #[test]
        fn prop_flags_monotonic_and_falling_is_uniform(seed in any::<u64>(), frames in 1usize..600) {
            let mut state = GameState::new(seed);
            state.paddle.x = 0.0;
            state.ball.pos = Vec2::new(300.0, 389.0);
            state.ball.vel = Vec2::new(2.0, 2.0);

            let mut was_falling = false;
            let mut was_over = false;
            for _ in 0..frames {
                let before: Vec<(bool, f32)> =
                    state.bricks.iter().map(|b| (b.is_active(), b.fall_y)).collect();
                let falling_before = state.flags.is_falling();
                step(&mut state, &[], FRAME_MS);

                prop_assert!(!was_falling || state.flags.is_falling());
                prop_assert!(!was_over || state.flags.is_game_over());
                was_falling = state.flags.is_falling();
                was_over = state.flags.is_game_over();

                if falling_before && !state.flags.is_game_over() {
                    for ((active, y), brick) in before.iter().zip(state.bricks.iter()) {
                        if *active {
                            prop_assert_eq!(brick.fall_y, y + 2.0);
                        }
                    }
                }
            }
        }
    }
}
