//! Brick collapse animation and the delayed game-over check
//!
//! Once the ball gets past the paddle every standing brick sinks by
//! `fall_speed` per frame. The game ends when the bottom brick of the first
//! column has sunk past the arena floor, as judged by a check that runs
//! `game_over_delay_ms` after it was armed.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::tuning::GameOverTiming;

/// Bookkeeping for pending game-over checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollapseState {
    /// Due times (simulation clock, ms) of armed checks, oldest first
    pending_checks: VecDeque<f64>,
    /// Frames left before the single frame-counted check starts evaluating
    frames_until_check: Option<u32>,
    /// Frames spent falling
    pub frames_falling: u64,
}

impl CollapseState {
    /// Number of wall-clock checks still waiting to fire
    pub fn pending_checks(&self) -> usize {
        self.pending_checks.len()
    }

    /// Frames remaining on the frame-counted countdown (None until armed)
    pub fn frames_until_check(&self) -> Option<u32> {
        self.frames_until_check
    }
}

/// The bottom brick of the first column has sunk past the floor.
///
/// A destroyed sentinel stops sinking, so this can stay false forever.
pub fn sentinel_fallen(state: &GameState) -> bool {
    let last_row = state.bricks.rows().saturating_sub(1);
    state
        .bricks
        .get(0, last_row)
        .is_some_and(|brick| brick.fall_y > state.tuning.arena_height)
}

/// Fire every wall-clock check whose due time has passed.
///
/// Runs before the frame's own collapse step, so each check sees the bricks
/// as the previous frame left them. Returns true if a check ended the game.
pub fn fire_due_checks(state: &mut GameState) -> bool {
    let mut ended = false;
    while let Some(&due) = state.collapse.pending_checks.front() {
        if due > state.clock_ms {
            break;
        }
        state.collapse.pending_checks.pop_front();
        if sentinel_fallen(state) && state.flags.end_game() {
            log::info!(
                "Game over: bricks collapsed ({} frames falling)",
                state.collapse.frames_falling
            );
            ended = true;
        }
    }
    ended
}

/// Sink every standing brick by one frame's fall
pub fn sink_bricks(state: &mut GameState) {
    let fall_speed = state.tuning.fall_speed;
    for brick in state.bricks.iter_mut().filter(|b| b.is_active()) {
        brick.fall_y += fall_speed;
    }
}

/// One frame of the collapse animation (only call while falling).
///
/// Returns true if this frame's check ended the game.
pub fn advance_collapse(state: &mut GameState) -> bool {
    sink_bricks(state);
    state.collapse.frames_falling += 1;

    match state.tuning.game_over_timing {
        GameOverTiming::WallClock => {
            let due = state.clock_ms + state.tuning.game_over_delay_ms;
            state.collapse.pending_checks.push_back(due);
            false
        }
        GameOverTiming::FrameCounted => {
            let remaining = state
                .collapse
                .frames_until_check
                .get_or_insert(state.tuning.game_over_delay_frames());
            if *remaining > 0 {
                *remaining -= 1;
                return false;
            }
            if sentinel_fallen(state) && state.flags.end_game() {
                log::info!(
                    "Game over: bricks collapsed ({} frames falling)",
                    state.collapse.frames_falling
                );
                return true;
            }
            false
        }
    }
}

/// Drop any checks still pending (the loop has stopped)
pub fn cancel_checks(state: &mut GameState) {
    state.collapse.pending_checks.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BrickStatus;
    use crate::tuning::Tuning;

    fn falling_state(timing: GameOverTiming) -> GameState {
        let tuning = Tuning {
            game_over_timing: timing,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(3, tuning);
        state.flags.arm_falling();
        state
    }

    #[test]
    fn test_sink_skips_tombstones() {
        let mut state = falling_state(GameOverTiming::WallClock);
        if let Some(brick) = state.bricks.get_mut(2, 2) {
            brick.status = BrickStatus::Destroyed;
        }
        sink_bricks(&mut state);
        sink_bricks(&mut state);

        assert_eq!(state.bricks.get(2, 2).map(|b| b.fall_y), Some(112.0));
        assert_eq!(state.bricks.get(0, 0).map(|b| b.fall_y), Some(84.0));
        // Original row position is untouched
        assert_eq!(state.bricks.get(0, 0).map(|b| b.y), Some(80.0));
    }

    #[test]
    fn test_sentinel() {
        let mut state = falling_state(GameOverTiming::WallClock);
        assert!(!sentinel_fallen(&state));
        if let Some(brick) = state.bricks.get_mut(0, 5) {
            brick.fall_y = 400.0;
        }
        assert!(!sentinel_fallen(&state));
        if let Some(brick) = state.bricks.get_mut(0, 5) {
            brick.fall_y = 401.0;
        }
        assert!(sentinel_fallen(&state));
    }

    #[test]
    fn test_destroyed_sentinel_never_ends_game() {
        let mut state = falling_state(GameOverTiming::FrameCounted);
        if let Some(brick) = state.bricks.get_mut(0, 5) {
            brick.status = BrickStatus::Destroyed;
        }
        for _ in 0..1000 {
            assert!(!advance_collapse(&mut state));
        }
        assert!(!state.flags.is_game_over());
        assert_eq!(state.bricks.get(0, 5).map(|b| b.fall_y), Some(160.0));
        assert!(state.bricks.get(1, 5).is_some_and(|b| b.fall_y > 400.0));
    }

    #[test]
    fn test_wall_clock_checks_overlap() {
        let mut state = falling_state(GameOverTiming::WallClock);
        for _ in 0..3 {
            state.clock_ms += 10.0;
            advance_collapse(&mut state);
        }
        assert_eq!(state.collapse.pending_checks(), 3);

        // Sentinel already past the floor, but nothing is due yet
        if let Some(brick) = state.bricks.get_mut(0, 5) {
            brick.fall_y = 500.0;
        }
        state.clock_ms = 3009.0;
        assert!(!fire_due_checks(&mut state));
        assert!(!state.flags.is_game_over());

        state.clock_ms = 3010.0;
        assert!(fire_due_checks(&mut state));
        assert!(state.flags.is_game_over());
        assert_eq!(state.collapse.pending_checks(), 2);

        // Later checks don't re-trigger
        state.clock_ms = 4000.0;
        assert!(!fire_due_checks(&mut state));
        assert_eq!(state.collapse.pending_checks(), 0);
    }

    #[test]
    fn test_wall_clock_check_fails_quietly() {
        let mut state = falling_state(GameOverTiming::WallClock);
        advance_collapse(&mut state);
        state.clock_ms = 5000.0;
        assert!(!fire_due_checks(&mut state));
        assert!(!state.flags.is_game_over());
        assert_eq!(state.collapse.pending_checks(), 0);
    }

    #[test]
    fn test_frame_counted_waits_then_checks_every_frame() {
        let mut state = falling_state(GameOverTiming::FrameCounted);
        let delay = state.tuning.game_over_delay_frames();

        for _ in 0..delay {
            assert!(!advance_collapse(&mut state));
        }
        assert_eq!(state.collapse.frames_until_check(), Some(0));
        assert_eq!(state.collapse.pending_checks(), 0);

        // Bottom brick started at 160 and has sunk 2 px per frame
        let sentinel_y = state.bricks.get(0, 5).map(|b| b.fall_y);
        assert_eq!(sentinel_y, Some(160.0 + 2.0 * delay as f32));
        assert!(advance_collapse(&mut state));
        assert!(state.flags.is_game_over());
    }
}
