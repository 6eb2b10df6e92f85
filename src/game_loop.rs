//! Frame loop state machine
//!
//! Owns the game state, buffers key events between frames and tracks whether
//! the platform should keep scheduling frames (Running) or not (Stopped).
//! The platform calls [`GameLoop::frame`] once per display refresh while running.

use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_MS, MAX_FRAME_MS};
use crate::scene::Scene;
use crate::sim::{GameEvent, GameKey, GameState, InputQueue, KeyEvent, StepStatus, step};
use crate::tuning::Tuning;

/// Whether frames are being scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopStatus {
    Running,
    Stopped,
}

/// What the platform should do after a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    /// Not a game key
    Ignored,
    /// Queued for the next frame
    Buffered,
    /// Restart pressed on the end screen: call [`GameLoop::restart`] and resume scheduling
    RestartRequested,
}

/// Output of one scheduled frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub scene: Scene,
    pub events: Vec<GameEvent>,
    /// Status after this frame; don't schedule another when `Stopped`
    pub status: LoopStatus,
}

pub struct GameLoop {
    state: GameState,
    queue: InputQueue,
    status: LoopStatus,
    /// Timestamp of the previous frame (ms), None before the first frame
    last_time: Option<f64>,
}

impl GameLoop {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        log::info!(
            "New game: seed {seed}, game-over timing {}",
            tuning.game_over_timing.as_str()
        );
        Self {
            state: GameState::with_tuning(seed, tuning),
            queue: InputQueue::new(),
            status: LoopStatus::Running,
            last_time: None,
        }
    }

    /// Resume from an existing state (replays, scripted scenarios)
    pub fn from_state(state: GameState) -> Self {
        let status = if state.flags.is_game_over() {
            LoopStatus::Stopped
        } else {
            LoopStatus::Running
        };
        Self {
            state,
            queue: InputQueue::new(),
            status,
            last_time: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> LoopStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == LoopStatus::Running
    }

    /// Key pressed (DOM `KeyboardEvent.key`)
    pub fn key_down(&mut self, key: &str) -> KeyResponse {
        match KeyEvent::down(key) {
            None => KeyResponse::Ignored,
            Some(KeyEvent::Down(GameKey::Restart)) => {
                if self.status == LoopStatus::Stopped && self.state.flags.is_game_over() {
                    KeyResponse::RestartRequested
                } else {
                    KeyResponse::Ignored
                }
            }
            Some(event) => {
                self.queue.push(event);
                KeyResponse::Buffered
            }
        }
    }

    /// Key released (DOM `KeyboardEvent.key`)
    pub fn key_up(&mut self, key: &str) -> KeyResponse {
        match KeyEvent::up(key) {
            None | Some(KeyEvent::Up(GameKey::Restart)) => KeyResponse::Ignored,
            Some(event) => {
                self.queue.push(event);
                KeyResponse::Buffered
            }
        }
    }

    /// Push an already-mapped event (autopilot, tests)
    pub fn push_event(&mut self, event: KeyEvent) {
        self.queue.push(event);
    }

    /// Run one frame at timestamp `now_ms`.
    ///
    /// Returns None once the loop has stopped; the platform shouldn't be
    /// calling in that state.
    pub fn frame(&mut self, now_ms: f64) -> Option<Frame> {
        if self.status == LoopStatus::Stopped {
            return None;
        }

        let elapsed = match self.last_time {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => FRAME_MS,
        };
        self.last_time = Some(now_ms);

        let events = self.queue.drain();
        let outcome = step(&mut self.state, &events, elapsed);

        if outcome.status == StepStatus::Stop {
            self.status = LoopStatus::Stopped;
            self.queue.clear();
            log::info!(
                "Loop stopped at frame {} with {} bricks standing",
                self.state.frame,
                self.state.bricks.active_count()
            );
        }

        Some(Frame {
            scene: outcome.scene,
            events: outcome.events,
            status: self.status,
        })
    }

    /// Throw away all state and start over. Only valid once stopped.
    pub fn restart(&mut self, seed: u64) -> bool {
        if self.status != LoopStatus::Stopped {
            log::warn!("Restart ignored: game still running");
            return false;
        }
        let tuning = self.state.tuning;
        *self = GameLoop::new(seed, tuning);
        log::info!("Game restarted");
        true
    }
}
