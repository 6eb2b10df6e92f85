//! Demo autopilot
//!
//! Emits the key presses a player would make to keep the paddle under the
//! ball. Drives the native headless runner.

use super::input::{GameKey, KeyEvent};
use super::state::GameState;

/// How far (px) the ball may drift from the paddle center before steering
const DEAD_ZONE: f32 = 6.0;

/// Tracks which direction key the autopilot is "holding"
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    holding: Option<GameKey>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key events for the next frame (empty when nothing changes)
    pub fn keys(&mut self, state: &GameState) -> Vec<KeyEvent> {
        let paddle_center = state.paddle.x + state.paddle.width / 2.0;
        // Lead the ball by one frame of travel
        let target = state.ball.pos.x + state.ball.vel.x;
        let offset = target - paddle_center;

        let wanted = if offset > DEAD_ZONE {
            Some(GameKey::Right)
        } else if offset < -DEAD_ZONE {
            Some(GameKey::Left)
        } else {
            None
        };

        if wanted == self.holding {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(key) = self.holding {
            events.push(KeyEvent::Up(key));
        }
        if let Some(key) = wanted {
            events.push(KeyEvent::Down(key));
        }
        self.holding = wanted;
        events
    }
}
