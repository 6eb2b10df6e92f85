//! Keyboard input: key aliases, key events and the per-frame input flags
//!
//! Browser key events are buffered in an [`InputQueue`] and folded into the
//! [`InputState`] flags at the start of the next frame.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A key the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKey {
    Right,
    Left,
    Restart,
}

impl GameKey {
    /// Map a DOM `KeyboardEvent.key` value to a game key
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Right" | "ArrowRight" | "d" | "D" => Some(GameKey::Right),
            "Left" | "ArrowLeft" | "a" | "A" => Some(GameKey::Left),
            "r" | "R" => Some(GameKey::Restart),
            _ => None,
        }
    }
}

/// A press or release of a game key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Down(GameKey),
    Up(GameKey),
}

impl KeyEvent {
    /// Key-down event for a DOM key name (None for unrecognized keys)
    pub fn down(key: &str) -> Option<Self> {
        GameKey::from_key(key).map(KeyEvent::Down)
    }

    /// Key-up event for a DOM key name (None for unrecognized keys)
    pub fn up(key: &str) -> Option<Self> {
        GameKey::from_key(key).map(KeyEvent::Up)
    }
}

/// Paddle direction flags, mirroring which keys are physically held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub move_right: bool,
    pub move_left: bool,
}

impl InputState {
    /// Apply one key event. Restart never touches the flags.
    pub fn apply(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(GameKey::Right) => self.move_right = true,
            KeyEvent::Down(GameKey::Left) => self.move_left = true,
            KeyEvent::Up(GameKey::Right) => self.move_right = false,
            KeyEvent::Up(GameKey::Left) => self.move_left = false,
            KeyEvent::Down(GameKey::Restart) | KeyEvent::Up(GameKey::Restart) => {}
        }
    }
}

/// Events received since the last frame, in arrival order
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: VecDeque<KeyEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: KeyEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every buffered event, oldest first
    pub fn drain(&mut self) -> Vec<KeyEvent> {
        self.events.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
