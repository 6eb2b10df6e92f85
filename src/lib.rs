//! Brick Fall - a Breakout-style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, brick hits, collapse animation)
//! - `scene`: Per-frame draw list captured from the simulation
//! - `renderer`: WebGPU sprite pipeline
//! - `game_loop`: Running/stopped loop state machine and input buffering
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game constants

pub mod game_loop;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use game_loop::{GameLoop, KeyResponse, LoopStatus};
pub use scene::Scene;
pub use tuning::{GameOverTiming, Tuning};

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (logical pixels)
    pub const ARENA_WIDTH: f32 = 448.0;
    pub const ARENA_HEIGHT: f32 = 400.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 4.0;
    /// Ball spawns this far above the bottom edge
    pub const BALL_START_OFFSET_Y: f32 = 30.0;
    pub const BALL_START_DX: f32 = 2.0;
    pub const BALL_START_DY: f32 = -2.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 50.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Gap between the paddle's bottom edge and the arena floor
    pub const PADDLE_BOTTOM_MARGIN: f32 = 10.0;
    /// Pixels per frame while a direction key is held
    pub const PADDLE_SENSITIVITY: f32 = 8.0;

    /// Brick grid layout
    pub const BRICK_COLUMNS: usize = 12;
    pub const BRICK_ROWS: usize = 6;
    pub const BRICK_WIDTH: f32 = 30.0;
    pub const BRICK_HEIGHT: f32 = 14.0;
    pub const BRICK_PADDING: f32 = 2.0;
    pub const BRICK_OFFSET_TOP: f32 = 80.0;
    pub const BRICK_OFFSET_LEFT: f32 = 34.0;
    /// Number of color variants in the bricks sprite sheet
    pub const BRICK_COLORS: u8 = 8;

    /// Collapse animation
    pub const FALL_SPEED: f32 = 2.0;
    pub const GAME_OVER_DELAY_MS: f64 = 3000.0;

    /// Nominal frame duration (60 Hz display)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest frame delta fed to the simulation clock (tab switches etc.)
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Sprite sheet regions (source pixels)
    pub const PADDLE_SPRITE_X: f32 = 29.0;
    pub const PADDLE_SPRITE_Y: f32 = 174.0;
    pub const BRICK_SPRITE_WIDTH: f32 = 32.0;
    pub const BRICK_SPRITE_HEIGHT: f32 = 16.0;
}
