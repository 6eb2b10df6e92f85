//! Data-driven game constants
//!
//! Every gameplay number lives here so a page (or the native runner) can
//! override them with a JSON blob. Defaults match `crate::consts`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How the delayed game-over check is scheduled once bricks start falling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameOverTiming {
    /// A fresh check is armed every falling frame and fires `game_over_delay_ms`
    /// later on the simulation clock. Checks overlap.
    #[default]
    WallClock,
    /// One countdown, armed when falling starts, measured in frames.
    FrameCounted,
}

impl GameOverTiming {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverTiming::WallClock => "wall-clock",
            GameOverTiming::FrameCounted => "frame-counted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wall-clock" | "wallclock" | "clock" => Some(GameOverTiming::WallClock),
            "frame-counted" | "framecounted" | "frames" => Some(GameOverTiming::FrameCounted),
            _ => None,
        }
    }
}

/// Errors from loading a tuning override
#[derive(Debug)]
pub enum TuningError {
    /// The JSON could not be parsed
    Parse(serde_json::Error),
    /// A field holds a value the simulation can't run with
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "invalid tuning json: {err}"),
            TuningError::Invalid(msg) => write!(f, "invalid tuning value: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}

/// Gameplay constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_start_offset_y: f32,
    pub ball_start_dx: f32,
    pub ball_start_dy: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_bottom_margin: f32,
    pub paddle_sensitivity: f32,

    // === Bricks ===
    pub brick_columns: usize,
    pub brick_rows: usize,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_offset_top: f32,
    pub brick_offset_left: f32,
    pub brick_colors: u8,

    // === Collapse ===
    pub fall_speed: f32,
    pub game_over_delay_ms: f64,
    pub game_over_timing: GameOverTiming,
    /// Frame duration used to convert the delay into a frame count
    pub nominal_frame_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            ball_radius: BALL_RADIUS,
            ball_start_offset_y: BALL_START_OFFSET_Y,
            ball_start_dx: BALL_START_DX,
            ball_start_dy: BALL_START_DY,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,
            paddle_sensitivity: PADDLE_SENSITIVITY,

            brick_columns: BRICK_COLUMNS,
            brick_rows: BRICK_ROWS,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_padding: BRICK_PADDING,
            brick_offset_top: BRICK_OFFSET_TOP,
            brick_offset_left: BRICK_OFFSET_LEFT,
            brick_colors: BRICK_COLORS,

            fall_speed: FALL_SPEED,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
            game_over_timing: GameOverTiming::WallClock,
            nominal_frame_ms: FRAME_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("ball_radius", self.ball_radius),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_sensitivity", self.paddle_sensitivity),
            ("brick_width", self.brick_width),
            ("brick_height", self.brick_height),
            ("fall_speed", self.fall_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        if self.brick_columns == 0 || self.brick_rows == 0 {
            return Err(TuningError::Invalid(format!(
                "brick grid must be non-empty, got {}x{}",
                self.brick_columns, self.brick_rows
            )));
        }
        if self.brick_colors == 0 {
            return Err(TuningError::Invalid("brick_colors must be > 0".into()));
        }
        if self.paddle_width > self.arena_width {
            return Err(TuningError::Invalid(format!(
                "paddle_width {} exceeds arena_width {}",
                self.paddle_width, self.arena_width
            )));
        }
        if !(self.game_over_delay_ms >= 0.0) || !(self.nominal_frame_ms > 0.0) {
            return Err(TuningError::Invalid(
                "game_over_delay_ms must be >= 0 and nominal_frame_ms > 0".into(),
            ));
        }
        Ok(())
    }

    /// Fixed paddle top edge
    pub fn paddle_y(&self) -> f32 {
        self.arena_height - self.paddle_height - self.paddle_bottom_margin
    }

    /// Rightmost legal paddle x
    pub fn paddle_max_x(&self) -> f32 {
        self.arena_width - self.paddle_width
    }

    /// Pixel origin of the brick at (column, row)
    pub fn brick_origin(&self, column: usize, row: usize) -> (f32, f32) {
        let x = column as f32 * (self.brick_width + self.brick_padding) + self.brick_offset_left;
        let y = row as f32 * (self.brick_height + self.brick_padding) + self.brick_offset_top;
        (x, y)
    }

    /// Game-over delay expressed in frames (for `GameOverTiming::FrameCounted`)
    pub fn game_over_delay_frames(&self) -> u32 {
        (self.game_over_delay_ms / self.nominal_frame_ms).round() as u32
    }
}
