//! Per-frame draw list
//!
//! The frame loop captures a [`Scene`] from the game state; the GPU renderer
//! and the DOM overlay only ever look at scenes, never at the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BRICK_SPRITE_HEIGHT, BRICK_SPRITE_WIDTH, PADDLE_SPRITE_X, PADDLE_SPRITE_Y};
use crate::sim::GameState;

pub const GAME_OVER_TITLE: &str = "Game Over";
pub const GAME_OVER_HINT: &str = "Press R to restart";

/// Which sprite sheet a sprite is cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteSheet {
    /// Paddle and misc sprites (`#sprite`)
    Sprites,
    /// One 32x16 cell per brick color (`#bricks`)
    Bricks,
}

/// Pixel rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// A sprite-sheet region blitted (and scaled) into the arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteDraw {
    pub sheet: SpriteSheet,
    /// Source region in sheet pixels
    pub src: Rect,
    /// Destination in arena pixels
    pub dst: Rect,
}

/// A filled circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleDraw {
    pub center: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
}

/// A line of text centered horizontally on `anchor.x`, baseline at `anchor.y`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    pub anchor: Vec2,
    pub size_px: f32,
    pub color: [f32; 4],
}

pub mod colors {
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GAME_OVER_TEXT: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}

/// Everything drawn in one frame, in draw order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scene {
    Playing {
        ball: CircleDraw,
        paddle: SpriteDraw,
        bricks: Vec<SpriteDraw>,
    },
    GameOver {
        lines: Vec<TextLine>,
    },
}

impl Scene {
    /// Build the draw list for the current state
    pub fn capture(state: &GameState) -> Self {
        let tuning = &state.tuning;

        if state.flags.is_game_over() {
            let center = Vec2::new(tuning.arena_width / 2.0, tuning.arena_height / 2.0);
            return Scene::GameOver {
                lines: vec![
                    TextLine {
                        text: GAME_OVER_TITLE.to_string(),
                        anchor: center,
                        size_px: 30.0,
                        color: colors::GAME_OVER_TEXT,
                    },
                    TextLine {
                        text: GAME_OVER_HINT.to_string(),
                        anchor: center + Vec2::new(0.0, 30.0),
                        size_px: 20.0,
                        color: colors::GAME_OVER_TEXT,
                    },
                ],
            };
        }

        let ball = CircleDraw {
            center: state.ball.pos,
            radius: state.ball.radius,
            color: colors::BALL,
        };

        let paddle = SpriteDraw {
            sheet: SpriteSheet::Sprites,
            src: Rect::new(
                PADDLE_SPRITE_X,
                PADDLE_SPRITE_Y,
                state.paddle.width,
                state.paddle.height,
            ),
            dst: Rect::new(
                state.paddle.x,
                state.paddle.y,
                state.paddle.width,
                state.paddle.height,
            ),
        };

        let bricks = state
            .bricks
            .active()
            .map(|brick| SpriteDraw {
                sheet: SpriteSheet::Bricks,
                src: Rect::new(
                    brick.color as f32 * BRICK_SPRITE_WIDTH,
                    0.0,
                    BRICK_SPRITE_WIDTH,
                    BRICK_SPRITE_HEIGHT,
                ),
                dst: Rect::new(brick.x, brick.fall_y, tuning.brick_width, tuning.brick_height),
            })
            .collect();

        Scene::Playing {
            ball,
            paddle,
            bricks,
        }
    }

    /// Text lines to overlay (empty while playing)
    pub fn text_lines(&self) -> &[TextLine] {
        match self {
            Scene::Playing { .. } => &[],
            Scene::GameOver { lines } => lines,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, Scene::GameOver { .. })
    }
}
