//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`]; nothing is global.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collapse::CollapseState;
use super::input::InputState;
use crate::tuning::Tuning;

/// A brick is either standing or a tombstone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickStatus {
    Active,
    Destroyed,
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    /// Displacement per frame
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Spawn position and velocity for a fresh game
    pub fn spawn(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.arena_width / 2.0,
                tuning.arena_height - tuning.ball_start_offset_y,
            ),
            vel: Vec2::new(tuning.ball_start_dx, tuning.ball_start_dy),
            radius: tuning.ball_radius,
        }
    }

    /// Where the ball would be after this frame's displacement
    #[inline]
    pub fn next_pos(&self) -> Vec2 {
        self.pos + self.vel
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (never changes)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Centered horizontally, resting above the arena floor
    pub fn spawn(tuning: &Tuning) -> Self {
        Self {
            x: (tuning.arena_width - tuning.paddle_width) / 2.0,
            y: tuning.paddle_y(),
            width: tuning.paddle_width,
            height: tuning.paddle_height,
        }
    }

    /// Whether `x` lies strictly between the paddle's left and right edges
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        x > self.x && x < self.x + self.width
    }
}

/// A single brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub column: usize,
    pub row: usize,
    /// Pixel origin (top-left)
    pub x: f32,
    /// Original row position; collision always uses this
    pub y: f32,
    /// Drawn position; sinks during the collapse animation
    pub fall_y: f32,
    pub status: BrickStatus,
    /// Sprite variant in the bricks sheet
    pub color: u8,
}

impl Brick {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == BrickStatus::Active
    }
}

/// Fixed-size brick grid, stored column-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickGrid {
    columns: usize,
    rows: usize,
    bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Build every brick as active with a random color
    pub fn build(tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let columns = tuning.brick_columns;
        let rows = tuning.brick_rows;
        let mut bricks = Vec::with_capacity(columns * rows);
        for column in 0..columns {
            for row in 0..rows {
                let (x, y) = tuning.brick_origin(column, row);
                bricks.push(Brick {
                    column,
                    row,
                    x,
                    y,
                    fall_y: y,
                    status: BrickStatus::Active,
                    color: rng.random_range(0..tuning.brick_colors),
                });
            }
        }
        Self {
            columns,
            rows,
            bricks,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    #[inline]
    fn index(&self, column: usize, row: usize) -> Option<usize> {
        (column < self.columns && row < self.rows).then(|| column * self.rows + row)
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Brick> {
        self.index(column, row).map(|i| &self.bricks[i])
    }

    pub fn get_mut(&mut self, column: usize, row: usize) -> Option<&mut Brick> {
        self.index(column, row).map(|i| &mut self.bricks[i])
    }

    /// All bricks, column by column
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Brick> {
        self.bricks.iter_mut()
    }

    /// Bricks still standing, column by column
    pub fn active(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

/// One-way game flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFlags {
    falling: bool,
    game_over: bool,
}

impl GameFlags {
    pub fn is_falling(&self) -> bool {
        self.falling
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Arm the collapse animation. Returns true only on the first call.
    pub fn arm_falling(&mut self) -> bool {
        let armed = !self.falling;
        self.falling = true;
        armed
    }

    /// Enter the terminal state. Returns true only on the first call.
    pub fn end_game(&mut self) -> bool {
        let ended = !self.game_over;
        self.game_over = true;
        ended
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed used for brick colors
    pub seed: u64,
    pub tuning: Tuning,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
    pub input: InputState,
    pub flags: GameFlags,
    pub collapse: CollapseState,
    /// Frames simulated so far
    pub frame: u64,
    /// Simulation clock (milliseconds since start)
    pub clock_ms: f64,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game with the given tuning.
    ///
    /// Tuning that fails [`Tuning::validate`] is replaced by the defaults.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(err) => {
                log::warn!("Rejecting tuning ({err}); using defaults");
                Tuning::default()
            }
        };
        let mut rng = Pcg32::seed_from_u64(seed);
        Self {
            seed,
            tuning,
            ball: Ball::spawn(&tuning),
            paddle: Paddle::spawn(&tuning),
            bricks: BrickGrid::build(&tuning, &mut rng),
            input: InputState::default(),
            flags: GameFlags::default(),
            collapse: CollapseState::default(),
            frame: 0,
            clock_ms: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_layout() {
        let state = GameState::new(7);
        assert_eq!(state.ball.pos, Vec2::new(224.0, 370.0));
        assert_eq!(state.ball.vel, Vec2::new(2.0, -2.0));
        assert_eq!(state.ball.radius, 4.0);
        assert_eq!(state.paddle.x, 199.0);
        assert_eq!(state.paddle.y, 380.0);
        assert!(!state.flags.is_falling());
        assert!(!state.flags.is_game_over());
    }

    #[test]
    fn test_grid_is_column_major_and_active() {
        let state = GameState::new(7);
        let grid = &state.bricks;
        assert_eq!(grid.len(), 72);
        assert_eq!(grid.active_count(), 72);
        assert_eq!((grid.columns(), grid.rows()), (12, 6));

        let order: Vec<(usize, usize)> = grid.iter().take(7).map(|b| (b.column, b.row)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (1, 0)]);

        let brick = grid.get(3, 2).expect("in range");
        assert_eq!((brick.x, brick.y, brick.fall_y), (130.0, 112.0, 112.0));
        assert!(grid.get(12, 0).is_none());
        assert!(grid.get(0, 6).is_none());
    }

    #[test]
    fn test_colors_are_seeded() {
        let a = GameState::new(42);
        let b = GameState::new(42);
        assert_eq!(a.bricks, b.bricks);
        assert!(a.bricks.iter().all(|brick| brick.color < 8));
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        let tuning = Tuning {
            brick_colors: 0,
            ..Tuning::default()
        };
        let state = GameState::with_tuning(7, tuning);
        assert_eq!(state.tuning, Tuning::default());
        assert_eq!(state.bricks.active_count(), 72);
        assert!(state.bricks.iter().all(|brick| brick.color < 8));
    }

    #[test]
    fn test_flags_are_one_way() {
        let mut flags = GameFlags::default();
        assert!(flags.arm_falling());
        assert!(!flags.arm_falling());
        assert!(flags.is_falling());
        assert!(flags.end_game());
        assert!(!flags.end_game());
        assert!(flags.is_game_over());
    }
}
