//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-frame physics (velocities are pixels per frame)
//! - Seeded RNG only
//! - Stable iteration order (column-major brick grid)
//! - No GPU or platform dependencies

pub mod autopilot;
pub mod collapse;
pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collapse::{CollapseState, sentinel_fallen};
pub use collision::{Aabb, resolve_brick_hits};
pub use input::{GameKey, InputQueue, InputState, KeyEvent};
pub use state::{Ball, Brick, BrickGrid, BrickStatus, GameFlags, GameState, Paddle};
pub use tick::{GameEvent, StepOutcome, StepStatus, step};
