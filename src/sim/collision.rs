//! Collision detection for the rectangular arena
//!
//! All checks are plain predicates on the ball's current or projected center;
//! the frame step in `tick` decides what to flip.

use glam::Vec2;

use super::state::{Ball, BrickGrid, BrickStatus, Paddle};

/// Axis-aligned box (origin at top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Point strictly inside the box (edges don't count)
    #[inline]
    pub fn contains_strict(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }
}

/// Projected x crosses the left or right wall
pub fn hits_side_wall(ball: &Ball, arena_width: f32) -> bool {
    let next_x = ball.pos.x + ball.vel.x;
    next_x > arena_width - ball.radius || next_x < ball.radius
}

/// Projected y crosses the ceiling
pub fn hits_ceiling(ball: &Ball) -> bool {
    ball.pos.y + ball.vel.y < ball.radius
}

/// Ball is over the paddle and its projected y reaches the paddle's top edge
pub fn hits_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    paddle.spans_x(ball.pos.x) && ball.pos.y + ball.vel.y >= paddle.y
}

/// Projected y is past the floor or past the paddle's bottom edge
pub fn falls_through(ball: &Ball, paddle: &Paddle, arena_height: f32) -> bool {
    let next_y = ball.pos.y + ball.vel.y;
    next_y > arena_height - ball.radius || next_y > paddle.y + paddle.height
}

/// Test the ball's current center against every active brick's original box.
///
/// Each brick the center is inside is marked destroyed and flips `vel.y` once,
/// so two overlapping hits in one frame cancel out. Returns the (column, row)
/// of every brick destroyed, in grid order.
pub fn resolve_brick_hits(
    ball: &mut Ball,
    bricks: &mut BrickGrid,
    brick_width: f32,
    brick_height: f32,
) -> Vec<(usize, usize)> {
    let center = ball.pos;
    let mut hits = Vec::new();
    for brick in bricks.iter_mut() {
        if !brick.is_active() {
            continue;
        }
        let bounds = Aabb::new(brick.x, brick.y, brick_width, brick_height);
        if bounds.contains_strict(center) {
            ball.vel.y = -ball.vel.y;
            brick.status = BrickStatus::Destroyed;
            hits.push((brick.column, brick.row));
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;
    use crate::tuning::Tuning;

    fn ball_at(x: f32, y: f32, dx: f32, dy: f32) -> Ball {
        Ball {
            pos: Vec2::new(x, y),
            vel: Vec2::new(dx, dy),
            radius: 4.0,
        }
    }

    #[test]
    fn test_aabb_edges_are_outside() {
        let bounds = Aabb::new(34.0, 80.0, 30.0, 14.0);
        assert!(bounds.contains_strict(Vec2::new(40.0, 85.0)));
        assert!(!bounds.contains_strict(Vec2::new(34.0, 85.0)));
        assert!(!bounds.contains_strict(Vec2::new(64.0, 85.0)));
        assert!(!bounds.contains_strict(Vec2::new(40.0, 80.0)));
        assert!(!bounds.contains_strict(Vec2::new(40.0, 94.0)));
    }

    #[test]
    fn test_side_walls() {
        assert!(hits_side_wall(&ball_at(443.0, 200.0, 2.0, -2.0), 448.0));
        assert!(!hits_side_wall(&ball_at(442.0, 200.0, 2.0, -2.0), 448.0));
        assert!(hits_side_wall(&ball_at(5.0, 200.0, -2.0, -2.0), 448.0));
        assert!(!hits_side_wall(&ball_at(6.0, 200.0, -2.0, -2.0), 448.0));
    }

    #[test]
    fn test_ceiling() {
        assert!(hits_ceiling(&ball_at(100.0, 5.0, 2.0, -2.0)));
        assert!(!hits_ceiling(&ball_at(100.0, 6.0, 2.0, -2.0)));
        assert!(!hits_ceiling(&ball_at(100.0, 5.0, 2.0, 2.0)));
    }

    #[test]
    fn test_paddle_span_and_reach() {
        let paddle = Paddle {
            x: 199.0,
            y: 380.0,
            width: 50.0,
            height: 10.0,
        };
        assert!(hits_paddle(&ball_at(224.0, 378.0, 2.0, 2.0), &paddle));
        assert!(!hits_paddle(&ball_at(224.0, 376.0, 2.0, 2.0), &paddle));
        // Edges of the span don't count
        assert!(!hits_paddle(&ball_at(199.0, 378.0, 2.0, 2.0), &paddle));
        assert!(!hits_paddle(&ball_at(249.0, 378.0, 2.0, 2.0), &paddle));
    }

    #[test]
    fn test_fall_through() {
        let paddle = Paddle {
            x: 0.0,
            y: 380.0,
            width: 50.0,
            height: 10.0,
        };
        assert!(!falls_through(&ball_at(300.0, 388.0, 2.0, 2.0), &paddle, 400.0));
        assert!(falls_through(&ball_at(300.0, 389.0, 2.0, 2.0), &paddle, 400.0));
    }

    #[test]
    fn test_brick_hit_destroys_and_flips() {
        let mut state = GameState::new(1);
        let mut ball = ball_at(40.0, 85.0, 2.0, -2.0);

        let hits = resolve_brick_hits(&mut ball, &mut state.bricks, 30.0, 14.0);
        assert_eq!(hits, vec![(0, 0)]);
        assert_eq!(ball.vel.y, 2.0);
        assert_eq!(
            state.bricks.get(0, 0).map(|b| b.status),
            Some(BrickStatus::Destroyed)
        );

        // Tombstones are skipped on the next pass
        let hits = resolve_brick_hits(&mut ball, &mut state.bricks, 30.0, 14.0);
        assert!(hits.is_empty());
        assert_eq!(ball.vel.y, 2.0);
    }

    #[test]
    fn test_overlapping_bricks_each_flip() {
        // Negative padding stacks rows 6 px apart, so boxes overlap
        let tuning = Tuning {
            brick_padding: -20.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(1, tuning);
        let mut ball = ball_at(40.0, 85.0, 2.0, -2.0);

        let hits = resolve_brick_hits(&mut ball, &mut state.bricks, 30.0, 14.0);
        assert_eq!(hits, vec![(0, 0), (0, 1)]);
        assert_eq!(ball.vel.y, -2.0);
        assert_eq!(state.bricks.active_count(), 70);
    }

    #[test]
    fn test_brick_hit_uses_original_row() {
        let mut state = GameState::new(1);
        for brick in state.bricks.iter_mut() {
            brick.fall_y += 100.0;
        }
        let mut ball = ball_at(40.0, 85.0, 2.0, -2.0);
        let hits = resolve_brick_hits(&mut ball, &mut state.bricks, 30.0, 14.0);
        assert_eq!(hits, vec![(0, 0)]);
    }
}
