//! Quad generation for scenes
//!
//! Converts a [`Scene`] into triangle-list vertices in normalized device
//! coordinates, grouped into runs that share a sprite sheet.

use std::ops::Range;

use super::vertex::{Vertex, mode};
use crate::scene::{CircleDraw, Rect, Scene, SpriteDraw, SpriteSheet};

/// Maps arena pixels (top-left origin, y down) to NDC (center origin, y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaProjection {
    pub width: f32,
    pub height: f32,
}

impl ArenaProjection {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn to_ndc(&self, x: f32, y: f32) -> [f32; 2] {
        [x / self.width * 2.0 - 1.0, 1.0 - y / self.height * 2.0]
    }
}

/// Contiguous vertices drawn with one sprite sheet bound
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub sheet: SpriteSheet,
    pub vertices: Range<u32>,
}

/// Two triangles covering `dst`, with per-corner uvs
fn quad(
    projection: &ArenaProjection,
    dst: Rect,
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
    shading: f32,
) -> [Vertex; 6] {
    let tl = projection.to_ndc(dst.x, dst.y);
    let tr = projection.to_ndc(dst.x + dst.w, dst.y);
    let bl = projection.to_ndc(dst.x, dst.y + dst.h);
    let br = projection.to_ndc(dst.x + dst.w, dst.y + dst.h);

    let corner = |position, u: f32, v: f32| Vertex::new(position, [u, v], color, shading);
    [
        corner(tl, uv_min[0], uv_min[1]),
        corner(bl, uv_min[0], uv_max[1]),
        corner(br, uv_max[0], uv_max[1]),
        corner(tl, uv_min[0], uv_min[1]),
        corner(br, uv_max[0], uv_max[1]),
        corner(tr, uv_max[0], uv_min[1]),
    ]
}

/// Textured quad for a sprite; `sheet_size` is the sheet's pixel size
pub fn sprite_quad(
    projection: &ArenaProjection,
    sprite: &SpriteDraw,
    sheet_size: (u32, u32),
) -> [Vertex; 6] {
    let (sw, sh) = (sheet_size.0.max(1) as f32, sheet_size.1.max(1) as f32);
    let uv_min = [sprite.src.x / sw, sprite.src.y / sh];
    let uv_max = [
        (sprite.src.x + sprite.src.w) / sw,
        (sprite.src.y + sprite.src.h) / sh,
    ];
    quad(
        projection,
        sprite.dst,
        uv_min,
        uv_max,
        [1.0; 4],
        mode::TEXTURED,
    )
}

/// Bounding quad for a circle; the shader discards outside the unit disc
pub fn circle_quad(projection: &ArenaProjection, circle: &CircleDraw) -> [Vertex; 6] {
    let r = circle.radius;
    let dst = Rect::new(circle.center.x - r, circle.center.y - r, r * 2.0, r * 2.0);
    quad(
        projection,
        dst,
        [-1.0, -1.0],
        [1.0, 1.0],
        circle.color,
        mode::CIRCLE,
    )
}

/// Append six vertices, extending the last batch if it uses the same sheet
fn push(
    vertices: &mut Vec<Vertex>,
    batches: &mut Vec<DrawBatch>,
    sheet: SpriteSheet,
    quad: [Vertex; 6],
) {
    let start = vertices.len() as u32;
    vertices.extend_from_slice(&quad);
    let end = vertices.len() as u32;
    match batches.last_mut() {
        Some(last) if last.sheet == sheet && last.vertices.end == start => last.vertices.end = end,
        _ => batches.push(DrawBatch {
            sheet,
            vertices: start..end,
        }),
    }
}

/// Vertices and batches for a scene, in draw order (ball, paddle, bricks).
///
/// The ball doesn't sample a texture; it rides along in the sprite sheet's
/// batch so it doesn't split the draw.
pub fn scene_vertices(
    projection: &ArenaProjection,
    scene: &Scene,
    sheet_size: impl Fn(SpriteSheet) -> (u32, u32),
) -> (Vec<Vertex>, Vec<DrawBatch>) {
    let mut vertices = Vec::new();
    let mut batches = Vec::new();

    if let Scene::Playing {
        ball,
        paddle,
        bricks,
    } = scene
    {
        vertices.reserve((bricks.len() + 2) * 6);
        push(
            &mut vertices,
            &mut batches,
            SpriteSheet::Sprites,
            circle_quad(projection, ball),
        );
        for sprite in std::iter::once(paddle).chain(bricks) {
            push(
                &mut vertices,
                &mut batches,
                sprite.sheet,
                sprite_quad(projection, sprite, sheet_size(sprite.sheet)),
            );
        }
    }

    (vertices, batches)
}
