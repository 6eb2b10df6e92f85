//! WebGPU rendering module
//!
//! Scenes become textured quads cut from the sprite sheets; the ball is a
//! circle shaded in the fragment shader.

pub mod shapes;
pub mod sprite_pipeline;
pub mod vertex;

pub use shapes::{ArenaProjection, DrawBatch, scene_vertices};
pub use sprite_pipeline::{RenderError, SpriteRenderState};
pub use vertex::Vertex;
