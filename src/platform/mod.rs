//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Sprite sheet pixels (DOM `<img>` elements on web)
//! - Tuning overrides (inline JSON on web, a file path natively)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Decoded RGBA8 image, row-major, no padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImagePixels {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Dimensions are non-zero and the buffer matches them
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.rgba.len() == self.width as usize * self.height as usize * 4
    }
}
