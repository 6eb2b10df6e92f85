//! Browser helpers (wasm32 only)

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use super::ImagePixels;
use crate::tuning::Tuning;

/// Read the pixels of an `<img id=...>` by drawing it onto a scratch 2D
/// canvas. Waits for the image to finish loading first.
pub async fn read_image_pixels(document: &Document, id: &str) -> Result<ImagePixels, String> {
    let image: HtmlImageElement = document
        .get_element_by_id(id)
        .ok_or_else(|| format!("no #{id} image"))?
        .dyn_into()
        .map_err(|_| format!("#{id} is not an <img>"))?;

    if !image.complete() || image.natural_width() == 0 {
        log::info!("Waiting for #{id} to load...");
        // Rejects only if the image can't be fetched or decoded
        JsFuture::from(image.decode())
            .await
            .map_err(|e| format!("#{id} failed to load: {e:?}"))?;
    }

    let (width, height) = (image.natural_width(), image.natural_height());
    if width == 0 || height == 0 {
        return Err(format!("#{id} has no pixels"));
    }

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| format!("create canvas: {e:?}"))?
        .dyn_into()
        .map_err(|_| "scratch element is not a canvas".to_string())?;
    canvas.set_width(width);
    canvas.set_height(height);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| format!("get 2d context: {e:?}"))?
        .ok_or_else(|| "2d context unavailable".to_string())?
        .dyn_into()
        .map_err(|_| "context is not 2d".to_string())?;

    ctx.draw_image_with_html_image_element(&image, 0.0, 0.0)
        .map_err(|e| format!("draw #{id}: {e:?}"))?;
    let data = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| format!("read #{id}: {e:?}"))?;

    let pixels = ImagePixels::new(width, height, data.data().0);
    log::info!("Loaded #{id}: {width}x{height}");
    Ok(pixels)
}

/// Tuning from an inline `<script id="tuning" type="application/json">`, or defaults
pub fn load_tuning(document: &Document) -> Tuning {
    let Some(json) = document
        .get_element_by_id("tuning")
        .and_then(|el| el.text_content())
    else {
        return Tuning::default();
    };

    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning override from page");
            tuning
        }
        Err(err) => {
            log::warn!("Ignoring tuning override: {err}");
            Tuning::default()
        }
    }
}
