//! Rasterization of service markup.
//!
//! Stand-in for the host's renderer, covering the shape subset the
//! rendering service emits: filled `<rect>` elements on a white
//! background. Anything fancier rasterizes to the background.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::markup;
use crate::node::Color;
use crate::CanvasError;

/// Rasterize SVG markup onto a white canvas of the given pixel size
/// and encode it as PNG.
///
/// Rect coordinates are mapped from the markup's intrinsic viewport to
/// the output size, so callers can export at any scale.
pub fn render_markup(svg: &str, out_width: u32, out_height: u32) -> Result<Vec<u8>, CanvasError> {
    let (src_w, src_h) = markup::markup_size(svg)?;
    if src_w <= 0.0 || src_h <= 0.0 {
        return Err(CanvasError::InvalidMarkup("zero-sized viewport".into()));
    }
    let out_width = out_width.max(1);
    let out_height = out_height.max(1);

    let mut canvas = RgbaImage::from_pixel(out_width, out_height, to_pixel(Color::WHITE));
    let scale_x = out_width as f32 / src_w;
    let scale_y = out_height as f32 / src_h;

    for shape in markup::rects(svg) {
        let Some(fill) = shape.fill else { continue };
        let w = (shape.width * scale_x).round() as i32;
        let h = (shape.height * scale_y).round() as i32;
        if w <= 0 || h <= 0 {
            continue;
        }
        let x = (shape.x * scale_x).round() as i32;
        let y = (shape.y * scale_y).round() as i32;
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(x, y).of_size(w as u32, h as u32),
            to_pixel(fill),
        );
    }

    encode_png(canvas)
}

/// Decode the pixel dimensions of an encoded image.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), CanvasError> {
    let img = image::load_from_memory(bytes)?;
    Ok((img.width(), img.height()))
}

fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>, CanvasError> {
    let mut out = Cursor::new(Vec::new());
    canvas.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

fn to_pixel(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}
