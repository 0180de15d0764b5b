//! SVG markup scanning.
//!
//! The rendering service emits plain SVG: a root element with explicit
//! dimensions and a flat list of `<rect>` shapes. This module pulls
//! out exactly that subset with attribute scanning; it is not a
//! general SVG parser and does not try to be one.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::Color;
use crate::CanvasError;

/// Size the SVG spec assigns a rootless/unsized svg viewport.
pub const DEFAULT_WIDTH: f32 = 300.0;
pub const DEFAULT_HEIGHT: f32 = 150.0;

static RE_SVG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<svg\b[^>]*>").unwrap());
static RE_RECT_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<rect\b[^>]*/?>").unwrap());
static RE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w:-]+)\s*=\s*"([^"]*)""#).unwrap());

/// A `<rect>` shape lifted out of the markup.
#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// `None` means `fill="none"` or an unparseable color; such rects
    /// are skipped when rasterizing.
    pub fill: Option<Color>,
}

fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    RE_ATTR
        .captures_iter(tag)
        .find(|c| &c[1] == name)
        .map(|c| c.get(2).map(|m| m.as_str()))?
}

/// Parse a dimension attribute value, tolerating a `px` suffix.
fn parse_dimension(value: &str) -> Option<f32> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}

/// Determine the markup's intrinsic size.
///
/// Priority: explicit `width`/`height` attributes on the root, then
/// the `viewBox`, then the SVG default of 300x150. Markup with no
/// `<svg>` root at all is rejected.
pub fn markup_size(svg: &str) -> Result<(f32, f32), CanvasError> {
    let root = RE_SVG_TAG
        .find(svg)
        .ok_or_else(|| CanvasError::InvalidMarkup("no <svg> root element".into()))?;
    let tag = root.as_str();

    let width = attr(tag, "width").and_then(parse_dimension);
    let height = attr(tag, "height").and_then(parse_dimension);
    if let (Some(w), Some(h)) = (width, height) {
        return Ok((w, h));
    }

    if let Some(view_box) = attr(tag, "viewBox") {
        let parts: Vec<f32> = view_box
            .split_whitespace()
            .filter_map(|p| p.parse().ok())
            .collect();
        if let [_, _, w, h] = parts[..] {
            return Ok((w, h));
        }
    }

    Ok((DEFAULT_WIDTH, DEFAULT_HEIGHT))
}

/// Lift all `<rect>` shapes out of the markup, in document order.
pub fn rects(svg: &str) -> Vec<RectShape> {
    RE_RECT_TAG
        .find_iter(svg)
        .map(|m| {
            let tag = m.as_str();
            RectShape {
                x: attr(tag, "x").and_then(parse_dimension).unwrap_or(0.0),
                y: attr(tag, "y").and_then(parse_dimension).unwrap_or(0.0),
                width: attr(tag, "width").and_then(parse_dimension).unwrap_or(0.0),
                height: attr(tag, "height").and_then(parse_dimension).unwrap_or(0.0),
                fill: parse_color(attr(tag, "fill").unwrap_or("black")),
            }
        })
        .collect()
}

/// Parse a subset of SVG color syntax: `#rgb`, `#rrggbb`, and the two
/// keywords barcode markup actually uses.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    match value {
        "none" | "transparent" => return None,
        "black" => return Some(Color::BLACK),
        "white" => return Some(Color::WHITE),
        _ => {}
    }
    let hex = value.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 1], 16)
                    .ok()
                    .map(|v| v * 17)
            };
            Some(Color::opaque(channel(0)?, channel(1)?, channel(2)?))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Color::opaque(channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}
