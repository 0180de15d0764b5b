//! Deterministic text metrics.
//!
//! The host's font subsystem is out of scope, so the in-memory
//! document measures text with a fixed advance model instead of real
//! glyph metrics. The numbers are stable across runs, which is what
//! layout code and tests need from them.

use crate::node::TextStyle;

/// Advance width of one character, as a fraction of the font size.
fn advance_factor(c: char) -> f32 {
    if c.is_ascii() {
        // Roughly the average advance of a proportional latin face.
        0.6
    } else {
        // Full-width for everything else (CJK and friends).
        1.0
    }
}

/// Measure a run of text, returning (width, height).
///
/// Width is the widest line; height is line count times line height.
/// Empty text still occupies one line, matching how design tools size
/// an empty text node.
pub fn measure(characters: &str, style: &TextStyle) -> (f32, f32) {
    let mut widest = 0.0f32;
    let mut lines = 0u32;
    for line in characters.split('\n') {
        lines += 1;
        let width: f32 = line
            .chars()
            .map(|c| advance_factor(c) * style.font_size)
            .sum();
        widest = widest.max(width);
    }
    let lines = lines.max(1);
    (widest, lines as f32 * style.line_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(font_size: f32, line_height: f32) -> TextStyle {
        TextStyle::caption(font_size, line_height)
    }

    #[test]
    fn ascii_width_scales_with_font_size() {
        let (w10, _) = measure("hello", &style(10.0, 12.0));
        let (w20, _) = measure("hello", &style(20.0, 24.0));
        assert!((w20 - 2.0 * w10).abs() < f32::EPSILON);
    }

    #[test]
    fn height_counts_lines() {
        let (_, h1) = measure("one", &style(36.0, 48.0));
        let (_, h3) = measure("a\nbb\nccc", &style(36.0, 48.0));
        assert_eq!(h1, 48.0);
        assert_eq!(h3, 144.0);
    }

    #[test]
    fn empty_text_occupies_one_line() {
        let (w, h) = measure("", &style(36.0, 48.0));
        assert_eq!(w, 0.0);
        assert_eq!(h, 48.0);
    }

    #[test]
    fn wide_characters_advance_further() {
        let (ascii, _) = measure("aa", &style(10.0, 12.0));
        let (cjk, _) = measure("ああ", &style(10.0, 12.0));
        assert!(cjk > ascii);
    }
}
