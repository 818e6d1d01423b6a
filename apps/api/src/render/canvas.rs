//! Display list and painter.
//!
//! Layout code emits `Element`s in logical pixels; `paint` scales them onto a white
//! RGBA bitmap. Text is drawn with the loaded font when there is one, otherwise each
//! glyph is painted as a block sized by its metric width.

use ab_glyph::FontVec;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut, draw_text_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::render::metrics::REPORT_METRICS;

pub const WHITE: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
pub const INK: Rgba<u8> = Rgba([0x1F, 0x29, 0x37, 0xFF]);
pub const MUTED: Rgba<u8> = Rgba([0x6B, 0x72, 0x80, 0xFF]);
pub const RULE: Rgba<u8> = Rgba([0xE5, 0xE7, 0xEB, 0xFF]);
pub const BRAND: Rgba<u8> = Rgba([0x00, 0x3B, 0x30, 0xFF]);
pub const BRAND_ACCENT: Rgba<u8> = Rgba([0x00, 0xB3, 0x6B, 0xFF]);
pub const BRAND_TINT: Rgba<u8> = Rgba([0xF0, 0xFD, 0xF4, 0xFF]);

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgba<u8>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgba<u8>,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        color: Rgba<u8>,
    },
    /// One already-wrapped line of text; `y` is the top of the line box.
    Text {
        x: f32,
        y: f32,
        size: f32,
        color: Rgba<u8>,
        text: String,
    },
}

/// `"00B36B"` → opaque colour. Malformed channels read as 0.
pub fn hex_color(hex: &str) -> Rgba<u8> {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .unwrap_or(0)
    };
    Rgba([channel(0), channel(2), channel(4), 0xFF])
}

/// Paints `elements` in order onto a fresh white bitmap of `width × height` logical px.
pub fn paint(
    elements: &[Element],
    width: u32,
    height: u32,
    scale: f32,
    font: Option<&FontVec>,
) -> RgbaImage {
    let px = |v: f32| (v * scale).round() as i32;
    let bitmap_w = px(width as f32).max(1) as u32;
    let bitmap_h = px(height as f32).max(1) as u32;
    let mut canvas = RgbaImage::from_pixel(bitmap_w, bitmap_h, WHITE);

    for element in elements {
        match element {
            Element::Rect { x, y, w, h, color } => {
                let (w, h) = (px(*w), px(*h));
                if w > 0 && h > 0 {
                    let rect = Rect::at(px(*x), px(*y)).of_size(w as u32, h as u32);
                    draw_filled_rect_mut(&mut canvas, rect, *color);
                }
            }
            Element::Line { from, to, color } => {
                let from = (from.0 * scale, from.1 * scale);
                let to = (to.0 * scale, to.1 * scale);
                // Two strokes one pixel apart so lines survive downscaling.
                for offset in [0.0, 1.0] {
                    draw_line_segment_mut(
                        &mut canvas,
                        (from.0 + offset, from.1),
                        (to.0 + offset, to.1),
                        *color,
                    );
                }
            }
            Element::Polygon { points, color } => {
                let mut scaled: Vec<Point<i32>> =
                    points.iter().map(|(x, y)| Point::new(px(*x), px(*y))).collect();
                scaled.dedup();
                while scaled.len() > 1 && scaled.first() == scaled.last() {
                    scaled.pop();
                }
                if scaled.len() >= 3 {
                    draw_polygon_mut(&mut canvas, &scaled, *color);
                }
            }
            Element::Text {
                x,
                y,
                size,
                color,
                text,
            } => match font {
                Some(font) => {
                    draw_text_mut(&mut canvas, *color, px(*x), px(*y), size * scale, font, text)
                }
                None => paint_blocks(&mut canvas, *x, *y, *size, *color, text, scale),
            },
        }
    }

    canvas
}

/// Greeked text: one filled block per visible glyph, advancing by metric width.
fn paint_blocks(
    canvas: &mut RgbaImage,
    x: f32,
    y: f32,
    size: f32,
    color: Rgba<u8>,
    text: &str,
    scale: f32,
) {
    let mut cursor = x;
    for c in text.chars() {
        let advance = REPORT_METRICS.char_width(c) * size;
        if !c.is_whitespace() {
            let left = ((cursor + advance * 0.1) * scale).round() as i32;
            let top = ((y + size * 0.2) * scale).round() as i32;
            let w = (advance * 0.8 * scale).round().max(1.0) as u32;
            let h = (size * 0.7 * scale).round().max(1.0) as u32;
            draw_filled_rect_mut(canvas, Rect::at(left, top).of_size(w, h), color);
        }
        cursor += advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parses_rgb() {
        assert_eq!(hex_color("003B30"), BRAND);
        assert_eq!(hex_color("zz"), Rgba([0, 0, 0, 0xFF]));
    }

    #[test]
    fn test_paint_scales_bitmap() {
        let canvas = paint(&[], 100, 50, 2.0, None);
        assert_eq!(canvas.dimensions(), (200, 100));
        assert_eq!(*canvas.get_pixel(10, 10), WHITE);
    }

    #[test]
    fn test_rect_is_painted_at_scale() {
        let rect = Element::Rect {
            x: 10.0,
            y: 10.0,
            w: 5.0,
            h: 5.0,
            color: BRAND,
        };
        let canvas = paint(&[rect], 40, 40, 2.0, None);
        assert_eq!(*canvas.get_pixel(25, 25), BRAND);
        assert_eq!(*canvas.get_pixel(5, 5), WHITE);
    }

    #[test]
    fn test_greeked_text_marks_pixels() {
        let text = Element::Text {
            x: 0.0,
            y: 0.0,
            size: 20.0,
            color: INK,
            text: "保研".to_string(),
        };
        let canvas = paint(&[text], 60, 30, 1.0, None);
        assert_eq!(*canvas.get_pixel(10, 10), INK);
        assert_eq!(*canvas.get_pixel(50, 10), WHITE);
    }

    #[test]
    fn test_degenerate_polygon_is_skipped() {
        let collapsed = Element::Polygon {
            points: vec![(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)],
            color: INK,
        };
        let canvas = paint(&[collapsed], 10, 10, 1.0, None);
        assert_eq!(*canvas.get_pixel(5, 5), WHITE);
    }
}
