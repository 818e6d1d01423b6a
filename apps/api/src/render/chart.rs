//! Radar chart painter.
//!
//! Grid rings at 20/40/60/80/100, one spoke per axis, the filled score polygon and
//! axis labels. Shared by the rasterized document and the deck's PNG snapshot.

use std::f32::consts::PI;
use std::io::Cursor;

use ab_glyph::FontVec;
use image::{DynamicImage, ImageFormat};

use crate::render::canvas::{hex_color, paint, Element, BRAND_ACCENT, INK, MUTED, RULE};
use crate::render::metrics::REPORT_METRICS;
use crate::render::RenderError;
use crate::view::RadarAxis;

const RINGS: [f32; 5] = [20.0, 40.0, 60.0, 80.0, 100.0];
const LABEL_SIZE: f32 = 18.0;
/// Logical size of the standalone snapshot; painted at 2× like the document.
const SNAPSHOT_SIZE: u32 = 440;
const SNAPSHOT_SCALE: f32 = 2.0;

/// Vertex of axis `index` of `count` at `value` (0–100) on a chart of `radius`.
/// Axis 0 points straight up; the rest follow clockwise.
pub fn vertex(center: (f32, f32), radius: f32, index: usize, count: usize, value: f32) -> (f32, f32) {
    let angle = -PI / 2.0 + index as f32 * 2.0 * PI / count as f32;
    let r = radius * value.clamp(0.0, 100.0) / 100.0;
    (center.0 + r * angle.cos(), center.1 + r * angle.sin())
}

/// Display list for one radar chart centred on `center`.
pub fn radar_elements(axes: &[RadarAxis], center: (f32, f32), radius: f32) -> Vec<Element> {
    let n = axes.len();
    if n < 3 {
        return Vec::new();
    }

    let mut elements = Vec::new();

    let data: Vec<(f32, f32)> = axes
        .iter()
        .enumerate()
        .map(|(i, axis)| vertex(center, radius, i, n, axis.score as f32))
        .collect();
    elements.push(Element::Polygon {
        points: data.clone(),
        color: hex_color("C6F0DC"),
    });

    for ring in RINGS {
        for i in 0..n {
            elements.push(Element::Line {
                from: vertex(center, radius, i, n, ring),
                to: vertex(center, radius, (i + 1) % n, n, ring),
                color: RULE,
            });
        }
    }
    for i in 0..n {
        elements.push(Element::Line {
            from: center,
            to: vertex(center, radius, i, n, 100.0),
            color: RULE,
        });
    }

    for i in 0..n {
        elements.push(Element::Line {
            from: data[i],
            to: data[(i + 1) % n],
            color: BRAND_ACCENT,
        });
    }
    for &(x, y) in &data {
        elements.push(Element::Rect {
            x: x - 4.0,
            y: y - 4.0,
            w: 8.0,
            h: 8.0,
            color: BRAND_ACCENT,
        });
    }

    for (i, axis) in axes.iter().enumerate() {
        let (lx, ly) = vertex(center, radius + 36.0, i, n, 100.0);
        let label = axis.label.to_string();
        let score = axis.score.to_string();
        let label_w = REPORT_METRICS.measure_str(&label) * LABEL_SIZE;
        let score_w = REPORT_METRICS.measure_str(&score) * LABEL_SIZE;
        elements.push(Element::Text {
            x: lx - label_w / 2.0,
            y: ly - LABEL_SIZE,
            size: LABEL_SIZE,
            color: INK,
            text: label,
        });
        elements.push(Element::Text {
            x: lx - score_w / 2.0,
            y: ly + 2.0,
            size: LABEL_SIZE,
            color: MUTED,
            text: score,
        });
    }

    elements
}

/// Paints the chart alone and encodes it as PNG.
pub fn radar_png(axes: &[RadarAxis], font: Option<&FontVec>) -> Result<Vec<u8>, RenderError> {
    let half = SNAPSHOT_SIZE as f32 / 2.0;
    let elements = radar_elements(axes, (half, half), half - 80.0);
    let bitmap = paint(&elements, SNAPSHOT_SIZE, SNAPSHOT_SIZE, SNAPSHOT_SCALE, font);

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(bitmap).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
