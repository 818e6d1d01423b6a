//! Rasterizer — lays out a `ReportView` as one tall single-column document and paints it.
//!
//! # Architecture
//! - `Rasterizer` is the seam the export handlers hold as `Arc<dyn Rasterizer>`.
//! - `CanvasRasterizer` builds a display list at a fixed logical width (never the
//!   viewer's window), then paints it at `scale`. The result is independent of any
//!   on-screen state, so layout never reflows mid-capture.
//! - Called from `spawn_blocking`; nothing here is async.

use std::path::Path;
use std::sync::Arc;

use ab_glyph::FontVec;
use image::{Rgba, RgbaImage};
use tracing::info;

use crate::render::canvas::{
    hex_color, paint, Element, BRAND, BRAND_ACCENT, BRAND_TINT, INK, MUTED, RULE, WHITE,
};
use crate::render::chart::{radar_elements, radar_png};
use crate::render::metrics::REPORT_METRICS;
use crate::render::pdf::page_height_px;
use crate::render::wrap::wrap_text;
use crate::render::RenderError;
use crate::view::{FactSource, RadarAxis, ReportView, Track};

// ────────────────────────────────────────────────────────────────────────────
// Options and trait
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Logical layout width in px.
    pub width: u32,
    /// Device pixel ratio; bitmap width = `width × scale`.
    pub scale: f32,
}

/// Longest document painted, in A4 pages at the layout width.
pub const MAX_PAGES: u32 = 8;

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            width: 1440,
            scale: 2.0,
        }
    }
}

/// Implement this to swap rasterization backends.
pub trait Rasterizer: Send + Sync {
    /// Full report as one bitmap, `options.width × options.scale` pixels wide.
    fn rasterize(&self, view: &ReportView, options: &RasterOptions) -> Result<RgbaImage, RenderError>;

    /// Standalone radar chart encoded as PNG.
    fn chart_png(&self, axes: &[RadarAxis]) -> Result<Vec<u8>, RenderError>;
}

#[derive(Clone, Default)]
pub struct CanvasRasterizer {
    font: Option<Arc<FontVec>>,
}

impl CanvasRasterizer {
    /// Glyphs are painted as metric-sized blocks.
    pub fn new() -> Self {
        Self { font: None }
    }

    pub fn with_font_bytes(bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = FontVec::try_from_vec(bytes)?;
        Ok(Self {
            font: Some(Arc::new(font)),
        })
    }

    pub fn with_font_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let rasterizer = Self::with_font_bytes(bytes)?;
        info!("Loaded report font from {}", path.display());
        Ok(rasterizer)
    }
}

impl Rasterizer for CanvasRasterizer {
    fn rasterize(&self, view: &ReportView, options: &RasterOptions) -> Result<RgbaImage, RenderError> {
        let layout = DocumentLayout::build(view, options.width as f32);
        let height = layout.height.ceil() as u32;
        if height == 0 {
            return Err(RenderError::EmptyDocument);
        }
        // Checked before the bitmap exists; a client-supplied report can be arbitrarily long.
        let limit = page_height_px(options.width) * MAX_PAGES;
        if height > limit {
            return Err(RenderError::DocumentTooLarge { height, limit });
        }
        Ok(paint(
            &layout.elements,
            options.width,
            height,
            options.scale,
            self.font.as_deref(),
        ))
    }

    fn chart_png(&self, axes: &[RadarAxis]) -> Result<Vec<u8>, RenderError> {
        radar_png(axes, self.font.as_deref())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document layout
// ────────────────────────────────────────────────────────────────────────────

const MARGIN: f32 = 80.0;
const SECTION_GAP: f32 = 48.0;
const GUTTER: f32 = 24.0;
const PAD: f32 = 24.0;
const LINE_HEIGHT: f32 = 1.6;

const TITLE_SIZE: f32 = 44.0;
const HEADING_SIZE: f32 = 28.0;
const SUBHEADING_SIZE: f32 = 24.0;
const BODY_SIZE: f32 = 20.0;
const SMALL_SIZE: f32 = 17.0;

const NO_DATA: &str = "暂无数据";

/// Display list for one report, plus its total logical height.
pub struct DocumentLayout {
    pub elements: Vec<Element>,
    pub height: f32,
    width: f32,
    cursor: f32,
}

impl DocumentLayout {
    pub fn build(view: &ReportView, width: f32) -> Self {
        let mut layout = Self {
            elements: Vec::new(),
            height: 0.0,
            width,
            cursor: 0.0,
        };

        layout.header(view);
        layout.school_facts(view);
        layout.radar(view);
        layout.swot(view);
        layout.bonus_schemes(view);
        layout.tiers(view);
        layout.timeline(view);
        layout.advice(view);
        layout.admission_cases(view);
        layout.footer();

        layout.height = layout.cursor;
        layout
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * MARGIN
    }

    // ── primitives ──────────────────────────────────────────────────────────

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba<u8>) {
        self.elements.push(Element::Rect { x, y, w, h, color });
    }

    fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
        wrap_text(text, width / size, &REPORT_METRICS)
    }

    fn block_height(lines: usize, size: f32) -> f32 {
        lines as f32 * size * LINE_HEIGHT
    }

    /// Pushes pre-wrapped lines starting at `y`; returns the block height.
    fn lines(&mut self, x: f32, y: f32, size: f32, color: Rgba<u8>, lines: Vec<String>) -> f32 {
        let height = Self::block_height(lines.len(), size);
        for (i, text) in lines.into_iter().enumerate() {
            self.elements.push(Element::Text {
                x,
                y: y + i as f32 * size * LINE_HEIGHT,
                size,
                color,
                text,
            });
        }
        height
    }

    /// Wraps and pushes `text`; returns the block height.
    fn text(&mut self, x: f32, y: f32, width: f32, size: f32, color: Rgba<u8>, text: &str) -> f32 {
        let lines = Self::wrap(text, width, size);
        self.lines(x, y, size, color, lines)
    }

    fn heading(&mut self, title: &str) {
        self.cursor += SECTION_GAP;
        let y = self.cursor;
        self.rect(MARGIN, y + 4.0, 8.0, HEADING_SIZE, BRAND_ACCENT);
        self.elements.push(Element::Text {
            x: MARGIN + 24.0,
            y,
            size: HEADING_SIZE,
            color: BRAND,
            text: title.to_string(),
        });
        self.cursor += HEADING_SIZE * LINE_HEIGHT + 8.0;
    }

    fn subheading(&mut self, title: &str) {
        let y = self.cursor;
        let h = self.text(MARGIN, y, self.content_width(), SUBHEADING_SIZE, INK, title);
        self.cursor += h + 4.0;
    }

    fn paragraph(&mut self, text: &str, color: Rgba<u8>) {
        let body = if text.trim().is_empty() { NO_DATA } else { text };
        let y = self.cursor;
        let h = self.text(MARGIN, y, self.content_width(), BODY_SIZE, color, body);
        self.cursor += h;
    }

    // ── sections ────────────────────────────────────────────────────────────

    fn header(&mut self, view: &ReportView) {
        let band = 220.0;
        self.rect(0.0, 0.0, self.width, band, BRAND);
        self.elements.push(Element::Text {
            x: MARGIN,
            y: 56.0,
            size: TITLE_SIZE,
            color: WHITE,
            text: view.title.clone(),
        });
        let identity_width = self.content_width();
        self.text(MARGIN, 140.0, identity_width, 22.0, hex_color("CDEBDD"), &view.identity);
        self.cursor = band;
    }

    fn school_facts(&mut self, view: &ReportView) {
        self.heading("一、院校保研数据");

        let facts = &view.facts;
        let card_h = 132.0;
        let y = self.cursor;
        self.rect(MARGIN, y, self.content_width(), card_h, BRAND_TINT);
        self.elements.push(Element::Text {
            x: MARGIN + PAD,
            y: y + 20.0,
            size: BODY_SIZE,
            color: MUTED,
            text: "预估保研率".to_string(),
        });
        self.elements.push(Element::Text {
            x: MARGIN + PAD,
            y: y + 56.0,
            size: 48.0,
            color: BRAND_ACCENT,
            text: format!("{}%", facts.rate_label()),
        });
        let source = match facts.rate_source {
            FactSource::Generated => "数据来源：智能补全",
            FactSource::SchoolTable => "数据来源：院校数据库",
            FactSource::Default => "数据来源：行业平均水平估算",
        };
        self.elements.push(Element::Text {
            x: MARGIN + 360.0,
            y: y + 76.0,
            size: SMALL_SIZE,
            color: MUTED,
            text: source.to_string(),
        });
        self.cursor += card_h + PAD;

        self.subheading("往届保研去向");
        self.chips(&facts.destinations);

        self.cursor += PAD;
        self.subheading("推免政策要点");
        if view.policy_segments.is_empty() {
            self.paragraph(&facts.policy, INK);
        } else {
            for segment in &view.policy_segments {
                let y = self.cursor;
                let h = self.text(
                    MARGIN + 24.0,
                    y,
                    self.content_width() - 24.0,
                    BODY_SIZE,
                    INK,
                    segment,
                );
                self.rect(MARGIN + 4.0, y + 12.0, 8.0, 8.0, BRAND_ACCENT);
                self.cursor += h + 6.0;
            }
        }
    }

    /// Destinations as flowing pills.
    fn chips(&mut self, items: &[String]) {
        if items.is_empty() {
            self.paragraph(NO_DATA, MUTED);
            return;
        }

        let chip_h = BODY_SIZE * 2.0;
        let right = MARGIN + self.content_width();
        let mut x = MARGIN;
        let mut y = self.cursor;

        for item in items {
            let chip_w = (REPORT_METRICS.measure_str(item) * BODY_SIZE + 2.0 * 16.0)
                .min(self.content_width());
            if x > MARGIN && x + chip_w > right {
                x = MARGIN;
                y += chip_h + 12.0;
            }
            self.rect(x, y, chip_w, chip_h, hex_color("E6F4EA"));
            self.elements.push(Element::Text {
                x: x + 16.0,
                y: y + (chip_h - BODY_SIZE) / 2.0 - 2.0,
                size: BODY_SIZE,
                color: BRAND,
                text: item.clone(),
            });
            x += chip_w + 12.0;
        }
        self.cursor = y + chip_h;
    }

    fn radar(&mut self, view: &ReportView) {
        self.heading("二、综合竞争力评估");

        let radius = 200.0;
        let chart_h = 2.0 * radius + 120.0;
        let y = self.cursor;
        let center = (MARGIN + radius + 80.0, y + chart_h / 2.0);
        self.elements.extend(radar_elements(&view.radar, center, radius));

        let bars_x = MARGIN + 2.0 * radius + 220.0;
        let bar_w = (MARGIN + self.content_width() - bars_x - 80.0).max(120.0);
        let mut row_y = y + 60.0;
        for axis in &view.radar {
            self.elements.push(Element::Text {
                x: bars_x,
                y: row_y,
                size: BODY_SIZE,
                color: INK,
                text: format!("{}  {}", axis.label, axis.score),
            });
            self.rect(bars_x, row_y + 40.0, bar_w, 12.0, RULE);
            self.rect(
                bars_x,
                row_y + 40.0,
                bar_w * axis.score as f32 / 100.0,
                12.0,
                BRAND_ACCENT,
            );
            row_y += 80.0;
        }

        self.cursor = y + chart_h.max(row_y - y);
    }

    fn swot(&mut self, view: &ReportView) {
        self.heading("三、SWOT 竞争力分析");

        let col_w = (self.content_width() - GUTTER) / 2.0;
        let inner_w = col_w - 2.0 * PAD;

        for row in view.swot.chunks(2) {
            let wrapped: Vec<Vec<Vec<String>>> = row
                .iter()
                .map(|q| {
                    q.items
                        .iter()
                        .map(|item| Self::wrap(&format!("• {item}"), inner_w, BODY_SIZE))
                        .collect()
                })
                .collect();

            let heights: Vec<f32> = wrapped
                .iter()
                .map(|items| {
                    let body: f32 = items
                        .iter()
                        .map(|lines| Self::block_height(lines.len(), BODY_SIZE) + 6.0)
                        .sum();
                    PAD + SUBHEADING_SIZE * LINE_HEIGHT + 8.0 + body.max(BODY_SIZE * LINE_HEIGHT) + PAD
                })
                .collect();
            let row_h = heights.iter().cloned().fold(0.0, f32::max);

            let y = self.cursor;
            for (col, (quadrant, items)) in row.iter().zip(wrapped).enumerate() {
                let x = MARGIN + col as f32 * (col_w + GUTTER);
                let accent = hex_color(quadrant.kind.accent());
                self.rect(x, y, col_w, row_h, hex_color(quadrant.kind.tint()));
                self.rect(x, y, col_w, 6.0, accent);
                self.elements.push(Element::Text {
                    x: x + PAD,
                    y: y + PAD,
                    size: SUBHEADING_SIZE,
                    color: accent,
                    text: quadrant.label.to_string(),
                });

                let mut item_y = y + PAD + SUBHEADING_SIZE * LINE_HEIGHT + 8.0;
                if items.is_empty() {
                    self.lines(x + PAD, item_y, BODY_SIZE, MUTED, vec![NO_DATA.to_string()]);
                }
                for lines in items {
                    item_y += self.lines(x + PAD, item_y, BODY_SIZE, INK, lines) + 6.0;
                }
            }
            self.cursor = y + row_h + GUTTER;
        }
        self.cursor -= GUTTER;
    }

    fn bonus_schemes(&mut self, view: &ReportView) {
        self.heading("四、保研加分细则");

        if view.bonus_schemes.is_empty() {
            self.paragraph(NO_DATA, MUTED);
            return;
        }

        for scheme in &view.bonus_schemes {
            self.subheading(&scheme.category);
            for item in &scheme.items {
                let y = self.cursor;
                let title = format!("{}（{}）", item.item, item.score);
                let h = self.text(
                    MARGIN + 24.0,
                    y,
                    self.content_width() - 24.0,
                    BODY_SIZE,
                    INK,
                    &title,
                );
                self.cursor += h;
                if !item.description.trim().is_empty() {
                    let y = self.cursor;
                    let h = self.text(
                        MARGIN + 48.0,
                        y,
                        self.content_width() - 48.0,
                        SMALL_SIZE,
                        MUTED,
                        &item.description,
                    );
                    self.cursor += h;
                }
                self.cursor += 6.0;
            }
            self.cursor += 12.0;
        }
    }

    fn tiers(&mut self, view: &ReportView) {
        self.heading("五、目标院校梯队");

        let count = view.tiers.len().max(1) as f32;
        let col_w = (self.content_width() - GUTTER * (count - 1.0)) / count;
        let inner_w = col_w - 2.0 * PAD;
        let band_h = 56.0;

        let wrapped: Vec<Vec<String>> = view
            .tiers
            .iter()
            .map(|t| Self::wrap(&t.text, inner_w, BODY_SIZE))
            .collect();
        let body_h = wrapped
            .iter()
            .map(|lines| Self::block_height(lines.len().max(1), BODY_SIZE))
            .fold(0.0, f32::max);
        let col_h = band_h + PAD + body_h + PAD;

        let y = self.cursor;
        for (i, (tier, lines)) in view.tiers.iter().zip(wrapped).enumerate() {
            let x = MARGIN + i as f32 * (col_w + GUTTER);
            let accent = hex_color(tier.accent());
            // Border, then white fill inset by 2px.
            self.rect(x, y, col_w, col_h, accent);
            self.rect(x + 2.0, y + band_h, col_w - 4.0, col_h - band_h - 2.0, WHITE);
            self.elements.push(Element::Text {
                x: x + PAD,
                y: y + (band_h - SUBHEADING_SIZE) / 2.0 - 4.0,
                size: SUBHEADING_SIZE,
                color: WHITE,
                text: tier.heading.to_string(),
            });
            let lines = if lines.is_empty() {
                vec![NO_DATA.to_string()]
            } else {
                lines
            };
            self.lines(x + PAD, y + band_h + PAD, BODY_SIZE, INK, lines);
        }
        self.cursor = y + col_h;
    }

    fn timeline(&mut self, view: &ReportView) {
        self.heading("六、阶段发展规划");

        if view.timeline.is_empty() {
            self.paragraph(NO_DATA, MUTED);
            return;
        }

        let rail_x = MARGIN + 10.0;
        let body_x = MARGIN + 48.0;
        let label_w = 80.0;
        let text_x = body_x + label_w;
        let text_w = MARGIN + self.content_width() - text_x;

        for stage in &view.timeline {
            let top = self.cursor;
            self.rect(rail_x - 8.0, top + 8.0, 16.0, 16.0, BRAND_ACCENT);
            self.elements.push(Element::Text {
                x: body_x,
                y: top,
                size: SUBHEADING_SIZE,
                color: BRAND,
                text: stage.stage.clone(),
            });
            self.cursor += SUBHEADING_SIZE * LINE_HEIGHT + 6.0;

            for track in [Track::Gpa, Track::English, Track::Research, Track::Contest] {
                let text = stage.line(track).unwrap_or_default();
                if text.trim().is_empty() {
                    continue;
                }
                let y = self.cursor;
                self.elements.push(Element::Text {
                    x: body_x,
                    y,
                    size: BODY_SIZE,
                    color: BRAND_ACCENT,
                    text: format!("{}：", track.label()),
                });
                let h = self.text(text_x, y, text_w, BODY_SIZE, INK, text);
                self.cursor += h.max(BODY_SIZE * LINE_HEIGHT) + 4.0;
            }

            self.rect(rail_x - 1.0, top + 28.0, 2.0, self.cursor - top - 20.0, RULE);
            self.cursor += 16.0;
        }
    }

    fn advice(&mut self, view: &ReportView) {
        self.heading("七、科研与竞赛建议");
        self.subheading("科研提升建议");
        self.paragraph(&view.research_advice, INK);
        self.cursor += PAD;
        self.subheading("推荐竞赛");
        self.paragraph(&view.competitions, INK);
    }

    fn admission_cases(&mut self, view: &ReportView) {
        self.heading("八、同层次录取案例");

        const COLUMNS: [(&str, f32); 6] = [
            ("学生", 0.12),
            ("本科院校", 0.2),
            ("专业", 0.2),
            ("成绩", 0.16),
            ("英语", 0.14),
            ("录取去向", 0.18),
        ];
        let width = self.content_width();
        let cell_pad = 12.0;

        let header_h = BODY_SIZE * LINE_HEIGHT + 2.0 * cell_pad;
        let y = self.cursor;
        self.rect(MARGIN, y, width, header_h, BRAND);
        let mut x = MARGIN;
        for (title, fraction) in COLUMNS {
            self.lines(x + cell_pad, y + cell_pad, BODY_SIZE, WHITE, vec![title.to_string()]);
            x += width * fraction;
        }
        self.cursor += header_h;

        for (row, case) in view.admission_cases.iter().enumerate() {
            let cells = [
                &case.student,
                &case.school,
                &case.major,
                &case.gpa,
                &case.english,
                &case.offer,
            ];
            let wrapped: Vec<Vec<String>> = cells
                .iter()
                .zip(COLUMNS)
                .map(|(text, (_, fraction))| {
                    Self::wrap(text, width * fraction - 2.0 * cell_pad, BODY_SIZE)
                })
                .collect();
            let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
            let row_h = Self::block_height(lines, BODY_SIZE) + 2.0 * cell_pad;

            let y = self.cursor;
            if row % 2 == 1 {
                self.rect(MARGIN, y, width, row_h, hex_color("F9FAFB"));
            }
            let mut x = MARGIN;
            for (lines, (_, fraction)) in wrapped.into_iter().zip(COLUMNS) {
                self.lines(x + cell_pad, y + cell_pad, BODY_SIZE, INK, lines);
                x += width * fraction;
            }
            self.rect(MARGIN, y + row_h - 1.0, width, 1.0, RULE);
            self.cursor += row_h;
        }
    }

    fn footer(&mut self) {
        self.cursor += SECTION_GAP;
        self.rect(MARGIN, self.cursor, self.content_width(), 1.0, RULE);
        self.cursor += 24.0;
        let y = self.cursor;
        let h = self.text(
            MARGIN,
            y,
            self.content_width(),
            SMALL_SIZE,
            MUTED,
            "本报告基于学生自填信息与公开数据生成，院校数据与建议仅供参考。",
        );
        self.cursor += h + MARGIN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::fixtures;
    use crate::models::report::{StageContent, TimelineStage};
    use crate::scoring::{HeuristicScorer, ScoringStrategy};
    use crate::synthesis::fallback::fallback_report;

    fn view_with_stages(stages: usize) -> ReportView {
        let profile = fixtures::profile();
        let mut report = fallback_report(&profile);
        report.planning = (0..stages)
            .map(|i| TimelineStage {
                stage: format!("阶段 {i}"),
                category_content: StageContent {
                    gpa: "保持专业前 10%".to_string(),
                    english: "六级刷分到 550 以上".to_string(),
                    research: "进入课题组参与项目".to_string(),
                    contest: "参加数学建模".to_string(),
                },
            })
            .collect();
        let vector = HeuristicScorer.vector(&profile);
        ReportView::build(&profile, &fixtures::school(), &report, &vector)
    }

    #[test]
    fn test_bitmap_width_is_logical_width_times_scale() {
        let bitmap = CanvasRasterizer::new()
            .rasterize(&view_with_stages(1), &RasterOptions::default())
            .unwrap();
        assert_eq!(bitmap.width(), 2880);
        assert!(bitmap.height() > 2000);
    }

    #[test]
    fn test_oversized_report_is_refused_before_painting() {
        let profile = fixtures::profile();
        let mut report = fallback_report(&profile);
        report.research_advice = "a".repeat(200_000);
        let vector = HeuristicScorer.vector(&profile);
        let view = ReportView::build(&profile, &fixtures::school(), &report, &vector);

        let result = CanvasRasterizer::new().rasterize(&view, &RasterOptions::default());
        match result {
            Err(RenderError::DocumentTooLarge { height, limit }) => {
                assert!(height > limit);
                assert_eq!(limit, page_height_px(1440) * MAX_PAGES);
            }
            other => panic!("expected DocumentTooLarge, got {:?}", other.map(|b| b.dimensions())),
        }
    }

    #[test]
    fn test_layout_grows_with_content() {
        let short = DocumentLayout::build(&view_with_stages(1), 1440.0);
        let long = DocumentLayout::build(&view_with_stages(6), 1440.0);
        assert!(long.height > short.height);
    }

    #[test]
    fn test_layout_is_independent_of_options_scale() {
        let view = view_with_stages(2);
        let rasterizer = CanvasRasterizer::new();
        let one = rasterizer
            .rasterize(&view, &RasterOptions { width: 1440, scale: 1.0 })
            .unwrap();
        let two = rasterizer.rasterize(&view, &RasterOptions::default()).unwrap();
        assert_eq!(two.width(), one.width() * 2);
        assert!((two.height() as i64 - one.height() as i64 * 2).abs() <= 2);
    }

    #[test]
    fn test_every_section_text_is_inside_the_page() {
        let layout = DocumentLayout::build(&view_with_stages(3), 1440.0);
        for element in &layout.elements {
            if let Element::Text { x, y, size, text, .. } = element {
                let right = x + REPORT_METRICS.measure_str(text) * size;
                assert!(*y < layout.height, "{text} below document end");
                assert!(right <= 1440.0 - MARGIN + 1.0, "{text} overflows ({right})");
            }
        }
    }

    #[test]
    fn test_identity_and_rate_are_laid_out() {
        let layout = DocumentLayout::build(&view_with_stages(0), 1440.0);
        let texts: Vec<&str> = layout
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"18.5%"));
        assert!(texts.contains(&"保研定位与发展规划"));
        assert!(texts.iter().any(|t| t.contains("南京航空航天大学")));
    }

    #[test]
    fn test_invalid_font_bytes_are_rejected() {
        let result = CanvasRasterizer::with_font_bytes(b"not a font".to_vec());
        assert!(matches!(result, Err(RenderError::Font(_))));
    }

    #[test]
    fn test_font_file_errors() {
        let missing = CanvasRasterizer::with_font_file("/nonexistent/report-font.ttf");
        assert!(matches!(missing, Err(RenderError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"\x00\x01\x00\x00garbage").unwrap();
        let corrupt = CanvasRasterizer::with_font_file(file.path());
        assert!(matches!(corrupt, Err(RenderError::Font(_))));
    }
}
