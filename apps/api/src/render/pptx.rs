//! Native Slide Exporter — a fixed five-slide PresentationML deck.
//!
//! Every element is an absolutely positioned shape with a fixed frame. Free text is cut
//! to a per-frame character budget (`...` appended) instead of being measured, so the
//! deck never reflows. The radar chart is the only picture.
//!
//! Slides: cover, SWOT, radar + school facts, tiers, timeline (GPA/research tracks only).

use std::io::{Cursor, Seek, Write};

use chrono::Utc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::render::RenderError;
use crate::view::{ReportView, Track};

pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const SLIDE_COUNT: usize = 5;

/// 16:9 at 10in × 5.625in.
const SLIDE_CX: i64 = 9_144_000;
const SLIDE_CY: i64 = 5_143_500;
const EMU_PER_INCH: f64 = 914_400.0;

pub const MAX_TIMELINE_STAGES: usize = 4;
pub const DESTINATIONS_BUDGET: usize = 120;
pub const POLICY_BUDGET: usize = 300;
pub const TIER_BUDGET: usize = 160;
pub const TRACK_BUDGET: usize = 90;
const SWOT_ITEMS: usize = 4;
const SWOT_ITEM_BUDGET: usize = 40;

const BRAND: &str = "003B30";
const ACCENT: &str = "00B36B";
const INK: &str = "1F2937";
const MUTED: &str = "6B7280";
const FONT: &str = "Microsoft YaHei";

const NS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

// ────────────────────────────────────────────────────────────────────────────
// Text helpers
// ────────────────────────────────────────────────────────────────────────────

/// Cuts `text` to `max` characters, appending `...` when anything was dropped.
pub fn truncate_chars(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

pub fn xml_escape(text: &str) -> String {
    // Control characters other than tab/newline are not valid XML 1.0.
    let text: String = text
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n'))
        .collect();
    quick_xml::escape::escape(text.as_str()).into_owned()
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

// ────────────────────────────────────────────────────────────────────────────
// Slide model
// ────────────────────────────────────────────────────────────────────────────

/// Shape frame in inches from the slide's top-left corner.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

const fn frame(x: f64, y: f64, w: f64, h: f64) -> Frame {
    Frame { x, y, w, h }
}

impl Frame {
    fn xfrm(&self) -> String {
        format!(
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            emu(self.x),
            emu(self.y),
            emu(self.w),
            emu(self.h)
        )
    }
}

#[derive(Debug, Clone)]
struct Para {
    text: String,
    size_pt: u32,
    bold: bool,
    color: String,
}

fn para(text: impl Into<String>, size_pt: u32, bold: bool, color: &str) -> Para {
    Para {
        text: text.into(),
        size_pt,
        bold,
        color: color.to_string(),
    }
}

impl Para {
    fn xml(&self) -> String {
        format!(
            concat!(
                r#"<a:p><a:r><a:rPr lang="zh-CN" sz="{size}" b="{bold}" dirty="0">"#,
                r#"<a:solidFill><a:srgbClr val="{color}"/></a:solidFill>"#,
                r#"<a:latin typeface="{font}"/><a:ea typeface="{font}"/></a:rPr>"#,
                r#"<a:t>{text}</a:t></a:r></a:p>"#
            ),
            size = self.size_pt * 100,
            bold = u8::from(self.bold),
            color = self.color,
            font = FONT,
            text = xml_escape(&self.text),
        )
    }
}

struct Slide {
    background: Option<&'static str>,
    shapes: Vec<String>,
    /// Relationship id of the embedded chart, when the slide has one.
    image_rel: Option<&'static str>,
    next_id: u32,
}

impl Slide {
    fn new() -> Self {
        Self {
            background: None,
            shapes: Vec::new(),
            image_rel: None,
            next_id: 2,
        }
    }

    fn id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Filled and/or outlined rectangle, optionally carrying text.
    fn shape(&mut self, frame: Frame, fill: Option<&str>, line: Option<&str>, paras: &[Para]) {
        let id = self.id();
        let fill = match fill {
            Some(color) => format!(r#"<a:solidFill><a:srgbClr val="{color}"/></a:solidFill>"#),
            None => "<a:noFill/>".to_string(),
        };
        let line = match line {
            Some(color) => format!(
                r#"<a:ln w="19050"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill></a:ln>"#
            ),
            None => "<a:ln><a:noFill/></a:ln>".to_string(),
        };
        let body = if paras.is_empty() {
            "<a:p><a:endParaRPr lang=\"zh-CN\"/></a:p>".to_string()
        } else {
            paras.iter().map(Para::xml).collect()
        };
        self.shapes.push(format!(
            concat!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Shape {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#,
                r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>{fill}{line}</p:spPr>"#,
                r#"<p:txBody><a:bodyPr wrap="square" lIns="91440" tIns="45720" rIns="91440" bIns="45720" anchor="t"><a:noAutofit/></a:bodyPr>"#,
                r#"<a:lstStyle/>{body}</p:txBody></p:sp>"#
            ),
            id = id,
            xfrm = frame.xfrm(),
            fill = fill,
            line = line,
            body = body,
        ));
    }

    fn text(&mut self, frame: Frame, paras: &[Para]) {
        self.shape(frame, None, None, paras);
    }

    fn rect(&mut self, frame: Frame, fill: &str) {
        self.shape(frame, Some(fill), None, &[]);
    }

    fn picture(&mut self, frame: Frame, rel_id: &'static str) {
        let id = self.id();
        self.image_rel = Some(rel_id);
        self.shapes.push(format!(
            concat!(
                r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Radar Chart"/>"#,
                r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
                r#"<p:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
                r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
            ),
            id = id,
            rel = rel_id,
            xfrm = frame.xfrm(),
        ));
    }

    fn title(&mut self, text: &str) {
        self.rect(frame(0.5, 0.38, 0.08, 0.42), ACCENT);
        self.text(frame(0.65, 0.28, 8.8, 0.6), &[para(text, 24, true, BRAND)]);
    }

    fn xml(&self) -> String {
        let background = self
            .background
            .map(|color| {
                format!(
                    r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#
                )
            })
            .unwrap_or_default();
        format!(
            concat!(
                "{decl}<p:sld {ns}><p:cSld>{bg}<p:spTree>",
                r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
                "<p:grpSpPr>{group}</p:grpSpPr>{shapes}</p:spTree></p:cSld>",
                "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"
            ),
            decl = XML_DECL,
            ns = NS,
            bg = background,
            group = GROUP_XFRM,
            shapes = self.shapes.concat(),
        )
    }

    fn rels_xml(&self) -> String {
        let image = self
            .image_rel
            .map(|rel| {
                format!(
                    r#"<Relationship Id="{rel}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>"#
                )
            })
            .unwrap_or_default();
        format!(
            concat!(
                "{decl}",
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
                r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
                "{image}</Relationships>"
            ),
            decl = XML_DECL,
            image = image,
        )
    }
}

const GROUP_XFRM: &str = r#"<a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm>"#;

// ────────────────────────────────────────────────────────────────────────────
// Slides
// ────────────────────────────────────────────────────────────────────────────

fn cover_slide(view: &ReportView) -> Slide {
    let mut slide = Slide::new();
    slide.background = Some(BRAND);
    slide.rect(frame(0.8, 1.55, 1.2, 0.08), ACCENT);
    slide.text(frame(0.8, 1.75, 8.4, 0.9), &[para(&view.title, 40, true, "FFFFFF")]);
    slide.text(
        frame(0.8, 2.75, 8.4, 0.6),
        &[para(truncate_chars(&view.identity, 80), 16, false, "CDEBDD")],
    );
    slide.text(
        frame(0.8, 4.6, 8.4, 0.4),
        &[para("专属保研竞争力分析报告", 12, false, "9FD8BF")],
    );
    slide
}

fn swot_slide(view: &ReportView) -> Slide {
    let mut slide = Slide::new();
    slide.title("SWOT 竞争力分析");

    let (w, h) = (4.35, 2.0);
    for (i, quadrant) in view.swot.iter().enumerate() {
        let x = 0.5 + (i % 2) as f64 * (w + 0.3);
        let y = 1.1 + (i / 2) as f64 * (h + 0.2);
        let accent = quadrant.kind.accent();

        let mut paras = vec![para(quadrant.label, 14, true, accent)];
        paras.extend(
            quadrant
                .items
                .iter()
                .take(SWOT_ITEMS)
                .map(|item| para(format!("• {}", truncate_chars(item, SWOT_ITEM_BUDGET)), 11, false, INK)),
        );
        slide.shape(frame(x, y, w, h), Some(quadrant.kind.tint()), Some(accent), &paras);
    }
    slide
}

fn facts_slide(view: &ReportView, image_rel: &'static str) -> Slide {
    let mut slide = Slide::new();
    slide.title("竞争力雷达与院校数据");
    slide.picture(frame(0.4, 1.0, 4.3, 4.3), image_rel);

    let facts = &view.facts;
    slide.text(
        frame(5.0, 1.05, 4.5, 0.6),
        &[para(format!("预估保研率: {}%", facts.rate_label()), 22, true, ACCENT)],
    );

    let destinations = if facts.destinations.is_empty() {
        "暂无数据".to_string()
    } else {
        truncate_chars(&facts.destinations.join("、"), DESTINATIONS_BUDGET)
    };
    slide.text(
        frame(5.0, 1.75, 4.5, 1.2),
        &[
            para("往届保研去向", 13, true, BRAND),
            para(destinations, 11, false, INK),
        ],
    );

    let policy = if facts.policy.trim().is_empty() {
        "暂无数据".to_string()
    } else {
        truncate_chars(&facts.policy, POLICY_BUDGET)
    };
    slide.text(
        frame(5.0, 3.0, 4.5, 2.35),
        &[para("推免政策", 13, true, BRAND), para(policy, 10, false, MUTED)],
    );
    slide
}

fn tiers_slide(view: &ReportView) -> Slide {
    let mut slide = Slide::new();
    slide.title("目标院校梯队");

    let (w, gap) = (2.85, 0.225);
    for (i, tier) in view.tiers.iter().enumerate() {
        let x = 0.5 + i as f64 * (w + gap);
        let accent = tier.accent();
        slide.shape(frame(x, 1.1, w, 4.0), Some("FFFFFF"), Some(accent), &[]);
        slide.shape(
            frame(x, 1.1, w, 0.55),
            Some(accent),
            None,
            &[para(tier.heading, 15, true, "FFFFFF")],
        );
        slide.text(
            frame(x + 0.05, 1.75, w - 0.1, 3.3),
            &[para(truncate_chars(&tier.text, TIER_BUDGET), 12, false, INK)],
        );
    }
    slide
}

fn timeline_slide(view: &ReportView) -> Slide {
    let mut slide = Slide::new();
    slide.title("阶段规划路线");

    if view.timeline.is_empty() {
        slide.text(frame(0.5, 1.2, 9.0, 0.6), &[para("暂无阶段规划", 14, false, MUTED)]);
        return slide;
    }

    for (i, stage) in view.timeline.iter().take(MAX_TIMELINE_STAGES).enumerate() {
        let y = 1.05 + i as f64 * 1.08;
        slide.shape(
            frame(0.5, y, 2.2, 0.95),
            Some("F0FDF4"),
            Some(ACCENT),
            &[para(truncate_chars(&stage.stage, 20), 13, true, BRAND)],
        );
        let gpa = stage.line(Track::Gpa).unwrap_or_default();
        let research = stage.line(Track::Research).unwrap_or_default();
        slide.text(
            frame(2.85, y, 6.65, 0.95),
            &[
                para(format!("GPA: {}", truncate_chars(gpa, TRACK_BUDGET)), 11, false, INK),
                para(format!("科研: {}", truncate_chars(research, TRACK_BUDGET)), 11, false, INK),
            ],
        );
    }
    slide
}

// ────────────────────────────────────────────────────────────────────────────
// Package parts
// ────────────────────────────────────────────────────────────────────────────

const CHART_REL: &str = "rId2";

fn content_types_xml() -> String {
    let slides: String = (1..=SLIDE_COUNT)
        .map(|n| {
            format!(
                r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            )
        })
        .collect();
    format!(
        concat!(
            "{decl}",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Default Extension="png" ContentType="image/png"/>"#,
            r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#,
            r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#,
            r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#,
            r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#,
            "{slides}",
            r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
            r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
            "</Types>"
        ),
        decl = XML_DECL,
        slides = slides,
    )
}

fn root_rels_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
            r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL,
    )
}

fn presentation_xml() -> String {
    let slide_ids: String = (1..=SLIDE_COUNT)
        .map(|n| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 1))
        .collect();
    format!(
        concat!(
            "{decl}<p:presentation {ns} saveSubsetFonts=\"1\">",
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
            "<p:sldIdLst>{slide_ids}</p:sldIdLst>",
            r#"<p:sldSz cx="{cx}" cy="{cy}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
            "</p:presentation>"
        ),
        decl = XML_DECL,
        ns = NS,
        slide_ids = slide_ids,
        cx = SLIDE_CX,
        cy = SLIDE_CY,
    )
}

fn presentation_rels_xml() -> String {
    let slides: String = (1..=SLIDE_COUNT)
        .map(|n| {
            format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
                n + 1,
                n
            )
        })
        .collect();
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
            "{slides}",
            r#"<Relationship Id="rId{theme}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL,
        slides = slides,
        theme = SLIDE_COUNT + 2,
    )
}

fn slide_master_xml() -> String {
    format!(
        concat!(
            "{decl}<p:sldMaster {ns}><p:cSld>",
            r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#,
            r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
            "<p:grpSpPr>{group}</p:grpSpPr></p:spTree></p:cSld>",
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            "</p:sldMaster>"
        ),
        decl = XML_DECL,
        ns = NS,
        group = GROUP_XFRM,
    )
}

fn slide_master_rels_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL,
    )
}

fn slide_layout_xml() -> String {
    format!(
        concat!(
            "{decl}<p:sldLayout {ns} type=\"blank\" preserve=\"1\"><p:cSld name=\"Blank\">",
            r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
            "<p:grpSpPr>{group}</p:grpSpPr></p:spTree></p:cSld>",
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"
        ),
        decl = XML_DECL,
        ns = NS,
        group = GROUP_XFRM,
    )
}

fn slide_layout_rels_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL,
    )
}

fn theme_xml() -> String {
    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    format!(
        concat!(
            "{decl}",
            r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Report">"#,
            "<a:themeElements>",
            r#"<a:clrScheme name="Report">"#,
            r#"<a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>"#,
            r#"<a:dk2><a:srgbClr val="003B30"/></a:dk2><a:lt2><a:srgbClr val="F0FDF4"/></a:lt2>"#,
            r#"<a:accent1><a:srgbClr val="00B36B"/></a:accent1><a:accent2><a:srgbClr val="1890FF"/></a:accent2>"#,
            r#"<a:accent3><a:srgbClr val="FFA500"/></a:accent3><a:accent4><a:srgbClr val="FF4D4F"/></a:accent4>"#,
            r#"<a:accent5><a:srgbClr val="52C41A"/></a:accent5><a:accent6><a:srgbClr val="6B7280"/></a:accent6>"#,
            r#"<a:hlink><a:srgbClr val="1890FF"/></a:hlink><a:folHlink><a:srgbClr val="722ED1"/></a:folHlink>"#,
            "</a:clrScheme>",
            r#"<a:fontScheme name="Report">"#,
            r#"<a:majorFont><a:latin typeface="{font}"/><a:ea typeface="{font}"/><a:cs typeface=""/></a:majorFont>"#,
            r#"<a:minorFont><a:latin typeface="{font}"/><a:ea typeface="{font}"/><a:cs typeface=""/></a:minorFont>"#,
            "</a:fontScheme>",
            r#"<a:fmtScheme name="Report">"#,
            "<a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst>",
            "<a:lnStyleLst>{line}{line}{line}</a:lnStyleLst>",
            "<a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>",
            "<a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst>",
            "</a:fmtScheme>",
            "</a:themeElements>",
            "<a:objectDefaults/><a:extraClrSchemeLst/>",
            "</a:theme>"
        ),
        decl = XML_DECL,
        font = FONT,
        fill = fill,
        line = line,
    )
}

fn core_xml(title: &str) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{title}</dc:title><dc:creator>admit-api</dc:creator>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#,
            "</cp:coreProperties>"
        ),
        decl = XML_DECL,
        title = xml_escape(title),
        created = Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
    )
}

fn app_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
            "<Application>admit-api</Application><Slides>{count}</Slides></Properties>"
        ),
        decl = XML_DECL,
        count = SLIDE_COUNT,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Assembly
// ────────────────────────────────────────────────────────────────────────────

/// Builds the `.pptx` package for `view`, embedding `chart_png` on the facts slide.
pub fn build_deck(view: &ReportView, chart_png: &[u8]) -> Result<Vec<u8>, RenderError> {
    let slides = [
        cover_slide(view),
        swot_slide(view),
        facts_slide(view, CHART_REL),
        tiers_slide(view),
        timeline_slide(view),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    write_part(&mut zip, "[Content_Types].xml", content_types_xml().as_bytes(), options)?;
    write_part(&mut zip, "_rels/.rels", root_rels_xml().as_bytes(), options)?;
    write_part(&mut zip, "docProps/core.xml", core_xml(&view.title).as_bytes(), options)?;
    write_part(&mut zip, "docProps/app.xml", app_xml().as_bytes(), options)?;
    write_part(&mut zip, "ppt/presentation.xml", presentation_xml().as_bytes(), options)?;
    write_part(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        presentation_rels_xml().as_bytes(),
        options,
    )?;
    write_part(
        &mut zip,
        "ppt/slideMasters/slideMaster1.xml",
        slide_master_xml().as_bytes(),
        options,
    )?;
    write_part(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        slide_master_rels_xml().as_bytes(),
        options,
    )?;
    write_part(
        &mut zip,
        "ppt/slideLayouts/slideLayout1.xml",
        slide_layout_xml().as_bytes(),
        options,
    )?;
    write_part(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        slide_layout_rels_xml().as_bytes(),
        options,
    )?;
    write_part(&mut zip, "ppt/theme/theme1.xml", theme_xml().as_bytes(), options)?;

    for (i, slide) in slides.iter().enumerate() {
        let n = i + 1;
        write_part(
            &mut zip,
            &format!("ppt/slides/slide{n}.xml"),
            slide.xml().as_bytes(),
            options,
        )?;
        write_part(
            &mut zip,
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            slide.rels_xml().as_bytes(),
            options,
        )?;
    }

    // PNG is already compressed.
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    write_part(&mut zip, "ppt/media/image1.png", chart_png, stored)?;

    Ok(zip.finish()?.into_inner())
}

fn write_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    body: &[u8],
    options: SimpleFileOptions,
) -> Result<(), RenderError> {
    zip.start_file(name, options)?;
    zip.write_all(body)?;
    Ok(())
}
