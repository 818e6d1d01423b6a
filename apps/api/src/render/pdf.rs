//! Rasterized Document Exporter — slices one tall bitmap into A4 pages.
//!
//! Page height in bitmap pixels is `round(width × 297 / 210)`. Bands are cut top to
//! bottom, JPEG-encoded and drawn full-width at the top of successive A4 pages. The
//! last band may be shorter than a page.

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

use crate::render::RenderError;

/// A4 portrait in PDF points.
pub const A4_WIDTH_PT: i64 = 595;
pub const A4_HEIGHT_PT: i64 = 842;
pub const JPEG_QUALITY: u8 = 95;

/// Bitmap rows per A4 page at `width` bitmap columns.
pub fn page_height_px(width: u32) -> u32 {
    (width as f64 * 297.0 / 210.0).round() as u32
}

/// `ceil(height / page_height)`, never less than one page.
pub fn page_count(height: u32, page_height: u32) -> usize {
    (height.div_ceil(page_height.max(1)) as usize).max(1)
}

/// Assembles the paginated PDF for `bitmap`.
pub fn paginate(bitmap: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyDocument);
    }
    let page_h = page_height_px(width);
    let pages = page_count(height, page_h);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages);

    for index in 0..pages {
        let top = index as u32 * page_h;
        let band_h = page_h.min(height - top);
        let band = imageops::crop_imm(bitmap, 0, top, width, band_h).to_image();
        let jpeg = encode_jpeg(band)?;

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => band_h as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        // Full page width; height keeps the band's aspect ratio; anchored to the page top.
        let drawn_h = (band_h as i64 * A4_WIDTH_PT + width as i64 / 2) / width as i64;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(A4_WIDTH_PT),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(drawn_h),
                        Object::Integer(0),
                        Object::Integer(A4_HEIGHT_PT - drawn_h),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(A4_WIDTH_PT),
                Object::Integer(A4_HEIGHT_PT),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    debug!("Assembled {pages} page PDF ({} bytes)", bytes.len());
    Ok(bytes)
}

fn encode_jpeg(band: RgbaImage) -> Result<Vec<u8>, RenderError> {
    let rgb = DynamicImage::ImageRgba8(band).to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(&rgb)?;
    Ok(jpeg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn bitmap(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([250, 250, 250, 255]))
    }

    #[test]
    fn test_a4_page_height() {
        assert_eq!(page_height_px(2880), 4073);
        assert_eq!(page_height_px(210), 297);
    }

    #[test]
    fn test_page_count_is_ceiling() {
        assert_eq!(page_count(4073, 4073), 1);
        assert_eq!(page_count(4074, 4073), 2);
        assert_eq!(page_count(10_000, 4073), 3);
        assert_eq!(page_count(1, 4073), 1);
    }

    #[test]
    fn test_pdf_page_count_matches_bitmap_height() {
        // 210 px wide → 297 px per page; 700 px tall → 3 pages (297 + 297 + 106).
        let bytes = paginate(&bitmap(210, 700)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_short_document_is_one_page() {
        let bytes = paginate(&bitmap(210, 100)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_pages_embed_jpeg_bands() {
        let bytes = paginate(&bitmap(210, 400)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let jpeg_count = doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .filter(|s| {
                s.dict
                    .get(b"Filter")
                    .and_then(|f| f.as_name())
                    .map(|n| n == b"DCTDecode")
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(jpeg_count, 2);
    }

    #[test]
    fn test_empty_bitmap_is_rejected() {
        assert!(matches!(
            paginate(&RgbaImage::new(0, 0)),
            Err(RenderError::EmptyDocument)
        ));
    }
}
