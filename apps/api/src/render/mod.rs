// Export pipeline: one ReportView, two artifacts.
// Rasterized PDF (canvas → bands → lopdf) and native PPTX (PresentationML in a zip).
// CPU-bound work must run inside tokio::task::spawn_blocking.

pub mod artifact;
pub mod canvas;
pub mod chart;
pub mod gate;
pub mod handlers;
pub mod metrics;
pub mod pdf;
pub mod pptx;
pub mod raster;
pub mod wrap;

use thiserror::Error;

pub use raster::{CanvasRasterizer, RasterOptions, Rasterizer};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("deck archive failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("font could not be loaded: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("document has zero height")]
    EmptyDocument,

    #[error("document is {height}px tall, limit is {limit}px")]
    DocumentTooLarge { height: u32, limit: u32 },
}
