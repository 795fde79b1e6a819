//! Bitmap export to PNG and single-page PDF.
//!
//! Export rasterizes the stroke history, plus any stroke still in progress,
//! onto a fresh [`PixmapSurface`] the size of the board's bitmap. Replay is
//! deterministic, so the result matches what the board shows without
//! reading pixels back from the GPU.

use crate::raster::{PixmapSurface, SurfaceError};
use flate2::{Compression, write::ZlibEncoder};
use kurbo::Rect;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Ref};
use sigboard_core::{Board, CanvasSize, DrawSurface, History, replay};
use std::io::Write;
use thiserror::Error;

/// Points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Bitmap has no pixels")]
    EmptyBitmap,
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] png::EncodingError),
    #[error("Compression failed: {0}")]
    Compress(#[from] std::io::Error),
    #[error("PDF writing failed: {0}")]
    Pdf(String),
}

/// Output file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    /// Label for save dialogs.
    pub fn description(self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG Image",
            ExportFormat::Pdf => "PDF Document",
        }
    }
}

/// An encoded file ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Page geometry for document export, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfLayout {
    pub page_width: f64,
    pub page_height: f64,
    /// Image offset from the page's left edge.
    pub image_left: f64,
    /// Image offset from the page's top edge.
    pub image_top: f64,
    pub image_width: f64,
}

impl Default for PdfLayout {
    /// A4 portrait with the image 10 mm in and 190 mm wide.
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            image_left: 10.0,
            image_top: 10.0,
            image_width: 190.0,
        }
    }
}

impl PdfLayout {
    pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    pub fn with_image_origin(mut self, left: f64, top: f64) -> Self {
        self.image_left = left;
        self.image_top = top;
        self
    }

    pub fn with_image_width(mut self, width: f64) -> Self {
        self.image_width = width;
        self
    }

    /// Page size in points.
    pub fn page_size_pt(&self) -> (f64, f64) {
        (self.page_width * PT_PER_MM, self.page_height * PT_PER_MM)
    }

    /// Where an image of `size` pixels lands, in PDF points (origin bottom-left).
    /// The height follows the image's aspect ratio.
    pub fn image_rect_pt(&self, size: CanvasSize) -> Rect {
        let width_mm = self.image_width;
        let height_mm = if size.width == 0 {
            0.0
        } else {
            width_mm * size.height as f64 / size.width as f64
        };
        let x = self.image_left * PT_PER_MM;
        let y = (self.page_height - self.image_top - height_mm) * PT_PER_MM;
        Rect::new(x, y, x + width_mm * PT_PER_MM, y + height_mm * PT_PER_MM)
    }
}

fn blank(size: CanvasSize) -> Result<PixmapSurface, ExportError> {
    if size.is_empty() {
        return Err(ExportError::EmptyBitmap);
    }
    Ok(PixmapSurface::try_new(size)?)
}

/// Replay `history` onto a transparent bitmap of `size`.
pub fn rasterize(history: &History, size: CanvasSize) -> Result<PixmapSurface, ExportError> {
    let mut surface = blank(size)?;
    replay(&mut surface, history);
    Ok(surface)
}

/// Render the board as it looks now, open stroke included.
///
/// Returns `Ok(None)` when the board has no surface mounted.
pub fn rasterize_board<S: DrawSurface>(
    board: &Board<S>,
) -> Result<Option<PixmapSurface>, ExportError> {
    let Some(size) = board.canvas_size() else {
        return Ok(None);
    };
    let mut surface = blank(size)?;
    board.render_to(&mut surface);
    Ok(Some(surface))
}

/// Encode straight-alpha RGBA8 pixels as PNG.
pub fn encode_png(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyBitmap);
    }
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba)?;
        writer.finish()?;
    }
    Ok(png_data)
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Write a one-page PDF with the RGBA image placed per `layout`.
///
/// Color goes into a Flate-compressed RGB image, alpha into its soft mask.
pub fn encode_pdf(
    rgba: &[u8],
    width: u32,
    height: u32,
    layout: &PdfLayout,
) -> Result<Vec<u8>, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyBitmap);
    }
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(ExportError::Pdf(format!(
            "expected {} bytes of RGBA, got {}",
            expected,
            rgba.len()
        )));
    }
    let (Ok(pdf_width), Ok(pdf_height)) = (i32::try_from(width), i32::try_from(height)) else {
        return Err(ExportError::Pdf(format!("image too large: {}x{}", width, height)));
    };

    let mut rgb = Vec::with_capacity(expected / 4 * 3);
    let mut alpha = Vec::with_capacity(expected / 4);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
        alpha.push(px[3]);
    }
    let rgb = deflate(&rgb)?;
    let alpha = deflate(&alpha)?;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let mask_id = Ref::new(5);
    let content_id = Ref::new(6);
    let image_name = Name(b"Im1");

    let (page_w, page_h) = layout.page_size_pt();
    let placement = layout.image_rect_pt(CanvasSize::new(width, height));

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(pdf_writer::Rect::new(0.0, 0.0, page_w as f32, page_h as f32));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(image_name, image_id);
    page.finish();

    let mut image = pdf.image_xobject(image_id, &rgb);
    image.filter(Filter::FlateDecode);
    image.width(pdf_width);
    image.height(pdf_height);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.s_mask(mask_id);
    image.finish();

    let mut mask = pdf.image_xobject(mask_id, &alpha);
    mask.filter(Filter::FlateDecode);
    mask.width(pdf_width);
    mask.height(pdf_height);
    mask.color_space().device_gray();
    mask.bits_per_component(8);
    mask.finish();

    let mut content = Content::new();
    content.save_state();
    content.transform([
        placement.width() as f32,
        0.0,
        0.0,
        placement.height() as f32,
        placement.x0 as f32,
        placement.y0 as f32,
    ]);
    content.x_object(image_name);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    Ok(pdf.finish())
}

/// Export what the board shows.
///
/// Returns `Ok(None)` when the board has no surface mounted.
pub fn export_board<S: DrawSurface>(
    board: &Board<S>,
    format: ExportFormat,
    layout: &PdfLayout,
) -> Result<Option<ExportedFile>, ExportError> {
    let Some(raster) = rasterize_board(board)? else {
        return Ok(None);
    };
    let size = raster.size();
    let rgba = raster.to_rgba();

    let bytes = match format {
        ExportFormat::Png => encode_png(&rgba, size.width, size.height)?,
        ExportFormat::Pdf => encode_pdf(&rgba, size.width, size.height, layout)?,
    };
    log::info!(
        "Exported {} strokes as {} ({} bytes)",
        board.history().len(),
        format.extension(),
        bytes.len()
    );

    Ok(Some(ExportedFile {
        file_name: board.config().file_name(format.extension()),
        mime_type: format.mime_type(),
        bytes,
    }))
}
