//! Sigboard Render Library
//!
//! Drawing surfaces for the Sigboard board and bitmap export.
//! The on-screen surface records into a Vello scene; export rasterizes the
//! history on the CPU with tiny-skia.

pub mod export;
mod raster;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use export::{
    ExportError, ExportFormat, ExportedFile, PdfLayout, encode_pdf, encode_png, export_board,
    rasterize, rasterize_board,
};
pub use raster::{PixmapSurface, SurfaceError};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{SceneSurface, VelloRenderer};
