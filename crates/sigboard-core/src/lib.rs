//! Sigboard Core Library
//!
//! Platform-agnostic stroke model, input mapping and board state for the
//! Sigboard whiteboard. Rendering backends live in `sigboard-render`; this
//! crate only talks to them through [`DrawSurface`].

pub mod board;
pub mod config;
pub mod history;
pub mod input;
pub mod recorder;
pub mod replay;
pub mod resize;
pub mod stroke;
pub mod surface;

pub use board::{Board, BoardMessage, BoardResponse};
pub use config::BoardConfig;
pub use history::History;
pub use input::{PointerEvent, PointerSource, map_to_canvas};
pub use recorder::{RecorderState, Segment, StrokeRecorder};
pub use replay::{draw_stroke, replay};
pub use resize::layout_canvas;
pub use stroke::{ColorParseError, PaletteColor, Stroke, StrokeColor, StrokeStyle};
pub use surface::{CanvasSize, DrawSurface, RecordingSurface, SurfaceCommand, VisibleStroke};
