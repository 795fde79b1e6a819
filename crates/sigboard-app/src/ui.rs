//! egui controls around the board and the page layout.

use egui::{Align2, Color32, Context, RichText, Vec2};
use kurbo::{Point, Rect, Size};
use sigboard_core::{Board, DrawSurface, PaletteColor, layout_canvas};
use sigboard_widgets::{
    ActionButton, ColorSwatch, TailwindPalette, WidthPreview, panel_frame, section_label,
    separator, vertical_separator,
};

use crate::shortcuts::ShortcutRegistry;

/// Page padding around everything (`p-12`).
pub const PAGE_PADDING: f64 = 48.0;
/// Title line height (`text-4xl`).
const TITLE_HEIGHT: f64 = 40.0;
/// Gap under the title (`mb-8`).
const TITLE_GAP: f64 = 32.0;
/// Gap between the canvas and the controls (`my-4`).
const CONTROLS_GAP: f64 = 16.0;
const TITLE_SIZE: f32 = 36.0;

/// Where things go on the page, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    /// Top center of the title.
    pub title_anchor: Point,
    /// The column the board lives in; its box drives canvas sizing.
    pub container: Rect,
    /// The canvas bitmap on screen.
    pub canvas: Rect,
    /// Top-left of the controls panel.
    pub controls_origin: Point,
}

impl BoardLayout {
    /// Lay out a centered column no wider than `max_width`.
    pub fn compute(viewport: Size, max_width: f64, height_ratio: f64) -> Self {
        let width = (viewport.width - 2.0 * PAGE_PADDING).min(max_width).max(0.0);
        let left = ((viewport.width - width) / 2.0).max(0.0);
        let top = PAGE_PADDING + TITLE_HEIGHT + TITLE_GAP;
        let height = (viewport.height - top - PAGE_PADDING).max(0.0);

        let container = Rect::new(left, top, left + width, top + height);
        let size = layout_canvas(container.size(), height_ratio);
        let canvas = Rect::from_origin_size(container.origin(), size.to_size());

        Self {
            title_anchor: Point::new(viewport.width / 2.0, PAGE_PADDING),
            container,
            canvas,
            controls_origin: Point::new(left, canvas.y1 + CONTROLS_GAP),
        }
    }
}

/// Actions that can be triggered by the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    SetColor(PaletteColor),
    SetLineWidth(f64),
    /// Clear the board.
    Reset,
    Undo,
    DownloadImage,
    DownloadPdf,
}

/// UI state mirrored from the board.
#[derive(Debug, Clone)]
pub struct UiState {
    pub color: PaletteColor,
    pub line_width: f64,
    pub min_line_width: f64,
    pub max_line_width: f64,
    pub palette: Vec<PaletteColor>,
    /// Committed strokes, for the undo tooltip.
    pub stroke_count: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            color: PaletteColor::Black,
            line_width: 3.0,
            min_line_width: 1.0,
            max_line_width: 10.0,
            palette: PaletteColor::ALL.to_vec(),
            stroke_count: 0,
        }
    }
}

impl UiState {
    pub fn from_board<S: DrawSurface>(board: &Board<S>) -> Self {
        let mut state = Self {
            min_line_width: board.config().min_line_width,
            max_line_width: board.config().max_line_width,
            palette: board.config().palette.clone(),
            ..Self::default()
        };
        state.sync(board);
        state
    }

    /// Pull the current style and history length from the board.
    pub fn sync<S: DrawSurface>(&mut self, board: &Board<S>) {
        let style = board.style();
        if let Some(color) = style.color.palette() {
            self.color = color;
        }
        self.line_width = style.line_width;
        self.stroke_count = board.history().len();
    }
}

/// Display color of a swatch (its Tailwind background class).
pub fn swatch_color(color: PaletteColor) -> Color32 {
    let shade = match color {
        PaletteColor::Red => TailwindPalette::get("red", 500),
        PaletteColor::Blue => TailwindPalette::get("blue", 700),
        PaletteColor::Green => TailwindPalette::get("green", 700),
        PaletteColor::Yellow => TailwindPalette::get("yellow", 300),
        PaletteColor::Orange => TailwindPalette::get("orange", 500),
        PaletteColor::Black => None,
    };
    shade.unwrap_or(Color32::BLACK)
}

/// Border of the selected swatch; black would vanish on black.
pub fn selection_color(color: PaletteColor) -> Color32 {
    match color {
        PaletteColor::Black => TailwindPalette::get("yellow", 300).unwrap_or(Color32::YELLOW),
        _ => Color32::BLACK,
    }
}

fn shortcut_hint(description: &str) -> String {
    ShortcutRegistry::label_for(description).unwrap_or_default()
}

fn to_pos(point: Point) -> egui::Pos2 {
    egui::pos2(point.x as f32, point.y as f32)
}

/// Render all UI panels and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &UiState, layout: &BoardLayout) -> Option<UiAction> {
    render_title(ctx, layout);
    render_controls(ctx, ui_state, layout)
}

fn render_title(ctx: &Context, layout: &BoardLayout) {
    egui::Area::new(egui::Id::new("title"))
        .fixed_pos(to_pos(layout.title_anchor))
        .pivot(Align2::CENTER_TOP)
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                RichText::new("Whiteboard")
                    .size(TITLE_SIZE)
                    .strong()
                    .color(Color32::BLACK),
            );
        });
}

fn render_controls(ctx: &Context, ui_state: &UiState, layout: &BoardLayout) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("controls"))
        .fixed_pos(to_pos(layout.controls_origin))
        .show(ctx, |ui| {
            ui.set_max_width(layout.container.width() as f32);
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(16.0, 0.0);
                    section_label(ui, "Color");
                    for (i, color) in ui_state.palette.iter().copied().enumerate() {
                        let tooltip = format!("{} ({})", color.name(), i + 1);
                        let (clicked, _) = ColorSwatch::new(swatch_color(color), &tooltip)
                            .selected(ui_state.color == color)
                            .selection_border(4.0, selection_color(color))
                            .show(ui);
                        if clicked {
                            action = Some(UiAction::SetColor(color));
                        }
                    }

                    vertical_separator(ui, 24.0);
                    section_label(ui, "Width");

                    let mut width = ui_state.line_width;
                    let range = ui_state.min_line_width..=ui_state.max_line_width;
                    let response = ui.add(
                        egui::Slider::new(&mut width, range)
                            .step_by(1.0)
                            .show_value(false),
                    );
                    if response.changed() {
                        action = Some(UiAction::SetLineWidth(width));
                    }
                    WidthPreview::new(ui_state.line_width as f32, swatch_color(ui_state.color))
                        .show(ui);
                });

                ui.add_space(12.0);
                separator(ui);
                ui.add_space(8.0);

                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(20.0, 12.0);
                    let red = swatch_color(PaletteColor::Red);

                    if ActionButton::new("Reset").fill(red).show(ui) {
                        action = Some(UiAction::Reset);
                    }
                    let undo_hint = format!(
                        "{} ({} strokes)",
                        shortcut_hint("Undo last stroke"),
                        ui_state.stroke_count
                    );
                    if ActionButton::new("Undo").tooltip(&undo_hint).show(ui) {
                        action = Some(UiAction::Undo);
                    }
                    let image_hint = shortcut_hint("Download image");
                    if ActionButton::new("Download Image").tooltip(&image_hint).show(ui) {
                        action = Some(UiAction::DownloadImage);
                    }
                    let pdf_hint = shortcut_hint("Download PDF");
                    if ActionButton::new("Download Pdf").tooltip(&pdf_hint).show(ui) {
                        action = Some(UiAction::DownloadPdf);
                    }
                });
            });
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigboard_core::{BoardMessage, RecordingSurface};
    use sigboard_widgets::colors_match;

    #[test]
    fn test_layout_centers_narrow_column() {
        let layout = BoardLayout::compute(Size::new(2000.0, 1000.0), 1024.0, 0.6);
        assert_eq!(layout.container.width(), 1024.0);
        assert_eq!(layout.container.x0, 488.0);
        assert_eq!(layout.title_anchor, Point::new(1000.0, PAGE_PADDING));
        assert_eq!(layout.canvas.origin(), layout.container.origin());
    }

    #[test]
    fn test_layout_canvas_height_ratio() {
        let layout = BoardLayout::compute(Size::new(800.0, 1000.0), 1024.0, 0.6);
        // 1000 - 120 (title block) - 48 (bottom padding)
        assert_eq!(layout.container.height(), 832.0);
        assert_eq!(layout.container.width(), 704.0);
        assert_eq!(layout.canvas.width(), 704.0);
        assert_eq!(layout.canvas.height(), 499.0);
        assert_eq!(layout.controls_origin.y, layout.canvas.y1 + 16.0);
    }

    #[test]
    fn test_layout_tiny_viewport() {
        let layout = BoardLayout::compute(Size::new(50.0, 100.0), 1024.0, 0.6);
        assert_eq!(layout.container.width(), 0.0);
        assert_eq!(layout.canvas.area(), 0.0);
    }

    #[test]
    fn test_swatch_colors() {
        assert!(colors_match(
            swatch_color(PaletteColor::Red),
            Color32::from_rgb(239, 68, 68)
        ));
        assert!(colors_match(
            swatch_color(PaletteColor::Blue),
            Color32::from_rgb(29, 78, 216)
        ));
        assert_eq!(swatch_color(PaletteColor::Black), Color32::BLACK);
        assert_eq!(
            selection_color(PaletteColor::Black),
            Color32::from_rgb(253, 224, 71)
        );
        assert_eq!(selection_color(PaletteColor::Yellow), Color32::BLACK);
    }

    #[test]
    fn test_state_follows_board() {
        let mut board: Board<RecordingSurface> = Board::default();
        let mut state = UiState::from_board(&board);
        assert_eq!(state.color, PaletteColor::Black);
        assert_eq!(state.line_width, 3.0);

        board.update(BoardMessage::SetColor(PaletteColor::Orange.into()));
        board.update(BoardMessage::SetLineWidth(42.0));
        state.sync(&board);
        assert_eq!(state.color, PaletteColor::Orange);
        assert_eq!(state.line_width, 10.0);
    }
}
