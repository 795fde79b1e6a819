//! Button components.

use egui::{Color32, CornerRadius, CursorIcon, Pos2, Sense, Stroke, StrokeKind, Ui, vec2};

use crate::sizing;

/// A filled, rounded button with a centered label (`rounded-md text-white`).
pub struct ActionButton<'a> {
    label: &'a str,
    fill: Color32,
    tooltip: Option<&'a str>,
}

impl<'a> ActionButton<'a> {
    /// Create a black button with white text.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            fill: Color32::BLACK,
            tooltip: None,
        }
    }

    pub fn fill(mut self, fill: Color32) -> Self {
        self.fill = fill;
        self
    }

    /// Hover text, e.g. the keyboard shortcut.
    pub fn tooltip(mut self, tooltip: &'a str) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font = egui::FontId::proportional(sizing::TEXT_BASE);
        let galley = ui
            .painter()
            .layout_no_wrap(self.label.to_string(), font, Color32::WHITE);
        let size = vec2(
            galley.size().x + sizing::BUTTON_PADDING_X * 2.0,
            sizing::BUTTON_HEIGHT,
        );
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let fill = if response.is_pointer_button_down_on() {
                self.fill.gamma_multiply(0.8)
            } else if response.hovered() {
                self.fill.gamma_multiply(0.9)
            } else {
                self.fill
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), fill);

            let text_pos = Pos2::new(
                rect.center().x - galley.size().x / 2.0,
                rect.center().y - galley.size().y / 2.0,
            );
            ui.painter().galley(text_pos, galley, Color32::WHITE);
        }

        let clicked = response.clicked();
        let response = response.on_hover_cursor(CursorIcon::PointingHand);
        if let Some(tooltip) = self.tooltip {
            response.on_hover_text(tooltip);
        }
        clicked
    }
}

/// A non-interactive box showing a horizontal line at the given width.
pub struct WidthPreview {
    width: f32,
    color: Color32,
}

impl WidthPreview {
    pub fn new(width: f32, color: Color32) -> Self {
        Self { width, color }
    }

    pub fn show(self, ui: &mut Ui) {
        let size = vec2(48.0, 24.0);
        let (rect, _response) = ui.allocate_exact_size(size, Sense::hover());

        if ui.is_rect_visible(rect) {
            ui.painter().rect_filled(
                rect,
                CornerRadius::same(sizing::CORNER_RADIUS),
                Color32::WHITE,
            );
            ui.painter().rect_stroke(
                rect,
                CornerRadius::same(sizing::CORNER_RADIUS),
                Stroke::new(1.0, Color32::from_gray(200)),
                StrokeKind::Inside,
            );

            let line_y = rect.center().y;
            ui.painter().line_segment(
                [
                    Pos2::new(rect.left() + 6.0, line_y),
                    Pos2::new(rect.right() - 6.0, line_y),
                ],
                Stroke::new(self.width.min(rect.height() - 4.0), self.color),
            );
        }
    }
}
