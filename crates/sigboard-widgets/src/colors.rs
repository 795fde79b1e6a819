//! Tailwind shades and color swatches.

use egui::{Color32, CursorIcon, Rect, Sense, Stroke, Ui, Vec2, vec2};

use crate::sizing;

/// A Tailwind color with all shade variants (50-950).
#[derive(Clone, Copy)]
pub struct TailwindColor {
    /// Color name (e.g., "Red", "Blue")
    pub name: &'static str,
    /// Shades from 50 to 950 (11 total)
    pub shades: [Color32; 11],
}

impl TailwindColor {
    /// Create a new TailwindColor from RGB tuples.
    pub const fn new(name: &'static str, shades: [(u8, u8, u8); 11]) -> Self {
        let mut out = [Color32::BLACK; 11];
        let mut i = 0;
        while i < 11 {
            out[i] = Color32::from_rgb(shades[i].0, shades[i].1, shades[i].2);
            i += 1;
        }
        Self { name, shades: out }
    }

    /// Shade by its Tailwind label (50, 100, ..., 950).
    pub fn shade(&self, label: u16) -> Option<Color32> {
        SHADE_LABELS
            .iter()
            .position(|l| *l == label)
            .map(|i| self.shades[i])
    }

    /// The 500-level color.
    pub const fn primary(&self) -> Color32 {
        self.shades[5]
    }
}

/// Shade labels, index-aligned with [`TailwindColor::shades`].
pub const SHADE_LABELS: [u16; 11] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900, 950];

/// The Tailwind colors the controls draw with.
pub struct TailwindPalette;

impl TailwindPalette {
    pub fn all() -> &'static [TailwindColor] {
        TAILWIND_COLORS
    }

    /// Get color by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static TailwindColor> {
        TAILWIND_COLORS
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Shorthand for `by_name(name)?.shade(label)`, e.g. `("red", 500)`.
    pub fn get(name: &str, label: u16) -> Option<Color32> {
        Self::by_name(name)?.shade(label)
    }
}

// Tailwind CSS colors - https://tailwindcss.com/docs/colors
pub const TAILWIND_COLORS: &[TailwindColor] = &[
    TailwindColor::new("Red", [
        (254, 242, 242), (254, 226, 226), (254, 202, 202), (252, 165, 165),
        (248, 113, 113), (239, 68, 68), (220, 38, 38), (185, 28, 28),
        (153, 27, 27), (127, 29, 29), (69, 10, 10),
    ]),
    TailwindColor::new("Orange", [
        (255, 247, 237), (255, 237, 213), (254, 215, 170), (253, 186, 116),
        (251, 146, 60), (249, 115, 22), (234, 88, 12), (194, 65, 12),
        (154, 52, 18), (124, 45, 18), (67, 20, 7),
    ]),
    TailwindColor::new("Yellow", [
        (254, 252, 232), (254, 249, 195), (254, 240, 138), (253, 224, 71),
        (250, 204, 21), (234, 179, 8), (202, 138, 4), (161, 98, 7),
        (133, 77, 14), (113, 63, 18), (66, 32, 6),
    ]),
    TailwindColor::new("Green", [
        (240, 253, 244), (220, 252, 231), (187, 247, 208), (134, 239, 172),
        (74, 222, 128), (34, 197, 94), (22, 163, 74), (21, 128, 61),
        (22, 101, 52), (20, 83, 45), (5, 46, 22),
    ]),
    TailwindColor::new("Blue", [
        (239, 246, 255), (219, 234, 254), (191, 219, 254), (147, 197, 253),
        (96, 165, 250), (59, 130, 246), (37, 99, 235), (29, 78, 216),
        (30, 64, 175), (30, 58, 138), (23, 37, 84),
    ]),
];

/// A clickable round color swatch.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    selected: bool,
    size: Vec2,
    /// Border drawn inside the edge when selected (Tailwind `border-[Npx]`).
    border: Stroke,
}

impl<'a> ColorSwatch<'a> {
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
            size: vec2(sizing::SWATCH, sizing::SWATCH),
            border: Stroke::new(4.0, Color32::BLACK),
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Use a border of `width` in `color` when selected.
    pub fn selection_border(mut self, width: f32, color: Color32) -> Self {
        self.border = Stroke::new(width, color);
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;
            ui.painter().circle_filled(center, radius, self.color);

            if self.selected {
                let inset = radius - self.border.width / 2.0;
                ui.painter().circle_stroke(center, inset, self.border);
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

/// Check if two colors match, ignoring alpha.
pub fn colors_match(a: Color32, b: Color32) -> bool {
    a.r() == b.r() && a.g() == b.g() && a.b() == b.b()
}
