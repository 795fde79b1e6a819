//! Tailwind-styled egui widgets for the Sigboard controls.
//!
//! - **Colors**: the Tailwind shades the controls use, round color swatches
//! - **Buttons**: filled action buttons, line width preview
//! - **Frames**: the controls panel frame
//! - **Layout**: section labels, separators

pub mod buttons;
pub mod colors;
pub mod frames;
pub mod layout;

pub use buttons::{ActionButton, WidthPreview};
pub use colors::{
    ColorSwatch, SHADE_LABELS, TAILWIND_COLORS, TailwindColor, TailwindPalette, colors_match,
};
pub use frames::panel_frame;
pub use layout::{section_label, separator, vertical_separator};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Color swatch diameter (Tailwind `w-8 h-8`)
    pub const SWATCH: f32 = 32.0;
    /// Action button height (`py-2` around base text)
    pub const BUTTON_HEIGHT: f32 = 40.0;
    /// Horizontal button padding (`px-10`)
    pub const BUTTON_PADDING_X: f32 = 40.0;
    /// Standard corner radius (`rounded-md`)
    pub const CORNER_RADIUS: u8 = 6;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
    /// Base text size (`text-base`)
    pub const TEXT_BASE: f32 = 16.0;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
