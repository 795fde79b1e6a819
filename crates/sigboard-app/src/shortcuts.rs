//! Keyboard shortcut registry and dispatch.

use sigboard_core::PaletteColor;

use crate::ui::UiAction;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        if self.ctrl {
            format!("Ctrl+{}", self.key)
        } else {
            self.key.to_string()
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, "Undo last stroke"),
            Shortcut::new("E", true, "Download image"),
            Shortcut::new("P", true, "Download PDF"),
            Shortcut::new("1", false, "Red"),
            Shortcut::new("2", false, "Blue"),
            Shortcut::new("3", false, "Green"),
            Shortcut::new("4", false, "Yellow"),
            Shortcut::new("5", false, "Orange"),
            Shortcut::new("6", false, "Black"),
            Shortcut::new("[", false, "Thinner line"),
            Shortcut::new("]", false, "Thicker line"),
        ]
    }

    /// Display string for the first shortcut with this description.
    pub fn label_for(description: &str) -> Option<String> {
        Self::all()
            .iter()
            .find(|s| s.description == description)
            .map(Shortcut::format)
    }

    /// Log all shortcuts at info level.
    pub fn log_all() {
        log::info!("Keyboard shortcuts:");
        for shortcut in Self::all() {
            log::info!("  {:8} {}", shortcut.format(), shortcut.description);
        }
    }
}

/// Map a pressed key to the action it triggers.
///
/// `key` is the logical key text as reported by the platform. `line_width`
/// is the current width, which `[` and `]` step from; the board clamps the
/// result to its range.
pub fn match_shortcut(key: &str, ctrl: bool, line_width: f64) -> Option<UiAction> {
    if ctrl {
        return match key.to_ascii_lowercase().as_str() {
            "z" => Some(UiAction::Undo),
            "e" => Some(UiAction::DownloadImage),
            "p" => Some(UiAction::DownloadPdf),
            _ => None,
        };
    }

    match key {
        "[" => Some(UiAction::SetLineWidth(line_width - 1.0)),
        "]" => Some(UiAction::SetLineWidth(line_width + 1.0)),
        _ => {
            let index = key.parse::<usize>().ok()?.checked_sub(1)?;
            PaletteColor::ALL.get(index).copied().map(UiAction::SetColor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_shortcuts() {
        assert_eq!(match_shortcut("z", true, 3.0), Some(UiAction::Undo));
        assert_eq!(match_shortcut("Z", true, 3.0), Some(UiAction::Undo));
        assert_eq!(match_shortcut("e", true, 3.0), Some(UiAction::DownloadImage));
        assert_eq!(match_shortcut("p", true, 3.0), Some(UiAction::DownloadPdf));
        assert_eq!(match_shortcut("x", true, 3.0), None);
    }

    #[test]
    fn test_plain_z_is_not_undo() {
        assert_eq!(match_shortcut("z", false, 3.0), None);
    }

    #[test]
    fn test_number_keys_pick_swatches() {
        assert_eq!(
            match_shortcut("1", false, 3.0),
            Some(UiAction::SetColor(PaletteColor::Red))
        );
        assert_eq!(
            match_shortcut("6", false, 3.0),
            Some(UiAction::SetColor(PaletteColor::Black))
        );
        assert_eq!(match_shortcut("0", false, 3.0), None);
        assert_eq!(match_shortcut("7", false, 3.0), None);
    }

    #[test]
    fn test_brackets_step_width() {
        assert_eq!(match_shortcut("[", false, 3.0), Some(UiAction::SetLineWidth(2.0)));
        assert_eq!(match_shortcut("]", false, 3.0), Some(UiAction::SetLineWidth(4.0)));
    }

    #[test]
    fn test_registry_formats() {
        assert_eq!(ShortcutRegistry::label_for("Undo last stroke").as_deref(), Some("Ctrl+Z"));
        assert_eq!(ShortcutRegistry::label_for("Black").as_deref(), Some("6"));
        assert_eq!(ShortcutRegistry::all().len(), 11);
    }
}
