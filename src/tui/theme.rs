use ratatui::style::Color;

use crate::model::{LogKind, SubStackStatus, UiConfig};

/// Names accepted under `[ui.colors]`
pub const COLOR_SLOTS: &[&str] = &[
    "background",
    "text",
    "text_bright",
    "highlight",
    "dim",
    "red",
    "yellow",
    "green",
    "cyan",
    "purple",
    "blue",
    "selection_bg",
];

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0A, 0x0A, 0x0A),
            text: Color::Rgb(0xC8, 0xC8, 0xC8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x22, 0xC5, 0x5E),
            dim: Color::Rgb(0x6B, 0x72, 0x80),
            red: Color::Rgb(0xEF, 0x44, 0x44),
            yellow: Color::Rgb(0xEA, 0xB3, 0x08),
            green: Color::Rgb(0x22, 0xC5, 0x5E),
            cyan: Color::Rgb(0x06, 0xB6, 0xD4),
            purple: Color::Rgb(0xA8, 0x55, 0xF7),
            blue: Color::Rgb(0x3B, 0x82, 0xF6),
            selection_bg: Color::Rgb(0x11, 0x18, 0x27),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                _ => {}
            }
        }
        theme
    }

    /// Color for a sub-stack's status label
    pub fn status_color(&self, status: SubStackStatus) -> Color {
        match status {
            SubStackStatus::Active => self.blue,
            SubStackStatus::Frozen => self.yellow,
            SubStackStatus::Completed => self.green,
            SubStackStatus::Pending => self.dim,
            SubStackStatus::Archived => self.purple,
        }
    }

    /// Color for a log entry's `[type]` tag
    pub fn log_kind_color(&self, kind: LogKind) -> Color {
        match kind {
            LogKind::Add => self.green,
            LogKind::Modify => self.cyan,
            LogKind::StatusChange => self.blue,
            LogKind::Stash => self.purple,
            LogKind::Freeze => self.yellow,
            LogKind::Archive => self.red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex() {
        assert_eq!(parse_hex_color("#FF4444"), Some(Color::Rgb(0xFF, 0x44, 0x44)));
        assert_eq!(parse_hex_color("FF4444"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn config_overrides_known_slots() {
        let mut ui = UiConfig::default();
        ui.colors.insert("highlight".into(), "#112233".into());
        ui.colors.insert("unknown".into(), "#445566".into());
        ui.colors.insert("text".into(), "not a color".into());
        let theme = Theme::from_config(&ui);
        assert_eq!(theme.highlight, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(theme.text, Theme::default().text);
    }

    #[test]
    fn every_slot_is_applied() {
        let mut ui = UiConfig::default();
        for slot in COLOR_SLOTS {
            ui.colors.insert(slot.to_string(), "#010203".into());
        }
        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(1, 2, 3));
        assert_eq!(theme.selection_bg, Color::Rgb(1, 2, 3));
        assert_eq!(theme.purple, Color::Rgb(1, 2, 3));
    }
}
