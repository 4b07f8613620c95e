//! Terminal color theme system
//!
//! Provides adaptive palettes for dark and light terminal backgrounds.
//! Auto-detects via COLORFGBG env var, or manual override with --light
//! or RMD_LIGHT_BG=1.

use ratatui::style::Color;

use rmd_core::GlyphColor;

/// Color theme for the terminal UI.
/// All UI code should use theme colors instead of hardcoded Color:: values.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    // General UI text
    /// Primary foreground text
    pub text: Color,
    /// Secondary/hint text (footers, instructions)
    pub text_dim: Color,

    // Borders
    /// Default border color
    pub border: Color,
    /// Informational border (help)
    pub border_accent: Color,
    /// Danger border (death screen)
    pub border_danger: Color,

    // Overlay panels (the body viewer and friends)
    /// Panel foreground
    pub panel_fg: Color,
    /// Panel background
    pub panel_bg: Color,

    // List selection, the focused browser vs the idle one
    pub sel_fg_active: Color,
    pub sel_bg_active: Color,
    pub sel_fg_inactive: Color,
    pub sel_bg_inactive: Color,

    // Body viewer entry colors
    /// Body part rows in the part browser
    pub body_part: Color,
    /// Organ rows in the part browser
    pub organ: Color,
    /// Wound readout lines
    pub wound: Color,

    // Map terrain backgrounds
    pub map_wall: Color,
    pub map_floor: Color,

    // Semantic colors
    /// Section headers, accent text
    pub accent: Color,
    /// Positive (healthy hp)
    pub good: Color,
    /// Negative (low hp, death)
    pub bad: Color,
}

impl Theme {
    /// Dark terminal background theme (default)
    pub fn dark() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::DarkGray,
            border: Color::White,
            border_accent: Color::Cyan,
            border_danger: Color::Red,
            panel_fg: Color::White,
            panel_bg: Color::Black,
            sel_fg_active: Color::Yellow,
            sel_bg_active: Color::Rgb(127, 127, 127),
            sel_fg_inactive: Color::Rgb(255, 255, 63),
            sel_bg_inactive: Color::Rgb(63, 63, 63),
            body_part: Color::Rgb(0, 127, 255),
            organ: Color::Rgb(191, 0, 0),
            wound: Color::Rgb(255, 63, 63),
            map_wall: Color::Rgb(0, 0, 100),
            map_floor: Color::Rgb(50, 50, 150),
            accent: Color::Cyan,
            good: Color::Green,
            bad: Color::Red,
        }
    }

    /// Light terminal background theme
    ///
    /// The map and panel palettes stay as-is since they carry their own
    /// backgrounds; only the bare-terminal text and borders flip.
    pub fn light() -> Self {
        Self {
            text: Color::Black,
            text_dim: Color::DarkGray,
            border: Color::DarkGray,
            border_accent: Color::Blue,
            border_danger: Color::Red,
            ..Self::dark()
        }
    }

    /// Auto-detect terminal background and return the matching theme.
    /// Checks COLORFGBG and the RMD_LIGHT_BG override.
    pub fn detect() -> Self {
        if Self::is_light_background() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Map an actor glyph color to a terminal color.
    ///
    /// Glyphs sit on the colored map background, so White stays readable
    /// on both themes; Grey is lifted a little on dark terminals.
    pub fn glyph_color(&self, color: GlyphColor) -> Color {
        match color {
            GlyphColor::White => Color::White,
            GlyphColor::Yellow => Color::Yellow,
            GlyphColor::Red => Color::Red,
            GlyphColor::Green => Color::Green,
            GlyphColor::Azure => Color::Rgb(0, 127, 255),
            GlyphColor::Grey => Color::Gray,
        }
    }

    fn is_light_background() -> bool {
        // Explicit override via environment variable
        if let Ok(val) = std::env::var("RMD_LIGHT_BG") {
            return val == "1" || val.eq_ignore_ascii_case("true");
        }

        // COLORFGBG is set by many terminals (xterm, rxvt, iTerm2, etc.)
        // Format: "fg;bg" where values are color indices (0-15)
        // Light backgrounds typically have bg index >= 7 (excluding 8 which is bright black)
        if let Ok(colorfgbg) = std::env::var("COLORFGBG")
            && let Some(bg_str) = colorfgbg.rsplit(';').next()
            && let Ok(bg_idx) = bg_str.parse::<u8>()
        {
            return matches!(bg_idx, 7 | 9..=15);
        }

        false
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}
