//! Color definitions for treequill themes.
//!
//! This module defines the [`ThemeColors`] struct which contains all color
//! values used in the treequill terminal UI. Colors are organized into three
//! categories: tree colors, UI elements, and semantic colors.

use ratatui::style::Color;

/// Defines all colors used in a treequill theme.
///
/// # Examples
///
/// ```
/// use treequill::theme::colors::ThemeColors;
///
/// let dark = ThemeColors::default_dark();
/// println!("Background: {:?}", dark.background);
/// ```
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree colors
    /// Node titles.
    pub title: Color,
    /// The `#id` suffix after each node.
    pub node_id: Color,
    /// Enabled `[+]` controls.
    pub add_control: Color,
    /// Enabled `[-]` controls.
    pub delete_control: Color,
    /// Disabled controls (root delete, or any control while a request is pending).
    pub control_disabled: Color,
    /// Loaded avatar summaries.
    pub avatar: Color,
    /// Placeholders: avatar loading, truncated subtrees.
    pub placeholder: Color,

    // UI colors
    /// Main background color.
    pub background: Color,
    /// Main foreground/text color.
    pub foreground: Color,
    /// Background of the selected title.
    pub cursor: Color,
    /// Text of the selected title.
    pub cursor_fg: Color,
    /// Background color for the status line.
    pub status_line_bg: Color,
    /// Foreground/text color for the status line.
    pub status_line_fg: Color,
    /// Border of the sidebar and overlays.
    pub border: Color,

    // Semantic colors
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl ThemeColors {
    /// Returns the default dark color scheme.
    ///
    /// Uses ANSI colors so the palette follows the terminal's own scheme.
    ///
    /// ```
    /// use treequill::theme::colors::ThemeColors;
    /// use ratatui::style::Color;
    ///
    /// let colors = ThemeColors::default_dark();
    /// assert_eq!(colors.background, Color::Reset);
    /// assert_eq!(colors.status_line_bg, Color::White);
    /// ```
    pub fn default_dark() -> Self {
        Self {
            title: Color::Gray,
            node_id: Color::DarkGray,
            add_control: Color::Green,
            delete_control: Color::Red,
            control_disabled: Color::DarkGray,
            avatar: Color::Magenta,
            placeholder: Color::DarkGray,

            background: Color::Reset,
            foreground: Color::Gray,
            cursor: Color::LightBlue,
            cursor_fg: Color::White,
            status_line_bg: Color::White,
            status_line_fg: Color::Black,
            border: Color::LightBlue,

            error: Color::Red,
            warning: Color::Yellow,
            info: Color::LightBlue,
        }
    }

    /// Returns the default light color scheme.
    pub fn default_light() -> Self {
        Self {
            title: Color::Black,
            node_id: Color::Gray,
            add_control: Color::Green,
            delete_control: Color::Red,
            control_disabled: Color::Gray,
            avatar: Color::Magenta,
            placeholder: Color::Gray,

            background: Color::Reset,
            foreground: Color::Black,
            cursor: Color::Blue,
            cursor_fg: Color::White,
            status_line_bg: Color::Black,
            status_line_fg: Color::White,
            border: Color::Blue,

            error: Color::Red,
            warning: Color::Rgb(0xb5, 0x89, 0x00),
            info: Color::Blue,
        }
    }

    /// Retro groove palette.
    pub fn gruvbox_dark() -> Self {
        Self {
            title: Color::Rgb(0xeb, 0xdb, 0xb2),
            node_id: Color::Rgb(0x92, 0x83, 0x74),
            add_control: Color::Rgb(0xb8, 0xbb, 0x26),
            delete_control: Color::Rgb(0xfb, 0x49, 0x34),
            control_disabled: Color::Rgb(0x66, 0x5c, 0x54),
            avatar: Color::Rgb(0xd3, 0x86, 0x9b),
            placeholder: Color::Rgb(0x92, 0x83, 0x74),

            background: Color::Rgb(0x28, 0x28, 0x28),
            foreground: Color::Rgb(0xeb, 0xdb, 0xb2),
            cursor: Color::Rgb(0x45, 0x85, 0x88),
            cursor_fg: Color::Rgb(0xfb, 0xf1, 0xc7),
            status_line_bg: Color::Rgb(0x50, 0x49, 0x45),
            status_line_fg: Color::Rgb(0xeb, 0xdb, 0xb2),
            border: Color::Rgb(0x83, 0xa5, 0x98),

            error: Color::Rgb(0xfb, 0x49, 0x34),
            warning: Color::Rgb(0xfa, 0xbd, 0x2f),
            info: Color::Rgb(0x83, 0xa5, 0x98),
        }
    }

    /// Arctic, north-bluish palette.
    pub fn nord() -> Self {
        Self {
            title: Color::Rgb(0xec, 0xef, 0xf4),
            node_id: Color::Rgb(0x4c, 0x56, 0x6a),
            add_control: Color::Rgb(0xa3, 0xbe, 0x8c),
            delete_control: Color::Rgb(0xbf, 0x61, 0x6a),
            control_disabled: Color::Rgb(0x4c, 0x56, 0x6a),
            avatar: Color::Rgb(0xb4, 0x8e, 0xad),
            placeholder: Color::Rgb(0x61, 0x6e, 0x88),

            background: Color::Rgb(0x2e, 0x34, 0x40),
            foreground: Color::Rgb(0xd8, 0xde, 0xe9),
            cursor: Color::Rgb(0x5e, 0x81, 0xac),
            cursor_fg: Color::Rgb(0xec, 0xef, 0xf4),
            status_line_bg: Color::Rgb(0x3b, 0x42, 0x52),
            status_line_fg: Color::Rgb(0xd8, 0xde, 0xe9),
            border: Color::Rgb(0x88, 0xc0, 0xd0),

            error: Color::Rgb(0xbf, 0x61, 0x6a),
            warning: Color::Rgb(0xeb, 0xcb, 0x8b),
            info: Color::Rgb(0x88, 0xc0, 0xd0),
        }
    }
}
