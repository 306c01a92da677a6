//! # Theme System
//!
//! Color themes for the day calendar.
//!
//! Rendering code never hardcodes `ratatui::style::Color` values; it reads
//! them from the active [`Theme`], which is picked by name from the config
//! file.
//!
//! ## Built-in Themes
//!
//! - **Catppuccin Mocha** (default)
//! - **Dracula**
//! - **Nord**
//! - **Gruvbox Dark**
//! - **Solarized Dark**

use ratatui::style::Color;

/// All colors used by the calendar, grouped by semantic role.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Name as written in `config.json`.
    pub name: &'static str,

    /// Calendar background.
    pub bg: Color,
    /// Primary text.
    pub fg: Color,
    /// Hour labels, grid lines, footer hints.
    pub fg_dim: Color,
    /// Header, borders and the selected block.
    pub accent: Color,

    /// Background of a finished study block.
    pub block: Color,
    /// Background of a block that is still running.
    pub ongoing: Color,
    /// Text drawn on top of a block.
    pub block_fg: Color,

    /// The current-time line.
    pub now_line: Color,
}

impl Theme {
    /// All built-in themes, in display order.
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Return the default theme (Catppuccin Mocha).
    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }
}

static BUILT_IN_THEMES: [Theme; 5] = [
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),          // base
        fg: Color::Rgb(205, 214, 244),       // text
        fg_dim: Color::Rgb(108, 112, 134),   // overlay0
        accent: Color::Rgb(137, 180, 250),   // blue
        block: Color::Rgb(69, 71, 90),       // surface1
        ongoing: Color::Rgb(64, 98, 80),     // green, darkened
        block_fg: Color::Rgb(205, 214, 244), // text
        now_line: Color::Rgb(243, 139, 168), // red
    },
    Theme {
        name: "Dracula",
        bg: Color::Rgb(40, 42, 54),
        fg: Color::Rgb(248, 248, 242),
        fg_dim: Color::Rgb(98, 114, 164),
        accent: Color::Rgb(189, 147, 249), // purple
        block: Color::Rgb(68, 71, 90),
        ongoing: Color::Rgb(40, 90, 60),
        block_fg: Color::Rgb(248, 248, 242),
        now_line: Color::Rgb(255, 85, 85),
    },
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        fg: Color::Rgb(216, 222, 233),
        fg_dim: Color::Rgb(76, 86, 106),
        accent: Color::Rgb(136, 192, 208), // frost
        block: Color::Rgb(67, 76, 94),
        ongoing: Color::Rgb(83, 105, 80),
        block_fg: Color::Rgb(236, 239, 244),
        now_line: Color::Rgb(191, 97, 106), // aurora red
    },
    Theme {
        name: "Gruvbox Dark",
        bg: Color::Rgb(40, 40, 40),
        fg: Color::Rgb(235, 219, 178),
        fg_dim: Color::Rgb(146, 131, 116),
        accent: Color::Rgb(250, 189, 47), // yellow
        block: Color::Rgb(80, 73, 69),
        ongoing: Color::Rgb(79, 94, 44),
        block_fg: Color::Rgb(251, 241, 199),
        now_line: Color::Rgb(251, 73, 52),
    },
    Theme {
        name: "Solarized Dark",
        bg: Color::Rgb(0, 43, 54),
        fg: Color::Rgb(147, 161, 161),
        fg_dim: Color::Rgb(88, 110, 117),
        accent: Color::Rgb(38, 139, 210), // blue
        block: Color::Rgb(7, 54, 66),
        ongoing: Color::Rgb(60, 80, 20),
        block_fg: Color::Rgb(238, 232, 213),
        now_line: Color::Rgb(220, 50, 47),
    },
];
