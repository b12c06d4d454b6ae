//! Theme presets for spark-prompt.
//!
//! Built-in themes:
//! - terminal (default - uses ANSI colors)
//! - mono (no colors, bold/dim only)
//! - dracula
//! - nord

use super::{sgr, Palette, Symbols, Theme, ThemeColor};

// =============================================================================
// Terminal Theme (Default)
// =============================================================================

/// Terminal theme - uses ANSI colors to respect the user's terminal theme.
pub fn terminal() -> Theme {
    Theme {
        name: "terminal".to_string(),
        description: "Uses terminal palette colors".to_string(),
        palette: Palette {
            prompt: ThemeColor::Default.bold(),
            info: ThemeColor::Ansi(6).fg(),   // cyan
            hint: ThemeColor::Ansi(8).fg(),   // bright black
            focus: ThemeColor::Ansi(12).fg(), // bright blue
            pick: ThemeColor::Ansi(2).fg(),   // green
            result: ThemeColor::Ansi(6).fg(),
            warn: ThemeColor::Ansi(1).fg(), // red
        },
        symbols: Symbols::default(),
    }
}

// =============================================================================
// Mono Theme
// =============================================================================

/// Mono - attributes only, for terminals without color.
pub fn mono() -> Theme {
    Theme {
        name: "mono".to_string(),
        description: "Bold and dim attributes only".to_string(),
        palette: Palette {
            prompt: sgr(&["1"]),
            info: String::new(),
            hint: sgr(&["2"]),
            focus: sgr(&["7"]),
            pick: sgr(&["1"]),
            result: sgr(&["1"]),
            warn: sgr(&["4"]),
        },
        symbols: Symbols::default(),
    }
}

// =============================================================================
// Dracula Theme
// =============================================================================

/// Dracula - dark theme with vivid colors.
pub fn dracula() -> Theme {
    Theme {
        name: "dracula".to_string(),
        description: "Dracula dark theme".to_string(),
        palette: Palette {
            prompt: ThemeColor::from(0xf8f8f2u32).bold(),
            info: ThemeColor::from(0x8be9fdu32).fg(),  // cyan
            hint: ThemeColor::from(0x6272a4u32).fg(),  // comment
            focus: ThemeColor::from(0xbd93f9u32).fg(), // purple
            pick: ThemeColor::from(0x50fa7bu32).fg(),  // green
            result: ThemeColor::from(0xff79c6u32).fg(), // pink
            warn: ThemeColor::from(0xff5555u32).fg(),  // red
        },
        symbols: Symbols { focus: "❯ ".to_string(), ..Symbols::default() },
    }
}

// =============================================================================
// Nord Theme
// =============================================================================

/// Nord - arctic, north-bluish palette.
pub fn nord() -> Theme {
    Theme {
        name: "nord".to_string(),
        description: "Arctic north-bluish theme".to_string(),
        palette: Palette {
            prompt: ThemeColor::from(0xeceff4u32).bold(),
            info: ThemeColor::from(0x88c0d0u32).fg(),
            hint: ThemeColor::from(0x4c566au32).fg(),
            focus: ThemeColor::from(0x81a1c1u32).fg(),
            pick: ThemeColor::from(0xa3be8cu32).fg(),
            result: ThemeColor::from(0x8fbcbbu32).fg(),
            warn: ThemeColor::from(0xbf616au32).fg(),
        },
        symbols: Symbols::default(),
    }
}

// =============================================================================
// Preset Lookup
// =============================================================================

/// Get a preset theme by name. Case-insensitive; "default" is the terminal theme.
pub fn get_preset(name: &str) -> Option<Theme> {
    match name.to_lowercase().replace(['_', '-'], "").as_str() {
        "terminal" | "default" => Some(terminal()),
        "mono" => Some(mono()),
        "dracula" => Some(dracula()),
        "nord" => Some(nord()),
        _ => None,
    }
}

/// Names accepted by [`get_preset`].
pub fn preset_names() -> &'static [&'static str] {
    &["terminal", "mono", "dracula", "nord"]
}
