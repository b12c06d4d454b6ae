//! Theme system for spark-prompt.
//!
//! A [`Theme`] is plain data: a [`Palette`] of raw SGR strings and a set of
//! [`Symbols`]. Widgets emit palette strings verbatim around sanitized text
//! and never inspect them. Presets build their palettes from [`ThemeColor`];
//! callers may supply any control string instead.
//!
//! # Example
//!
//! ```rust
//! use spark_prompt::theme::{get_preset, Theme};
//!
//! let dracula = get_preset("dracula").unwrap();
//! assert_eq!(dracula.name, "dracula");
//! assert_eq!(Theme::default().name, "terminal");
//! ```

use serde::{Deserialize, Serialize};

pub mod presets;

pub use presets::*;

// =============================================================================
// ThemeColor - Foreground color for presets
// =============================================================================

/// Theme color can be:
/// - `Default`: Terminal's default foreground
/// - `Ansi(n)`: ANSI palette index (0-255)
/// - `Rgb(r, g, b)`: Explicit 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeColor {
    #[default]
    Default,
    /// - 0-7: Standard colors
    /// - 8-15: Bright colors
    /// - 16-255: Extended palette
    Ansi(u8),
    Rgb(u8, u8, u8),
}

impl ThemeColor {
    /// SGR parameter selecting this color as foreground.
    pub fn fg_param(&self) -> String {
        match *self {
            Self::Default => "39".to_string(),
            Self::Ansi(n) if n < 8 => format!("3{n}"),
            Self::Ansi(n) if n < 16 => format!("9{}", n - 8),
            Self::Ansi(n) => format!("38;5;{n}"),
            Self::Rgb(r, g, b) => format!("38;2;{r};{g};{b}"),
        }
    }

    /// Full SGR sequence for this foreground.
    pub fn fg(&self) -> String {
        sgr(&[&self.fg_param()])
    }

    /// Bold foreground.
    pub fn bold(&self) -> String {
        sgr(&["1", &self.fg_param()])
    }

    /// Dim foreground.
    pub fn dim(&self) -> String {
        sgr(&["2", &self.fg_param()])
    }
}

/// `u8` is an ANSI index.
impl From<u8> for ThemeColor {
    fn from(index: u8) -> Self {
        Self::Ansi(index)
    }
}

/// `u32` is an RGB integer (0xRRGGBB).
impl From<u32> for ThemeColor {
    fn from(rgb: u32) -> Self {
        Self::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

/// Join SGR parameters into one sequence. No parameters means no styling.
pub fn sgr(params: &[&str]) -> String {
    if params.is_empty() {
        return String::new();
    }
    format!("\x1b[{}m", params.join(";"))
}

// =============================================================================
// Palette - Raw styles per role
// =============================================================================

/// Raw control strings for each visual role. Empty means unstyled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// The prompt text in front of the widget.
    pub prompt: String,
    /// The info slot: filter text, trail, caller status.
    pub info: String,
    /// The hint slot: default value, key help.
    pub hint: String,
    /// The focused option.
    pub focus: String,
    /// Pin marks of picked options.
    pub pick: String,
    /// The committed value in the summary line.
    pub result: String,
    /// Warnings under the body (failed check, inaccessible entry).
    pub warn: String,
}

// =============================================================================
// Symbols
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Symbols {
    /// Prefix of the focused option.
    pub focus: String,
    /// Mark of a picked option.
    pub pin: String,
    /// Mark of an unpicked option.
    pub unpin: String,
    /// Rune shown in place of each concealed character.
    pub conceal: char,
    /// Suffix of truncated labels.
    pub ellipsis: String,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            focus: "> ".to_string(),
            pin: "[X] ".to_string(),
            unpin: "[ ] ".to_string(),
            conceal: '*',
            ellipsis: "…".to_string(),
        }
    }
}

// =============================================================================
// Theme
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Theme name (e.g., "dracula", "mono").
    pub name: String,
    pub description: String,
    pub palette: Palette,
    pub symbols: Symbols,
}

impl Default for Theme {
    fn default() -> Self {
        terminal()
    }
}

impl Theme {
    /// Unstyled theme with default symbols.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            palette: Palette::default(),
            symbols: Symbols::default(),
        }
    }
}
