//! Prompt configuration, loaded from TOML.
//!
//! ```toml
//! backend = "termios"
//! escape_timeout_ms = 50
//! theme = "dracula"
//!
//! [palette]
//! focus = "\u001b[35m"
//!
//! [symbols]
//! pin = "(*) "
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::BackendKind;
use crate::theme::{get_preset, Theme};

/// How long a lone ESC waits for the rest of a sequence.
pub const DEFAULT_ESCAPE_TIMEOUT_MS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub backend: BackendKind,
    pub escape_timeout_ms: u64,
    /// Preset name, see [`crate::theme::preset_names`].
    pub theme: String,
    pub palette: PaletteOverrides,
    pub symbols: SymbolOverrides,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Auto,
            escape_timeout_ms: DEFAULT_ESCAPE_TIMEOUT_MS,
            theme: "default".to_string(),
            palette: PaletteOverrides::default(),
            symbols: SymbolOverrides::default(),
        }
    }
}

/// Palette entries replacing the preset's. Unset entries keep the preset value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteOverrides {
    pub prompt: Option<String>,
    pub info: Option<String>,
    pub hint: Option<String>,
    pub focus: Option<String>,
    pub pick: Option<String>,
    pub result: Option<String>,
    pub warn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolOverrides {
    pub focus: Option<String>,
    pub pin: Option<String>,
    pub unpin: Option<String>,
    pub conceal: Option<char>,
    pub ellipsis: Option<String>,
}

fn replace<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

impl PromptConfig {
    /// Read and parse a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded prompt config");
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    /// The named preset with this config's overrides applied.
    pub fn theme(&self) -> Result<Theme> {
        let mut theme = get_preset(&self.theme).ok_or_else(|| Error::UnknownTheme(self.theme.clone()))?;

        let p = &self.palette;
        replace(&mut theme.palette.prompt, &p.prompt);
        replace(&mut theme.palette.info, &p.info);
        replace(&mut theme.palette.hint, &p.hint);
        replace(&mut theme.palette.focus, &p.focus);
        replace(&mut theme.palette.pick, &p.pick);
        replace(&mut theme.palette.result, &p.result);
        replace(&mut theme.palette.warn, &p.warn);

        let s = &self.symbols;
        replace(&mut theme.symbols.focus, &s.focus);
        replace(&mut theme.symbols.pin, &s.pin);
        replace(&mut theme.symbols.unpin, &s.unpin);
        replace(&mut theme.symbols.conceal, &s.conceal);
        replace(&mut theme.symbols.ellipsis, &s.ellipsis);

        Ok(theme)
    }
}
