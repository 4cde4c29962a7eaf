//! Configuration and color scheme management for lineterm.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.lineterm/config.toml`
//! - Built-in color schemes for console output
//!
//! # Configuration File
//!
//! ```toml
//! # Text shown in front of the input line
//! prompt = ">>> "
//!
//! # Stripped from the first word before command lookup
//! command_prefix = "/"
//!
//! # Color scheme: default, solarized-dark, monokai, nord,
//! #               dracula, gruvbox-dark, tokyo-night
//! color_scheme = "nord"
//!
//! # trace, debug, info, warn, error
//! log_level = "info"
//!
//! # Output lines kept in memory
//! scrollback = 10000
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt rendered before the input text
    pub prompt: String,
    /// Optional prefix on command names (`/echo`)
    pub command_prefix: String,
    /// Color scheme name
    pub color_scheme: String,
    /// Log filter level for the binary's log file
    pub log_level: String,
    /// Maximum number of retained output lines
    pub scrollback: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: ">>> ".to_string(),
            command_prefix: "/".to_string(),
            color_scheme: "default".to_string(),
            log_level: "info".to_string(),
            scrollback: 10_000,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get the color scheme
    pub fn get_color_scheme(&self) -> ColorScheme {
        ColorScheme::by_name(&self.color_scheme)
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Console output colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,
    /// Regular command output
    pub foreground: Color,
    /// Echo of submitted lines
    pub echo: Color,
    /// `Process::error` output and command failures
    pub error: Color,
    /// Prompt in front of the input line
    pub prompt: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_scheme()
    }
}

impl ColorScheme {
    /// Default color scheme
    pub fn default_scheme() -> Self {
        Self {
            name: "default".to_string(),
            foreground: Color::new(255, 255, 255),
            echo: Color::new(180, 180, 180),
            error: Color::new(255, 85, 85),
            prompt: Color::new(100, 150, 255),
        }
    }

    /// Solarized Dark scheme
    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark".to_string(),
            foreground: Color::new(147, 161, 161),
            echo: Color::new(101, 123, 131),
            error: Color::new(220, 50, 47),
            prompt: Color::new(38, 139, 210),
        }
    }

    /// Monokai scheme
    pub fn monokai() -> Self {
        Self {
            name: "monokai".to_string(),
            foreground: Color::new(248, 248, 242),
            echo: Color::new(150, 150, 140),
            error: Color::new(249, 38, 114),
            prompt: Color::new(166, 226, 46),
        }
    }

    /// Nord scheme
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            foreground: Color::new(216, 222, 233),
            echo: Color::new(147, 161, 181),
            error: Color::new(191, 97, 106),
            prompt: Color::new(136, 192, 208),
        }
    }

    /// Dracula scheme
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            foreground: Color::new(248, 248, 242),
            echo: Color::new(98, 114, 164),
            error: Color::new(255, 85, 85),
            prompt: Color::new(189, 147, 249),
        }
    }

    /// Gruvbox Dark scheme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark".to_string(),
            foreground: Color::new(235, 219, 178),
            echo: Color::new(168, 153, 132),
            error: Color::new(251, 73, 52),
            prompt: Color::new(215, 153, 33),
        }
    }

    /// Tokyo Night scheme
    pub fn tokyo_night() -> Self {
        Self {
            name: "tokyo-night".to_string(),
            foreground: Color::new(192, 202, 245),
            echo: Color::new(86, 95, 137),
            error: Color::new(247, 118, 142),
            prompt: Color::new(122, 162, 247),
        }
    }

    /// Get scheme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "solarized-dark" | "solarized_dark" => Self::solarized_dark(),
            "monokai" => Self::monokai(),
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            "gruvbox-dark" | "gruvbox_dark" | "gruvbox" => Self::gruvbox_dark(),
            "tokyo-night" | "tokyo_night" | "tokyonight" => Self::tokyo_night(),
            _ => Self::default_scheme(),
        }
    }

    /// List available schemes
    pub fn list() -> Vec<&'static str> {
        vec![
            "default",
            "solarized-dark",
            "monokai",
            "nord",
            "dracula",
            "gruvbox-dark",
            "tokyo-night",
        ]
    }
}

/// `~/.lineterm`, created on first use
pub fn data_dir() -> Option<PathBuf> {
    let dir = home_dir()?.join(".lineterm");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse("prompt = \"$ \"\ncolor_scheme = \"nord\"").unwrap();
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.command_prefix, "/");
        assert_eq!(config.scrollback, 10_000);
        assert_eq!(config.get_color_scheme().name, "nord");
    }

    #[test]
    fn test_malformed_file_is_error() {
        assert!(Config::parse("scrollback = \"lots\"").is_err());
    }

    #[test]
    fn test_unknown_scheme_falls_back() {
        assert_eq!(ColorScheme::by_name("no-such-theme").name, "default");
        for name in ColorScheme::list() {
            assert_eq!(ColorScheme::by_name(name).name, name);
        }
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = Config {
            command_prefix: ":".to_string(),
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lineterm-config-{}.toml", std::process::id()));
        fs::write(&path, "command_prefix = \":\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(config.command_prefix, ":");

        let missing = Config::load_from(&path);
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
