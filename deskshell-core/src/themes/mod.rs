//! Named color themes.
//!
//! This module provides:
//! - `Palette` - Color-role to color-value mapping
//! - `ReservedTheme` - The built-in `light` and `dark` themes
//! - `ThemeRegistry` - Directory of XML theme files plus the active selection
//! - `Rgb` / `contrasting_text` - Helpers for drawing palette swatches

pub mod color;
mod palette;
mod registry;
mod types;
mod xml;

pub use color::{contrasting_text, Rgb};
pub use palette::{roles, Palette, ReservedTheme};
pub use registry::{ThemeRegistry, DEFAULT_THEMES_DIR, FALLBACK_THEME, THEME_SETTING_KEY};
pub use types::{is_valid_theme_name, ThemeError};
pub use xml::XmlError;
