//! Typed view over the settings keys the shell understands.
//!
//! The settings store itself is schema-free; this is where defaults and
//! valid ranges for `theme`, `window_size` and `language` live.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::settings::{SettingsError, SettingsStore};
use crate::themes::{FALLBACK_THEME, THEME_SETTING_KEY};

/// Settings key for the main window size.
pub const WINDOW_SIZE_KEY: &str = "window_size";

/// Settings key for the interface language code.
pub const LANGUAGE_KEY: &str = "language";

/// Language used when none is set or the stored one is unsupported.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Language codes offered by the settings dialog.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "es", "fr", "de"];

// =============================================================================
// Window Size
// =============================================================================

/// Main window dimensions in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl WindowSize {
    pub const MIN_WIDTH: u32 = 400;
    pub const MAX_WIDTH: u32 = 3840;
    pub const MIN_HEIGHT: u32 = 300;
    pub const MAX_HEIGHT: u32 = 2160;

    /// Clamp both dimensions to the ranges the settings dialog allows.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH),
            height: self.height.clamp(Self::MIN_HEIGHT, Self::MAX_HEIGHT),
        }
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// =============================================================================
// Preferences
// =============================================================================

/// Check if `code` is one of [`SUPPORTED_LANGUAGES`].
pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// Application preferences read from and written to the settings store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Active theme name. Written only through `ThemeRegistry::set_theme`.
    pub theme: String,

    /// Main window size.
    pub window_size: WindowSize,

    /// Interface language code (e.g., "en").
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: FALLBACK_THEME.as_str().to_string(),
            window_size: WindowSize::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Preferences {
    /// Load preferences from the store, using defaults for missing values.
    ///
    /// Values with the wrong shape are replaced by defaults and logged.
    pub fn load(store: &SettingsStore) -> Self {
        let mut prefs = Self::default();

        if let Some(value) = store.get(THEME_SETTING_KEY) {
            match value.as_str() {
                Some(theme) => prefs.theme = theme.to_string(),
                None => warn!(value = %value, "Ignoring non-string theme setting"),
            }
        }

        if let Some(value) = store.get(WINDOW_SIZE_KEY) {
            match serde_json::from_value::<WindowSize>(value.clone()) {
                Ok(size) => prefs.window_size = size,
                Err(e) => warn!(error = %e, "Failed to parse window size, using default"),
            }
        }

        if let Some(value) = store.get(LANGUAGE_KEY) {
            match value.as_str() {
                Some(language) => prefs.language = language.to_string(),
                None => warn!(value = %value, "Ignoring non-string language setting"),
            }
        }

        prefs
    }

    /// Write window size and language to the store.
    ///
    /// The theme is left alone; selection goes through the theme registry so
    /// the name is checked against existing themes.
    pub fn save(&self, store: &mut SettingsStore) -> Result<(), SettingsError> {
        store.set_as(WINDOW_SIZE_KEY, &self.window_size)?;
        store.set(LANGUAGE_KEY, self.language.as_str())?;
        Ok(())
    }

    /// Clamp settings to valid ranges.
    pub fn validate(&mut self) {
        self.window_size = self.window_size.clamped();

        if !is_supported_language(&self.language) {
            warn!(language = %self.language, "Unsupported language, using default");
            self.language = DEFAULT_LANGUAGE.to_string();
        }

        if self.theme.is_empty() {
            self.theme = FALLBACK_THEME.as_str().to_string();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, SettingsStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::open(temp_dir.path().join("default.json")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_preferences_default() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, "light");
        assert_eq!(prefs.window_size, WindowSize { width: 800, height: 600 });
        assert_eq!(prefs.language, "en");
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let (_temp, store) = setup_store();
        assert_eq!(Preferences::load(&store), Preferences::default());
    }

    #[test]
    fn test_load_reads_seeded_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("default.json");
        SettingsStore::ensure_default_file(&path).unwrap();
        let store = SettingsStore::open(&path).unwrap();

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.theme, "dark");
        assert_eq!(prefs.window_size, WindowSize::default());
        assert_eq!(prefs.language, "en");
    }

    #[test]
    fn test_load_tolerates_partial_window_size() {
        let (_temp, mut store) = setup_store();
        store.set(WINDOW_SIZE_KEY, json!({"width": 1280})).unwrap();

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.window_size, WindowSize { width: 1280, height: 600 });
    }

    #[test]
    fn test_load_ignores_mistyped_values() {
        let (_temp, mut store) = setup_store();
        store.set(THEME_SETTING_KEY, 42).unwrap();
        store.set(WINDOW_SIZE_KEY, "big").unwrap();
        store.set(LANGUAGE_KEY, json!(["en"])).unwrap();

        assert_eq!(Preferences::load(&store), Preferences::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_temp, mut store) = setup_store();

        let prefs = Preferences {
            theme: "ignored-by-save".to_string(),
            window_size: WindowSize { width: 1024, height: 768 },
            language: "fr".to_string(),
        };
        prefs.save(&mut store).unwrap();

        let reopened = SettingsStore::open(store.path()).unwrap();
        let loaded = Preferences::load(&reopened);
        assert_eq!(loaded.window_size, prefs.window_size);
        assert_eq!(loaded.language, "fr");
        assert_eq!(loaded.theme, "light");
        assert_eq!(
            reopened.get(WINDOW_SIZE_KEY),
            Some(&json!({"width": 1024, "height": 768}))
        );
    }

    #[test]
    fn test_validate_clamps_window_size() {
        let mut prefs = Preferences::default();

        prefs.window_size = WindowSize { width: 10, height: 10 };
        prefs.validate();
        assert_eq!(prefs.window_size, WindowSize { width: 400, height: 300 });

        prefs.window_size = WindowSize { width: 10_000, height: 10_000 };
        prefs.validate();
        assert_eq!(prefs.window_size, WindowSize { width: 3840, height: 2160 });
    }

    #[test]
    fn test_validate_resets_unknown_language() {
        let mut prefs = Preferences::default();
        prefs.language = "xx".to_string();
        prefs.validate();
        assert_eq!(prefs.language, "en");

        prefs.language = "de".to_string();
        prefs.validate();
        assert_eq!(prefs.language, "de");
    }

    #[test]
    fn test_validate_sets_empty_theme() {
        let mut prefs = Preferences::default();
        prefs.theme = String::new();
        prefs.validate();
        assert_eq!(prefs.theme, "light");
    }

    #[test]
    fn test_window_size_display() {
        assert_eq!(WindowSize::default().to_string(), "800x600");
    }
}
