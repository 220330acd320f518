//! Theme registry: a directory of named palettes plus the active selection.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::events::{EventSender, ShellEvent};
use crate::settings::{LoadMode, SettingsStore};

use super::palette::{Palette, ReservedTheme};
use super::types::{is_valid_theme_name, ThemeError};
use super::xml;

/// Default theme directory, relative to the application root.
pub const DEFAULT_THEMES_DIR: &str = "resources/themes";

/// Settings key holding the active theme name.
pub const THEME_SETTING_KEY: &str = "theme";

/// Theme used when settings do not name one.
pub const FALLBACK_THEME: ReservedTheme = ReservedTheme::Light;

const THEME_EXTENSION: &str = "xml";

/// Registry of palettes stored as one XML file per theme.
///
/// The settings store is not held; operations that change the selection take
/// it as an argument.
#[derive(Debug)]
pub struct ThemeRegistry {
    dir: PathBuf,
    current: String,
    mode: LoadMode,
    events: Option<EventSender>,
}

impl ThemeRegistry {
    /// Open the registry at `dir`, seeding the reserved themes if missing.
    ///
    /// The current theme comes from the `theme` setting. Malformed theme files
    /// are handled with the same [`LoadMode`] as `settings`.
    pub fn open(dir: impl Into<PathBuf>, settings: &SettingsStore) -> Result<Self, ThemeError> {
        let current = settings
            .get_str(THEME_SETTING_KEY)
            .unwrap_or(FALLBACK_THEME.as_str())
            .to_string();

        let registry = Self {
            dir: dir.into(),
            current,
            mode: settings.mode(),
            events: None,
        };
        registry.ensure_default_themes()?;

        debug!(
            dir = %registry.dir.display(),
            current = %registry.current,
            "ThemeRegistry opened"
        );
        Ok(registry)
    }

    /// Send change notifications to `events`.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Write each reserved palette whose file is missing.
    ///
    /// Existing files are never touched. Returns the themes that were seeded.
    pub fn ensure_default_themes(&self) -> Result<Vec<ReservedTheme>, ThemeError> {
        fs::create_dir_all(&self.dir).map_err(|e| ThemeError::io(&self.dir, e))?;

        let mut seeded = Vec::new();
        for theme in ReservedTheme::ALL {
            let path = self.theme_path(theme.as_str());
            if path.exists() {
                continue;
            }
            self.write_palette(theme.as_str(), &theme.default_palette())?;
            info!(theme = %theme, "Seeded default theme");
            seeded.push(theme);
        }
        Ok(seeded)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Name of the active theme. Does not touch the disk.
    ///
    /// The file may have been removed out of band; use
    /// [`resolve_active_theme`](Self::resolve_active_theme) when that matters.
    pub fn current_theme(&self) -> &str {
        &self.current
    }

    /// Make `name` the active theme and persist it to `settings`.
    ///
    /// Returns `false` if no such theme exists; the selection is unchanged.
    pub fn set_theme(&mut self, settings: &mut SettingsStore, name: &str) -> Result<bool, ThemeError> {
        if !self.available_themes()?.iter().any(|t| t == name) {
            debug!(theme = name, "Refusing to select unknown theme");
            return Ok(false);
        }

        self.current = name.to_string();
        settings.set(THEME_SETTING_KEY, name)?;
        info!(theme = name, "Theme selected");
        self.emit(ShellEvent::ThemeSelected {
            name: name.to_string(),
        });
        Ok(true)
    }

    /// The current theme if its file still exists, otherwise the first
    /// available theme. `None` only when the directory holds no themes.
    pub fn resolve_active_theme(&self) -> Result<Option<String>, ThemeError> {
        let available = self.available_themes()?;
        if available.iter().any(|t| *t == self.current) {
            return Ok(Some(self.current.clone()));
        }

        let fallback = available.into_iter().next();
        if let Some(name) = &fallback {
            warn!(
                current = %self.current,
                fallback = %name,
                "Current theme no longer exists, falling back"
            );
        }
        Ok(fallback)
    }

    // =========================================================================
    // Palettes
    // =========================================================================

    /// Read the palette for `name`.
    ///
    /// A missing theme yields an empty palette.
    pub fn theme_colors(&self, name: &str) -> Result<Palette, ThemeError> {
        if !is_valid_theme_name(name) {
            return Ok(Palette::new());
        }

        let path = self.theme_path(name);
        if !path.exists() {
            debug!(theme = name, "Theme file not found, returning empty palette");
            return Ok(Palette::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| ThemeError::io(&path, e))?;
        match xml::decode(&content) {
            Ok(palette) => Ok(palette),
            Err(source) if self.mode.is_strict() => Err(ThemeError::Malformed { path, source }),
            Err(e) => {
                warn!(
                    "Failed to parse theme at {}: {}. Using an empty palette.",
                    path.display(),
                    e
                );
                Ok(Palette::new())
            }
        }
    }

    /// Read the palette of the current theme.
    pub fn current_colors(&self) -> Result<Palette, ThemeError> {
        self.theme_colors(&self.current)
    }

    /// Write `colors` as theme `name`, replacing any existing file.
    pub fn save_theme(&self, name: &str, colors: &Palette) -> Result<(), ThemeError> {
        self.write_palette(name, colors)?;
        info!(theme = name, roles = colors.len(), "Theme saved");
        self.emit(ShellEvent::ThemeSaved {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Create theme `name` as a copy of the active palette.
    ///
    /// Returns `false` if a theme with that name already exists.
    pub fn create_theme(&self, name: &str) -> Result<bool, ThemeError> {
        if !is_valid_theme_name(name) {
            return Err(ThemeError::InvalidName(name.to_string()));
        }
        if self.contains(name) {
            debug!(theme = name, "Theme already exists");
            return Ok(false);
        }

        let source = self
            .resolve_active_theme()?
            .unwrap_or_else(|| FALLBACK_THEME.as_str().to_string());
        let colors = self.theme_colors(&source)?;
        self.save_theme(name, &colors)?;
        Ok(true)
    }

    // =========================================================================
    // Listing / Removal
    // =========================================================================

    /// Names of every theme file in the directory, sorted.
    pub fn available_themes(&self) -> Result<Vec<String>, ThemeError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ThemeError::io(&self.dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ThemeError::io(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(THEME_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if is_valid_theme_name(stem) => names.push(stem.to_string()),
                _ => debug!(path = %path.display(), "Skipping unusable theme file name"),
            }
        }

        names.sort();
        Ok(names)
    }

    /// Check whether a theme file exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        is_valid_theme_name(name) && self.theme_path(name).is_file()
    }

    /// Delete theme `name`.
    ///
    /// Returns `false` for reserved themes and for themes that do not exist.
    pub fn delete_theme(&self, name: &str) -> Result<bool, ThemeError> {
        if Self::is_reserved(name) {
            info!(theme = name, "Refusing to delete reserved theme");
            return Ok(false);
        }
        if !self.contains(name) {
            return Ok(false);
        }

        let path = self.theme_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(ThemeError::io(&path, e)),
        }

        info!(theme = name, "Theme deleted");
        self.emit(ShellEvent::ThemeDeleted {
            name: name.to_string(),
        });
        Ok(true)
    }

    /// Rename theme `from` to `to`, following the selection if it pointed at `from`.
    ///
    /// Returns `false` if `from` is reserved or missing, or `to` already exists.
    pub fn rename_theme(
        &mut self,
        settings: &mut SettingsStore,
        from: &str,
        to: &str,
    ) -> Result<bool, ThemeError> {
        if Self::is_reserved(from) {
            info!(theme = from, "Refusing to rename reserved theme");
            return Ok(false);
        }
        if !is_valid_theme_name(to) {
            return Err(ThemeError::InvalidName(to.to_string()));
        }
        if !self.contains(from) || self.contains(to) {
            return Ok(false);
        }

        let source = self.theme_path(from);
        let target = self.theme_path(to);
        fs::rename(&source, &target).map_err(|e| ThemeError::io(&source, e))?;

        if self.current == from {
            self.current = to.to_string();
            settings.set(THEME_SETTING_KEY, to)?;
        }

        info!(from, to, "Theme renamed");
        self.emit(ShellEvent::ThemeRenamed {
            from: from.to_string(),
            to: to.to_string(),
        });
        Ok(true)
    }

    // =========================================================================
    // Paths
    // =========================================================================

    /// Directory holding the theme files.
    pub fn themes_dir(&self) -> &Path {
        &self.dir
    }

    /// File path for theme `name`.
    pub fn theme_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{THEME_EXTENSION}"))
    }

    /// Check if `name` is one of the built-in themes.
    pub fn is_reserved(name: &str) -> bool {
        ReservedTheme::from_name(name).is_some()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn write_palette(&self, name: &str, colors: &Palette) -> Result<(), ThemeError> {
        if !is_valid_theme_name(name) {
            return Err(ThemeError::InvalidName(name.to_string()));
        }

        fs::create_dir_all(&self.dir).map_err(|e| ThemeError::io(&self.dir, e))?;
        let content = xml::encode(colors)?;
        let path = self.theme_path(name);
        fs::write(&path, content).map_err(|e| ThemeError::io(&path, e))?;
        Ok(())
    }

    fn emit(&self, event: ShellEvent) {
        if let Some(events) = &self.events {
            if events.send(event).is_err() {
                debug!("Event receiver dropped");
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
