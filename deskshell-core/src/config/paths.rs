//! Location of the settings file and theme directory.
//!
//! Both live under one application root:
//!
//! - `{root}/settings/default.json`
//! - `{root}/resources/themes/`
//!
//! The root defaults to the working directory. [`AppPaths::user_default`]
//! places it in the platform config directory instead
//! (e.g. `~/.config/deskshell/` on Linux).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::settings::DEFAULT_SETTINGS_PATH;
use crate::themes::DEFAULT_THEMES_DIR;

/// Subdirectory name under the platform config directory.
const APP_DIR_NAME: &str = "deskshell";

/// Resolved file locations for one application root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Paths under `root`.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Paths relative to the working directory.
    pub fn relative() -> Self {
        Self::under(PathBuf::new())
    }

    /// Paths under the per-user config directory.
    pub fn user_default() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(Self::under(config_dir.join(APP_DIR_NAME)))
    }

    /// Application root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.root.join(DEFAULT_SETTINGS_PATH)
    }

    /// Path to the theme directory.
    pub fn themes_dir(&self) -> PathBuf {
        self.root.join(DEFAULT_THEMES_DIR)
    }

    /// Ensure the settings and theme directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created (e.g., permission issues).
    pub fn ensure_dirs_exist(&self) -> Result<()> {
        let settings_file = self.settings_file();
        let themes_dir = self.themes_dir();
        let dirs = [settings_file.parent(), Some(themes_dir.as_path())];

        for dir in dirs.into_iter().flatten() {
            if dir.as_os_str().is_empty() {
                continue;
            }
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        Ok(())
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::relative()
    }
}
