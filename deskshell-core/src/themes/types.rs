//! Theme registry error types and name rules.

use std::path::PathBuf;

use thiserror::Error;

use super::xml::XmlError;
use crate::settings::SettingsError;

/// Errors that can occur while reading or writing theme files.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Invalid theme name: {0:?}")]
    InvalidName(String),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed theme file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: XmlError,
    },
    #[error("Failed to encode theme: {0}")]
    Encode(#[from] XmlError),
    #[error("Failed to persist theme selection: {0}")]
    Settings(#[from] SettingsError),
}

impl ThemeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Check that `name` can be used as a theme file stem.
///
/// Rejects empty names, hidden names, `.`/`..` and anything with a path
/// separator.
pub fn is_valid_theme_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_theme_names() {
        assert!(is_valid_theme_name("light"));
        assert!(is_valid_theme_name("Solarized Dark"));
        assert!(is_valid_theme_name("high-contrast_2"));
    }

    #[test]
    fn test_invalid_theme_names() {
        assert!(!is_valid_theme_name(""));
        assert!(!is_valid_theme_name("."));
        assert!(!is_valid_theme_name(".."));
        assert!(!is_valid_theme_name(".hidden"));
        assert!(!is_valid_theme_name("../escape"));
        assert!(!is_valid_theme_name("nested/theme"));
        assert!(!is_valid_theme_name("nested\\theme"));
    }
}
