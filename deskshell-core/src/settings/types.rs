//! Settings store error and load-mode definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file was present when checked but gone by the time it was read.
    #[error("Settings file {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed settings file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Settings file {} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// How to treat files whose content cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Discard malformed content and start empty, logging a warning.
    #[default]
    Lenient,
    /// Report malformed content as an error.
    Strict,
}

impl LoadMode {
    /// Returns true for [`LoadMode::Strict`].
    pub fn is_strict(self) -> bool {
        matches!(self, LoadMode::Strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_mode_default_is_lenient() {
        assert_eq!(LoadMode::default(), LoadMode::Lenient);
        assert!(!LoadMode::Lenient.is_strict());
        assert!(LoadMode::Strict.is_strict());
    }

    #[test]
    fn test_not_found_message_names_path() {
        let err = SettingsError::NotFound(PathBuf::from("settings/default.json"));
        assert_eq!(
            err.to_string(),
            "Settings file settings/default.json not found"
        );
    }
}
