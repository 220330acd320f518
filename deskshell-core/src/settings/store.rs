//! JSON-backed key-value settings store.
//!
//! The whole mapping lives in memory and is rewritten to disk on every
//! mutation. There is no schema: callers pick their keys and tolerate missing
//! ones through [`SettingsStore::get_or`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use super::types::{LoadMode, SettingsError};

/// Default location of the settings file, relative to the application root.
pub const DEFAULT_SETTINGS_PATH: &str = "settings/default.json";

/// Indentation used for the persisted document.
const INDENT: &[u8] = b"    ";

// =============================================================================
// Store
// =============================================================================

/// Flat key-value settings persisted as a single JSON object.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    mode: LoadMode,
    values: Map<String, Value>,
}

impl SettingsStore {
    /// Open the store at `path`, discarding malformed content.
    ///
    /// A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        Self::open_with_mode(path, LoadMode::Lenient)
    }

    /// Open the store at `path` with an explicit load mode.
    pub fn open_with_mode(path: impl Into<PathBuf>, mode: LoadMode) -> Result<Self, SettingsError> {
        let mut store = Self {
            path: path.into(),
            mode,
            values: Map::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Replace the in-memory mapping with the file's current content.
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        self.values = load_values(&self.path, self.mode)?;
        debug!(
            path = %self.path.display(),
            keys = self.values.len(),
            "Settings loaded"
        );
        Ok(())
    }

    /// Create the seed settings document at `path` unless a file already exists.
    ///
    /// Returns `true` when the file was written.
    pub fn ensure_default_file(path: &Path) -> Result<bool, SettingsError> {
        if path.exists() {
            return Ok(false);
        }

        write_document(path, &default_document())?;
        info!(path = %path.display(), "Default settings file created");
        Ok(true)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get the stored value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get the stored value for `key`, or `default` if it is absent.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// Get a string value. Returns `None` if absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Deserialize the value for `key` into `T`.
    ///
    /// Returns `None` if the key is absent or the value has the wrong shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(typed) => Some(typed),
            Err(e) => {
                debug!(key, error = %e, "Setting has unexpected shape");
                None
            }
        }
    }

    /// Check whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// All keys in stable order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// All entries in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load mode this store was opened with.
    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    // =========================================================================
    // Mutations (each one rewrites the file)
    // =========================================================================

    /// Insert or overwrite `key`, then persist.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<(), SettingsError> {
        let key = key.into();
        debug!(key = %key, "Setting value");
        self.values.insert(key, value.into());
        self.persist()
    }

    /// Serialize `value` and store it under `key`, then persist.
    pub fn set_as<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<(), SettingsError> {
        let value = serde_json::to_value(value)?;
        self.set(key, value)
    }

    /// Remove `key` and persist. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        if self.values.remove(key).is_some() {
            debug!(key, "Removed setting");
            self.persist()?;
        }
        Ok(())
    }

    /// Remove every key and persist.
    pub fn clear(&mut self) -> Result<(), SettingsError> {
        self.values.clear();
        debug!(path = %self.path.display(), "Cleared settings");
        self.persist()
    }

    fn persist(&self) -> Result<(), SettingsError> {
        write_document(&self.path, &self.values)
    }
}

// =============================================================================
// File I/O
// =============================================================================

/// The document written by [`SettingsStore::ensure_default_file`].
fn default_document() -> Value {
    json!({
        "theme": "dark",
        "window_size": {
            "width": 800,
            "height": 600
        },
        "language": "en"
    })
}

fn load_values(path: &Path, mode: LoadMode) -> Result<Map<String, Value>, SettingsError> {
    if !path.exists() {
        debug!("Settings not found at {}, starting empty", path.display());
        return Ok(Map::new());
    }

    let content = read_existing(path)?;
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) if mode.is_strict() => Err(SettingsError::NotAnObject(path.to_path_buf())),
        Ok(_) => {
            warn!(
                "Settings at {} are not a JSON object. Starting fresh.",
                path.display()
            );
            Ok(Map::new())
        }
        Err(source) if mode.is_strict() => Err(SettingsError::Malformed {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) => {
            warn!(
                "Failed to parse settings at {}: {}. Starting fresh.",
                path.display(),
                e
            );
            Ok(Map::new())
        }
    }
}

/// Read a settings file already known to exist.
///
/// A file that disappeared since the existence check is reported as
/// [`SettingsError::NotFound`] rather than treated as empty.
fn read_existing(path: &Path) -> Result<String, SettingsError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SettingsError::NotFound(path.to_path_buf()),
        _ => SettingsError::io(path, e),
    })
}

fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    fs::write(path, buf).map_err(|e| SettingsError::io(path, e))?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
