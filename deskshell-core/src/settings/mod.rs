//! Settings persistence.
//!
//! This module provides:
//! - `SettingsStore` - JSON-backed key-value store, rewritten on every change
//! - `SettingsError` - Load/persist failures
//! - `LoadMode` - Lenient or strict handling of malformed files

mod store;
mod types;

pub use store::{SettingsStore, DEFAULT_SETTINGS_PATH};
pub use types::{LoadMode, SettingsError};
