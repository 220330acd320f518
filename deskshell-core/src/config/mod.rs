//! Configuration module for Deskshell.
//!
//! Resolves where the stores live on disk and gives the schema-free settings
//! store a typed view for the keys the shell uses.

mod paths;
mod preferences;

pub use paths::AppPaths;
pub use preferences::{
    is_supported_language, Preferences, WindowSize, DEFAULT_LANGUAGE, LANGUAGE_KEY,
    SUPPORTED_LANGUAGES, WINDOW_SIZE_KEY,
};
