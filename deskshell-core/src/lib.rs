//! Deskshell Core Library
//!
//! This crate provides the persistence layer for Deskshell, a small desktop
//! application shell. It includes:
//!
//! - A JSON-backed key-value settings store
//! - A registry of named color themes stored as XML files
//! - Typed preferences (theme, window size, language) over the settings store
//! - File location resolution
//! - Change notifications for the presentation layer

pub mod config;
pub mod events;
pub mod settings;
pub mod themes;

// Re-exports for convenience
pub use config::{AppPaths, Preferences, WindowSize};
pub use events::{event_channel, EventReceiver, EventSender, ShellEvent};
pub use settings::{LoadMode, SettingsError, SettingsStore};
pub use themes::{Palette, ReservedTheme, ThemeError, ThemeRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
