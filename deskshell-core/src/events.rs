//! Change notifications for the presentation layer.
//!
//! The theme registry reports every successful change here so whoever owns
//! the main window can reapply styling.

use tokio::sync::mpsc;

// =============================================================================
// Events
// =============================================================================

/// Events sent from the stores to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// A palette file was written (created or overwritten).
    ThemeSaved { name: String },

    /// The active theme changed and was persisted to settings.
    ThemeSelected { name: String },

    /// A theme file was removed.
    ThemeDeleted { name: String },

    /// A theme file was moved to a new name.
    ThemeRenamed { from: String, to: String },
}

impl ShellEvent {
    /// Name of the theme this event is about (the new name for renames).
    pub fn theme_name(&self) -> &str {
        match self {
            ShellEvent::ThemeSaved { name }
            | ShellEvent::ThemeSelected { name }
            | ShellEvent::ThemeDeleted { name } => name,
            ShellEvent::ThemeRenamed { to, .. } => to,
        }
    }
}

// =============================================================================
// Channel Types
// =============================================================================

/// Sender for shell events.
pub type EventSender = mpsc::UnboundedSender<ShellEvent>;

/// Receiver for shell events.
pub type EventReceiver = mpsc::UnboundedReceiver<ShellEvent>;

/// Create an event channel for store change notifications.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Drain every event currently queued without blocking.
pub fn drain(rx: &mut EventReceiver) -> Vec<ShellEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
