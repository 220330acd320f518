//! Shell state and command handling.
//!
//! `Shell` owns both stores and plays the main window's part: after every
//! command it drains change notifications and reapplies the active theme.

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use deskshell_core::events::drain;
use deskshell_core::themes::contrasting_text;
use deskshell_core::{
    event_channel, AppPaths, EventReceiver, LoadMode, Palette, Preferences, SettingsStore,
    ThemeRegistry,
};

use crate::cli::{Command, PrefsCommand, SaveArgs, SettingsCommand, ThemeCommand};

// =============================================================================
// Outcome
// =============================================================================

/// Result of a command that ran without an I/O failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The stores declined the request (unknown theme, reserved name, ...).
    Refused(String),
}

// =============================================================================
// Shell
// =============================================================================

/// Both stores plus the receiving end of their change notifications.
pub struct Shell {
    settings: SettingsStore,
    registry: ThemeRegistry,
    events: EventReceiver,
    applied_theme: Option<String>,
}

impl Shell {
    /// Open the stores under `paths`.
    pub fn open(paths: &AppPaths, mode: LoadMode) -> Result<Self> {
        let settings_file = paths.settings_file();
        let settings = SettingsStore::open_with_mode(&settings_file, mode)
            .with_context(|| format!("Failed to load settings from {}", settings_file.display()))?;

        let (tx, rx) = event_channel();
        let registry = ThemeRegistry::open(paths.themes_dir(), &settings)
            .context("Failed to open theme directory")?
            .with_events(tx);

        let mut shell = Self {
            settings,
            registry,
            events: rx,
            applied_theme: None,
        };
        shell.apply_theme()?;
        Ok(shell)
    }

    /// Seed the default settings file, then open the stores.
    pub fn init(paths: &AppPaths, mode: LoadMode) -> Result<Self> {
        paths.ensure_dirs_exist()?;
        let settings_file = paths.settings_file();
        if SettingsStore::ensure_default_file(&settings_file)? {
            info!(path = %settings_file.display(), "Created default settings");
        }
        Self::open(paths, mode)
    }

    /// Theme most recently applied to the (virtual) main window.
    pub fn applied_theme(&self) -> Option<&str> {
        self.applied_theme.as_deref()
    }

    /// Run one command, writing user-facing output to `out`.
    pub fn run(&mut self, command: Command, out: &mut dyn Write) -> Result<Outcome> {
        let outcome = match command {
            Command::Init => {
                writeln!(out, "Settings: {}", self.settings.path().display())?;
                writeln!(out, "Themes:   {}", self.registry.themes_dir().display())?;
                Outcome::Done
            }
            Command::Settings(cmd) => self.run_settings(cmd, out)?,
            Command::Theme(cmd) => self.run_theme(cmd, out)?,
            Command::Prefs(cmd) => self.run_prefs(cmd, out)?,
        };

        self.apply_pending_events()?;
        Ok(outcome)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    fn run_settings(&mut self, command: SettingsCommand, out: &mut dyn Write) -> Result<Outcome> {
        match command {
            SettingsCommand::Show => {
                for (key, value) in self.settings.iter() {
                    writeln!(out, "{key} = {value}")?;
                }
            }
            SettingsCommand::Get { key } => match self.settings.get(&key) {
                Some(value) => writeln!(out, "{}", serde_json::to_string_pretty(value)?)?,
                None => return Ok(Outcome::Refused(format!("Setting '{key}' is not set."))),
            },
            SettingsCommand::Set { key, value } => {
                let value = parse_setting_value(&value);
                self.settings.set(key, value)?;
            }
            SettingsCommand::Remove { key } => self.settings.remove(&key)?,
            SettingsCommand::Clear => self.settings.clear()?,
        }
        Ok(Outcome::Done)
    }

    // =========================================================================
    // Themes
    // =========================================================================

    fn run_theme(&mut self, command: ThemeCommand, out: &mut dyn Write) -> Result<Outcome> {
        match command {
            ThemeCommand::List => {
                let current = self.registry.current_theme();
                for name in self.registry.available_themes()? {
                    let marker = if name == current { "*" } else { " " };
                    writeln!(out, "{marker} {name}")?;
                }
            }
            ThemeCommand::Current => {
                writeln!(out, "{}", self.registry.current_theme())?;
            }
            ThemeCommand::Select { name } => {
                if !self.registry.set_theme(&mut self.settings, &name)? {
                    return Ok(Outcome::Refused(format!("Unknown theme '{name}'.")));
                }
            }
            ThemeCommand::Show { name } => {
                let name = name.unwrap_or_else(|| self.registry.current_theme().to_string());
                if !self.registry.contains(&name) {
                    return Ok(Outcome::Refused(format!("Unknown theme '{name}'.")));
                }
                write_palette(out, &self.registry.theme_colors(&name)?)?;
            }
            ThemeCommand::Save(args) => return self.save_theme(args, out),
            ThemeCommand::Create { name } => {
                if !self.registry.create_theme(&name)? {
                    return Ok(Outcome::Refused(format!(
                        "A theme named '{name}' already exists."
                    )));
                }
                writeln!(out, "Theme '{name}' has been created.")?;
            }
            ThemeCommand::Delete { name } => {
                if ThemeRegistry::is_reserved(&name) {
                    return Ok(Outcome::Refused("Cannot delete default themes.".to_string()));
                }
                if !self.registry.delete_theme(&name)? {
                    return Ok(Outcome::Refused(format!("Failed to delete theme '{name}'.")));
                }
                writeln!(out, "Theme '{name}' has been deleted.")?;
            }
            ThemeCommand::Rename { from, to } => {
                if !self.registry.rename_theme(&mut self.settings, &from, &to)? {
                    return Ok(Outcome::Refused(format!(
                        "Cannot rename theme '{from}' to '{to}'."
                    )));
                }
                writeln!(out, "Theme '{from}' has been renamed to '{to}'.")?;
            }
        }
        Ok(Outcome::Done)
    }

    fn save_theme(&mut self, args: SaveArgs, out: &mut dyn Write) -> Result<Outcome> {
        let mut colors = if args.replace {
            Palette::new()
        } else {
            self.registry.theme_colors(&args.name)?
        };
        for (role, value) in args.colors {
            colors.set(role, value);
        }

        self.registry.save_theme(&args.name, &colors)?;
        if args.select && !self.registry.set_theme(&mut self.settings, &args.name)? {
            return Ok(Outcome::Refused(format!(
                "Theme '{}' was saved but could not be selected.",
                args.name
            )));
        }

        writeln!(out, "Theme '{}' has been saved.", args.name)?;
        Ok(Outcome::Done)
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    fn run_prefs(&mut self, command: PrefsCommand, out: &mut dyn Write) -> Result<Outcome> {
        match command {
            PrefsCommand::Show => {
                let prefs = Preferences::load(&self.settings);
                writeln!(out, "theme       {}", self.registry.current_theme())?;
                writeln!(out, "window_size {}", prefs.window_size)?;
                writeln!(out, "language    {}", prefs.language)?;
            }
            PrefsCommand::Set {
                width,
                height,
                language,
            } => {
                let mut prefs = Preferences::load(&self.settings);
                if let Some(width) = width {
                    prefs.window_size.width = width;
                }
                if let Some(height) = height {
                    prefs.window_size.height = height;
                }
                if let Some(language) = language {
                    prefs.language = language;
                }
                prefs.validate();
                prefs.save(&mut self.settings)?;
                writeln!(out, "window_size {}", prefs.window_size)?;
                writeln!(out, "language    {}", prefs.language)?;
            }
        }
        Ok(Outcome::Done)
    }

    // =========================================================================
    // Styling
    // =========================================================================

    fn apply_pending_events(&mut self) -> Result<()> {
        let events = drain(&mut self.events);
        if events.is_empty() {
            return Ok(());
        }
        for event in &events {
            debug!(?event, theme = event.theme_name(), "Shell event");
        }
        self.apply_theme()
    }

    /// Resolve the active theme and (re)apply it.
    fn apply_theme(&mut self) -> Result<()> {
        match self.registry.resolve_active_theme()? {
            Some(theme) => {
                let colors = self.registry.theme_colors(&theme)?;
                info!(theme = %theme, roles = colors.len(), "Applying theme");
                self.applied_theme = Some(theme);
            }
            None => {
                warn!("No themes available to apply");
                self.applied_theme = None;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Interpret a command-line value as JSON, falling back to a plain string.
fn parse_setting_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn write_palette(out: &mut dyn Write, colors: &Palette) -> Result<()> {
    let width = colors.iter().map(|(role, _)| role.len()).max().unwrap_or(0);
    for (role, value) in colors.iter() {
        writeln!(
            out,
            "{role:<width$}  {value:<9}  text: {}",
            contrasting_text(value)
        )?;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, AppPaths, Shell) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::under(temp_dir.path());
        let shell = Shell::init(&paths, LoadMode::Lenient).unwrap();
        (temp_dir, paths, shell)
    }

    fn run(shell: &mut Shell, command: Command) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = shell.run(command, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_init_seeds_settings_and_themes() {
        let (_temp, paths, shell) = setup();

        assert!(paths.settings_file().is_file());
        assert!(paths.themes_dir().join("light.xml").is_file());
        assert!(paths.themes_dir().join("dark.xml").is_file());
        // The seed file selects dark
        assert_eq!(shell.applied_theme(), Some("dark"));
    }

    #[test]
    fn test_open_without_init_uses_light() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::under(temp_dir.path());
        let shell = Shell::open(&paths, LoadMode::Lenient).unwrap();

        assert_eq!(shell.applied_theme(), Some("light"));
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_settings_set_parses_json_values() {
        let (_temp, paths, mut shell) = setup();

        run(
            &mut shell,
            Command::Settings(SettingsCommand::Set {
                key: "window_size".to_string(),
                value: r#"{"width": 1024, "height": 768}"#.to_string(),
            }),
        );
        run(
            &mut shell,
            Command::Settings(SettingsCommand::Set {
                key: "nickname".to_string(),
                value: "not json".to_string(),
            }),
        );

        let store = SettingsStore::open(paths.settings_file()).unwrap();
        assert_eq!(
            store.get("window_size"),
            Some(&json!({"width": 1024, "height": 768}))
        );
        assert_eq!(store.get_str("nickname"), Some("not json"));
    }

    #[test]
    fn test_settings_get_missing_is_refused() {
        let (_temp, _paths, mut shell) = setup();
        let (outcome, _) = run(
            &mut shell,
            Command::Settings(SettingsCommand::Get {
                key: "missing".to_string(),
            }),
        );
        assert!(matches!(outcome, Outcome::Refused(_)));
    }

    #[test]
    fn test_theme_list_marks_current() {
        let (_temp, _paths, mut shell) = setup();
        let (outcome, output) = run(&mut shell, Command::Theme(ThemeCommand::List));

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(output, "* dark\n  light\n");
    }

    #[test]
    fn test_theme_select_unknown_is_refused() {
        let (_temp, _paths, mut shell) = setup();
        let (outcome, _) = run(
            &mut shell,
            Command::Theme(ThemeCommand::Select {
                name: "nonexistent".to_string(),
            }),
        );

        assert_eq!(outcome, Outcome::Refused("Unknown theme 'nonexistent'.".to_string()));
        assert_eq!(shell.applied_theme(), Some("dark"));
    }

    #[test]
    fn test_theme_select_reapplies_styling() {
        let (_temp, _paths, mut shell) = setup();
        run(
            &mut shell,
            Command::Theme(ThemeCommand::Select {
                name: "light".to_string(),
            }),
        );
        assert_eq!(shell.applied_theme(), Some("light"));
    }

    #[test]
    fn test_theme_save_merges_and_selects() {
        let (_temp, paths, mut shell) = setup();
        run(
            &mut shell,
            Command::Theme(ThemeCommand::Create {
                name: "ocean".to_string(),
            }),
        );
        let (outcome, _) = run(
            &mut shell,
            Command::Theme(ThemeCommand::Save(SaveArgs {
                name: "ocean".to_string(),
                colors: vec![("primaryColor".to_string(), "#006994".to_string())],
                replace: false,
                select: true,
            })),
        );

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(shell.applied_theme(), Some("ocean"));

        let settings = SettingsStore::open(paths.settings_file()).unwrap();
        let registry = ThemeRegistry::open(paths.themes_dir(), &settings).unwrap();
        let colors = registry.theme_colors("ocean").unwrap();
        assert_eq!(colors.get("primaryColor"), Some("#006994"));
        // Copied from the dark palette, untouched by the save
        assert_eq!(colors.get("secondaryColor"), Some("#212121"));
    }

    #[test]
    fn test_theme_save_replace_writes_only_given_colors() {
        let (_temp, _paths, mut shell) = setup();
        run(
            &mut shell,
            Command::Theme(ThemeCommand::Save(SaveArgs {
                name: "mono".to_string(),
                colors: vec![("primaryColor".to_string(), "#000000".to_string())],
                replace: true,
                select: false,
            })),
        );

        let (_, output) = run(
            &mut shell,
            Command::Theme(ThemeCommand::Show {
                name: Some("mono".to_string()),
            }),
        );
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("primaryColor"));
        assert!(output.contains("text: white"));
    }

    #[test]
    fn test_theme_delete_reserved_is_refused() {
        let (_temp, paths, mut shell) = setup();
        let (outcome, _) = run(
            &mut shell,
            Command::Theme(ThemeCommand::Delete {
                name: "dark".to_string(),
            }),
        );

        assert_eq!(
            outcome,
            Outcome::Refused("Cannot delete default themes.".to_string())
        );
        assert!(paths.themes_dir().join("dark.xml").is_file());
    }

    #[test]
    fn test_deleting_applied_theme_falls_back() {
        let (_temp, _paths, mut shell) = setup();
        run(
            &mut shell,
            Command::Theme(ThemeCommand::Create {
                name: "custom".to_string(),
            }),
        );
        run(
            &mut shell,
            Command::Theme(ThemeCommand::Select {
                name: "custom".to_string(),
            }),
        );
        assert_eq!(shell.applied_theme(), Some("custom"));

        run(
            &mut shell,
            Command::Theme(ThemeCommand::Delete {
                name: "custom".to_string(),
            }),
        );
        assert_eq!(shell.applied_theme(), Some("dark"));
    }

    #[test]
    fn test_rename_applied_theme_follows_selection() {
        let (_temp, paths, mut shell) = setup();
        run(
            &mut shell,
            Command::Theme(ThemeCommand::Create {
                name: "draft".to_string(),
            }),
        );
        run(
            &mut shell,
            Command::Theme(ThemeCommand::Select {
                name: "draft".to_string(),
            }),
        );

        let (outcome, _) = run(
            &mut shell,
            Command::Theme(ThemeCommand::Rename {
                from: "draft".to_string(),
                to: "final".to_string(),
            }),
        );

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(shell.applied_theme(), Some("final"));
        let store = SettingsStore::open(paths.settings_file()).unwrap();
        assert_eq!(store.get_str("theme"), Some("final"));
    }

    #[test]
    fn test_prefs_set_clamps_and_persists() {
        let (_temp, paths, mut shell) = setup();
        let (_, output) = run(
            &mut shell,
            Command::Prefs(PrefsCommand::Set {
                width: Some(100),
                height: Some(900),
                language: Some("de".to_string()),
            }),
        );
        assert!(output.contains("400x900"));

        let store = SettingsStore::open(paths.settings_file()).unwrap();
        let prefs = Preferences::load(&store);
        assert_eq!(prefs.window_size.width, 400);
        assert_eq!(prefs.window_size.height, 900);
        assert_eq!(prefs.language, "de");
        assert_eq!(prefs.theme, "dark");
    }

    #[test]
    fn test_strict_mode_reports_corrupt_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::under(temp_dir.path());
        paths.ensure_dirs_exist().unwrap();
        std::fs::write(paths.settings_file(), "{ not json").unwrap();

        assert!(Shell::open(&paths, LoadMode::Strict).is_err());
        assert!(Shell::open(&paths, LoadMode::Lenient).is_ok());
    }
}
