//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Deskshell - settings and theme management for the desktop shell
#[derive(Parser, Debug)]
#[command(name = "deskshell")]
#[command(version)]
#[command(about = "Manage Deskshell settings and color themes", long_about = None)]
pub struct Args {
    /// Application root holding settings/ and resources/ (default: current directory)
    #[arg(long, conflicts_with = "user")]
    pub root: Option<PathBuf>,

    /// Use the per-user config directory as the application root
    #[arg(long)]
    pub user: bool,

    /// Report malformed settings or theme files instead of discarding them
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the default settings file and themes if they are missing
    Init,

    /// Read or change raw settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Manage color themes
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// Show or change window size and language
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    /// Print every stored setting
    Show,
    /// Print one setting
    Get { key: String },
    /// Store a setting (VALUE is parsed as JSON, otherwise kept as a string)
    Set { key: String, value: String },
    /// Remove a setting
    Remove { key: String },
    /// Remove every setting
    Clear,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ThemeCommand {
    /// List available themes, marking the current one
    List,
    /// Print the current theme name
    Current,
    /// Make a theme the current one
    Select { name: String },
    /// Print a theme's colors (default: current theme)
    Show { name: Option<String> },
    /// Write colors to a theme, creating it if needed
    Save(SaveArgs),
    /// Create a theme as a copy of the current one
    Create { name: String },
    /// Delete a theme
    Delete { name: String },
    /// Rename a theme
    Rename { from: String, to: String },
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct SaveArgs {
    /// Theme name
    pub name: String,

    /// Colors as ROLE=VALUE pairs (e.g. primaryColor=#2979ff)
    #[arg(required = true, value_parser = parse_color_pair)]
    pub colors: Vec<(String, String)>,

    /// Write only the given colors instead of updating the existing palette
    #[arg(long)]
    pub replace: bool,

    /// Also make the theme current
    #[arg(long)]
    pub select: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PrefsCommand {
    /// Print theme, window size and language
    Show,
    /// Change window size and/or language
    Set {
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        language: Option<String>,
    },
}

/// Parse a `ROLE=VALUE` argument.
fn parse_color_pair(raw: &str) -> Result<(String, String), String> {
    let (role, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ROLE=VALUE, got '{raw}'"))?;
    let role = role.trim();
    if role.is_empty() {
        return Err(format!("missing color role in '{raw}'"));
    }
    Ok((role.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_pair() {
        assert_eq!(
            parse_color_pair("primaryColor=#2979ff"),
            Ok(("primaryColor".to_string(), "#2979ff".to_string()))
        );
        assert!(parse_color_pair("primaryColor").is_err());
        assert!(parse_color_pair("=#fff").is_err());
    }

    #[test]
    fn test_parse_theme_save() {
        let args = Args::try_parse_from([
            "deskshell",
            "theme",
            "save",
            "ocean",
            "primaryColor=#006994",
            "secondaryColor=#e0f7fa",
            "--select",
        ])
        .unwrap();

        match args.command {
            Command::Theme(ThemeCommand::Save(save)) => {
                assert_eq!(save.name, "ocean");
                assert_eq!(save.colors.len(), 2);
                assert!(save.select);
                assert!(!save.replace);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_theme_save_requires_colors() {
        assert!(Args::try_parse_from(["deskshell", "theme", "save", "ocean"]).is_err());
    }

    #[test]
    fn test_root_conflicts_with_user() {
        assert!(Args::try_parse_from(["deskshell", "--root", "/tmp", "--user", "init"]).is_err());
    }

    #[test]
    fn test_parse_prefs_set() {
        let args =
            Args::try_parse_from(["deskshell", "prefs", "set", "--width", "1024", "--language", "fr"])
                .unwrap();
        assert_eq!(
            args.command,
            Command::Prefs(PrefsCommand::Set {
                width: Some(1024),
                height: None,
                language: Some("fr".to_string()),
            })
        );
    }
}
