//! Palettes and the reserved built-in themes.

use std::collections::BTreeMap;

// =============================================================================
// Color Roles
// =============================================================================

/// Color-role names used by the built-in palettes.
pub mod roles {
    pub const PRIMARY_COLOR: &str = "primaryColor";
    pub const PRIMARY_LIGHT_COLOR: &str = "primaryLightColor";
    pub const SECONDARY_COLOR: &str = "secondaryColor";
    pub const SECONDARY_LIGHT_COLOR: &str = "secondaryLightColor";
    pub const SECONDARY_DARK_COLOR: &str = "secondaryDarkColor";
    pub const PRIMARY_TEXT_COLOR: &str = "primaryTextColor";
    pub const SECONDARY_TEXT_COLOR: &str = "secondaryTextColor";

    /// All built-in roles, in the order the theme editor lists them.
    pub const ALL: [&str; 7] = [
        PRIMARY_COLOR,
        PRIMARY_LIGHT_COLOR,
        SECONDARY_COLOR,
        SECONDARY_LIGHT_COLOR,
        SECONDARY_DARK_COLOR,
        PRIMARY_TEXT_COLOR,
        SECONDARY_TEXT_COLOR,
    ];
}

// =============================================================================
// Palette
// =============================================================================

/// A mapping from color-role name to color value.
///
/// Values are stored as given; nothing checks that they are valid colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: BTreeMap<String, String>,
}

impl Palette {
    /// Create an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for a role.
    pub fn get(&self, role: &str) -> Option<&str> {
        self.colors.get(role).map(String::as_str)
    }

    /// Set the value for a role, returning the previous value.
    pub fn set(&mut self, role: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.colors.insert(role.into(), value.into())
    }

    /// Check whether a role is present.
    pub fn contains(&self, role: &str) -> bool {
        self.colors.contains_key(role)
    }

    /// Iterate over `(role, value)` pairs sorted by role.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the palette has no roles.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Palette {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            colors: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Palette {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.into_iter()
    }
}

// =============================================================================
// Reserved Themes
// =============================================================================

/// Built-in themes that are always seeded and can never be deleted or renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedTheme {
    Light,
    Dark,
}

impl ReservedTheme {
    /// Every reserved theme.
    pub const ALL: [ReservedTheme; 2] = [ReservedTheme::Light, ReservedTheme::Dark];

    /// Theme name, which is also the file stem.
    pub fn as_str(self) -> &'static str {
        match self {
            ReservedTheme::Light => "light",
            ReservedTheme::Dark => "dark",
        }
    }

    /// Match a theme name against the reserved set.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// The fixed palette written when this theme's file is missing.
    pub fn default_palette(self) -> Palette {
        let values = match self {
            ReservedTheme::Light => [
                "#2979ff", "#75a7ff", "#f5f5f5", "#ffffff", "#e6e6e6", "#000000", "#000000",
            ],
            ReservedTheme::Dark => [
                "#1a237e", "#534bae", "#212121", "#484848", "#000000", "#ffffff", "#ffffff",
            ],
        };

        roles::ALL.into_iter().zip(values).collect()
    }
}

impl std::fmt::Display for ReservedTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
