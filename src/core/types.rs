//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Slug`] - Validated registry slug identifying a mod
//! - [`GameVersion`] - Dotted numeric Minecraft version
//! - [`ModLoader`] - Supported mod loaders
//! - [`ModTarget`] - A user-supplied `<id|slug>` argument
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so a hand-edited lock file with a bad key fails
//! at load time instead of deep inside a resolution.
//!
//! # Examples
//!
//! ```
//! use tmod::core::types::{GameVersion, ModTarget, Slug};
//!
//! let slug = Slug::new("waystones").unwrap();
//! let version = GameVersion::new("1.20.1").unwrap();
//!
//! assert!(Slug::new("has space").is_err());
//! assert!(GameVersion::new("1.x").is_err());
//! assert_eq!(ModTarget::parse("238222").unwrap(), ModTarget::Id(238222));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid slug: {0}")]
    InvalidSlug(String),

    #[error("invalid game version: {0}")]
    InvalidGameVersion(String),

    #[error("unknown mod loader '{0}', must be one of: forge, fabric, quilt, neoforge")]
    UnknownLoader(String),
}

/// A validated mod slug.
///
/// Slugs are the human-readable identifiers the registry assigns to a mod
/// within its category. The rules are deliberately loose (the registry is
/// the authority) but exclude anything that cannot appear in a URL path
/// segment or a TOML bare key:
/// - Cannot be empty
/// - Only ASCII letters, digits, `-`, `_` and `.`
/// - Cannot start with `-` or `.`
///
/// # Example
///
/// ```
/// use tmod::core::types::Slug;
///
/// let slug = Slug::new("jei").unwrap();
/// assert_eq!(slug.as_str(), "jei");
///
/// assert!(Slug::new("").is_err());
/// assert!(Slug::new("-flag").is_err());
/// assert!(Slug::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Create a new validated slug.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSlug` if the text is not a usable slug.
    pub fn new(slug: impl Into<String>) -> Result<Self, TypeError> {
        let slug = slug.into();
        Self::validate(&slug)?;
        Ok(Self(slug))
    }

    fn validate(slug: &str) -> Result<(), TypeError> {
        if slug.is_empty() {
            return Err(TypeError::InvalidSlug("slug cannot be empty".into()));
        }

        if slug.starts_with('-') || slug.starts_with('.') {
            return Err(TypeError::InvalidSlug(format!(
                "'{}' cannot start with '-' or '.'",
                slug
            )));
        }

        if let Some(bad) = slug
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(TypeError::InvalidSlug(format!(
                "'{}' contains invalid character '{}'",
                slug, bad
            )));
        }

        Ok(())
    }

    /// Get the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl FromStr for Slug {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A Minecraft game version such as `1.20.1`.
///
/// At least two dot-separated components, each a base-10 integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameVersion(String);

impl GameVersion {
    /// Create a new validated game version.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidGameVersion` for anything that is not a
    /// dotted numeric version.
    pub fn new(version: impl Into<String>) -> Result<Self, TypeError> {
        let version = version.into();
        let components: Vec<&str> = version.split('.').collect();

        if components.len() < 2 {
            return Err(TypeError::InvalidGameVersion(format!(
                "'{}' needs at least a major and minor component",
                version
            )));
        }

        if components
            .iter()
            .any(|c| c.is_empty() || !c.chars().all(|ch| ch.is_ascii_digit()))
        {
            return Err(TypeError::InvalidGameVersion(format!(
                "'{}' must contain only numbers separated by dots",
                version
            )));
        }

        Ok(Self(version))
    }

    /// Get the version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for GameVersion {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GameVersion> for String {
    fn from(version: GameVersion) -> Self {
        version.0
    }
}

impl FromStr for GameVersion {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Mod loaders a repository can target.
///
/// Persisted by name (`"Forge"`); the registry identifies loaders by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModLoader {
    Forge,
    Fabric,
    Quilt,
    NeoForge,
}

impl ModLoader {
    /// Every loader, in the order offered by `tmod init`.
    pub const ALL: [ModLoader; 4] = [
        ModLoader::Forge,
        ModLoader::Fabric,
        ModLoader::Quilt,
        ModLoader::NeoForge,
    ];

    /// The registry's numeric `modLoaderType`.
    pub fn api_id(self) -> u8 {
        match self {
            ModLoader::Forge => 1,
            ModLoader::Fabric => 4,
            ModLoader::Quilt => 5,
            ModLoader::NeoForge => 6,
        }
    }
}

impl fmt::Display for ModLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModLoader::Forge => write!(f, "Forge"),
            ModLoader::Fabric => write!(f, "Fabric"),
            ModLoader::Quilt => write!(f, "Quilt"),
            ModLoader::NeoForge => write!(f, "NeoForge"),
        }
    }
}

impl FromStr for ModLoader {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forge" => Ok(ModLoader::Forge),
            "fabric" => Ok(ModLoader::Fabric),
            "quilt" => Ok(ModLoader::Quilt),
            "neoforge" => Ok(ModLoader::NeoForge),
            _ => Err(TypeError::UnknownLoader(s.to_string())),
        }
    }
}

/// What the user asked for on the command line: a numeric id or a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModTarget {
    Id(u32),
    Slug(Slug),
}

impl ModTarget {
    /// Parse `<id|slug>`. All-digit input is an id.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = input.parse::<u32>() {
                return Ok(ModTarget::Id(id));
            }
        }
        Slug::new(input).map(ModTarget::Slug)
    }
}

impl fmt::Display for ModTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModTarget::Id(id) => write!(f, "#{}", id),
            ModTarget::Slug(slug) => write!(f, "{}", slug),
        }
    }
}
