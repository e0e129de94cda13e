//! registry::types
//!
//! Remote model types returned by the mod registry.
//!
//! These mirror the registry's JSON (camelCase keys) and are never
//! persisted. Only the fields the engine and the CLI read are modeled;
//! everything else in a response is ignored.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::core::types::Slug;

/// A mod as described by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mod {
    pub id: u32,
    pub game_id: u32,
    pub name: String,
    pub slug: Slug,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub links: ModLinks,
    /// Reported as a JSON number that is not always integral.
    #[serde(default)]
    pub download_count: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModLinks {
    #[serde(default)]
    pub website_url: Option<String>,
}

/// One downloadable file of a mod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModFile {
    pub id: u32,
    pub mod_id: u32,
    #[serde(default)]
    pub display_name: String,
    pub file_name: String,
    /// Upload date; doubles as the version token stored in the lock file.
    pub file_date: String,
    #[serde(default)]
    pub file_length: u64,
    /// Withheld by the registry for mods that opt out of third-party
    /// distribution.
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub hashes: Vec<FileHash>,
    #[serde(default, rename = "dependencies")]
    pub relations: Vec<Relation>,
}

impl ModFile {
    /// Ids of mods that must be installed alongside this file.
    ///
    /// Order follows the registry; a mod listed twice is returned once.
    pub fn required_mod_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = Vec::new();
        for relation in self.relations.iter().filter(|r| r.kind.is_mandatory()) {
            if !ids.contains(&relation.mod_id) {
                ids.push(relation.mod_id);
            }
        }
        ids
    }

    /// Ids of mods this file declares itself incompatible with.
    pub fn incompatible_mod_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.relations
            .iter()
            .filter(|r| r.kind == RelationKind::Incompatible)
            .map(|r| r.mod_id)
    }

    /// The SHA-1 digest published by the registry, if any.
    pub fn sha1(&self) -> Option<&str> {
        self.hashes
            .iter()
            .find(|h| h.algo == HashAlgo::Sha1)
            .map(|h| h.value.as_str())
    }

    fn recency_key(&self) -> (Option<DateTime<FixedOffset>>, &str, u32) {
        let parsed = DateTime::parse_from_rfc3339(&self.file_date).ok();
        (parsed, &self.file_date, self.id)
    }
}

/// Order two files newest first.
///
/// Every file is ranked by the same key: its parsed RFC 3339 instant (so
/// differing offsets and fractional-second precision do not matter), then
/// the raw date string, then the id. Files whose date does not parse sort
/// after every file whose date does.
pub fn newest_first(a: &ModFile, b: &ModFile) -> Ordering {
    b.recency_key().cmp(&a.recency_key())
}

/// A directed relation from a file to another mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub mod_id: u32,
    #[serde(rename = "relationType")]
    pub kind: RelationKind,
}

/// Relation kinds, numbered as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RelationKind {
    EmbeddedLibrary,
    OptionalDependency,
    RequiredDependency,
    Tool,
    Incompatible,
    Include,
}

impl RelationKind {
    /// Kinds that must be present for the file to work.
    pub fn is_mandatory(self) -> bool {
        matches!(
            self,
            RelationKind::RequiredDependency | RelationKind::EmbeddedLibrary
        )
    }
}

impl TryFrom<u8> for RelationKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RelationKind::EmbeddedLibrary),
            2 => Ok(RelationKind::OptionalDependency),
            3 => Ok(RelationKind::RequiredDependency),
            4 => Ok(RelationKind::Tool),
            5 => Ok(RelationKind::Incompatible),
            6 => Ok(RelationKind::Include),
            other => Err(format!("unknown relation type {}", other)),
        }
    }
}

impl From<RelationKind> for u8 {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::EmbeddedLibrary => 1,
            RelationKind::OptionalDependency => 2,
            RelationKind::RequiredDependency => 3,
            RelationKind::Tool => 4,
            RelationKind::Incompatible => 5,
            RelationKind::Include => 6,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationKind::EmbeddedLibrary => "embedded library",
            RelationKind::OptionalDependency => "optional dependency",
            RelationKind::RequiredDependency => "required dependency",
            RelationKind::Tool => "tool",
            RelationKind::Incompatible => "incompatible",
            RelationKind::Include => "include",
        };
        write!(f, "{}", name)
    }
}

/// A published digest of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHash {
    pub value: String,
    pub algo: HashAlgo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum HashAlgo {
    Sha1,
    Md5,
    Other(u8),
}

impl From<u8> for HashAlgo {
    fn from(value: u8) -> Self {
        match value {
            1 => HashAlgo::Sha1,
            2 => HashAlgo::Md5,
            other => HashAlgo::Other(other),
        }
    }
}

impl From<HashAlgo> for u8 {
    fn from(algo: HashAlgo) -> Self {
        match algo {
            HashAlgo::Sha1 => 1,
            HashAlgo::Md5 => 2,
            HashAlgo::Other(other) => other,
        }
    }
}
