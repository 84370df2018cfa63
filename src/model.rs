//! The renderer-neutral changelog model.
//!
//! Values here are built once by [`ChangelogBuilder`](crate::ChangelogBuilder)
//! and only read afterwards. Renderers decide how they look.

use indexmap::IndexMap;
use serde::Serialize;
use time::{macros::format_description, OffsetDateTime};

use crate::{commit_type::KnownType, error::Result, sectionmap::BREAKING_SECTION};

/// String keyed map preserving insertion order
pub type StringMap = IndexMap<String, String>;

/// A single entry of the release notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeItem {
    pub title: String,
    #[serde(rename = "type")]
    pub change_type: KnownType,
    pub scope: Option<String>,
    pub breaking: bool,
    pub summary: String,
    pub details: Option<String>,
    /// Reference kind to link or plain text, e.g. `"pr"`, `"mr"`, `"commit"`
    pub references: StringMap,
    pub metadata: StringMap,
}

/// A titled, ordered bucket of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogSection {
    pub title: String,
    pub items: Vec<ChangeItem>,
}

impl ChangelogSection {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The release notes of one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Changelog {
    pub version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub sections: Vec<ChangelogSection>,
    /// Passthrough values for renderers, e.g. `"compare_url"`
    pub metadata: StringMap,
}

impl Changelog {
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(ChangelogSection::is_empty)
    }

    /// Looks up a section by its title.
    pub fn section(&self, title: &str) -> Option<&ChangelogSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// The items of the breaking changes section.
    pub fn breaking_items(&self) -> impl Iterator<Item = &ChangeItem> {
        self.section(BREAKING_SECTION)
            .into_iter()
            .flat_map(|s| s.items.iter())
    }

    /// The release date as `YYYY-MM-DD`.
    pub fn formatted_date(&self) -> Result<String> {
        self.date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(Into::into)
    }
}
