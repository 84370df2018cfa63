//! Turns raw commit messages into structured, deduplicated and ordered
//! release notes.
//!
//! Commits flow through [`parse_commit_message`], [`classify_change_type`]
//! and [`extract_reference`] into a [`ChangelogBuilder`], which filters,
//! deduplicates and buckets them into a renderer-neutral [`Changelog`].

#[macro_use]
mod macros;
mod builder;
mod commit_type;
pub mod config;
pub mod error;
pub mod git;
mod link_style;
pub mod model;
mod parser;
mod reference;
mod sectionmap;

pub use builder::{ChangelogBuilder, ClassifiedCommit, COMPARE_URL_KEY};
pub use commit_type::{classify_change_type, normalize_type, KnownType};
pub use git::{Author, Commit};
pub use link_style::LinkStyle;
pub use model::{ChangeItem, Changelog, ChangelogSection};
pub use parser::{parse_commit_message, Footers, ParsedCommitMessage};
pub use reference::{extract_mr_number, extract_pr_number, extract_reference, Reference};
pub use sectionmap::{
    resolve_order, section_type_for, SectionMap, BREAKING_SECTION, DEFAULT_SECTION_ORDER,
    OTHER_SECTION,
};

// The default config file
const DEFAULT_CONFIG_FILE: &str = ".relnote.toml";
