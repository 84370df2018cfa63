use regex::Regex;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::parser::parse_commit_message;

/// The closed set of change types a commit can be classified as.
///
/// Displays and parses as the lowercase conventional token (`feat`, `fix`,
/// ...).
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Debug,
    Default,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum KnownType {
    Build,
    #[default]
    Chore,
    Ci,
    Docs,
    Feat,
    Fix,
    Perf,
    Refactor,
    Style,
    Test,
    Revert,
}

impl KnownType {
    /// The default title of the changelog section collecting this type.
    ///
    /// # Example
    ///
    /// ```
    /// # use relnote::KnownType;
    /// assert_eq!(KnownType::Fix.section_title(), "Bug Fixes");
    /// ```
    pub fn section_title(&self) -> &'static str {
        match self {
            KnownType::Build => "Build System",
            KnownType::Chore => "Chores",
            KnownType::Ci => "Continuous Integration",
            KnownType::Docs => "Documentation",
            KnownType::Feat => "Features",
            KnownType::Fix => "Bug Fixes",
            KnownType::Perf => "Performance Improvements",
            KnownType::Refactor => "Code Refactoring",
            KnownType::Style => "Styles",
            KnownType::Test => "Tests",
            KnownType::Revert => "Reverts",
        }
    }
}

fn alias_for(key: &str) -> &str {
    match key {
        "feature" => "feat",
        "bugfix" | "hotfix" | "bug" | "security" => "fix",
        "doc" | "documentation" => "docs",
        "performance" => "perf",
        "tests" => "test",
        "deps" => "chore",
        other => other,
    }
}

/// Normalizes a raw type token against the alias table and the known set.
///
/// Returns `None` for empty or unrecognized tokens.
///
/// # Example
///
/// ```
/// # use relnote::{normalize_type, KnownType};
/// assert_eq!(normalize_type("Feature"), Some(KnownType::Feat));
/// assert_eq!(normalize_type("wip"), None);
/// ```
pub fn normalize_type(raw: &str) -> Option<KnownType> {
    if raw.is_empty() {
        return None;
    }
    let key = raw.to_lowercase();
    alias_for(&key).parse().ok()
}

// Evaluated top to bottom, first hit wins.
fn fallback_rules() -> [(&'static Regex, KnownType); 7] {
    [
        (regex!(r"(?i)\btest(s|ing)?\b"), KnownType::Test),
        (regex!(r"(?i)\bfix(ed|es|ing)?\b|\bbug\b"), KnownType::Fix),
        (regex!(r"(?i)\bfeat(ure)?\b"), KnownType::Feat),
        (regex!(r"(?i)\bdoc(s|ument(s|ation|ed|ing)?)?"), KnownType::Docs),
        (regex!(r"(?i)\brefactor\b"), KnownType::Refactor),
        (regex!(r"(?i)\bperf(ormance)?\b|\boptimi[sz]e\b"), KnownType::Perf),
        (regex!(r"(?i)\bbuild\b"), KnownType::Build),
    ]
}

/// Guesses the change type of an arbitrary commit message.
///
/// Conventional messages yield their normalized header type; anything else
/// goes through the keyword heuristics, and `default` is returned when none
/// of them match.
///
/// # Example
///
/// ```
/// # use relnote::{classify_change_type, KnownType};
/// let ty = classify_change_type("Improve performance of data loader", KnownType::Chore);
/// assert_eq!(ty, KnownType::Perf);
/// ```
pub fn classify_change_type(message: &str, default: KnownType) -> KnownType {
    if let Some(ty) = parse_commit_message(message).commit_type {
        return ty;
    }
    let lowered = message.to_lowercase();
    fallback_rules()
        .into_iter()
        .find(|(re, _)| re.is_match(&lowered))
        .map_or(default, |(_, ty)| ty)
}
