use std::collections::HashSet;

use log::{debug, trace, warn};
use regex::Regex;
use time::OffsetDateTime;

use crate::{
    commit_type::{classify_change_type, normalize_type, KnownType},
    error::Result,
    git::Commit,
    link_style::LinkStyle,
    model::{ChangeItem, Changelog, StringMap},
    parser::{parse_commit_message, ParsedCommitMessage},
    reference::{extract_reference, Reference},
    sectionmap::{resolve_order, SectionMap, DEFAULT_SECTION_ORDER},
};

/// Metadata key of the compare link passed through to renderers
pub const COMPARE_URL_KEY: &str = "compare_url";

/// A commit paired with everything the grouping stages need to know about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCommit {
    pub commit: Commit,
    pub parsed: ParsedCommitMessage,
    /// The header type, or the heuristic guess for non-conventional messages
    pub change_type: KnownType,
    pub reference: Option<Reference>,
}

impl ClassifiedCommit {
    /// Parses, classifies and (unless `with_references` is false) extracts the
    /// change request reference of a commit.
    pub fn new(commit: Commit, default_type: KnownType, with_references: bool) -> Self {
        let parsed = parse_commit_message(commit.message.as_str());
        let change_type = parsed
            .commit_type
            .unwrap_or_else(|| classify_change_type(&commit.message, default_type));
        let reference = if with_references {
            extract_reference(&commit.message)
        } else {
            None
        };
        ClassifiedCommit {
            commit,
            parsed,
            change_type,
            reference,
        }
    }
}

/// The base struct used to set options and assemble a `Changelog` from an
/// ordered list of commits.
///
/// # Example
///
/// ```
/// # use relnote::{Author, ChangelogBuilder, Commit};
/// let commits = vec![
///     Commit::new("a1", Author::new("Ann", "ann@example.com"), "feat(ui): dark mode (#3)"),
///     Commit::new("b2", Author::new("Bob", "bob@example.com"), "fix: crash on start"),
/// ];
///
/// let changelog = ChangelogBuilder::new().version("1.4.0").build(commits);
///
/// assert_eq!(changelog.sections[0].title, "Features");
/// assert_eq!(changelog.sections[1].items[0].title, "crash on start");
/// ```
#[derive(Debug, Clone)]
pub struct ChangelogBuilder {
    /// The version label of the release (Defaults to `Unreleased`)
    pub version: String,
    /// The release date (Defaults to now)
    pub date: OffsetDateTime,
    /// The repository used for the base of hyper-links
    pub repo: Option<String>,
    /// The link style used for change request and commit hyper-links
    pub link_style: LinkStyle,
    /// Canonical section order, empty for first-seen order
    pub section_order: Vec<KnownType>,
    /// Types to keep, empty to keep all
    pub include_types: Vec<KnownType>,
    /// Scopes whose commits are dropped
    pub exclude_scopes: HashSet<String>,
    /// Keeps only commits whose `Name <email>` identity matches
    pub author_filter: Option<Regex>,
    /// Whether items carry their scope (Defaults to `true`)
    pub include_scopes: bool,
    pub no_merge_commits: bool,
    /// Skips reference extraction, and with it deduplication
    pub no_prs: bool,
    /// The type assumed when a message gives no hint (Defaults to `chore`)
    pub default_type: KnownType,
    compare_refs: Option<(String, String)>,
    /// Passed through to the changelog metadata
    pub metadata: StringMap,
}

impl Default for ChangelogBuilder {
    fn default() -> Self {
        debug!("Creating default builder with ChangelogBuilder::default()");
        ChangelogBuilder {
            version: "Unreleased".to_owned(),
            date: OffsetDateTime::now_utc(),
            repo: None,
            link_style: LinkStyle::Github,
            section_order: DEFAULT_SECTION_ORDER.to_vec(),
            include_types: Vec::new(),
            exclude_scopes: HashSet::new(),
            author_filter: None,
            include_scopes: true,
            no_merge_commits: false,
            no_prs: false,
            default_type: KnownType::Chore,
            compare_refs: None,
            metadata: StringMap::new(),
        }
    }
}

impl ChangelogBuilder {
    pub fn new() -> Self {
        ChangelogBuilder::default()
    }

    /// Sets the version label for the release
    ///
    /// # Example
    ///
    /// ```
    /// # use relnote::ChangelogBuilder;
    /// let builder = ChangelogBuilder::new().version("v0.2.1-beta3");
    /// ```
    pub fn version<S: Into<String>>(mut self, v: S) -> ChangelogBuilder {
        self.version = v.into();
        self
    }

    pub fn date(mut self, date: OffsetDateTime) -> ChangelogBuilder {
        self.date = date;
        self
    }

    /// Sets the repository used for the base of hyper-links
    ///
    /// **NOTE:** Leave off the trailing `.git`
    pub fn repository<S: Into<String>>(mut self, r: S) -> ChangelogBuilder {
        self.repo = Some(r.into());
        self
    }

    pub fn link_style(mut self, l: LinkStyle) -> ChangelogBuilder {
        self.link_style = l;
        self
    }

    /// Sets the canonical section order from type tokens, aliases or section
    /// titles. Unrecognized entries are ignored; an empty list emits sections
    /// in the order their first item appears.
    ///
    /// # Example
    ///
    /// ```
    /// # use relnote::{ChangelogBuilder, KnownType};
    /// let builder = ChangelogBuilder::new().section_order(["fix", "Features"]);
    /// assert_eq!(builder.section_order, [KnownType::Fix, KnownType::Feat]);
    /// ```
    pub fn section_order<I, S>(mut self, order: I) -> ChangelogBuilder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.section_order = resolve_order(order);
        self
    }

    /// Restricts the changelog to the given types. Aliases are accepted and
    /// unrecognized entries are ignored.
    pub fn include_types<I, S>(mut self, types: I) -> ChangelogBuilder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include_types.clear();
        for raw in types {
            match normalize_type(raw.as_ref().trim()) {
                Some(ty) if !self.include_types.contains(&ty) => self.include_types.push(ty),
                Some(_) => {}
                None => warn!("ignoring unknown type {:?} in include-types", raw.as_ref()),
            }
        }
        self
    }

    pub fn exclude_scopes<I, S>(mut self, scopes: I) -> ChangelogBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the author filter, a regex searched in each commit's
    /// `Name <email>` identity. An empty pattern clears the filter.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthorFilter` when the pattern is not a valid regex.
    pub fn author_filter<S: AsRef<str>>(mut self, pattern: S) -> Result<ChangelogBuilder> {
        self.author_filter = match pattern.as_ref() {
            "" => None,
            p => Some(Regex::new(p)?),
        };
        Ok(self)
    }

    pub fn include_scopes(mut self, include: bool) -> ChangelogBuilder {
        self.include_scopes = include;
        self
    }

    pub fn no_merge_commits(mut self, no_merges: bool) -> ChangelogBuilder {
        self.no_merge_commits = no_merges;
        self
    }

    pub fn no_prs(mut self, no_prs: bool) -> ChangelogBuilder {
        self.no_prs = no_prs;
        self
    }

    pub fn default_type(mut self, ty: KnownType) -> ChangelogBuilder {
        self.default_type = ty;
        self
    }

    /// Sets the compare link passed through to renderers verbatim. Takes
    /// precedence over `ChangelogBuilder::compare`.
    pub fn compare_url<S: Into<String>>(mut self, url: S) -> ChangelogBuilder {
        self.metadata.insert(COMPARE_URL_KEY.to_owned(), url.into());
        self
    }

    /// Derives the compare link between two refs from the repository and
    /// link style when the changelog is built.
    pub fn compare<F: Into<String>, T: Into<String>>(mut self, from: F, to: T) -> ChangelogBuilder {
        self.compare_refs = Some((from.into(), to.into()));
        self
    }

    pub fn metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> ChangelogBuilder {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Parses and classifies raw commits, keeping their order.
    pub fn classify<I: IntoIterator<Item = Commit>>(&self, commits: I) -> Vec<ClassifiedCommit> {
        commits
            .into_iter()
            .map(|c| ClassifiedCommit::new(c, self.default_type, !self.no_prs))
            .collect()
    }

    /// Builds the changelog from commits in traversal order.
    pub fn build<I: IntoIterator<Item = Commit>>(&self, commits: I) -> Changelog {
        self.build_classified(self.classify(commits))
    }

    /// Builds the changelog from already classified commits in traversal
    /// order: filter, deduplicate by reference, then bucket into sections.
    ///
    /// Never fails; a fully filtered list yields a changelog without sections.
    pub fn build_classified(&self, commits: Vec<ClassifiedCommit>) -> Changelog {
        let total = commits.len();
        let kept = self.filter(commits);
        let filtered = kept.len();
        let kept = self.dedup(kept);
        debug!(
            "building {}: {} commits, {} after filtering, {} after dedup",
            self.version,
            total,
            filtered,
            kept.len()
        );

        let items = kept.iter().map(|c| self.change_item(c));
        let sections = SectionMap::from_items(self.section_order.clone(), items).into_sections();

        Changelog {
            version: self.version.clone(),
            date: self.date,
            sections,
            metadata: self.changelog_metadata(),
        }
    }

    /// Drops commits excluded by the filter options, keeping the order of the
    /// survivors.
    pub fn filter(&self, commits: Vec<ClassifiedCommit>) -> Vec<ClassifiedCommit> {
        commits.into_iter().filter(|c| self.keeps(c)).collect()
    }

    fn keeps(&self, c: &ClassifiedCommit) -> bool {
        if self.no_merge_commits && c.commit.is_merge {
            trace!("dropping merge commit {}", c.commit.hash);
            return false;
        }
        if !self.include_types.is_empty() && !self.include_types.contains(&c.change_type) {
            trace!("dropping {} commit {}", c.change_type, c.commit.hash);
            return false;
        }
        if let Some(scope) = c.parsed.scope.as_deref() {
            if self.exclude_scopes.contains(scope.trim()) {
                trace!("dropping commit {} in scope {}", c.commit.hash, scope);
                return false;
            }
        }
        if let Some(re) = &self.author_filter {
            if !re.is_match(&c.commit.author.to_string()) {
                trace!("dropping commit {} by {}", c.commit.hash, c.commit.author);
                return false;
            }
        }
        true
    }

    fn reference_of(&self, c: &ClassifiedCommit) -> Option<Reference> {
        c.reference.filter(|_| !self.no_prs)
    }

    /// Keeps the first commit for each change request reference; commits
    /// without one are always kept.
    pub fn dedup(&self, commits: Vec<ClassifiedCommit>) -> Vec<ClassifiedCommit> {
        let mut seen = HashSet::new();
        commits
            .into_iter()
            .filter(|c| match self.reference_of(c) {
                Some(reference) if !seen.insert(reference) => {
                    debug!("dropping {} as a duplicate of {}", c.commit.hash, reference);
                    false
                }
                Some(reference) => {
                    trace!("keeping {} for {}", c.commit.hash, reference);
                    true
                }
                None => true,
            })
            .collect()
    }

    /// Maps a commit onto its changelog item.
    pub fn change_item(&self, c: &ClassifiedCommit) -> ChangeItem {
        let repo = self.repo.as_deref().unwrap_or("");
        let parsed = &c.parsed;
        let mut references = StringMap::new();
        let mut metadata = StringMap::new();

        if let Some(reference) = self.reference_of(c) {
            references.insert(
                reference.kind().to_owned(),
                self.link_style.reference_link(reference, repo),
            );
            metadata.insert(
                format!("{}_number", reference.kind()),
                reference.number().to_string(),
            );
        }
        references.insert("commit".to_owned(), c.commit.hash.clone());
        if !repo.is_empty() {
            metadata.insert(
                "commit_url".to_owned(),
                self.link_style.commit_link(&c.commit, repo),
            );
        }
        metadata.insert("author".to_owned(), c.commit.author.to_string());

        ChangeItem {
            title: parsed.subject.clone(),
            change_type: c.change_type,
            scope: parsed.scope.clone().filter(|_| self.include_scopes),
            breaking: parsed.breaking,
            summary: parsed.subject.clone(),
            details: details_for(parsed),
            references,
            metadata,
        }
    }

    fn changelog_metadata(&self) -> StringMap {
        let mut metadata = self.metadata.clone();
        if !metadata.contains_key(COMPARE_URL_KEY) {
            let link = self.compare_refs.as_ref().and_then(|(from, to)| {
                self.link_style
                    .compare_link(from, to, self.repo.as_deref().unwrap_or(""))
            });
            if let Some(link) = link {
                metadata.insert(COMPARE_URL_KEY.to_owned(), link);
            }
        }
        metadata
    }
}

// Body first, then any breaking note the body does not already spell out.
fn details_for(parsed: &ParsedCommitMessage) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    if !parsed.body.is_empty() {
        parts.push(&parsed.body);
    }
    for note in &parsed.breaking_descriptions {
        if !parsed.body.contains(note.as_str()) {
            parts.push(note);
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}
