use std::{result::Result as StdResult, str::FromStr};

use strum::{Display, EnumString};

use crate::{git::Commit, reference::Reference};

/// Determines the hyperlink style used for change request, commit and compare
/// links. Defaults to `LinkStyle::Github`
///
/// # Example
///
/// ```
/// # use relnote::LinkStyle;
/// let style: LinkStyle = "GitLab".parse().unwrap();
/// assert_eq!(style, LinkStyle::Gitlab);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum LinkStyle {
    #[default]
    Github,
    Gitlab,
    Bitbucket,
}

impl<'de> serde::de::Deserialize<'de> for LinkStyle {
    fn deserialize<D>(deserializer: D) -> StdResult<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl LinkStyle {
    /// Gets a hyperlink url to a pull request, or `#N` without a repository.
    ///
    /// # Example
    ///
    /// ```
    /// # use relnote::LinkStyle;
    /// let link = LinkStyle::Github.pull_request_link(141, "https://github.com/acme/app");
    ///
    /// assert_eq!("https://github.com/acme/app/pull/141", link);
    /// ```
    pub fn pull_request_link(&self, number: u64, repo: &str) -> String {
        match repo.trim_end_matches('/') {
            "" => format!("#{number}"),
            link => match *self {
                LinkStyle::Github => format!("{link}/pull/{number}"),
                LinkStyle::Gitlab => format!("{link}/-/merge_requests/{number}"),
                LinkStyle::Bitbucket => format!("{link}/pull-requests/{number}"),
            },
        }
    }

    /// Gets a hyperlink url to a merge request, or `!N` without a repository.
    pub fn merge_request_link(&self, number: u64, repo: &str) -> String {
        match repo.trim_end_matches('/') {
            "" => format!("!{number}"),
            link => match *self {
                LinkStyle::Gitlab => format!("{link}/-/merge_requests/{number}"),
                LinkStyle::Github => format!("{link}/pull/{number}"),
                LinkStyle::Bitbucket => format!("{link}/pull-requests/{number}"),
            },
        }
    }

    pub fn reference_link(&self, reference: Reference, repo: &str) -> String {
        match reference {
            Reference::PullRequest(n) => self.pull_request_link(n, repo),
            Reference::MergeRequest(n) => self.merge_request_link(n, repo),
        }
    }

    /// Gets a hyperlink url to a commit, or the short hash without a
    /// repository.
    ///
    /// # Example
    ///
    /// ```
    /// # use relnote::{Author, Commit, LinkStyle};
    /// let link = LinkStyle::Gitlab;
    /// let commit = Commit::new("123abc891234567890abcdefabc4567898724", Author::default(), "fix: x");
    /// let commit = link.commit_link(&commit, "https://gitlab.com/acme/app");
    ///
    /// assert_eq!("https://gitlab.com/acme/app/-/commit/123abc891234567890abcdefabc4567898724", commit);
    /// ```
    pub fn commit_link(&self, commit: &Commit, repo: &str) -> String {
        let hash = &commit.hash;
        match repo.trim_end_matches('/') {
            "" => commit.short_hash().to_owned(),
            link => match *self {
                LinkStyle::Github => format!("{link}/commit/{hash}"),
                LinkStyle::Gitlab => format!("{link}/-/commit/{hash}"),
                LinkStyle::Bitbucket => format!("{link}/commits/{hash}"),
            },
        }
    }

    /// Gets a hyperlink url comparing two refs. There is no plain text
    /// fallback, so an empty repository yields `None`.
    pub fn compare_link(&self, from: &str, to: &str, repo: &str) -> Option<String> {
        match repo.trim_end_matches('/') {
            "" => None,
            link => Some(match *self {
                LinkStyle::Github => format!("{link}/compare/{from}...{to}"),
                LinkStyle::Gitlab => format!("{link}/-/compare/{from}...{to}"),
                LinkStyle::Bitbucket => format!("{link}/branches/compare/{to}%0D{from}"),
            }),
        }
    }
}
