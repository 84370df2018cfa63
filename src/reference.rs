use std::fmt;

use regex::Regex;
use serde::Serialize;

fn github_regex() -> &'static Regex {
    regex!(r"(?i)\(#(\d+)\)|\b(?:merge\s+)?pull\s+request\s+#(\d+)|\bPR\s*#(\d+)")
}

fn gitlab_regex() -> &'static Regex {
    regex!(r"(?i)\(!(\d+)\)|\bmerge\s+request\s+!(\d+)|\bMR\s*!(\d+)")
}

fn github_bracket_regex() -> &'static Regex {
    regex!(r"\(#(\d+)\)")
}

fn gitlab_bracket_regex() -> &'static Regex {
    regex!(r"\(!(\d+)\)")
}

// Leftmost match wins; whichever alternative matched holds the number.
fn first_positive(re: &Regex, message: &str) -> Option<u64> {
    re.captures_iter(message).find_map(|caps| {
        caps.iter()
            .skip(1)
            .flatten()
            .next()
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .filter(|n| *n > 0)
    })
}

/// Extracts a GitHub-style pull request number: `(#N)`, `Merge pull request
/// #N`, `Pull request #N` or `PR #N`.
///
/// A `(!N)` bracket outranks the word forms: a message carrying one and no
/// `(#N)` bracket belongs to the merge request grammar.
///
/// # Example
///
/// ```
/// # use relnote::extract_pr_number;
/// assert_eq!(extract_pr_number("feat: add login (#123)"), Some(123));
/// assert_eq!(extract_pr_number("Merge pull request #7 from me/branch"), Some(7));
/// assert_eq!(extract_pr_number("feat: add login (!123)"), None);
/// assert_eq!(extract_pr_number("fix: crash (!12)\n\nPR #3"), None);
/// ```
pub fn extract_pr_number<'a, M: Into<Option<&'a str>>>(message: M) -> Option<u64> {
    let message = message.into()?;
    if first_positive(github_bracket_regex(), message).is_none()
        && first_positive(gitlab_bracket_regex(), message).is_some()
    {
        return None;
    }
    first_positive(github_regex(), message)
}

/// Extracts a GitLab-style merge request number: `(!N)`, `Merge request !N`
/// or `MR !N`.
///
/// A `(#N)` bracket, or a GitHub word form in a message without any bracket,
/// rules out a merge request, so at most one of the two extractors returns a
/// value for any message.
///
/// # Example
///
/// ```
/// # use relnote::extract_mr_number;
/// assert_eq!(extract_mr_number("fix: crash (!42)"), Some(42));
/// assert_eq!(extract_mr_number("fix: crash (#42)"), None);
/// assert_eq!(extract_mr_number("fix: crash (!12)\n\nPR #3"), Some(12));
/// ```
pub fn extract_mr_number<'a, M: Into<Option<&'a str>>>(message: M) -> Option<u64> {
    let message = message.into()?;
    if first_positive(github_bracket_regex(), message).is_some() {
        return None;
    }
    if first_positive(gitlab_bracket_regex(), message).is_none()
        && first_positive(github_regex(), message).is_some()
    {
        return None;
    }
    first_positive(gitlab_regex(), message)
}

/// A change request reference carried by a commit message.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(tag = "kind", content = "number", rename_all = "snake_case")]
pub enum Reference {
    PullRequest(u64),
    MergeRequest(u64),
}

impl Reference {
    pub fn number(&self) -> u64 {
        match *self {
            Reference::PullRequest(n) | Reference::MergeRequest(n) => n,
        }
    }

    /// The key used for this reference in `ChangeItem::references`.
    pub fn kind(&self) -> &'static str {
        match self {
            Reference::PullRequest(_) => "pr",
            Reference::MergeRequest(_) => "mr",
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reference::PullRequest(n) => write!(f, "#{n}"),
            Reference::MergeRequest(n) => write!(f, "!{n}"),
        }
    }
}

/// Extracts whichever reference a message carries, preferring the GitHub
/// grammar.
pub fn extract_reference(message: &str) -> Option<Reference> {
    extract_pr_number(message)
        .map(Reference::PullRequest)
        .or_else(|| extract_mr_number(message).map(Reference::MergeRequest))
}
