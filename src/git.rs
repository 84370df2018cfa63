use std::fmt;

use serde::{Deserialize, Serialize};

/// The identity of a commit author
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new<N: Into<String>, E: Into<String>>(name: N, email: E) -> Self {
        Author {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Formats as `Name <email>`, the string author filters are matched against
impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.email.is_empty()) {
            (_, true) => write!(f, "{}", self.name),
            (true, false) => write!(f, "<{}>", self.email),
            (false, false) => write!(f, "{} <{}>", self.name, self.email),
        }
    }
}

/// The struct representation of a `Commit` as handed over by the repository
/// reader, already restricted to the requested range and in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The full hash
    pub hash: String,
    pub author: Author,
    /// The raw commit message, header included
    pub message: String,
    /// Whether the commit has more than one parent
    #[serde(default)]
    pub is_merge: bool,
}

impl Commit {
    pub fn new<H: Into<String>, M: Into<String>>(hash: H, author: Author, message: M) -> Self {
        Commit {
            hash: hash.into(),
            author,
            message: message.into(),
            is_merge: false,
        }
    }

    /// Marks the commit as a merge commit.
    pub fn merge(mut self, is_merge: bool) -> Self {
        self.is_merge = is_merge;
        self
    }

    /// The first eight characters of the hash
    pub fn short_hash(&self) -> &str {
        self.hash.get(..8).unwrap_or(&self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_identity() {
        assert_eq!(
            Author::new("Jane Doe", "jane@example.com").to_string(),
            "Jane Doe <jane@example.com>"
        );
        assert_eq!(Author::new("bot", "").to_string(), "bot");
        assert_eq!(Author::new("", "ci@example.com").to_string(), "<ci@example.com>");
    }

    #[test]
    fn short_hash() {
        let c = Commit::new("0123456789abcdef", Author::default(), "chore: x");
        assert_eq!(c.short_hash(), "01234567");
        let c = Commit::new("abc", Author::default(), "chore: x");
        assert_eq!(c.short_hash(), "abc");
        assert!(!c.is_merge);
        assert!(c.merge(true).is_merge);
    }
}
