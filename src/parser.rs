//! Conventional Commit message parsing.
//!
//! A message is split into a header (`type(scope)!: subject`), a free-form
//! body and an optional trailing block of `token: value` footers. Parsing is
//! total: anything that does not follow the convention becomes a
//! non-conventional parse whose subject is the raw header.

use indexmap::IndexMap;
use log::trace;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::commit_type::{normalize_type, KnownType};

/// Ordered footer map, `token -> values` in first-seen order.
pub type Footers = IndexMap<String, Vec<String>>;

const BREAKING_TOKEN: &str = "BREAKING CHANGE";

fn header_regex() -> &'static Regex {
    regex!(r"^(?P<type>[A-Za-z][A-Za-z0-9-]*)(?:\((?P<scope>[^)]+)\))?(?P<breaking>!)?:\s*(?P<subject>.+)$")
}

fn footer_regex() -> &'static Regex {
    regex!(r"^(?P<token>[A-Za-z][A-Za-z0-9- ]*)(?::\s*(?P<value>.+)|\s+#(?P<hash>.+))$")
}

fn breaking_note_regex() -> &'static Regex {
    regex!(r"(?i)^BREAKING(?:-| )CHANGE:\s*(?P<note>.+)$")
}

/// The structured form of a single commit message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedCommitMessage {
    /// The normalized header type, `None` for non-conventional headers or
    /// unknown type tokens
    #[serde(rename = "type")]
    pub commit_type: Option<KnownType>,
    /// The header scope, if any
    pub scope: Option<String>,
    /// The header subject, or the whole header when it is not conventional
    pub subject: String,
    /// The first body paragraph joined onto a single line
    pub description: Option<String>,
    /// The body with the footer block and surrounding blank lines removed
    pub body: String,
    pub footers: Footers,
    pub breaking: bool,
    /// Every breaking note found, footers first then body notes
    pub breaking_descriptions: Vec<String>,
    /// Whether the header matched the grammar *and* its type is known
    pub is_conventional: bool,
}

impl ParsedCommitMessage {
    /// Values of a footer token, if present.
    pub fn footer(&self, token: &str) -> Option<&[String]> {
        self.footers.get(token).map(Vec::as_slice)
    }
}

struct Header<'a> {
    raw_type: Option<&'a str>,
    scope: Option<&'a str>,
    subject: &'a str,
    breaking: bool,
    matched: bool,
}

impl<'a> Header<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match header_regex().captures(line) {
            Some(caps) => Header {
                raw_type: caps.name("type").map(|m| m.as_str()),
                scope: caps.name("scope").map(|m| m.as_str()),
                subject: caps.name("subject").map_or("", |m| m.as_str().trim()),
                breaking: caps.name("breaking").is_some(),
                matched: true,
            },
            None => Header {
                raw_type: None,
                scope: None,
                subject: line,
                breaking: false,
                matched: false,
            },
        }
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

fn footer_captures(line: &str) -> Option<Captures<'_>> {
    footer_regex().captures(line.trim())
}

fn looks_like_footer(line: &str) -> bool {
    is_blank(line) || footer_captures(line).is_some() || is_indented(line)
}

/// Parses a raw commit message. `None` and `""` are equivalent.
///
/// # Example
///
/// ```
/// # use relnote::{parse_commit_message, KnownType};
/// let parsed = parse_commit_message("fix(db)!: drop legacy table\n\nRefs: #42");
///
/// assert_eq!(parsed.commit_type, Some(KnownType::Fix));
/// assert_eq!(parsed.scope.as_deref(), Some("db"));
/// assert!(parsed.breaking);
/// assert_eq!(parsed.footer("Refs"), Some(&["#42".to_owned()][..]));
/// ```
pub fn parse_commit_message<'a, M: Into<Option<&'a str>>>(message: M) -> ParsedCommitMessage {
    let normalized = message.into().unwrap_or("").replace("\r\n", "\n");
    let mut lines: Vec<&str> = normalized.split('\n').collect();
    while lines.last().is_some_and(|l| is_blank(l)) {
        lines.pop();
    }
    let start = lines.iter().position(|l| !is_blank(l)).unwrap_or(lines.len());
    let lines = &lines[start..];

    let header = Header::parse(lines.first().copied().unwrap_or(""));
    let rest = lines.get(1..).unwrap_or(&[]);
    let first_content = rest.iter().position(|l| !is_blank(l)).unwrap_or(rest.len());
    let (body_lines, footer_lines) = split_body_and_footers(&rest[first_content..]);

    let footers = parse_footers(footer_lines);
    let mut breaking = header.breaking;
    let mut breaking_descriptions = Vec::new();

    for (token, values) in &footers {
        if token.to_uppercase().replace('-', " ") == BREAKING_TOKEN {
            breaking = true;
            breaking_descriptions.extend(values.iter().cloned());
        }
    }
    for line in body_lines {
        if let Some(caps) = breaking_note_regex().captures(line.trim()) {
            breaking = true;
            breaking_descriptions.push(caps["note"].to_owned());
        }
    }

    let commit_type = header.raw_type.and_then(normalize_type);
    trace!(
        "parsed header type={:?} scope={:?} breaking={}",
        commit_type,
        header.scope,
        breaking
    );

    ParsedCommitMessage {
        is_conventional: header.matched && commit_type.is_some(),
        commit_type,
        scope: header.scope.map(str::to_owned),
        subject: header.subject.to_owned(),
        description: first_paragraph(body_lines),
        body: body_lines.join("\n").trim().to_owned(),
        footers,
        breaking,
        breaking_descriptions,
    }
}

/// Finds the footer block: the first footer line that opens a paragraph and
/// after which every line is blank, a footer or indented. Without such a line
/// everything is body.
fn split_body_and_footers<'l, 'a>(lines: &'l [&'a str]) -> (&'l [&'a str], &'l [&'a str]) {
    // Candidates before the last line that cannot belong to a footer block
    // never qualify.
    let suffix_start = lines
        .iter()
        .rposition(|l| !looks_like_footer(l))
        .map_or(0, |idx| idx + 1);
    let boundary = (suffix_start..lines.len()).find(|&idx| {
        footer_captures(lines[idx]).is_some() && (idx == 0 || is_blank(lines[idx - 1]))
    });

    let (mut body, footers) = match boundary {
        Some(idx) => lines.split_at(idx),
        None => (lines, &lines[lines.len()..]),
    };
    while let Some((last, init)) = body.split_last() {
        if !is_blank(last) {
            break;
        }
        body = init;
    }
    (body, footers)
}

fn parse_footers(lines: &[&str]) -> Footers {
    let mut footers = Footers::new();
    let mut current: Option<String> = None;

    for line in lines {
        if is_blank(line) {
            current = None;
            continue;
        }
        if let Some(caps) = footer_captures(line) {
            let token = caps["token"].trim().to_owned();
            let value = match caps.name("value") {
                Some(v) => v.as_str().trim().to_owned(),
                None => format!("#{}", caps["hash"].trim()),
            };
            footers.entry(token.clone()).or_default().push(value);
            current = Some(token);
            continue;
        }
        if is_indented(line) {
            let last = current
                .as_ref()
                .and_then(|t| footers.get_mut(t))
                .and_then(|values| values.last_mut());
            if let Some(last) = last {
                last.push('\n');
                last.push_str(line.trim());
                continue;
            }
        }
        current = None;
    }

    footers
}

fn first_paragraph(lines: &[&str]) -> Option<String> {
    let paragraph: Vec<&str> = lines
        .iter()
        .map(|l| l.trim())
        .skip_while(|l| l.is_empty())
        .take_while(|l| !l.is_empty())
        .collect();
    if paragraph.is_empty() {
        None
    } else {
        Some(paragraph.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn breaking_footer_and_refs() {
        let parsed = parse_commit_message(indoc! {"
            feat(auth)!: require MFA

            Introduce mandatory multi-factor authentication for admin users.

            BREAKING CHANGE: Admin users must configure MFA before the next login.
            Refs: #123"});

        assert_eq!(parsed.commit_type, Some(KnownType::Feat));
        assert_eq!(parsed.scope.as_deref(), Some("auth"));
        assert_eq!(parsed.subject, "require MFA");
        assert!(parsed.breaking);
        assert!(parsed.is_conventional);
        assert_eq!(
            parsed.breaking_descriptions,
            vec!["Admin users must configure MFA before the next login.".to_owned()]
        );
        assert_eq!(parsed.footers.len(), 2);
        assert_eq!(parsed.footer("Refs"), Some(&["#123".to_owned()][..]));
        assert_eq!(
            parsed.body,
            "Introduce mandatory multi-factor authentication for admin users."
        );
        assert_eq!(
            parsed.description.as_deref(),
            Some("Introduce mandatory multi-factor authentication for admin users.")
        );
    }

    #[test]
    fn non_conventional_header() {
        let parsed = parse_commit_message("Release v1.2.3");

        assert_eq!(parsed.commit_type, None);
        assert_eq!(parsed.scope, None);
        assert_eq!(parsed.subject, "Release v1.2.3");
        assert!(!parsed.breaking);
        assert!(!parsed.is_conventional);
        assert_eq!(parsed.description, None);
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn empty_and_absent() {
        for parsed in [parse_commit_message(""), parse_commit_message(None::<&str>)] {
            assert_eq!(parsed, ParsedCommitMessage::default());
        }
        assert_eq!(parse_commit_message("\n\n  \n").subject, "");
    }

    #[test]
    fn unknown_type_is_not_conventional() {
        let parsed = parse_commit_message("wip(core)!: half done");

        assert_eq!(parsed.commit_type, None);
        assert_eq!(parsed.scope.as_deref(), Some("core"));
        assert_eq!(parsed.subject, "half done");
        assert!(parsed.breaking);
        assert!(!parsed.is_conventional);
    }

    #[test]
    fn alias_type_is_conventional() {
        let parsed = parse_commit_message("Feature: dark mode");
        assert_eq!(parsed.commit_type, Some(KnownType::Feat));
        assert!(parsed.is_conventional);
        assert!(!parsed.breaking);
    }

    #[test]
    fn header_requires_subject() {
        let parsed = parse_commit_message("feat:");
        assert_eq!(parsed.commit_type, None);
        assert_eq!(parsed.subject, "feat:");
    }

    #[test]
    fn crlf_and_surrounding_blank_lines() {
        let parsed = parse_commit_message("\r\n\r\nfix: a\r\n\r\nbody line\r\n\r\n");
        assert_eq!(parsed.commit_type, Some(KnownType::Fix));
        assert_eq!(parsed.subject, "a");
        assert_eq!(parsed.body, "body line");
    }

    #[test]
    fn hash_footer_form() {
        let parsed = parse_commit_message(indoc! {"
            fix: handle timeouts

            Closes #77
            Reviewed-by: Jane Doe"});

        assert_eq!(parsed.footer("Closes"), Some(&["#77".to_owned()][..]));
        assert_eq!(parsed.footer("Reviewed-by"), Some(&["Jane Doe".to_owned()][..]));
        assert_eq!(parsed.body, "");
        assert_eq!(parsed.description, None);
    }

    #[test]
    fn repeated_tokens_keep_first_seen_order() {
        let parsed = parse_commit_message(indoc! {"
            chore: release

            Co-authored-by: A
            Refs: #1
            Co-authored-by: B"});

        let tokens: Vec<&str> = parsed.footers.keys().map(String::as_str).collect();
        assert_eq!(tokens, ["Co-authored-by", "Refs"]);
        assert_eq!(
            parsed.footer("Co-authored-by"),
            Some(&["A".to_owned(), "B".to_owned()][..])
        );
    }

    #[test]
    fn footer_continuation_lines() {
        let parsed = parse_commit_message(
            "feat: x\n\nBREAKING CHANGE: first line\n  second line\n\tthird line\n\nRefs: #9",
        );

        assert_eq!(
            parsed.footer("BREAKING CHANGE"),
            Some(&["first line\nsecond line\nthird line".to_owned()][..])
        );
        assert_eq!(
            parsed.breaking_descriptions,
            vec!["first line\nsecond line\nthird line".to_owned()]
        );
        assert_eq!(parsed.footer("Refs"), Some(&["#9".to_owned()][..]));
    }

    #[test]
    fn blank_line_ends_continuation() {
        let parsed = parse_commit_message("feat: x\n\nRefs: #1\n\n  orphan\nAcked-by: C");

        assert_eq!(parsed.footer("Refs"), Some(&["#1".to_owned()][..]));
        assert_eq!(parsed.footer("Acked-by"), Some(&["C".to_owned()][..]));
        assert_eq!(parsed.footers.len(), 2);
    }

    #[test]
    fn footer_like_line_inside_paragraph_stays_body() {
        let parsed = parse_commit_message(indoc! {"
            docs: explain setup

            Note: the installer needs network access
            and will download about 200MB of data."});

        assert!(parsed.footers.is_empty());
        assert_eq!(
            parsed.body,
            "Note: the installer needs network access\nand will download about 200MB of data."
        );
        assert_eq!(
            parsed.description.as_deref(),
            Some("Note: the installer needs network access and will download about 200MB of data.")
        );
    }

    #[test]
    fn footer_must_open_a_paragraph() {
        let parsed = parse_commit_message("fix: a\n\nsome text\nRefs: #3");
        assert!(parsed.footers.is_empty());
        assert_eq!(parsed.body, "some text\nRefs: #3");
    }

    #[test]
    fn breaking_note_in_body() {
        let parsed = parse_commit_message(indoc! {"
            refactor: rename config keys

            breaking-change: `port` is now `listen-port`
            Old configuration files must be migrated by hand."});

        assert!(parsed.breaking);
        assert!(parsed.footers.is_empty());
        assert_eq!(
            parsed.breaking_descriptions,
            vec!["`port` is now `listen-port`".to_owned()]
        );
    }

    #[test]
    fn every_breaking_source_contributes() {
        let parsed = parse_commit_message(indoc! {"
            feat(api)!: new pagination

            BREAKING CHANGE: cursor replaces offset
            in the middle of a paragraph.

            BREAKING-CHANGE: limit is capped at 100"});

        assert!(parsed.breaking);
        assert_eq!(
            parsed.breaking_descriptions,
            vec![
                "limit is capped at 100".to_owned(),
                "cursor replaces offset".to_owned(),
            ]
        );
        assert_eq!(parsed.footer("BREAKING-CHANGE").map(|v| v.len()), Some(1));
    }

    #[test]
    fn description_is_first_paragraph() {
        let parsed = parse_commit_message(indoc! {"
            perf: cache lookups

              Lookups are memoized
            per request.

            Second paragraph."});

        assert_eq!(
            parsed.description.as_deref(),
            Some("Lookups are memoized per request.")
        );
        assert_eq!(
            parsed.body,
            "Lookups are memoized\nper request.\n\nSecond paragraph."
        );
    }
}
