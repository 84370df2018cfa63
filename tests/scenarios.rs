use relnote::{
    classify_change_type, extract_mr_number, extract_pr_number, parse_commit_message, Author,
    ChangelogBuilder, Commit, KnownType,
};

fn commit(hash: &str, message: &str) -> Commit {
    Commit::new(hash, Author::new("Test User", "test@example.com"), message)
}

#[test]
fn breaking_feature_with_footers() {
    let parsed = parse_commit_message(
        "feat(auth)!: require MFA\n\n\
         Introduce mandatory multi-factor authentication for admin users.\n\n\
         BREAKING CHANGE: Admin users must configure MFA before the next login.\n\
         Refs: #123",
    );

    assert_eq!(parsed.commit_type, Some(KnownType::Feat));
    assert_eq!(parsed.scope.as_deref(), Some("auth"));
    assert!(parsed.breaking);
    assert_eq!(
        parsed.breaking_descriptions,
        ["Admin users must configure MFA before the next login."]
    );
    assert_eq!(parsed.footers.len(), 2);
    assert_eq!(parsed.footers["Refs"], ["#123"]);
    assert!(parsed.body.starts_with("Introduce mandatory"));
}

#[test]
fn non_conventional_release_commit() {
    let parsed = parse_commit_message("Release v1.2.3");

    assert_eq!(parsed.commit_type, None);
    assert_eq!(parsed.subject, "Release v1.2.3");
    assert!(!parsed.breaking);
    assert!(!parsed.is_conventional);
}

#[test]
fn heuristic_classification() {
    let cases = [
        ("Fix flaky tests in pipeline", KnownType::Test),
        ("Improve performance of data loader", KnownType::Perf),
        ("Document new configuration", KnownType::Docs),
    ];
    for (message, expected) in cases {
        assert_eq!(classify_change_type(message, KnownType::Chore), expected, "{message}");
    }
}

#[test]
fn header_shape_is_preserved() {
    for (raw, ty) in [("feat", KnownType::Feat), ("hotfix", KnownType::Fix), ("ci", KnownType::Ci)] {
        let parsed = parse_commit_message(format!("{raw}(core-api)!: do things").as_str());
        assert_eq!(parsed.commit_type, Some(ty));
        assert_eq!(parsed.scope.as_deref(), Some("core-api"));
        assert!(parsed.breaking);
        assert!(parsed.breaking_descriptions.is_empty());
    }
}

#[test]
fn reference_extractors_are_exclusive() {
    assert_eq!(extract_pr_number("feat: x (#123)"), Some(123));
    assert_eq!(extract_mr_number("feat: x (#123)"), None);
    assert_eq!(extract_mr_number("feat: x (!123)"), Some(123));
    assert_eq!(extract_pr_number("feat: x (!123)"), None);
}

#[test]
fn excluded_scope_is_dropped() {
    let commits = vec![
        commit("1", "chore: initial"),
        commit("2", "feat(auth): add auth"),
        commit("3", "chore(deps): update packages"),
        commit("4", "feat(ui): improve button"),
    ];
    let changelog = ChangelogBuilder::new()
        .exclude_scopes(["deps"])
        .build(commits);

    let titles: Vec<&str> = changelog
        .sections
        .iter()
        .flat_map(|s| s.items.iter().map(|i| i.title.as_str()))
        .collect();
    assert!(titles.contains(&"add auth"));
    assert!(titles.contains(&"improve button"));
    assert!(!titles.contains(&"update packages"));
}

#[test]
fn merge_and_squash_of_same_pr() {
    let commits = vec![
        commit("aaa", "feat(search): fuzzy matching (#88)"),
        commit("bbb", "Merge pull request #88 from acme/fuzzy").merge(true),
    ];
    let changelog = ChangelogBuilder::new().build(commits);

    let items: Vec<_> = changelog.sections.iter().flat_map(|s| &s.items).collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].references["commit"], "aaa");
    assert_eq!(items[0].metadata["pr_number"], "88");
}
