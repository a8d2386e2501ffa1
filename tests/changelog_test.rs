use chrono::NaiveDate;
use semantic_releaser::changelog::{Changelog, CHANGELOG_HEADER, INSERT_MARKER};
use semantic_releaser::error::ReleaserError;
use semver::Version;
use std::fs;
use tempfile::TempDir;

fn release(new: &str) -> Changelog {
    let mut changelog = Changelog::new();
    changelog.set_old_version(Version::new(1, 0, 0));
    changelog.set_new_version(Version::parse(new).unwrap());
    changelog.set_date(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    changelog
}

#[test]
fn test_write_to_creates_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");

    let mut changelog = release("1.1.0");
    changelog.add_feature("feat: autoscaling", "abc1234");
    changelog.write_to(&path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# Changelog\n\nAll notable changes to this project will be documented in this file.\n\n<!-- INSERT COMMENT -->\n## 1.1.0 (2024-06-30)\n\n### Features\n\n* feat: autoscaling (abc1234)\n\n"
    );
}

#[test]
fn test_write_to_preserves_everything_around_the_marker() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");
    let before = "# Changelog\n\nCustom intro.\n\n";
    let after = "## 1.0.0 (2024-01-01)\n\n### Features\n\n* feat: first (1111111)\n";
    fs::write(&path, format!("{}{}\n\n{}", before, INSERT_MARKER, after)).unwrap();

    let mut changelog = release("1.0.1");
    changelog.add_fix("fix: readiness (#7)", "abc1234");
    changelog.write_to(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        format!(
            "{}{}\n{}\n\n{}",
            before,
            INSERT_MARKER,
            changelog.render(),
            after
        )
    );
    assert!(content.ends_with(after));
}

#[test]
fn test_successive_releases_stack_newest_first() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");

    let mut first = release("1.0.1");
    first.add_fix("fix: one", "1111111");
    first.write_to(&path).unwrap();

    let mut second = release("1.1.0");
    second.add_feature("feat: two", "2222222");
    second.write_to(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with(CHANGELOG_HEADER));
    assert_eq!(content.matches(INSERT_MARKER).count(), 1);
    let newer = content.find("## 1.1.0").unwrap();
    let older = content.find("### 1.0.1").unwrap();
    assert!(newer < older);
}

#[test]
fn test_write_to_without_marker_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");
    fs::write(&path, "# Hand written changelog\n").unwrap();

    let mut changelog = release("2.0.0");
    changelog.add_breaking("feat!: new values schema", "abc1234");

    let err = changelog.write_to(&path).unwrap_err();
    assert!(matches!(err, ReleaserError::MissingPlaceholder(ref p) if p == &path));
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Hand written changelog\n");
}

#[test]
fn test_emptiness_signal() {
    let changelog = release("1.0.1");
    assert_eq!(changelog.len(), 0);
    assert!(changelog.is_empty());
    assert_eq!(changelog.render(), "");
}
