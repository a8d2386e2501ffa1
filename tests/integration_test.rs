mod common;

use common::TestRepo;
use git2::{ObjectType, Repository};
use semantic_releaser::config::Config;
use semantic_releaser::error::ReleaserError;
use semantic_releaser::git::Git2Repository;
use semantic_releaser::hooks::RecordingRunner;
use semantic_releaser::release::{ProjectOutcome, Releaser};
use semver::Version;

/// Monorepo with two released charts and a bare `origin`
fn monorepo() -> (TestRepo, tempfile::TempDir) {
    let test_repo = TestRepo::init();
    let api = test_repo.commit(
        "chore(api): release 1.0.0 [skip ci]",
        &[
            ("charts/api/Chart.yaml", "apiVersion: v2\nname: api\nversion: 1.0.0\n"),
            (
                "charts/api/CHANGELOG.md",
                "# Changelog\n\n<!-- INSERT COMMENT -->\n\n## 1.0.0 (2024-01-01)\n\n### Features\n\n* feat: first (aaaaaaa)\n",
            ),
        ],
    );
    test_repo.tag("api-1.0.0", api);
    let web = test_repo.commit(
        "chore(web): release 0.4.2 [skip ci]",
        &[("charts/web/Chart.yaml", "apiVersion: v2\nname: web\nversion: 0.4.2\n")],
    );
    test_repo.tag("web-0.4.2", web);
    test_repo.commit("docs: repository readme", &[("README.md", "# charts\n")]);

    let bare = test_repo.add_bare_remote("origin");
    (test_repo, bare)
}

#[test]
fn test_release_commits_tags_and_pushes() {
    let (test_repo, bare) = monorepo();
    test_repo.commit("feat(api): add hpa", &[("charts/api/templates/hpa.yaml", "kind: HPA\n")]);
    test_repo.commit("fix(web): readiness path", &[("charts/web/values.yaml", "readiness: /healthz\n")]);

    let repo = Git2Repository::open(test_repo.path()).unwrap();
    let releaser = Releaser::new(repo, RecordingRunner::new(), Config::default());
    let report = releaser.run().unwrap();

    assert_eq!(
        report.get("api").unwrap().result.as_ref().unwrap(),
        &ProjectOutcome::Released {
            previous: Version::new(1, 0, 0),
            version: Version::new(1, 1, 0),
            tag: "api-1.1.0".to_string(),
        }
    );
    assert_eq!(
        report.get("web").unwrap().result.as_ref().unwrap(),
        &ProjectOutcome::Released {
            previous: Version::new(0, 4, 2),
            version: Version::new(0, 4, 3),
            tag: "web-0.4.3".to_string(),
        }
    );

    // Version lines rewritten in place
    assert_eq!(
        test_repo.read("charts/api/Chart.yaml"),
        "apiVersion: v2\nname: api\nversion: 1.1.0\n"
    );
    assert_eq!(
        test_repo.read("charts/web/Chart.yaml"),
        "apiVersion: v2\nname: web\nversion: 0.4.3\n"
    );

    // Existing changelog keeps prior releases below the new one
    let api_changelog = test_repo.read("charts/api/CHANGELOG.md");
    assert!(api_changelog.starts_with("# Changelog\n\n<!-- INSERT COMMENT -->\n## 1.1.0 ("));
    assert!(api_changelog.contains("### Features\n\n* feat(api): add hpa ("));
    assert!(api_changelog.ends_with("\n## 1.0.0 (2024-01-01)\n\n### Features\n\n* feat: first (aaaaaaa)\n"));

    // New changelog created with the standard preamble
    let web_changelog = test_repo.read("charts/web/CHANGELOG.md");
    assert!(web_changelog.starts_with(
        "# Changelog\n\nAll notable changes to this project will be documented in this file.\n\n<!-- INSERT COMMENT -->\n### 0.4.3 ("
    ));

    // Two release commits on top of the feature commits
    let head = test_repo.head();
    let previous = head.parent(0).unwrap();
    let summaries = [
        head.summary().unwrap().to_string(),
        previous.summary().unwrap().to_string(),
    ];
    assert!(summaries.contains(&"chore(api): release 1.1.0 [skip ci]".to_string()));
    assert!(summaries.contains(&"chore(web): release 0.4.3 [skip ci]".to_string()));
    assert!(head.message().unwrap().contains("\n\n"));

    // Annotated tags and branch pushed to the remote
    let remote = Repository::open_bare(bare.path()).unwrap();
    for tag in ["api-1.1.0", "web-0.4.3"] {
        let reference = remote.find_reference(&format!("refs/tags/{}", tag)).unwrap();
        let object = reference.peel(ObjectType::Tag).unwrap();
        assert!(object.as_tag().is_some(), "{} should be annotated", tag);
    }
    let branch = remote
        .find_reference(&format!("refs/heads/{}", test_repo.branch()))
        .unwrap();
    assert_eq!(branch.target().unwrap(), head.id());
    assert!(releaser.runner().commands().is_empty());
}

#[test]
fn test_second_run_is_a_noop() {
    let (test_repo, _bare) = monorepo();
    test_repo.commit("fix(api): typo", &[("charts/api/values.yaml", "a: 1\n")]);

    let repo = Git2Repository::open(test_repo.path()).unwrap();
    let releaser = Releaser::new(repo, RecordingRunner::new(), Config::default());
    releaser.run().unwrap();
    let head = test_repo.head().id();

    let report = releaser.run().unwrap();
    for project in &report.projects {
        assert!(matches!(
            project.result.as_ref().unwrap(),
            ProjectOutcome::Unchanged { .. }
        ));
    }
    assert_eq!(test_repo.head().id(), head);
}

#[test]
fn test_publish_failure_fails_the_run_after_push() {
    let (test_repo, bare) = monorepo();
    test_repo.commit(
        "fix(web): readiness",
        &[
            ("charts/web/values.yaml", "readiness: /\n"),
            (
                "charts/web/Chart.yaml",
                "apiVersion: v2\nname: web\nversion: 0.4.2\ncommands:\n  publishNewVersion: helm push {{projectName}}-{{nextVersion}}.tgz\n",
            ),
        ],
    );

    let repo = Git2Repository::open(test_repo.path()).unwrap();
    let releaser = Releaser::new(repo, RecordingRunner::failing_on("helm push"), Config::default());

    match releaser.run().unwrap_err() {
        ReleaserError::Project { name, source } => {
            assert_eq!(name, "web");
            assert!(matches!(*source, ReleaserError::Command { .. }));
        }
        other => panic!("unexpected error: {}", other),
    }

    let commands = releaser.runner().commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].command, "helm push web-0.4.3.tgz");
    assert!(commands[0].dir.ends_with("charts/web"));
    assert!(test_repo.file("charts/web/CHANGELOG.md").exists());

    // The release itself was already pushed
    let remote = Repository::open_bare(bare.path()).unwrap();
    assert!(remote.find_reference("refs/tags/web-0.4.3").is_ok());
}

#[test]
fn test_unreachable_remote_fails_only_that_project_step() {
    let test_repo = TestRepo::init();
    let api = test_repo.commit("chore: init", &[("charts/api/Chart.yaml", "version: 1.0.0\n")]);
    test_repo.tag("api-1.0.0", api);
    test_repo.commit("fix: a", &[("charts/api/values.yaml", "a: 1\n")]);
    test_repo.add_remote("origin", "/nonexistent/remote/for/releaser.git");

    let repo = Git2Repository::open(test_repo.path()).unwrap();
    let releaser = Releaser::new(repo, RecordingRunner::new(), Config::default());
    let report = releaser.run_all().unwrap();

    assert!(report.has_failures());
    assert!(matches!(
        report.get("api").unwrap().result,
        Err(ReleaserError::Remote(_))
    ));
    // Commit and tag stay local
    assert_eq!(
        test_repo.head().summary().unwrap(),
        "chore(api): release 1.0.1 [skip ci]"
    );
    assert!(test_repo.repo.find_reference("refs/tags/api-1.0.1").is_ok());
}
