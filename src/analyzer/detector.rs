use semver::Version;
use std::ops::ControlFlow;

use crate::analyzer::classifier::CommitClassifier;
use crate::boundary::BoundaryWarning;
use crate::changelog::Changelog;
use crate::config::Config;
use crate::domain::{increment, Bump};
use crate::error::Result;
use crate::git::Repository;
use crate::project::SubProject;

/// Outcome of detection for one sub-project
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub current: Version,
    pub next: Version,
    pub bump: Bump,
    pub changelog: Changelog,
}

impl ReleasePlan {
    /// A plan is a release exactly when its changelog has entries
    pub fn is_release(&self) -> bool {
        !self.changelog.is_empty()
    }
}

/// Walks a sub-project's history since its last release and decides the next
/// version.
pub struct ReleaseDetector<'a, R: Repository + ?Sized> {
    repo: &'a R,
    config: &'a Config,
    classifier: CommitClassifier,
}

impl<'a, R: Repository + ?Sized> ReleaseDetector<'a, R> {
    pub fn new(repo: &'a R, config: &'a Config) -> Result<Self> {
        Ok(ReleaseDetector {
            repo,
            config,
            classifier: CommitClassifier::new(&config.conventional_commits)?,
        })
    }

    pub fn detect(&self, project: &SubProject) -> Result<ReleasePlan> {
        let mut changelog = Changelog::new();
        changelog.set_old_version(project.current_version.clone());
        self.attach_remote(&mut changelog);

        let release_tag = project.current_tag();
        let boundary = self.repo.find_tag_target(&release_tag)?;
        if boundary.is_none() {
            BoundaryWarning::NoReleaseTag { tag: release_tag }.log();
        }

        let mut bump = Bump::None;
        self.repo.walk_path(&project.path, &mut |commit| {
            if boundary.as_deref() == Some(commit.id.as_str()) {
                return ControlFlow::Break(());
            }

            let commit_bump = self.classifier.classify(commit.summary_bytes());
            tracing::debug!(
                commit = commit.short_id(),
                bump = %commit_bump,
                "{}",
                commit.summary()
            );

            match commit_bump {
                Bump::Major => changelog.add_breaking(commit.summary(), commit.short_id()),
                Bump::Minor => changelog.add_feature(commit.summary(), commit.short_id()),
                Bump::Patch => changelog.add_fix(commit.summary(), commit.short_id()),
                Bump::None => {}
            }

            bump = bump.max(commit_bump);
            ControlFlow::Continue(())
        })?;

        let next = increment(&project.current_version, bump);
        if bump != Bump::None {
            changelog.set_new_version(next.clone());
        }

        Ok(ReleasePlan {
            current: project.current_version.clone(),
            next,
            bump,
            changelog,
        })
    }

    fn attach_remote(&self, changelog: &mut Changelog) {
        match self.repo.remote_url(&self.config.remote) {
            Ok(Some(url)) => {
                changelog.set_remote(&url);
                if !changelog.has_links() {
                    BoundaryWarning::UnrecognizedRemote { url }.log();
                }
            }
            Ok(None) => BoundaryWarning::MissingRemote {
                remote: self.config.remote.clone(),
            }
            .log(),
            Err(e) => tracing::debug!(error = %e, "cannot read remote url"),
        }
    }
}
