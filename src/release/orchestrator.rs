use rayon::ThreadPoolBuilder;
use semver::Version;
use std::fs;
use std::sync::mpsc::sync_channel;
use std::sync::Mutex;

use crate::analyzer::ReleaseDetector;
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{Bump, TagPattern};
use crate::error::{ReleaserError, Result};
use crate::git::Repository;
use crate::hooks::CommandRunner;
use crate::project::SubProject;
use crate::release::executor::ReleaseExecutor;

/// What happened to one sub-project
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectOutcome {
    /// A release was committed, tagged and pushed
    Released {
        previous: Version,
        version: Version,
        tag: String,
    },
    /// No release-worthy commits since the last release
    Unchanged { version: Version },
    /// Dry run: the release that would have been made
    Planned {
        current: Version,
        next: Version,
        bump: Bump,
        notes: String,
    },
}

#[derive(Debug)]
pub struct ProjectReport {
    pub name: String,
    pub result: Result<ProjectOutcome>,
}

/// Per-project results of a run, sorted by project name
#[derive(Debug, Default)]
pub struct RunReport {
    pub projects: Vec<ProjectReport>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.projects.iter().any(|p| p.result.is_err())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ReleaserError)> {
        self.projects
            .iter()
            .filter_map(|p| p.result.as_ref().err().map(|e| (p.name.as_str(), e)))
    }

    /// The report, or the failure of the first failing project by name
    pub fn into_result(mut self) -> Result<RunReport> {
        match self.projects.iter().position(|p| p.result.is_err()) {
            Some(index) => {
                let failed = self.projects.remove(index);
                match failed.result {
                    Err(e) => Err(e.in_project(failed.name)),
                    Ok(_) => Ok(self),
                }
            }
            None => Ok(self),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ProjectReport> {
        self.projects.iter().find(|p| p.name == name)
    }
}

/// Releases every sub-project of a monorepo
pub struct Releaser<R: Repository, C: CommandRunner> {
    repo: R,
    runner: C,
    config: Config,
}

impl<R: Repository, C: CommandRunner> Releaser<R, C> {
    pub fn new(repo: R, runner: C, config: Config) -> Self {
        Releaser {
            repo,
            runner,
            config,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn runner(&self) -> &C {
        &self.runner
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Names of the sub-projects that carry a descriptor, sorted
    pub fn discover_projects(&self) -> Result<Vec<String>> {
        let root = self.repo.workdir().join(&self.config.projects_dir);
        if !root.is_dir() {
            return Err(ReleaserError::config(format!(
                "Projects directory '{}' not found",
                root.display()
            )));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().join(&self.config.descriptor_file).is_file() {
                names.push(name);
            } else {
                BoundaryWarning::MissingDescriptor {
                    project: name,
                    descriptor: self.config.descriptor_file.display().to_string(),
                }
                .log();
            }
        }

        names.sort();
        Ok(names)
    }

    /// Release every sub-project and fail with the first failure by name
    pub fn run(&self) -> Result<RunReport> {
        self.run_all()?.into_result()
    }

    /// Release every sub-project concurrently and collect all outcomes.
    ///
    /// Only discovery and setup errors are returned as `Err`; per-project
    /// failures are part of the report.
    pub fn run_all(&self) -> Result<RunReport> {
        let names = self.discover_projects()?;
        if names.is_empty() {
            tracing::info!("no sub-projects found");
            return Ok(RunReport::default());
        }

        let tag_pattern = TagPattern::new(self.config.tag_pattern.clone())?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(names.len().max(1))
            .thread_name(|i| format!("releaser-{}", i))
            .build()?;

        let lock = Mutex::new(());
        let (tx, rx) = sync_channel(names.len());

        pool.scope(|scope| {
            for name in &names {
                let tx = tx.clone();
                let lock = &lock;
                let tag_pattern = &tag_pattern;
                scope.spawn(move |_| {
                    let span = tracing::info_span!("project", name = %name);
                    let _enter = span.enter();

                    let result = self.release_project(name, tag_pattern, lock);
                    if let Err(e) = &result {
                        tracing::error!(error = %e, "release failed");
                    }

                    let _ = tx.send(ProjectReport {
                        name: name.clone(),
                        result,
                    });
                });
            }
        });
        drop(tx);

        let mut projects: Vec<ProjectReport> = rx.into_iter().collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(RunReport { projects })
    }

    fn release_project(
        &self,
        name: &str,
        tag_pattern: &TagPattern,
        lock: &Mutex<()>,
    ) -> Result<ProjectOutcome> {
        let project = SubProject::load(&self.repo, &self.config, tag_pattern, name)?;
        let plan = ReleaseDetector::new(&self.repo, &self.config)?.detect(&project)?;

        if !plan.is_release() {
            tracing::info!(version = %plan.current, "no release-worthy changes");
            return Ok(ProjectOutcome::Unchanged {
                version: plan.current,
            });
        }

        if self.config.dry_run {
            tracing::info!(current = %plan.current, next = %plan.next, bump = %plan.bump, "release planned");
            return Ok(ProjectOutcome::Planned {
                notes: plan.changelog.render(),
                current: plan.current,
                next: plan.next,
                bump: plan.bump,
            });
        }

        let tag = ReleaseExecutor::new(&self.repo, &self.runner, &self.config, lock)
            .release(&project, &plan)?;

        Ok(ProjectOutcome::Released {
            previous: plan.current,
            version: plan.next,
            tag,
        })
    }
}
