use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::analyzer::ReleasePlan;
use crate::config::Config;
use crate::error::Result;
use crate::git::{pathspec, Repository};
use crate::hooks::{CommandRunner, HookContext, HookStage};
use crate::project::{write_version_line, SubProject};

/// Applies a release plan: version file, changelog, commit, tag, push and
/// publish. Every failure aborts the remaining steps; nothing is rolled back.
pub struct ReleaseExecutor<'a, R: Repository + ?Sized, C: CommandRunner + ?Sized> {
    repo: &'a R,
    runner: &'a C,
    config: &'a Config,
    /// Serializes repository writes across sibling releases
    lock: &'a Mutex<()>,
}

impl<'a, R: Repository + ?Sized, C: CommandRunner + ?Sized> ReleaseExecutor<'a, R, C> {
    pub fn new(repo: &'a R, runner: &'a C, config: &'a Config, lock: &'a Mutex<()>) -> Self {
        ReleaseExecutor {
            repo,
            runner,
            config,
            lock,
        }
    }

    /// Release `project` at `plan.next` and return the created tag
    pub fn release(&self, project: &SubProject, plan: &ReleasePlan) -> Result<String> {
        let tag = project.tag_for(&plan.next);
        let context = HookContext {
            project_name: project.name.clone(),
            project_path: pathspec(&project.path),
            next_version: plan.next.to_string(),
            tag: tag.clone(),
        };

        let ran_command = self.set_version(project, plan, &context)?;

        let changelog_path = self.repo.workdir().join(&project.changelog_file);
        plan.changelog.write_to(&changelog_path)?;
        tracing::debug!(path = %project.changelog_file.display(), "changelog updated");

        {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.commit_and_push(project, plan, &tag, ran_command)?;
        }

        if let Some(command) = project.descriptor.publish_command() {
            self.run_hook(HookStage::PublishNewVersion, command, project, &context)?;
        }

        Ok(tag)
    }

    /// Returns `true` when a descriptor command set the version
    fn set_version(
        &self,
        project: &SubProject,
        plan: &ReleasePlan,
        context: &HookContext,
    ) -> Result<bool> {
        if let Some(command) = project.descriptor.set_new_version_command() {
            self.run_hook(HookStage::SetNewVersion, command, project, context)?;
            return Ok(true);
        }

        let version_path = self.repo.workdir().join(&project.version_file);
        if version_path.is_file() && write_version_line(&version_path, &plan.next)? {
            tracing::debug!(path = %project.version_file.display(), version = %plan.next, "version updated");
        } else {
            tracing::debug!(
                path = %project.version_file.display(),
                "no version line, version recorded by tag only"
            );
        }
        Ok(false)
    }

    fn commit_and_push(
        &self,
        project: &SubProject,
        plan: &ReleasePlan,
        tag: &str,
        ran_command: bool,
    ) -> Result<()> {
        let mut paths: Vec<PathBuf> = vec![project.changelog_file.clone()];
        if self.repo.workdir().join(&project.version_file).is_file() {
            paths.push(project.version_file.clone());
        }
        self.repo.stage(&paths)?;
        if ran_command {
            self.repo.stage_tracked(&project.path)?;
        }

        let summary = release_summary(&project.name, &plan.next.to_string());
        let message = format!("{}\n\n{}", summary, plan.changelog.render().trim_end());
        let commit_id = self.repo.commit(&message)?;
        tracing::info!(commit = %commit_id, "{}", summary);

        self.repo.create_annotated_tag(tag, &commit_id, &summary)?;

        let branch = self.repo.current_branch()?;
        let refspecs = vec![
            format!("refs/heads/{0}:refs/heads/{0}", branch),
            format!("refs/tags/{0}:refs/tags/{0}", tag),
        ];
        self.repo.push(&self.config.remote, &refspecs)?;
        tracing::info!(tag, remote = %self.config.remote, "pushed release");

        Ok(())
    }

    fn run_hook(
        &self,
        stage: HookStage,
        template: &str,
        project: &SubProject,
        context: &HookContext,
    ) -> Result<()> {
        let command = context.expand(template)?;
        tracing::info!(hook = stage.name(), command = %command, "running descriptor command");
        self.runner
            .run(&command, &project.dir, &context.to_env_vars())
    }
}

/// First line of the release commit
pub fn release_summary(name: &str, version: &str) -> String {
    format!("chore({}): release {} [skip ci]", name, version)
}
