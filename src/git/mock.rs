use crate::error::{ReleaserError, Result};
use crate::git::{CommitInfo, Repository};
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A commit in the mock history together with the paths it changed
#[derive(Debug, Clone)]
struct MockCommit {
    info: CommitInfo,
    paths: Vec<PathBuf>,
}

/// Mock repository for testing without actual git operations.
///
/// History is kept newest first. Write operations are recorded as readable
/// strings (`"stage charts/a/CHANGELOG.md"`, `"commit ..."`, `"tag ..."`,
/// `"push ..."`) and can be inspected with [MockRepository::operations].
pub struct MockRepository {
    workdir: PathBuf,
    commits: Vec<MockCommit>,
    tags: Mutex<HashMap<String, String>>,
    remotes: HashMap<String, String>,
    branch: String,
    operations: Mutex<Vec<String>>,
    fail_push: bool,
}

impl MockRepository {
    /// Create a new empty mock repository rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            commits: Vec::new(),
            tags: Mutex::new(HashMap::new()),
            remotes: HashMap::new(),
            branch: "main".to_string(),
            operations: Mutex::new(Vec::new()),
            fail_push: false,
        }
    }

    /// Record a new commit on top of history; returns its generated hash
    pub fn add_commit<P: AsRef<Path>>(&mut self, message: &str, paths: &[P]) -> String {
        self.add_raw_commit(message.as_bytes(), paths)
    }

    /// Like [MockRepository::add_commit] for messages that need not be UTF-8
    pub fn add_raw_commit<P: AsRef<Path>>(&mut self, message: &[u8], paths: &[P]) -> String {
        let id = format!("{:040x}", self.commits.len() + 1);
        self.commits.insert(
            0,
            MockCommit {
                info: CommitInfo::from_bytes(id.clone(), message.to_vec(), "Test Author"),
                paths: paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
            },
        );
        id
    }

    /// Add a tag pointing to a commit hash
    pub fn add_tag(&mut self, name: impl Into<String>, target: impl Into<String>) {
        if let Ok(mut tags) = self.tags.lock() {
            tags.insert(name.into(), target.into());
        }
    }

    /// Configure a remote URL
    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }

    /// Make every push fail as if the remote rejected it
    pub fn reject_pushes(&mut self) {
        self.fail_push = true;
    }

    /// Recorded write operations, in call order
    pub fn operations(&self) -> Vec<String> {
        self.operations
            .lock()
            .map(|ops| ops.clone())
            .unwrap_or_default()
    }

    fn record(&self, operation: String) {
        if let Ok(mut ops) = self.operations.lock() {
            ops.push(operation);
        }
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn walk_path(
        &self,
        path: &Path,
        visit: &mut dyn FnMut(&CommitInfo) -> ControlFlow<()>,
    ) -> Result<()> {
        for commit in &self.commits {
            if !commit.paths.iter().any(|p| p.starts_with(path)) {
                continue;
            }
            if visit(&commit.info).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn find_tag_target(&self, tag_name: &str) -> Result<Option<String>> {
        let tags = self
            .tags
            .lock()
            .map_err(|_| ReleaserError::tag("mock tag store poisoned"))?;
        Ok(tags.get(tag_name).cloned())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self
            .tags
            .lock()
            .map_err(|_| ReleaserError::tag("mock tag store poisoned"))?;
        let mut names: Vec<String> = tags.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(remote).cloned())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            self.record(format!("stage {}", crate::git::pathspec(path)));
        }
        Ok(())
    }

    fn stage_tracked(&self, dir: &Path) -> Result<()> {
        self.record(format!("stage-tracked {}", crate::git::pathspec(dir)));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let summary = message.lines().next().unwrap_or_default();
        self.record(format!("commit {}", summary));
        Ok(format!("{:040x}", 0xc0ffee_u64 + self.operations().len() as u64))
    }

    fn create_annotated_tag(&self, name: &str, target: &str, _message: &str) -> Result<()> {
        let mut tags = self
            .tags
            .lock()
            .map_err(|_| ReleaserError::tag("mock tag store poisoned"))?;
        match tags.get(name) {
            Some(existing) if existing != target => {
                return Err(ReleaserError::tag(format!(
                    "Tag '{}' already exists at {}",
                    name, existing
                )))
            }
            _ => {
                tags.insert(name.to_string(), target.to_string());
            }
        }
        drop(tags);
        self.record(format!("tag {}", name));
        Ok(())
    }

    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()> {
        if self.fail_push {
            return Err(ReleaserError::remote(format!(
                "Push to '{}' rejected: non-fast-forward",
                remote
            )));
        }
        self.record(format!("push {} {}", remote, refspecs.join(" ")));
        Ok(())
    }
}
