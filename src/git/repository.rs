use crate::error::{ReleaserError, Result};
use crate::git::{pathspec, CommitInfo};
use git2::{
    Commit, Cred, CredentialType, DiffOptions, ErrorCode, ObjectType, Oid, PushOptions,
    RemoteCallbacks, Repository as Git2Repo, Sort,
};
use std::cell::RefCell;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

/// Credential attempts before giving up on a remote
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// git2-backed repository.
///
/// `git2::Repository` is `Send` but not `Sync`, so every operation opens its
/// own handle on the working tree. Handles are cheap and this lets concurrent
/// release tasks read history in parallel.
pub struct Git2Repository {
    workdir: PathBuf,
}

impl Git2Repository {
    /// Open or discover a git repository with a working tree
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| ReleaserError::config("Bare repositories are not supported"))?
            .to_path_buf();

        Ok(Git2Repository { workdir })
    }

    fn handle(&self) -> Result<Git2Repo> {
        Ok(Git2Repo::open(&self.workdir)?)
    }
}

/// Whether a commit changed anything below `spec` compared to its first parent
fn touches(repo: &Git2Repo, commit: &Commit<'_>, spec: &str) -> Result<bool> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parent(0) {
        Ok(parent) => Some(parent.tree()?),
        Err(_) => None,
    };

    let mut options = DiffOptions::new();
    options.pathspec(spec);

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut options))?;
    let changed = diff.deltas().next().is_some();
    Ok(changed)
}

fn remote_callbacks<'a>(repo: &Git2Repo) -> Result<RemoteCallbacks<'a>> {
    let config = repo.config()?;
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();

    callbacks.credentials(move |url, username_from_url, allowed_types| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }

        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                if attempts == 1 {
                    return Ok(cred);
                }
            }

            // Try different key types in order of preference
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
                return Ok(cred);
            }
        }

        Cred::default()
    });

    Ok(callbacks)
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn walk_path(
        &self,
        path: &Path,
        visit: &mut dyn FnMut(&CommitInfo) -> ControlFlow<()>,
    ) -> Result<()> {
        let repo = self.handle()?;
        let spec = pathspec(path);

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = repo.find_commit(oid)?;

            if !touches(&repo, &commit, &spec)? {
                continue;
            }

            let info = CommitInfo::from_bytes(
                oid.to_string(),
                commit.message_bytes().to_vec(),
                commit.author().name().unwrap_or("unknown"),
            );

            if visit(&info).is_break() {
                break;
            }
        }

        Ok(())
    }

    fn find_tag_target(&self, tag_name: &str) -> Result<Option<String>> {
        let repo = self.handle()?;
        let reference_name = format!("refs/tags/{}", tag_name);

        let target = match repo.find_reference(&reference_name) {
            Ok(reference) => {
                let commit = reference
                    .peel_to_commit()
                    .map_err(|e| ReleaserError::tag(format!("Cannot peel tag '{}': {}", tag_name, e)))?;
                Some(commit.id().to_string())
            }
            Err(e) if e.code() == ErrorCode::NotFound => None,
            Err(e) => {
                return Err(ReleaserError::tag(format!(
                    "Cannot find tag '{}': {}",
                    tag_name, e
                )))
            }
        };

        Ok(target)
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let repo = self.handle()?;
        let tags = repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        let repo = self.handle()?;

        let url = match repo.find_remote(remote) {
            Ok(found) => found.url().map(|url| url.to_string()),
            Err(e) if e.code() == ErrorCode::NotFound => None,
            Err(e) => {
                return Err(ReleaserError::remote(format!(
                    "Cannot find remote '{}': {}",
                    remote, e
                )))
            }
        };

        Ok(url)
    }

    fn current_branch(&self) -> Result<String> {
        let repo = self.handle()?;
        let head = repo.head()?;

        if !head.is_branch() {
            return Err(ReleaserError::config("HEAD is detached; check out a branch to release"));
        }

        let branch = head
            .shorthand()
            .map(|name| name.to_string())
            .ok_or_else(|| ReleaserError::config("Branch name is not valid UTF-8"))?;

        Ok(branch)
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        let repo = self.handle()?;
        let mut index = repo.index()?;

        for path in paths {
            index.add_path(path)?;
        }

        index.write()?;
        Ok(())
    }

    fn stage_tracked(&self, dir: &Path) -> Result<()> {
        let repo = self.handle()?;
        let mut index = repo.index()?;

        index.update_all([pathspec(dir)], None)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let repo = self.handle()?;
        let mut index = repo.index()?;

        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let parent = repo.head()?.peel_to_commit()?;

        if parent.tree_id() == tree_id {
            return Err(ReleaserError::Git(git2::Error::from_str(
                "nothing to commit: index matches HEAD",
            )));
        }

        let signature = repo.signature()?;
        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        Ok(oid.to_string())
    }

    fn create_annotated_tag(&self, name: &str, target: &str, message: &str) -> Result<()> {
        if let Some(existing) = self.find_tag_target(name)? {
            if existing == target {
                return Ok(());
            }
            return Err(ReleaserError::tag(format!(
                "Tag '{}' already exists at {}",
                name, existing
            )));
        }

        let repo = self.handle()?;
        let oid = Oid::from_str(target)?;
        let object = repo
            .find_object(oid, Some(ObjectType::Commit))
            .map_err(|e| ReleaserError::tag(format!("Cannot find object: {}", e)))?;
        let signature = repo.signature()?;

        repo.tag(name, &object, &signature, message, false)
            .map_err(|e| ReleaserError::tag(format!("Cannot create tag: {}", e)))?;

        Ok(())
    }

    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()> {
        let repo = self.handle()?;
        let mut remote_handle = repo
            .find_remote(remote)
            .map_err(|e| ReleaserError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let rejected: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let mut callbacks = remote_callbacks(&repo)?;
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                rejected
                    .borrow_mut()
                    .push(format!("{}: {}", refname, status));
            }
            Ok(())
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote_handle
            .push(refspecs, Some(&mut push_options))
            .map_err(|e| ReleaserError::remote(format!("Push to '{}' failed: {}", remote, e)))?;

        let rejected = rejected.borrow();
        if !rejected.is_empty() {
            return Err(ReleaserError::remote(format!(
                "Push to '{}' rejected: {}",
                remote,
                rejected.join(", ")
            )));
        }

        Ok(())
    }
}
