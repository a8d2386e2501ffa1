//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations the
//! releaser needs, allowing for multiple implementations including a real
//! repository and a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! # Usage
//!
//! Detection and release code depends on the [Repository] trait rather than
//! on concrete implementations.
//!
//! ```rust
//! # use semantic_releaser::git::Repository;
//! # use std::ops::ControlFlow;
//! # use std::path::Path;
//! # fn example<R: Repository>(repo: &R) -> semantic_releaser::Result<()> {
//! repo.walk_path(Path::new("charts/nginx"), &mut |commit| {
//!     println!("{} {}", commit.short_id(), commit.summary());
//!     ControlFlow::Continue(())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

/// Length of the abbreviated commit hash used in changelogs
pub const SHORT_HASH_LEN: usize = 7;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub id: String,
    /// The full commit message, decoded lossily for display
    pub message: String,
    /// The commit message exactly as stored
    pub raw_message: Vec<u8>,
    /// The commit author
    pub author: String,
}

impl CommitInfo {
    /// Build from a stored message; `message` is its lossy UTF-8 decoding
    pub fn from_bytes(id: impl Into<String>, raw_message: Vec<u8>, author: impl Into<String>) -> Self {
        CommitInfo {
            id: id.into(),
            message: String::from_utf8_lossy(&raw_message).into_owned(),
            raw_message,
            author: author.into(),
        }
    }

    /// Abbreviated hash
    pub fn short_id(&self) -> &str {
        self.id.get(..SHORT_HASH_LEN).unwrap_or(&self.id)
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// First line of the stored message, undecoded
    pub fn summary_bytes(&self) -> &[u8] {
        let line = self
            .raw_message
            .split(|b| *b == b'\n')
            .next()
            .unwrap_or_default();
        line.strip_suffix(b"\r").unwrap_or(line)
    }
}

/// Common git operation trait for abstraction
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync`: one repository value is shared by
/// every per-project release task. Implementations do not serialize writes
/// themselves; callers hold the run-wide release lock around
/// stage/commit/tag/push.
///
/// ## Paths
///
/// Paths are relative to the repository working directory.
pub trait Repository: Send + Sync {
    /// Root of the working tree
    fn workdir(&self) -> &Path;

    /// Visit commits reachable from HEAD that touch `path`, newest first.
    ///
    /// The walk ends early when `visit` returns [ControlFlow::Break].
    fn walk_path(
        &self,
        path: &Path,
        visit: &mut dyn FnMut(&CommitInfo) -> ControlFlow<()>,
    ) -> Result<()>;

    /// Commit hash a tag points at (annotated tags are peeled), or `None` if
    /// the tag does not exist
    fn find_tag_target(&self, tag_name: &str) -> Result<Option<String>>;

    /// All tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// First URL of a remote, or `None` if the remote is not configured
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    /// Short name of the checked out branch
    fn current_branch(&self) -> Result<String>;

    /// Add files to the index
    fn stage(&self, paths: &[PathBuf]) -> Result<()>;

    /// Refresh the index for every tracked file below `dir`
    fn stage_tracked(&self, dir: &Path) -> Result<()>;

    /// Commit the index on top of HEAD and return the new commit hash
    fn commit(&self, message: &str) -> Result<String>;

    /// Create an annotated tag at `target`. Re-creating an identical tag is a
    /// no-op; a same-named tag elsewhere is an error.
    fn create_annotated_tag(&self, name: &str, target: &str, message: &str) -> Result<()>;

    /// Push refspecs to a remote without forcing; any rejected reference fails
    /// the push
    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()>;
}

/// Convert a relative path into a git pathspec (forward slashes)
pub fn pathspec(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_and_summary() {
        let info = CommitInfo::from_bytes(
            "0123456789abcdef0123456789abcdef01234567",
            b"fix: a\n\nbody".to_vec(),
            "Test",
        );
        assert_eq!(info.short_id(), "0123456");
        assert_eq!(info.summary(), "fix: a");
        assert_eq!(info.summary_bytes(), b"fix: a");
    }

    #[test]
    fn test_short_id_of_short_hash() {
        let info = CommitInfo::from_bytes("abc", Vec::new(), "");
        assert_eq!(info.short_id(), "abc");
        assert_eq!(info.summary(), "");
        assert_eq!(info.summary_bytes(), b"");
    }

    #[test]
    fn test_summary_bytes_keep_invalid_utf8() {
        let info = CommitInfo::from_bytes("abc", b"fix: \xff\r\nbody".to_vec(), "Test");
        assert_eq!(info.summary_bytes(), b"fix: \xff");
        assert_eq!(info.summary(), "fix: \u{fffd}");
    }
}
