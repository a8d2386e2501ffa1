use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for semantic-releaser operations
#[derive(Error, Debug)]
pub enum ReleaserError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Commit message is not a conventional commit: {0}")]
    Commit(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Project descriptor not found: {}", .0.display())]
    DescriptorNotFound(PathBuf),

    #[error("Changelog {} is missing the `<!-- INSERT COMMENT -->` placeholder", .0.display())]
    MissingPlaceholder(PathBuf),

    #[error("Command `{command}` failed ({status})\n\nSTDOUT:\n\n{stdout}\n\nSTDERR:\n\n{stderr}")]
    Command {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("Project '{name}' failed: {source}")]
    Project {
        name: String,
        #[source]
        source: Box<ReleaserError>,
    },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid semantic version: {0}")]
    Semver(#[from] semver::Error),

    #[error("Descriptor parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in semantic-releaser
pub type Result<T> = std::result::Result<T, ReleaserError>;

impl ReleaserError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaserError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaserError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaserError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaserError::Remote(msg.into())
    }

    /// Create a template error with context
    pub fn template(msg: impl Into<String>) -> Self {
        ReleaserError::Template(msg.into())
    }

    /// Attach the failing sub-project's name
    pub fn in_project(self, name: impl Into<String>) -> Self {
        ReleaserError::Project {
            name: name.into(),
            source: Box::new(self),
        }
    }
}
