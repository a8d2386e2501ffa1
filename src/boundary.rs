use std::fmt;

/// Non-fatal conditions met while scanning sub-projects and their history.
/// They change behavior (skip a directory, omit links, walk all history) but
/// never fail a release.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Directory has no descriptor file, so it is not a release candidate
    MissingDescriptor { project: String, descriptor: String },
    /// Tag matches the naming pattern but its version part is not semver
    UnparsableTag { tag: String, reason: String },
    /// Remote is not a recognized host; changelog entries get no links
    UnrecognizedRemote { url: String },
    /// No remote with this name is configured
    MissingRemote { remote: String },
    /// The current version has no release tag; all history is considered
    NoReleaseTag { tag: String },
}

impl BoundaryWarning {
    /// Emit the warning through `tracing` at a level matching its impact
    pub fn log(&self) {
        match self {
            BoundaryWarning::MissingDescriptor { .. } | BoundaryWarning::NoReleaseTag { .. } => {
                tracing::debug!("{}", self)
            }
            BoundaryWarning::UnrecognizedRemote { .. } | BoundaryWarning::MissingRemote { .. } => {
                tracing::info!("{}", self)
            }
            BoundaryWarning::UnparsableTag { .. } => tracing::warn!("{}", self),
        }
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::MissingDescriptor {
                project,
                descriptor,
            } => {
                write!(f, "Skipping '{}': no {} found", project, descriptor)
            }
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::UnrecognizedRemote { url } => {
                write!(f, "Remote '{}' is not a recognized host, changelog links disabled", url)
            }
            BoundaryWarning::MissingRemote { remote } => {
                write!(f, "No remote named '{}', changelog links disabled", remote)
            }
            BoundaryWarning::NoReleaseTag { tag } => {
                write!(f, "Release tag '{}' not found, considering full history", tag)
            }
        }
    }
}
