//! Sub-projects: independently versioned directories of the monorepo

pub mod descriptor;

pub use descriptor::ProjectDescriptor;

use regex::Regex;
use semver::Version;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{parse_version, TagPattern};
use crate::error::{ReleaserError, Result};
use crate::git::Repository;

/// Matches the top-level `version:` line of a version file
pub const VERSION_LINE: &str = r"(?m)^version:[ \t]*(?P<value>\S[^\r\n]*?)[ \t]*(?P<eol>\r?)$";

/// A release candidate, snapshotted once per run
#[derive(Debug, Clone)]
pub struct SubProject {
    /// Directory name, used in tags and commit messages
    pub name: String,
    /// Path relative to the repository root
    pub path: PathBuf,
    /// Absolute directory on disk
    pub dir: PathBuf,
    pub current_version: Version,
    pub descriptor: ProjectDescriptor,
    /// Version file, relative to the repository root
    pub version_file: PathBuf,
    /// Changelog file, relative to the repository root
    pub changelog_file: PathBuf,
    pub tag_pattern: TagPattern,
}

impl SubProject {
    /// Load the sub-project `name` below the configured projects directory.
    ///
    /// Fails with [ReleaserError::DescriptorNotFound] when the directory has
    /// no descriptor file.
    pub fn load<R: Repository + ?Sized>(
        repo: &R,
        config: &Config,
        tag_pattern: &TagPattern,
        name: &str,
    ) -> Result<Self> {
        let path = config.projects_dir.join(name);
        let dir = repo.workdir().join(&path);

        let descriptor_path = dir.join(&config.descriptor_file);
        if !descriptor_path.is_file() {
            return Err(ReleaserError::DescriptorNotFound(
                path.join(&config.descriptor_file),
            ));
        }
        let descriptor = ProjectDescriptor::load(&descriptor_path)?;

        let version_file = path.join(&config.version_file);
        let current_version = match read_version_line(&repo.workdir().join(&version_file))? {
            Some(raw) => parse_version(&raw).map_err(|e| {
                ReleaserError::version(format!("{}: {}", version_file.display(), e))
            })?,
            None => highest_tagged_version(repo, tag_pattern, name)?
                .unwrap_or_else(|| Version::new(0, 0, 0)),
        };

        Ok(SubProject {
            name: name.to_string(),
            changelog_file: path.join(&config.changelog_file),
            path,
            dir,
            current_version,
            descriptor,
            version_file,
            tag_pattern: tag_pattern.clone(),
        })
    }

    /// Release tag for a version of this project
    pub fn tag_for(&self, version: &Version) -> String {
        self.tag_pattern.format(&self.name, version)
    }

    /// Release tag of the current version
    pub fn current_tag(&self) -> String {
        self.tag_for(&self.current_version)
    }
}

/// Value of the `version:` line, or `None` if the file or line is missing
pub fn read_version_line(path: &Path) -> Result<Option<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let re = Regex::new(VERSION_LINE)?;
    Ok(re.captures(&content).map(|caps| strip_comment(&caps["value"]).to_string()))
}

fn strip_comment(value: &str) -> &str {
    value.split(" #").next().unwrap_or(value).trim()
}

/// Rewrite the `version:` line in place, leaving the rest of the file as is.
///
/// Returns `false` when the file has no such line.
pub fn write_version_line(path: &Path, version: &Version) -> Result<bool> {
    let content = fs::read_to_string(path)?;
    let re = Regex::new(VERSION_LINE)?;

    if !re.is_match(&content) {
        return Ok(false);
    }

    // keep the line ending of CRLF files
    let updated = re.replace(&content, |caps: &regex::Captures<'_>| {
        format!("version: {}{}", version, &caps["eol"])
    });
    fs::write(path, updated.as_bytes())?;
    Ok(true)
}

/// Highest version among tags that match the pattern for `name`
fn highest_tagged_version<R: Repository + ?Sized>(
    repo: &R,
    tag_pattern: &TagPattern,
    name: &str,
) -> Result<Option<Version>> {
    let matcher = tag_pattern.matcher(name)?;
    let mut highest: Option<Version> = None;

    for tag in repo.list_tags()? {
        let Some(captures) = matcher.captures(&tag) else {
            continue;
        };

        match parse_version(&captures[1]) {
            Ok(version) => {
                if highest.as_ref().map_or(true, |h| version > *h) {
                    highest = Some(version);
                }
            }
            Err(e) => BoundaryWarning::UnparsableTag {
                tag: tag.clone(),
                reason: e.to_string(),
            }
            .log(),
        }
    }

    Ok(highest)
}
