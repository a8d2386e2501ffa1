use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Command line arguments. Every setting can also come from the environment;
/// both override the configuration file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "semantic-releaser",
    version,
    about = "Release independently versioned sub-projects of a monorepo from conventional commits"
)]
pub struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "PROJECTS_DIR", help = "Directory whose children are sub-projects")]
    pub projects_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "GIT_TAG_PATTERN",
        help = "Tag pattern with {project} and {version} placeholders"
    )]
    pub tag_pattern: Option<String>,

    #[arg(long, env = "DESCRIPTOR_FILE", help = "Descriptor file marking a sub-project")]
    pub descriptor_file: Option<PathBuf>,

    #[arg(long, env = "VERSION_FILE", help = "File holding the `version:` line")]
    pub version_file: Option<PathBuf>,

    #[arg(long, env = "CHANGELOG_FILE", help = "Changelog file of each sub-project")]
    pub changelog_file: Option<PathBuf>,

    #[arg(long, env = "GIT_REMOTE", help = "Remote to push releases to")]
    pub remote: Option<String>,

    #[arg(long, env = "DRY_RUN", help = "Preview releases without making changes")]
    pub dry_run: bool,

    #[arg(long, default_value = "info", help = "Log level when RUST_LOG is unset")]
    pub log_level: String,
}

impl Args {
    /// Override configuration values with the ones given on the command line
    pub fn apply(&self, config: &mut Config) {
        if let Some(projects_dir) = &self.projects_dir {
            config.projects_dir = projects_dir.clone();
        }
        if let Some(tag_pattern) = &self.tag_pattern {
            config.tag_pattern = tag_pattern.clone();
        }
        if let Some(descriptor_file) = &self.descriptor_file {
            config.descriptor_file = descriptor_file.clone();
        }
        if let Some(version_file) = &self.version_file {
            config.version_file = version_file.clone();
        }
        if let Some(changelog_file) = &self.changelog_file {
            config.changelog_file = changelog_file.clone();
        }
        if let Some(remote) = &self.remote {
            config.remote = remote.clone();
        }
        if self.dry_run {
            config.dry_run = true;
        }
    }
}
