use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "releaser.toml";

/// Represents the complete configuration for semantic-releaser.
///
/// Describes where sub-projects live, which files carry their version and
/// changelog, how release tags are named, and how commits are classified.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Directory (relative to the repository root) whose children are sub-projects
    #[serde(default = "default_projects_dir")]
    pub projects_dir: PathBuf,

    /// Descriptor file, relative to each sub-project, marking it as releasable
    #[serde(default = "default_descriptor_file")]
    pub descriptor_file: PathBuf,

    /// File holding the `version: <value>` line, relative to each sub-project
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    /// Changelog file, relative to each sub-project
    #[serde(default = "default_changelog_file")]
    pub changelog_file: PathBuf,

    /// Tag naming pattern with `{project}` (or `{chart}`) and `{version}` placeholders
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    /// Remote used for links and pushes
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Detect and report only; never write, commit, tag or push
    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,
}

fn default_projects_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_descriptor_file() -> PathBuf {
    PathBuf::from("Chart.yaml")
}

fn default_version_file() -> PathBuf {
    PathBuf::from("Chart.yaml")
}

fn default_changelog_file() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_tag_pattern() -> String {
    "{project}-{version}".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Returns the default list of conventional commit types.
fn default_commit_types() -> Vec<String> {
    vec![
        "build".to_string(),
        "chore".to_string(),
        "ci".to_string(),
        "docs".to_string(),
        "feat".to_string(),
        "fix".to_string(),
        "perf".to_string(),
        "refactor".to_string(),
        "revert".to_string(),
        "style".to_string(),
        "test".to_string(),
    ]
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    vec![
        "BREAKING CHANGE:".to_string(),
        "BREAKING-CHANGE:".to_string(),
    ]
}

fn default_minor_types() -> Vec<String> {
    vec!["feat".to_string()]
}

fn default_patch_types() -> Vec<String> {
    vec!["fix".to_string()]
}

/// Configuration for conventional commit analysis.
///
/// `types` is the grammar's vocabulary: a message using any other type does
/// not parse. `minor_types` and `patch_types` select which parsed types bump
/// the version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_commit_types")]
    pub types: Vec<String>,

    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,

    #[serde(default = "default_minor_types")]
    pub minor_types: Vec<String>,

    #[serde(default = "default_patch_types")]
    pub patch_types: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            types: default_commit_types(),
            breaking_change_indicators: default_breaking_change_indicators(),
            minor_types: default_minor_types(),
            patch_types: default_patch_types(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            projects_dir: default_projects_dir(),
            descriptor_file: default_descriptor_file(),
            version_file: default_version_file(),
            changelog_file: default_changelog_file(),
            tag_pattern: default_tag_pattern(),
            remote: default_remote(),
            dry_run: false,
            conventional_commits: ConventionalCommitsConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releaser.toml` in current directory
/// 3. `.releaser.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".releaser.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
