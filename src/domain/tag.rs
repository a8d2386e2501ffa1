use regex::Regex;
use semver::Version;

use crate::error::{ReleaserError, Result};

/// Tag naming pattern (e.g., "{project}-{version}", "{chart}/v{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains("{version}") {
            return Err(ReleaserError::tag(format!(
                "Pattern '{}' must contain {{version}} placeholder",
                pattern
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a tag for a project and version.
    /// Example: pattern="{project}-{version}", project="nginx", version="1.2.3" -> "nginx-1.2.3"
    pub fn format(&self, project: &str, version: &Version) -> String {
        self.pattern
            .replace("{project}", project)
            .replace("{chart}", project)
            .replace("{version}", &version.to_string())
    }

    /// Compile an anchored matcher whose single capture group is the version
    /// part of a tag belonging to `project`.
    pub fn matcher(&self, project: &str) -> Result<Regex> {
        let escaped_project = regex::escape(project);
        let regex_pattern = regex::escape(&self.pattern)
            .replace(r"\{project\}", &escaped_project)
            .replace(r"\{chart\}", &escaped_project)
            .replace(r"\{version\}", "(.+)");

        Ok(Regex::new(&format!("^{}$", regex_pattern))?)
    }
}
