use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Sub-project descriptor.
///
/// Only the `commands` block is read; every other key is ignored so a chart's
/// `Chart.yaml` can serve as its own descriptor.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProjectDescriptor {
    #[serde(default)]
    pub commands: DescriptorCommands,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorCommands {
    /// Replaces the built-in `version:` rewrite
    #[serde(default)]
    pub set_new_version: Option<String>,

    /// Runs after the release has been pushed
    #[serde(default)]
    pub publish_new_version: Option<String>,
}

impl ProjectDescriptor {
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(ProjectDescriptor::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn set_new_version_command(&self) -> Option<&str> {
        non_blank(self.commands.set_new_version.as_deref())
    }

    pub fn publish_command(&self) -> Option<&str> {
        non_blank(self.commands.publish_new_version.as_deref())
    }
}

fn non_blank(command: Option<&str>) -> Option<&str> {
    command.filter(|c| !c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let descriptor = ProjectDescriptor::parse(
            "commands:\n  setNewVersion: npm version {{nextVersion}}\n  publishNewVersion: npm publish\n",
        )
        .unwrap();
        assert_eq!(
            descriptor.set_new_version_command(),
            Some("npm version {{nextVersion}}")
        );
        assert_eq!(descriptor.publish_command(), Some("npm publish"));
    }

    #[test]
    fn test_chart_yaml_is_a_descriptor() {
        let descriptor = ProjectDescriptor::parse(
            "apiVersion: v2\nname: nginx\nversion: 1.0.0\ndependencies:\n  - name: common\n    version: 2.x\n",
        )
        .unwrap();
        assert_eq!(descriptor, ProjectDescriptor::default());
    }

    #[test]
    fn test_blank_commands_are_absent() {
        let descriptor = ProjectDescriptor::parse("commands:\n  publishNewVersion: \"  \"\n").unwrap();
        assert_eq!(descriptor.publish_command(), None);
        assert_eq!(ProjectDescriptor::parse("").unwrap(), ProjectDescriptor::default());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(ProjectDescriptor::parse("commands: [unclosed").is_err());
    }
}
