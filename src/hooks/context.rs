use regex::Regex;
use std::collections::HashMap;

use crate::error::{ReleaserError, Result};

/// Points in the release where a descriptor command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    SetNewVersion,
    PublishNewVersion,
}

impl HookStage {
    /// Descriptor key of the command
    pub fn name(&self) -> &'static str {
        match self {
            HookStage::SetNewVersion => "setNewVersion",
            HookStage::PublishNewVersion => "publishNewVersion",
        }
    }
}

/// Values available to descriptor commands
#[derive(Debug, Clone)]
pub struct HookContext {
    pub project_name: String,
    /// Sub-project path relative to the repository root
    pub project_path: String,
    pub next_version: String,
    pub tag: String,
}

impl HookContext {
    /// Substitute `{{nextVersion}}`, `{{projectName}}` and `{{projectPath}}`.
    ///
    /// Placeholders may carry a leading dot and inner spaces
    /// (`{{ .nextVersion }}`). Any other placeholder is a template error.
    pub fn expand(&self, template: &str) -> Result<String> {
        let placeholder = Regex::new(r"\{\{\s*\.?(\w+)\s*\}\}")?;

        let mut out = String::with_capacity(template.len());
        let mut last = 0;
        for caps in placeholder.captures_iter(template) {
            let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = self.lookup(key.as_str()).ok_or_else(|| {
                ReleaserError::template(format!(
                    "unknown placeholder '{}' in `{}`",
                    whole.as_str(),
                    template
                ))
            })?;

            out.push_str(&template[last..whole.start()]);
            out.push_str(value);
            last = whole.end();
        }
        out.push_str(&template[last..]);

        Ok(out)
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "nextVersion" => Some(&self.next_version),
            "projectName" => Some(&self.project_name),
            "projectPath" => Some(&self.project_path),
            _ => None,
        }
    }

    /// Environment exported to descriptor commands
    ///
    /// Maps context fields to RELEASER_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("RELEASER_PROJECT_NAME".to_string(), self.project_name.clone());
        env.insert("RELEASER_PROJECT_PATH".to_string(), self.project_path.clone());
        env.insert("RELEASER_NEXT_VERSION".to_string(), self.next_version.clone());
        env.insert("RELEASER_TAG".to_string(), self.tag.clone());

        env
    }
}
