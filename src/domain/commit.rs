use regex::Regex;

use crate::config::ConventionalCommitsConfig;
use crate::error::{ReleaserError, Result};

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

/// Conventional commit grammar, compiled once per run.
///
/// Supports formats:
/// - type(scope)!: description
/// - type(scope): description
/// - type!: description
/// - type: description
///
/// Anything else, including a type outside the configured vocabulary, is a
/// parse failure.
#[derive(Debug, Clone)]
pub struct CommitParser {
    header: Regex,
    types: Vec<String>,
    breaking_change_indicators: Vec<String>,
}

impl CommitParser {
    pub fn new(config: &ConventionalCommitsConfig) -> Result<Self> {
        let header = Regex::new(
            r"^(?P<type>[A-Za-z]+)(?:\((?P<scope>[^()\r\n]*)\))?(?P<bang>!)?: (?P<description>.+)",
        )?;

        Ok(CommitParser {
            header,
            types: config.types.iter().map(|t| t.to_lowercase()).collect(),
            breaking_change_indicators: config.breaking_change_indicators.clone(),
        })
    }

    pub fn parse(&self, message: &str) -> Result<ParsedCommit> {
        let captures = self
            .header
            .captures(message)
            .ok_or_else(|| ReleaserError::Commit(first_line(message).to_string()))?;

        let r#type = captures["type"].to_lowercase();
        if !self.types.contains(&r#type) {
            return Err(ReleaserError::Commit(format!(
                "unknown type '{}' in '{}'",
                r#type,
                first_line(message)
            )));
        }

        let scope = captures
            .name("scope")
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());
        let description = captures["description"].trim().to_string();

        let has_footer = message.lines().skip(1).any(|line| {
            self.breaking_change_indicators
                .iter()
                .any(|indicator| line.starts_with(indicator.as_str()))
        });

        Ok(ParsedCommit {
            r#type,
            scope,
            description,
            is_breaking_change: captures.name("bang").is_some() || has_footer,
        })
    }
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}
