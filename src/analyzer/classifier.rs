use crate::config::ConventionalCommitsConfig;
use crate::domain::{Bump, CommitParser, ParsedCommit};
use crate::error::Result;

/// Maps commit messages to version bumps.
///
/// Classification is best-effort by contract: a message that is not valid
/// UTF-8, does not follow the conventional commit grammar, or uses an unknown
/// type is [Bump::None]. It never fails and never aborts a walk.
#[derive(Debug, Clone)]
pub struct CommitClassifier {
    parser: CommitParser,
    minor_types: Vec<String>,
    patch_types: Vec<String>,
}

impl CommitClassifier {
    pub fn new(config: &ConventionalCommitsConfig) -> Result<Self> {
        Ok(CommitClassifier {
            parser: CommitParser::new(config)?,
            minor_types: config.minor_types.iter().map(|t| t.to_lowercase()).collect(),
            patch_types: config.patch_types.iter().map(|t| t.to_lowercase()).collect(),
        })
    }

    /// Classify one raw commit message
    pub fn classify(&self, raw_message: impl AsRef<[u8]>) -> Bump {
        let Ok(message) = std::str::from_utf8(raw_message.as_ref()) else {
            return Bump::None;
        };

        match self.parser.parse(message) {
            Ok(parsed) => self.bump_for(&parsed),
            Err(e) => {
                tracing::trace!(error = %e, "commit not classified");
                Bump::None
            }
        }
    }

    fn bump_for(&self, parsed: &ParsedCommit) -> Bump {
        if parsed.is_breaking_change {
            Bump::Major
        } else if self.minor_types.contains(&parsed.r#type) {
            Bump::Minor
        } else if self.patch_types.contains(&parsed.r#type) {
            Bump::Patch
        } else {
            Bump::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CommitClassifier {
        CommitClassifier::new(&ConventionalCommitsConfig::default()).unwrap()
    }

    #[test]
    fn test_classify_major() {
        assert_eq!(classifier().classify("feat(api)!: redesign endpoint"), Bump::Major);
        assert_eq!(classifier().classify("chore!: drop support for helm 2"), Bump::Major);
    }

    #[test]
    fn test_classify_minor() {
        assert_eq!(classifier().classify("feat(auth): add oauth support"), Bump::Minor);
    }

    #[test]
    fn test_classify_patch() {
        assert_eq!(classifier().classify("fix(ui): button styling"), Bump::Patch);
    }

    #[test]
    fn test_classify_ignores_docs_and_chore() {
        for message in [
            "docs: update readme",
            "chore: update deps",
            "style: format code",
            "test: add tests",
            "refactor: cleanup",
        ] {
            assert_eq!(classifier().classify(message), Bump::None, "{}", message);
        }
    }

    #[test]
    fn test_classify_malformed_is_none() {
        assert_eq!(classifier().classify(""), Bump::None);
        assert_eq!(classifier().classify("Updated stuff"), Bump::None);
        assert_eq!(classifier().classify("Merge pull request #12 from a/b"), Bump::None);
        assert_eq!(classifier().classify(b"\xff\xfe\x00"), Bump::None);
    }

    #[test]
    fn test_classify_with_custom_types() {
        let config = ConventionalCommitsConfig {
            minor_types: vec!["feat".to_string(), "perf".to_string()],
            ..ConventionalCommitsConfig::default()
        };
        let classifier = CommitClassifier::new(&config).unwrap();
        assert_eq!(classifier.classify("perf: cache index"), Bump::Minor);
    }
}
