//! Release notes built from classified commits
//!
//! A [Changelog] collects commits into three buckets (breaking changes,
//! features, bug fixes), renders them as a Markdown section and splices that
//! section into a project's changelog file.

pub mod links;

pub use links::RemoteLinks;

use chrono::NaiveDate;
use regex::Regex;
use semver::Version;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{ReleaserError, Result};

/// Marker after which new releases are inserted
pub const INSERT_MARKER: &str = "<!-- INSERT COMMENT -->";

/// Preamble of a freshly created changelog file
pub const CHANGELOG_HEADER: &str =
    "# Changelog\n\nAll notable changes to this project will be documented in this file.\n\n";

const BREAKING_HEADER: &str = "⚠ BREAKING CHANGES";
const FEATURES_HEADER: &str = "Features";
const FIXES_HEADER: &str = "Bug Fixes";

/// One changelog line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub message: String,
    pub hash: String,
}

/// Release notes for one sub-project release
#[derive(Debug, Clone)]
pub struct Changelog {
    old_version: Option<Version>,
    new_version: Option<Version>,
    date: NaiveDate,
    links: Option<RemoteLinks>,
    breaking: Vec<Entry>,
    features: Vec<Entry>,
    fixes: Vec<Entry>,
}

impl Default for Changelog {
    fn default() -> Self {
        Self::new()
    }
}

impl Changelog {
    /// Empty changelog dated today
    pub fn new() -> Self {
        Changelog {
            old_version: None,
            new_version: None,
            date: chrono::Local::now().date_naive(),
            links: None,
            breaking: Vec::new(),
            features: Vec::new(),
            fixes: Vec::new(),
        }
    }

    pub fn add_breaking(&mut self, message: impl Into<String>, hash: impl Into<String>) {
        self.breaking.push(Entry {
            message: message.into(),
            hash: hash.into(),
        });
    }

    pub fn add_feature(&mut self, message: impl Into<String>, hash: impl Into<String>) {
        self.features.push(Entry {
            message: message.into(),
            hash: hash.into(),
        });
    }

    pub fn add_fix(&mut self, message: impl Into<String>, hash: impl Into<String>) {
        self.fixes.push(Entry {
            message: message.into(),
            hash: hash.into(),
        });
    }

    pub fn set_old_version(&mut self, version: Version) {
        self.old_version = Some(version);
    }

    pub fn set_new_version(&mut self, version: Version) {
        self.new_version = Some(version);
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Derive links from the repository remote. Unrecognized hosts leave the
    /// changelog without links.
    pub fn set_remote(&mut self, url: &str) {
        self.links = RemoteLinks::from_remote_url(url);
    }

    pub fn has_links(&self) -> bool {
        self.links.is_some()
    }

    pub fn new_version(&self) -> Option<&Version> {
        self.new_version.as_ref()
    }

    pub fn breaking(&self) -> &[Entry] {
        &self.breaking
    }

    pub fn features(&self) -> &[Entry] {
        &self.features
    }

    pub fn fixes(&self) -> &[Entry] {
        &self.fixes
    }

    /// Total number of entries across all buckets
    pub fn len(&self) -> usize {
        self.breaking.len() + self.features.len() + self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the release as Markdown.
    ///
    /// Returns an empty string when there are no entries.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        let version = self
            .new_version
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "Unreleased".to_string());

        // Patch releases get a smaller heading
        let level = match &self.new_version {
            Some(v) if v.patch != 0 => "###",
            _ => "##",
        };

        let title = match (&self.links, &self.old_version) {
            (Some(links), Some(old)) => {
                format!("[{}]({})", version, links.compare_url(&old.to_string(), &version))
            }
            _ => version,
        };

        out.push_str(&format!(
            "{} {} ({})\n\n",
            level,
            title,
            self.date.format("%Y-%m-%d")
        ));

        let pull_request = Regex::new(r"\(#(\d+)\)$").ok();
        self.render_section(&mut out, BREAKING_HEADER, &self.breaking, pull_request.as_ref());
        self.render_section(&mut out, FEATURES_HEADER, &self.features, pull_request.as_ref());
        self.render_section(&mut out, FIXES_HEADER, &self.fixes, pull_request.as_ref());

        out
    }

    fn render_section(
        &self,
        out: &mut String,
        header: &str,
        entries: &[Entry],
        pull_request: Option<&Regex>,
    ) {
        if entries.is_empty() {
            return;
        }

        out.push_str(&format!("### {}\n\n", header));
        for entry in entries {
            out.push_str(&format!(
                "* {} ({})\n",
                self.decorate(&entry.message, pull_request),
                self.hash_reference(&entry.hash)
            ));
        }
        out.push('\n');
    }

    fn decorate(&self, message: &str, pull_request: Option<&Regex>) -> String {
        match (&self.links, pull_request) {
            (Some(links), Some(re)) => re
                .replace(message, |caps: &regex::Captures<'_>| {
                    format!("([#{}]({}))", &caps[1], links.pull_request_url(&caps[1]))
                })
                .into_owned(),
            _ => message.to_string(),
        }
    }

    fn hash_reference(&self, hash: &str) -> String {
        match &self.links {
            Some(links) => format!("[{}]({})", hash, links.commit_url(hash)),
            None => hash.to_string(),
        }
    }

    /// Splice the rendered release into existing changelog content.
    ///
    /// Empty content starts a new file. Returns `None` when non-empty content
    /// lacks [INSERT_MARKER].
    pub fn merge_into(&self, existing: &str) -> Option<String> {
        let base = if existing.is_empty() {
            format!("{}{}\n", CHANGELOG_HEADER, INSERT_MARKER)
        } else {
            existing.to_string()
        };

        let split = base.find(INSERT_MARKER)? + INSERT_MARKER.len();
        let (head, tail) = base.split_at(split);

        // The marker keeps its own line break
        let rest = tail.strip_prefix('\n').unwrap_or(tail);

        Some(format!("{}\n{}{}", head, self.render(), rest_with_gap(rest)))
    }

    /// Merge the rendered release into the changelog file at `path`.
    ///
    /// A missing file is created.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let existing = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let merged = self
            .merge_into(&existing)
            .ok_or_else(|| ReleaserError::MissingPlaceholder(path.to_path_buf()))?;

        fs::write(path, merged)?;
        Ok(())
    }
}

/// Prior releases stay separated from the new one by a blank line
fn rest_with_gap(rest: &str) -> String {
    if rest.is_empty() {
        String::new()
    } else {
        format!("\n{}", rest)
    }
}

impl std::fmt::Display for Changelog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
