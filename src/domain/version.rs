use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;

/// Magnitude of a semantic version increment.
///
/// Variants are ordered by precedence, so the highest bump of a commit range
/// is simply the maximum: `None < Patch < Minor < Major`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Bump {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl Bump {
    pub fn name(&self) -> &'static str {
        match self {
            Bump::None => "none",
            Bump::Patch => "patch",
            Bump::Minor => "minor",
            Bump::Major => "major",
        }
    }
}

impl fmt::Display for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a version string, tolerating a leading `v`/`V` and surrounding quotes.
pub fn parse_version(raw: &str) -> crate::error::Result<Version> {
    let clean = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_start_matches(['v', 'V']);
    Ok(Version::parse(clean)?)
}

/// Applies a bump to a version.
///
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1, unless the version is a pre-release, which is
///   released as-is
/// - **None**: unchanged
///
/// Pre-release and build metadata never survive an increment.
pub fn increment(version: &Version, bump: Bump) -> Version {
    let stable = |major, minor, patch| Version {
        major,
        minor,
        patch,
        pre: Prerelease::EMPTY,
        build: BuildMetadata::EMPTY,
    };

    match bump {
        Bump::Major => stable(version.major + 1, 0, 0),
        Bump::Minor => stable(version.major, version.minor + 1, 0),
        Bump::Patch if !version.pre.is_empty() || !version.build.is_empty() => {
            stable(version.major, version.minor, version.patch)
        }
        Bump::Patch => stable(version.major, version.minor, version.patch + 1),
        Bump::None => version.clone(),
    }
}
