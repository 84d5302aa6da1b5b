use crate::error::{GitShipError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Semantic version with optional prerelease and build metadata
///
/// Increments never mutate; each returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    inner: semver::Version,
}

impl Version {
    /// Create a plain release version from its triple
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            inner: semver::Version::new(major, minor, patch),
        }
    }

    /// Parse a canonical version string (e.g., "1.2.3" or "2.0.0-rc.1+build.5")
    pub fn parse(input: &str) -> Result<Self> {
        let inner = semver::Version::parse(input.trim())
            .map_err(|e| GitShipError::version_parse(input, e.to_string()))?;
        Ok(Version { inner })
    }

    /// Parse version from a tag string (e.g., "v1.2.3" -> Version(1,2,3))
    pub fn from_tag(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        let clean_tag = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        Self::parse(clean_tag).map_err(|_| {
            GitShipError::version_parse(tag, "expected a tag like v1.2.3")
        })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Prerelease identifiers, empty for a plain release
    pub fn prerelease(&self) -> &str {
        self.inner.pre.as_str()
    }

    /// Build metadata, empty when absent
    pub fn build(&self) -> &str {
        self.inner.build.as_str()
    }

    /// Tag naming this version: always `"v" + version`
    pub fn tag(&self) -> String {
        format!("v{}", self)
    }

    pub fn is_prerelease(&self) -> bool {
        !self.inner.pre.is_empty()
    }

    /// Bump the patch field
    ///
    /// A prerelease of the target patch (1.2.4-rc.1) is finalized instead.
    pub fn increment_patch(&self) -> Self {
        if self.is_prerelease() {
            return self.finalized();
        }
        Version::new(self.major(), self.minor(), self.patch() + 1)
    }

    /// Bump the minor field and reset patch
    pub fn increment_minor(&self) -> Self {
        if self.is_prerelease() && self.patch() == 0 {
            return self.finalized();
        }
        Version::new(self.major(), self.minor() + 1, 0)
    }

    /// Bump the major field and reset minor and patch
    pub fn increment_major(&self) -> Self {
        if self.is_prerelease() && self.minor() == 0 && self.patch() == 0 {
            return self.finalized();
        }
        Version::new(self.major() + 1, 0, 0)
    }

    /// Apply the increment for a release type
    pub fn increment(&self, release_type: ReleaseType) -> Self {
        (release_type.operation())(self)
    }

    fn finalized(&self) -> Self {
        Version::new(self.major(), self.minor(), self.patch())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl FromStr for Version {
    type Err = GitShipError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Version increment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseType {
    Patch,
    Minor,
    Major,
}

/// Increment function selected by a [`ReleaseType`]
pub type IncrementFn = fn(&Version) -> Version;

impl ReleaseType {
    /// The increment operation for this release type
    pub fn operation(self) -> IncrementFn {
        match self {
            ReleaseType::Patch => Version::increment_patch,
            ReleaseType::Minor => Version::increment_minor,
            ReleaseType::Major => Version::increment_major,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Patch => "patch",
            ReleaseType::Minor => "minor",
            ReleaseType::Major => "major",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseType {
    type Err = GitShipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch" => Ok(ReleaseType::Patch),
            "minor" => Ok(ReleaseType::Minor),
            "major" => Ok(ReleaseType::Major),
            _ => Err(GitShipError::version_parse(
                s,
                "release type must be patch, minor or major",
            )),
        }
    }
}
