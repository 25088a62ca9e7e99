//! Version values, version specifiers and the version matcher.
//!
//! Relationship declarations reference other resources with a version
//! specifier. The accepted forms are:
//!
//! - an exact version string (`1.0.0`, or anything that is not a pattern)
//! - `latest`, or no version at all
//! - caret ranges `^X.Y.Z`: same major, at least `X.Y.Z`
//! - tilde ranges `~X.Y.Z`: same major and minor, at least `X.Y.Z`
//! - x-patterns `1.x`, `1.2.x`, `*`: wildcard components match anything
//!
//! Exact matching is plain string equality. Every other comparison goes
//! through [`Version::coerce`], so a candidate that cannot be read as a
//! numeric version only ever matches exactly.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// A numeric `major.minor.patch` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parses one to three dot-separated numeric components. Missing
    /// components default to zero, so `1.2` reads as `1.2.0`.
    pub fn parse(s: &str) -> Option<Version> {
        let mut parts = [0u64; 3];
        let mut count = 0;
        for part in s.split('.') {
            if count == 3 || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            parts[count] = part.parse().ok()?;
            count += 1;
        }
        Some(Version::new(parts[0], parts[1], parts[2]))
    }

    /// Lenient parse used for ordering and range checks.
    ///
    /// Accepts a leading `v` or `=`, and ignores pre-release and build
    /// metadata (`1.2.3-beta.1+sha` coerces to `1.2.3`).
    pub fn coerce(s: &str) -> Option<Version> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix(['v', 'V', '='])
            .unwrap_or(trimmed);
        let core = trimmed
            .split(['-', '+'])
            .next()
            .unwrap_or(trimmed);
        Version::parse(core)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Orders two version strings the way "latest" is decided: coerced numeric
/// order when both coerce, plain string order otherwise.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::coerce(a), Version::coerce(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

// ---------------------------------------------------------------------------
// XPattern
// ---------------------------------------------------------------------------

/// A version pattern whose `None` components are wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XPattern(pub [Option<u64>; 3]);

impl XPattern {
    pub fn matches(&self, version: &Version) -> bool {
        let actual = [version.major, version.minor, version.patch];
        self.0
            .iter()
            .zip(actual)
            .all(|(want, got)| want.map_or(true, |w| w == got))
    }
}

impl fmt::Display for XPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|c| c.map_or_else(|| "x".to_string(), |n| n.to_string()))
            .collect();
        f.write_str(&parts.join("."))
    }
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "x" | "X" | "*")
}

// ---------------------------------------------------------------------------
// VersionSpec
// ---------------------------------------------------------------------------

/// A parsed version specifier from a relationship declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum VersionSpec {
    /// Matches exactly one version string.
    Exact(String),
    /// Matches only the latest version of the referenced id.
    Latest,
    /// `^X.Y.Z`
    Caret(Version),
    /// `~X.Y.Z`
    Tilde(Version),
    /// `1.x`, `1.2.x`, `*`
    XPattern(XPattern),
}

impl VersionSpec {
    /// Parses a version specifier, rejecting malformed ranges and patterns.
    pub fn parse(spec: &str) -> Result<VersionSpec, CatalogError> {
        let trimmed = spec.trim();
        let invalid = |reason: &str| CatalogError::InvalidVersionSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("empty specifier"));
        }
        if trimmed == "latest" {
            return Ok(VersionSpec::Latest);
        }
        if let Some(rest) = trimmed.strip_prefix('^') {
            return Version::coerce(rest)
                .map(VersionSpec::Caret)
                .ok_or_else(|| invalid("caret range needs a numeric version"));
        }
        if let Some(rest) = trimmed.strip_prefix('~') {
            return Version::coerce(rest)
                .map(VersionSpec::Tilde)
                .ok_or_else(|| invalid("tilde range needs a numeric version"));
        }

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.iter().any(|p| is_wildcard(p)) {
            if parts.len() > 3 {
                return Err(invalid("pattern has more than three components"));
            }
            let mut components = [None; 3];
            for (slot, part) in components.iter_mut().zip(&parts) {
                if is_wildcard(part) {
                    continue;
                }
                *slot = Some(
                    part.parse::<u64>()
                        .map_err(|_| invalid("pattern component is not numeric"))?,
                );
            }
            return Ok(VersionSpec::XPattern(XPattern(components)));
        }

        Ok(VersionSpec::Exact(trimmed.to_string()))
    }

    /// Parses a specifier, falling back to exact matching on the raw string
    /// when it is malformed.
    pub fn parse_lenient(spec: &str) -> VersionSpec {
        VersionSpec::parse(spec).unwrap_or_else(|err| {
            debug!(%err, "treating malformed version spec as exact");
            VersionSpec::Exact(spec.to_string())
        })
    }

    /// The specifier of a declaration whose version may be omitted.
    pub fn from_declared(version: Option<&str>) -> VersionSpec {
        match version {
            None => VersionSpec::Latest,
            Some(v) => VersionSpec::parse_lenient(v),
        }
    }

    /// Decides whether `candidate` satisfies this specifier. `latest` is the
    /// latest version among all resources sharing the referenced id.
    pub fn matches(&self, candidate: &str, latest: Option<&str>) -> bool {
        match self {
            VersionSpec::Exact(v) => v == candidate,
            VersionSpec::Latest => latest == Some(candidate),
            VersionSpec::Caret(min) => Version::coerce(candidate)
                .is_some_and(|c| c.major == min.major && c >= *min),
            VersionSpec::Tilde(min) => Version::coerce(candidate)
                .is_some_and(|c| c.major == min.major && c.minor == min.minor && c >= *min),
            VersionSpec::XPattern(pattern) => {
                Version::coerce(candidate).is_some_and(|c| pattern.matches(&c))
            }
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, VersionSpec::Exact(_))
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, VersionSpec::Latest)
    }
}

impl FromStr for VersionSpec {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionSpec::parse(s)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Exact(v) => f.write_str(v),
            VersionSpec::Latest => f.write_str("latest"),
            VersionSpec::Caret(v) => write!(f, "^{v}"),
            VersionSpec::Tilde(v) => write!(f, "~{v}"),
            VersionSpec::XPattern(p) => write!(f, "{p}"),
        }
    }
}
