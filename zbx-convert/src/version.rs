use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Error raised for a version string that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version string '{0}'")]
pub struct MalformedVersion(pub String);

/// A dotted release version such as `3.2` or `2.4.5`.
///
/// Only numeric release segments take part in ordering; a pre-release or
/// build suffix (`3.4.0-rc1`, `3.4.0+hotfix`) is ignored. Missing trailing
/// segments compare as zero, so `3.2` and `3.2.0` are equal.
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
    raw: String,
}

impl Version {
    /// Build a version directly from release segments.
    pub fn new(segments: &[u64]) -> Self {
        let raw = segments
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        Self {
            segments: segments.to_vec(),
            raw,
        }
    }

    /// The version string as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when `self` is at or above `threshold`.
    pub fn at_least(&self, threshold: &Version) -> bool {
        self >= threshold
    }

    /// True when `self` is strictly below `threshold`.
    pub fn below(&self, threshold: &Version) -> bool {
        self < threshold
    }
}

impl FromStr for Version {
    type Err = MalformedVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let release = raw.split(['-', '+']).next().unwrap_or(raw);
        if release.is_empty() {
            return Err(MalformedVersion(s.to_string()));
        }

        let segments = release
            .split('.')
            .map(|segment| {
                segment
                    .parse::<u64>()
                    .map_err(|_| MalformedVersion(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            segments,
            raw: raw.to_string(),
        })
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for index in 0..len {
            let left = self.segments.get(index).copied().unwrap_or(0);
            let right = other.segments.get(index).copied().unwrap_or(0);
            match left.cmp(&right) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality must agree with the ordering: `3.2` and `3.2.0` are the same
// version.
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

#[cfg(test)]
mod tests {
    use super::{MalformedVersion, Version};

    fn v(s: &str) -> Version {
        s.parse().expect("test version should parse")
    }

    #[test]
    fn orders_by_numeric_segments() {
        assert!(v("2.0") < v("3.0"));
        assert!(v("3.0") < v("3.2"));
        assert!(v("3.2") < v("3.2.1"));
        assert!(v("3.10") > v("3.9"));
    }

    #[test]
    fn missing_segments_compare_as_zero() {
        assert_eq!(v("3.2"), v("3.2.0"));
        assert_eq!(v("3"), v("3.0.0"));
        assert!(v("3") < v("3.0.1"));
    }

    #[test]
    fn ignores_pre_release_and_build_suffixes() {
        assert_eq!(v("3.4.0-rc1"), v("3.4"));
        assert_eq!(v("3.4.0+hotfix"), v("3.4.0"));
    }

    #[test]
    fn at_least_and_below_are_threshold_helpers() {
        let threshold = Version::new(&[3, 2]);
        assert!(v("3.2").at_least(&threshold));
        assert!(v("3.2.1").at_least(&threshold));
        assert!(v("3.0").below(&threshold));
        assert!(!v("3.2.0").below(&threshold));
    }

    #[test]
    fn rejects_non_numeric_segments() {
        assert_eq!(
            "banana".parse::<Version>(),
            Err(MalformedVersion("banana".to_string()))
        );
        assert!("3.x".parse::<Version>().is_err());
        assert!("".parse::<Version>().is_err());
        assert!("3..2".parse::<Version>().is_err());
    }

    #[test]
    fn new_builds_a_dotted_display() {
        assert_eq!(Version::new(&[3, 2]).as_str(), "3.2");
        assert_eq!(Version::new(&[2, 4, 5]).to_string(), "2.4.5");
    }
}
