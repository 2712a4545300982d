use crate::error::PodmanError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Lowest podman release this crate knows how to talk to.
pub const MINIMUM_SUPPORTED_VERSION: Version = Version::new(1, 4, 0);

/// A `major.minor.patch` version, ordered numerically segment by segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses a version as reported by podman, tolerating a pre-release or
    /// build suffix on the patch segment (`4.9.0-dev`, `4.3.1+abc`).
    pub fn parse_lenient(input: &str) -> Result<Self, PodmanError> {
        let trimmed = input.trim();
        let end = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
        trimmed[..end].parse()
    }

    pub fn is_supported(&self) -> bool {
        *self >= MINIMUM_SUPPORTED_VERSION
    }
}

impl FromStr for Version {
    type Err = PodmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.trim().split('.').collect();
        if segments.len() != 3 {
            return Err(PodmanError::parse(
                "version",
                format!("expected 3 dot-separated segments in '{s}'"),
            ));
        }

        let mut numbers = [0u64; 3];
        for (slot, segment) in numbers.iter_mut().zip(&segments) {
            if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit()) {
                return Err(PodmanError::parse(
                    "version",
                    format!("segment '{segment}' of '{s}' is not numeric"),
                ));
            }
            *slot = segment
                .parse()
                .map_err(|e| PodmanError::parse("version", format!("'{s}': {e}")))?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
