//! Binary artifact coordinates in `group:name:version` form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The group/name/version triple that identifies a prebuilt binary artifact.
///
/// Parses from and displays as `group:name:version`, e.g.
/// `com.example:login:1.4.0`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Coordinate {
    /// The artifact group, e.g. `com.example`.
    pub group: String,
    /// The artifact (module) name, e.g. `login`.
    pub name: String,
    /// The artifact version, e.g. `1.4.0`.
    pub version: String,
}

impl Coordinate {
    /// Creates a coordinate from its three parts.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// Error type for parsing coordinate strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid artifact coordinate '{input}': expected group:name:version")]
pub struct ParseCoordinateError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError {
            input: s.to_string(),
        };
        let mut parts = s.trim().split(':');
        let (Some(group), Some(name), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };
        if group.is_empty() || name.is_empty() || version.is_empty() {
            return Err(err());
        }
        Ok(Self::new(group, name, version))
    }
}
