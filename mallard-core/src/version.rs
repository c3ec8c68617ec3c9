//! Semantic version triple for game manifests.

use std::str::FromStr;

use crate::error::{EngineError, ErrorKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Sentinel for "no valid version".
    pub const MAX: Self = Self {
        major: u32::MAX,
        minor: u32::MAX,
        patch: u32::MAX,
    };

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let mut next = || -> Result<u32, EngineError> {
            parts
                .next()
                .ok_or_else(|| {
                    EngineError::with_message(ErrorKind::InvalidFormat, format!("bad version: {s}"))
                })?
                .parse()
                .map_err(|_| {
                    EngineError::with_message(ErrorKind::InvalidFormat, format!("bad version: {s}"))
                })
        };

        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(EngineError::with_message(
                ErrorKind::InvalidFormat,
                format!("bad version: {s}"),
            ));
        }
        Ok(version)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
