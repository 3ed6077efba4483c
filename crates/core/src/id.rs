//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Server-assigned identifier of a Movies record.
///
/// Serialized as a bare JSON number so it matches the wire shape
/// (`{"id": 42, ...}`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(i64);

impl MovieId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for MovieId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for MovieId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MovieId> for i64 {
    fn from(value: MovieId) -> Self {
        value.0
    }
}

impl FromStr for MovieId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::invalid_id(format!("MovieId: {s:?}: {e}")))?;
        Ok(Self(value))
    }
}
