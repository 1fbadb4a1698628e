//! Discussion intensity - pacing and turn-count policy

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How long a discussion runs before the scheduler calls it complete
///
/// Each level maps to a number of full rounds (one turn per participant).
/// The bound is a hard ceiling on total turn count, not a judgment of
/// whether the debate "resolved" - resolution would need another generation
/// call, which this system deliberately avoids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    #[default]
    Normal,
    High,
}

impl Intensity {
    /// Full rounds each participant gets to speak
    pub fn rounds(&self) -> u32 {
        match self {
            Intensity::Low => 1,
            Intensity::Normal => 2,
            Intensity::High => 4,
        }
    }

    /// Maximum total turn count for a discussion with `participant_count` agents
    pub fn turn_limit(&self, participant_count: usize) -> u32 {
        self.rounds() * participant_count as u32
    }

    pub fn as_str(&self) -> &str {
        match self {
            Intensity::Low => "low",
            Intensity::Normal => "normal",
            Intensity::High => "high",
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = DomainError;

    /// Unknown values fail fast instead of defaulting silently
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Intensity::Low),
            "normal" => Ok(Intensity::Normal),
            "high" => Ok(Intensity::High),
            other => Err(DomainError::UnknownIntensity(other.to_string())),
        }
    }
}
