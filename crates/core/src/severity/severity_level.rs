use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::error::SimulationError;

/// Stage of simulated keratitis progression.
///
/// `Healthy` is the identity transform; the other stages degrade the
/// affected side of the frame with increasing blur and haze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    #[default]
    Healthy,
    Early,
    Middle,
    Late,
}

impl SeverityLevel {
    pub const ALL: &[SeverityLevel] = &[
        SeverityLevel::Healthy,
        SeverityLevel::Early,
        SeverityLevel::Middle,
        SeverityLevel::Late,
    ];

    pub const DEGRADED: &[SeverityLevel] = &[
        SeverityLevel::Early,
        SeverityLevel::Middle,
        SeverityLevel::Late,
    ];

    pub fn is_healthy(self) -> bool {
        self == SeverityLevel::Healthy
    }

    /// Stable numeric code, used when packing the level into atomics.
    pub fn code(self) -> u8 {
        match self {
            SeverityLevel::Healthy => 0,
            SeverityLevel::Early => 1,
            SeverityLevel::Middle => 2,
            SeverityLevel::Late => 3,
        }
    }

    /// Short lowercase name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            SeverityLevel::Healthy => "healthy",
            SeverityLevel::Early => "early",
            SeverityLevel::Middle => "middle",
            SeverityLevel::Late => "late",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityLevel::Healthy => write!(f, "Healthy Eye"),
            SeverityLevel::Early => write!(f, "Early Stage (<1 Week)"),
            SeverityLevel::Middle => write!(f, "Middle Stage (2 Weeks)"),
            SeverityLevel::Late => write!(f, "Late Stage (>3 Weeks)"),
        }
    }
}

impl TryFrom<u8> for SeverityLevel {
    type Error = SimulationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SeverityLevel::Healthy),
            1 => Ok(SeverityLevel::Early),
            2 => Ok(SeverityLevel::Middle),
            3 => Ok(SeverityLevel::Late),
            other => Err(SimulationError::UnknownSeverity(other.to_string())),
        }
    }
}

impl FromStr for SeverityLevel {
    type Err = SimulationError;

    /// Accepts the short name (`"late"`) or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SeverityLevel::ALL
            .iter()
            .copied()
            .find(|level| {
                level.name().eq_ignore_ascii_case(needle)
                    || level.to_string().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| SimulationError::UnknownSeverity(s.to_string()))
    }
}
