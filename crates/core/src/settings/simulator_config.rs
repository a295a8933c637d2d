use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compositing::divider::DividerStyle;
use crate::severity::severity_level::SeverityLevel;
use crate::severity::severity_profile::{
    SeverityProfile, SeverityProfiles, EARLY_PROFILE, LATE_PROFILE, MIDDLE_PROFILE,
};
use crate::shared::constants::{DEFAULT_SPLIT_PERCENT, NOISE_BASE, NOISE_INTENSITY};
use crate::shared::error::SimulationError;

use super::live_settings::{LiveSettings, SettingsSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub base: u8,
    pub intensity: u8,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            base: NOISE_BASE,
            intensity: NOISE_INTENSITY,
        }
    }
}

/// Per-level profile entries as they appear in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileTable {
    pub early: SeverityProfile,
    pub middle: SeverityProfile,
    pub late: SeverityProfile,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            early: EARLY_PROFILE,
            middle: MIDDLE_PROFILE,
            late: LATE_PROFILE,
        }
    }
}

/// Everything needed to start a simulation session.
///
/// Loaded from JSON; any field left out takes its reference default. Nothing
/// here is validated until [`SimulatorConfig::build_profiles`] or
/// [`SimulatorConfig::live_settings`] is called, which happens once at
/// startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub severity: SeverityLevel,
    pub split_percent: u32,
    pub noise: NoiseConfig,
    pub divider: DividerStyle,
    pub profiles: ProfileTable,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            severity: SeverityLevel::Healthy,
            split_percent: DEFAULT_SPLIT_PERCENT,
            noise: NoiseConfig::default(),
            divider: DividerStyle::default(),
            profiles: ProfileTable::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn load(path: &Path) -> Result<Self, SimulationError> {
        let json = fs::read_to_string(path).map_err(|e| {
            SimulationError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| SimulationError::Config(e.to_string()))
    }

    pub fn build_profiles(&self) -> Result<SeverityProfiles, SimulationError> {
        SeverityProfiles::new(self.profiles.early, self.profiles.middle, self.profiles.late)
    }

    pub fn live_settings(&self) -> Result<LiveSettings, SimulationError> {
        LiveSettings::new(SettingsSnapshot {
            severity: self.severity,
            split_percent: self.split_percent,
        })
    }
}
