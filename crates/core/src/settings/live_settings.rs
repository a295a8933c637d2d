use std::sync::atomic::{AtomicU32, Ordering};

use crate::severity::severity_level::SeverityLevel;
use crate::shared::constants::DEFAULT_SPLIT_PERCENT;
use crate::shared::error::SimulationError;

const SEVERITY_MASK: u32 = 0xFF;
const SPLIT_SHIFT: u32 = 8;

/// A consistent view of both live settings, taken once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsSnapshot {
    pub severity: SeverityLevel,
    pub split_percent: u32,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            severity: SeverityLevel::Healthy,
            split_percent: DEFAULT_SPLIT_PERCENT,
        }
    }
}

/// Severity and split position shared between the control thread (writer)
/// and the frame processing thread (reader).
///
/// Both values live in one `AtomicU32`, so a snapshot can never pair a new
/// severity with a stale split or observe a half-written value. Share it as
/// `Arc<LiveSettings>`; no lock is ever held while frames are processed.
#[derive(Debug)]
pub struct LiveSettings {
    packed: AtomicU32,
}

impl LiveSettings {
    pub fn new(snapshot: SettingsSnapshot) -> Result<Self, SimulationError> {
        validate_split(snapshot.split_percent)?;
        Ok(Self {
            packed: AtomicU32::new(pack(snapshot)),
        })
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        unpack(self.packed.load(Ordering::Acquire))
    }

    /// Replaces both values in a single store.
    pub fn set(&self, snapshot: SettingsSnapshot) -> Result<(), SimulationError> {
        validate_split(snapshot.split_percent)?;
        self.packed.store(pack(snapshot), Ordering::Release);
        Ok(())
    }

    pub fn set_severity(&self, severity: SeverityLevel) {
        let code = u32::from(severity.code());
        // The closure always returns Some, so fetch_update cannot fail.
        let _ = self
            .packed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |packed| {
                Some((packed & !SEVERITY_MASK) | code)
            });
        log::debug!("Severity set to {severity}");
    }

    pub fn set_split_position(&self, percent: u32) -> Result<(), SimulationError> {
        validate_split(percent)?;
        let _ = self
            .packed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |packed| {
                Some((packed & SEVERITY_MASK) | (percent << SPLIT_SHIFT))
            });
        log::debug!("Split position set to {percent}%");
        Ok(())
    }
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            packed: AtomicU32::new(pack(SettingsSnapshot::default())),
        }
    }
}

fn validate_split(percent: u32) -> Result<(), SimulationError> {
    if percent > 100 {
        return Err(SimulationError::InvalidSplitPosition(percent));
    }
    Ok(())
}

fn pack(snapshot: SettingsSnapshot) -> u32 {
    u32::from(snapshot.severity.code()) | (snapshot.split_percent << SPLIT_SHIFT)
}

fn unpack(packed: u32) -> SettingsSnapshot {
    // Only validated codes are ever stored.
    let severity = SeverityLevel::try_from((packed & SEVERITY_MASK) as u8).unwrap_or_default();
    SettingsSnapshot {
        severity,
        split_percent: packed >> SPLIT_SHIFT,
    }
}
