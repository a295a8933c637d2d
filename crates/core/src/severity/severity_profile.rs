use serde::{Deserialize, Serialize};

use crate::shared::error::SimulationError;

use super::severity_level::SeverityLevel;

/// Blur and haze parameters for one degraded severity level.
///
/// `blur_radius` is the horizontal Gaussian kernel width and
/// `outer_blur_radius` the vertical kernel height; the two differ on purpose.
/// `opacity` is the weight of the blurred image against the noise plate.
/// Sizes are signed so a negative value in a config file reaches validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityProfile {
    pub opacity: f64,
    pub blur_radius: i64,
    pub outer_blur_radius: i64,
}

impl SeverityProfile {
    pub const fn new(opacity: f64, blur_radius: i64, outer_blur_radius: i64) -> Self {
        Self {
            opacity,
            blur_radius,
            outer_blur_radius,
        }
    }

    /// `(width, height)` of the blur kernel as configured.
    pub fn kernel_size(&self) -> (i64, i64) {
        (self.blur_radius, self.outer_blur_radius)
    }

    /// Checks the entry and returns its kernel size as pixel counts.
    fn validate(&self, level: SeverityLevel) -> Result<(usize, usize), SimulationError> {
        let axis_size = |axis: &'static str, size: i64| {
            usize::try_from(size)
                .ok()
                .filter(|s| s % 2 == 1)
                .ok_or_else(|| SimulationError::InvalidKernelSize {
                    level: level.name().to_string(),
                    axis,
                    size,
                })
        };
        let kx = axis_size("horizontal", self.blur_radius)?;
        let ky = axis_size("vertical", self.outer_blur_radius)?;
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(SimulationError::InvalidOpacity {
                level: level.name().to_string(),
                opacity: self.opacity,
            });
        }
        Ok((kx, ky))
    }
}

pub const EARLY_PROFILE: SeverityProfile = SeverityProfile::new(0.4, 31, 21);
pub const MIDDLE_PROFILE: SeverityProfile = SeverityProfile::new(0.2, 51, 41);
pub const LATE_PROFILE: SeverityProfile = SeverityProfile::new(0.1, 91, 81);

/// Validated lookup table from degraded severity level to its profile.
///
/// Entries are checked once at construction, so lookups on the frame path
/// never need to re-validate kernel sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityProfiles {
    early: SeverityProfile,
    middle: SeverityProfile,
    late: SeverityProfile,
    kernels: [(usize, usize); 3],
}

impl SeverityProfiles {
    pub fn new(
        early: SeverityProfile,
        middle: SeverityProfile,
        late: SeverityProfile,
    ) -> Result<Self, SimulationError> {
        let kernels = [
            early.validate(SeverityLevel::Early)?,
            middle.validate(SeverityLevel::Middle)?,
            late.validate(SeverityLevel::Late)?,
        ];
        Ok(Self {
            early,
            middle,
            late,
            kernels,
        })
    }

    /// Profile for a degraded level. `Healthy` has no profile and is rejected.
    pub fn lookup(&self, level: SeverityLevel) -> Result<&SeverityProfile, SimulationError> {
        match level {
            SeverityLevel::Early => Ok(&self.early),
            SeverityLevel::Middle => Ok(&self.middle),
            SeverityLevel::Late => Ok(&self.late),
            SeverityLevel::Healthy => Err(SimulationError::UnknownSeverity(
                level.name().to_string(),
            )),
        }
    }

    /// Validated `(width, height)` kernel sizes for Early, Middle and Late, in that order.
    pub(crate) fn degraded_kernels(&self) -> [(usize, usize); 3] {
        self.kernels
    }
}

impl Default for SeverityProfiles {
    fn default() -> Self {
        // Reference profiles are odd and positive on both axes.
        let kernel = |p: SeverityProfile| (p.blur_radius as usize, p.outer_blur_radius as usize);
        Self {
            early: EARLY_PROFILE,
            middle: MIDDLE_PROFILE,
            late: LATE_PROFILE,
            kernels: [
                kernel(EARLY_PROFILE),
                kernel(MIDDLE_PROFILE),
                kernel(LATE_PROFILE),
            ],
        }
    }
}
