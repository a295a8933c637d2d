use ndarray::{concatenate, s, Axis};
use rand::rngs::StdRng;
use rand::Rng;

use crate::degradation::domain::degradation_filter::DegradationFilter;
use crate::severity::severity_level::SeverityLevel;
use crate::shared::error::SimulationError;
use crate::shared::frame::Frame;

use super::divider::DividerStyle;

/// Column at which a frame of `width` pixels splits for `percent` (0-100).
///
/// Rounds to the nearest column and clamps to `0..=width`.
pub fn split_point(percent: u32, width: u32) -> u32 {
    let column = (f64::from(percent) / 100.0 * f64::from(width)).round();
    column.clamp(0.0, f64::from(width)) as u32
}

/// Renders the split-screen comparison for one frame.
///
/// Columns left of the split are copied untouched, columns right of it are
/// degraded for the requested severity, and a divider is drawn on the split.
/// The compositor keeps no per-frame state; severity and split position are
/// passed in on every call.
pub struct FrameCompositor<R: Rng = StdRng> {
    filter: DegradationFilter<R>,
    divider: DividerStyle,
}

impl<R: Rng> FrameCompositor<R> {
    pub fn new(filter: DegradationFilter<R>, divider: DividerStyle) -> Self {
        log::debug!(
            "Compositor ready: divider {}px {:?}",
            divider.thickness,
            divider.color
        );
        Self { filter, divider }
    }

    pub fn divider(&self) -> &DividerStyle {
        &self.divider
    }

    /// Produces the composited frame. Output dimensions and frame index always
    /// match the input.
    pub fn transform(
        &mut self,
        frame: &Frame,
        level: SeverityLevel,
        split_percent: u32,
    ) -> Result<Frame, SimulationError> {
        if frame.channels() != 3 {
            return Err(SimulationError::UnsupportedFrame {
                channels: frame.channels(),
            });
        }
        let split = split_point(split_percent, frame.width());

        let mut output = if level.is_healthy() || split == frame.width() {
            frame.clone()
        } else {
            self.degrade_right_of(frame, split, level)?
        };

        debug_assert_eq!(
            output.dimensions(),
            frame.dimensions(),
            "composited frame changed shape"
        );
        if output.dimensions() != frame.dimensions() {
            return Err(SimulationError::DimensionMismatch {
                expected: frame.dimensions(),
                actual: output.dimensions(),
            });
        }

        self.divider.draw(&mut output, split);
        Ok(output)
    }

    fn degrade_right_of(
        &mut self,
        frame: &Frame,
        split: u32,
        level: SeverityLevel,
    ) -> Result<Frame, SimulationError> {
        let view = frame.as_ndarray();
        let split = split as usize;

        let right = Frame::from_array(view.slice(s![.., split.., ..]).to_owned(), frame.index());
        let degraded = self.filter.apply(&right, level)?;
        if degraded.dimensions() != right.dimensions() {
            return Err(SimulationError::DimensionMismatch {
                expected: right.dimensions(),
                actual: degraded.dimensions(),
            });
        }
        if split == 0 {
            return Ok(degraded);
        }

        let left = view.slice(s![.., ..split, ..]);
        let joined = concatenate(Axis(1), &[left, degraded.as_ndarray()]).map_err(|_| {
            SimulationError::DimensionMismatch {
                expected: frame.dimensions(),
                actual: (split as u32 + degraded.width(), degraded.height()),
            }
        })?;
        Ok(Frame::from_array(joined, frame.index()))
    }
}
