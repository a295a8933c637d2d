use std::ops::Range;

use ndarray::{s, Axis};
use serde::{Deserialize, Serialize};

use crate::shared::constants::{DEFAULT_DIVIDER_COLOR, DEFAULT_DIVIDER_THICKNESS};
use crate::shared::frame::Frame;

/// Appearance of the vertical line marking the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividerStyle {
    pub thickness: u32,
    /// BGR
    pub color: [u8; 3],
}

impl Default for DividerStyle {
    fn default() -> Self {
        Self {
            thickness: DEFAULT_DIVIDER_THICKNESS,
            color: DEFAULT_DIVIDER_COLOR,
        }
    }
}

impl DividerStyle {
    /// Columns covered by a line centred on `split`, clipped to `0..width`.
    ///
    /// Odd thicknesses are symmetric around `split`; even ones lean right.
    pub fn columns(&self, split: u32, width: u32) -> Range<usize> {
        if self.thickness == 0 {
            return 0..0;
        }
        let start = split.saturating_sub((self.thickness - 1) / 2).min(width) as usize;
        let end = (split as u64 + (self.thickness / 2) as u64 + 1).min(width as u64) as usize;
        start..end.max(start)
    }

    /// Paints the divider over the full height of `frame`. Channels past the
    /// third are left as they are.
    pub fn draw(&self, frame: &mut Frame, split: u32) {
        let cols = self.columns(split, frame.width());
        if cols.is_empty() || frame.height() == 0 {
            return;
        }
        let mut view = frame.as_ndarray_mut();
        let mut band = view.slice_mut(s![.., cols, ..]);
        for (mut channel, &value) in band.axis_iter_mut(Axis(2)).zip(&self.color) {
            channel.fill(value);
        }
    }
}
