use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Colour bars in BGR: white, yellow, cyan, green, magenta, red, blue, black.
const BARS: [[u8; 3]; 8] = [
    [255, 255, 255],
    [0, 255, 255],
    [255, 255, 0],
    [0, 255, 0],
    [255, 0, 255],
    [0, 0, 255],
    [255, 0, 0],
    [0, 0, 0],
];

/// Pixels the bar pattern scrolls per frame.
const SCROLL_PER_FRAME: u32 = 4;

/// Camera stand-in that yields a scrolling colour-bar pattern.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    count: usize,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, count: usize) -> Self {
        Self {
            width,
            height,
            count,
        }
    }

    fn render(&self, index: usize) -> Frame {
        let w = self.width as usize;
        let shift = (index as u64 * SCROLL_PER_FRAME as u64 % w.max(1) as u64) as usize;
        let row: Vec<u8> = (0..w)
            .flat_map(|x| {
                let bar = ((x + shift) % w) * BARS.len() / w;
                BARS[bar]
            })
            .collect();
        Frame::new(row.repeat(self.height as usize), self.width, self.height, 3, index)
    }
}

impl FrameSource for SyntheticSource {
    fn frame_count(&self) -> Option<usize> {
        Some(self.count)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        Box::new(
            (0..self.count).map(|i| Ok::<_, Box<dyn std::error::Error>>(self.render(i))),
        )
    }

    fn close(&mut self) {}
}
