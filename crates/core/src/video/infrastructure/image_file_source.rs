use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Adapts a list of image files to the [`FrameSource`] interface, one frame
/// per file, in the given order.
///
/// Images are decoded with the `image` crate and converted to BGR.
pub struct ImageFileSource {
    paths: Vec<PathBuf>,
}

impl ImageFileSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

fn load_bgr(path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    let rgb = image::open(path)
        .map_err(|e| format!("failed to decode {}: {e}", path.display()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut data = rgb.into_raw();
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    Ok(Frame::new(data, width, height, 3, index))
}

impl FrameSource for ImageFileSource {
    fn frame_count(&self) -> Option<usize> {
        Some(self.paths.len())
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        Box::new(
            self.paths
                .iter()
                .enumerate()
                .map(|(index, path)| load_bgr(path, index)),
        )
    }

    fn close(&mut self) {}
}
