use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::frame_sink::FrameSink;

/// Writes every frame as `frame_{index:05}.png` under a directory.
pub struct ImageSequenceSink {
    dir: PathBuf,
    written: usize,
}

impl ImageSequenceSink {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            written: 0,
        }
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for ImageSequenceSink {
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if self.written == 0 {
            std::fs::create_dir_all(&self.dir)?;
        }

        let mut rgb = frame.data().to_vec();
        for px in rgb.chunks_exact_mut(3) {
            px.swap(0, 2);
        }
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), rgb)
            .ok_or("Failed to create image from frame data")?;
        img.save(self.path_for(frame.index()))?;

        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("Wrote {} frames to {}", self.written, self.dir.display());
        Ok(())
    }
}
