use crate::shared::frame::Frame;

/// Receives composited frames for display, storage or transmission.
pub trait FrameSink: Send {
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
