use crate::shared::frame::Frame;

/// Supplies captured frames to a simulation session.
///
/// Implementations own the capture details (camera, files, generators);
/// the session only sees `Frame`s in capture order.
pub trait FrameSource: Send {
    /// Number of frames the source will yield, when known up front.
    fn frame_count(&self) -> Option<usize>;

    /// Returns an iterator over frames in capture order. A failed frame is
    /// reported in place and does not end the stream.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
