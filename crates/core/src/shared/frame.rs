use ndarray::{Array3, ArrayView3, ArrayViewMut3};

/// A single video frame: contiguous BGR bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the simulation works on
/// `height x width x channels` views of the same buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A 3-channel frame where every pixel holds the same BGR value.
    pub fn filled(width: u32, height: u32, bgr: [u8; 3], index: usize) -> Self {
        let pixels = (width as usize) * (height as usize);
        let data = bgr.iter().copied().cycle().take(pixels * 3).collect();
        Self::new(data, width, height, 3, index)
    }

    /// Builds a frame from a `(height, width, channels)` array in any memory layout.
    pub fn from_array(array: Array3<u8>, index: usize) -> Self {
        let (height, width, channels) = array.dim();
        // Logical iteration order is row-major regardless of the backing strides.
        let data = array.iter().copied().collect();
        Self::new(data, width as u32, height as u32, channels as u8, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// `(width, height)`, the pair every pipeline stage must preserve.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let offset = ((y as usize) * (self.width as usize) + x as usize) * c;
        &self.data[offset..offset + c]
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
