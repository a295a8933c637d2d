/// Gray level the noise plate is centred on.
pub const NOISE_BASE: u8 = 128;

/// Noise offsets are drawn from `[-NOISE_INTENSITY, NOISE_INTENSITY)`.
pub const NOISE_INTENSITY: u8 = 3;

pub const DEFAULT_SPLIT_PERCENT: u32 = 50;

pub const DEFAULT_DIVIDER_THICKNESS: u32 = 3;
pub const DEFAULT_DIVIDER_COLOR: [u8; 3] = [255, 255, 255];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
