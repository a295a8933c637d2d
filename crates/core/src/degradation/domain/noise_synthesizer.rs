use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shared::constants::{NOISE_BASE, NOISE_INTENSITY};
use crate::shared::frame::Frame;

/// Produces the gray haze plate blended into degraded regions.
///
/// Each call draws a fresh plate from the injected random source; nothing is
/// cached between calls, so consecutive frames get independent grain.
pub struct NoiseSynthesizer<R: Rng = StdRng> {
    rng: R,
    base: u8,
    intensity: u8,
}

impl NoiseSynthesizer<StdRng> {
    /// Synthesizer seeded from the operating system's entropy source.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Deterministic synthesizer, for tests and reproducible renders.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoiseSynthesizer<R> {
    pub fn new(rng: R) -> Self {
        Self::with_params(rng, NOISE_BASE, NOISE_INTENSITY)
    }

    pub fn with_params(rng: R, base: u8, intensity: u8) -> Self {
        Self {
            rng,
            base,
            intensity,
        }
    }

    pub fn base(&self) -> u8 {
        self.base
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// A `height x width` 3-channel plate where every sample is
    /// `base + offset`, offset uniform in `[-intensity, intensity)`,
    /// clamped to `0..=255`.
    pub fn generate(&mut self, height: u32, width: u32) -> Frame {
        let len = (height as usize) * (width as usize) * 3;
        let base = self.base as i16;
        let intensity = self.intensity as i16;
        let data = (0..len)
            .map(|_| {
                let offset = if intensity > 0 {
                    self.rng.random_range(-intensity..intensity)
                } else {
                    0
                };
                (base + offset).clamp(0, 255) as u8
            })
            .collect();
        Frame::new(data, width, height, 3, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_has_requested_shape() {
        let mut noise = NoiseSynthesizer::seeded(1);
        let plate = noise.generate(48, 64);
        assert_eq!(plate.dimensions(), (64, 48));
        assert_eq!(plate.channels(), 3);
        assert_eq!(plate.data().len(), 64 * 48 * 3);
    }

    #[test]
    fn test_samples_stay_in_half_open_band() {
        let mut noise = NoiseSynthesizer::seeded(7);
        let plate = noise.generate(100, 100);
        assert!(plate.data().iter().all(|&v| (125..=130).contains(&v)));
    }

    #[test]
    fn test_plate_is_not_flat() {
        let mut noise = NoiseSynthesizer::seeded(7);
        let plate = noise.generate(32, 32);
        let first = plate.data()[0];
        assert!(plate.data().iter().any(|&v| v != first));
    }

    #[test]
    fn test_mean_is_near_base() {
        let mut noise = NoiseSynthesizer::seeded(3);
        let plate = noise.generate(200, 200);
        let mean = plate.data().iter().map(|&v| v as f64).sum::<f64>() / plate.data().len() as f64;
        // Offsets in [-3, 3) average to -0.5.
        assert!((mean - 127.5).abs() < 0.1, "mean was {mean}");
    }

    #[test]
    fn test_same_seed_gives_same_plate() {
        let a = NoiseSynthesizer::seeded(42).generate(16, 16);
        let b = NoiseSynthesizer::seeded(42).generate(16, 16);
        assert_eq!(a, b);
    }

    #[test]
    fn test_successive_calls_draw_fresh_noise() {
        let mut noise = NoiseSynthesizer::seeded(42);
        let a = noise.generate(16, 16);
        let b = noise.generate(16, 16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_values_clamp_at_extremes() {
        let mut noise = NoiseSynthesizer::with_params(StdRng::seed_from_u64(5), 254, 10);
        let plate = noise.generate(20, 20);
        assert!(plate.data().iter().any(|&v| v == 255));

        let mut noise = NoiseSynthesizer::with_params(StdRng::seed_from_u64(5), 1, 10);
        let plate = noise.generate(20, 20);
        assert!(plate.data().iter().any(|&v| v == 0));
    }

    #[test]
    fn test_zero_intensity_is_flat_base() {
        let mut noise = NoiseSynthesizer::with_params(StdRng::seed_from_u64(5), 90, 0);
        let plate = noise.generate(4, 4);
        assert!(plate.data().iter().all(|&v| v == 90));
    }

    #[test]
    fn test_zero_width_plate() {
        let mut noise = NoiseSynthesizer::seeded(1);
        let plate = noise.generate(10, 0);
        assert!(plate.is_empty());
        assert!(plate.data().is_empty());
    }
}
