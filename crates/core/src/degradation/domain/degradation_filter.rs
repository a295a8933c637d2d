use ndarray::Zip;
use rand::rngs::StdRng;
use rand::Rng;

use crate::degradation::infrastructure::gaussian;
use crate::severity::severity_level::SeverityLevel;
use crate::severity::severity_profile::SeverityProfiles;
use crate::shared::error::SimulationError;
use crate::shared::frame::Frame;

use super::noise_synthesizer::NoiseSynthesizer;

/// Blur kernels for one degraded level, built once from its profile.
struct LevelKernels {
    horizontal: Vec<f32>,
    vertical: Vec<f32>,
}

/// Simulates corneal scarring on a region: an asymmetric Gaussian blur
/// followed by a weighted blend with a fresh gray noise plate.
///
/// Kernels are derived from the validated profiles at construction; the
/// blur scratch buffer is reused across frames.
pub struct DegradationFilter<R: Rng = StdRng> {
    profiles: SeverityProfiles,
    kernels: [LevelKernels; 3],
    noise: NoiseSynthesizer<R>,
    blur_temp: Vec<f32>,
}

impl<R: Rng> DegradationFilter<R> {
    pub fn new(profiles: SeverityProfiles, noise: NoiseSynthesizer<R>) -> Self {
        let kernels = profiles.degraded_kernels().map(|(kx, ky)| LevelKernels {
            horizontal: gaussian::gaussian_kernel_1d(kx),
            vertical: gaussian::gaussian_kernel_1d(ky),
        });
        Self {
            profiles,
            kernels,
            noise,
            blur_temp: Vec::new(),
        }
    }

    pub fn profiles(&self) -> &SeverityProfiles {
        &self.profiles
    }

    /// Degrades `region` for a non-healthy `level`, returning a new frame of
    /// the same dimensions. Empty regions come back unchanged.
    pub fn apply(&mut self, region: &Frame, level: SeverityLevel) -> Result<Frame, SimulationError> {
        let opacity = self.profiles.lookup(level)?.opacity;
        if region.is_empty() {
            return Ok(region.clone());
        }
        if region.channels() != 3 {
            return Err(SimulationError::UnsupportedFrame {
                channels: region.channels(),
            });
        }

        let noise = self.noise.generate(region.height(), region.width());

        let mut blurred = region.clone();
        let kernels = &self.kernels[usize::from(level.code()) - 1];
        gaussian::separable_gaussian_blur(
            blurred.data_mut(),
            region.width() as usize,
            region.height() as usize,
            3,
            &kernels.horizontal,
            &kernels.vertical,
            &mut self.blur_temp,
        );

        let alpha = opacity as f32;
        let beta = 1.0 - alpha;
        Zip::from(blurred.as_ndarray_mut())
            .and(noise.as_ndarray())
            .for_each(|b, &n| *b = weighted_blend(*b, alpha, n, beta));

        if blurred.dimensions() != region.dimensions() {
            return Err(SimulationError::DimensionMismatch {
                expected: region.dimensions(),
                actual: blurred.dimensions(),
            });
        }
        Ok(blurred)
    }
}

/// `a * alpha + b * beta`, rounded to the nearest byte and saturated.
fn weighted_blend(a: u8, alpha: f32, b: u8, beta: f32) -> u8 {
    (a as f32 * alpha + b as f32 * beta).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::severity_profile::{SeverityProfile, EARLY_PROFILE, MIDDLE_PROFILE};
    use rstest::rstest;

    fn filter(seed: u64) -> DegradationFilter {
        DegradationFilter::new(SeverityProfiles::default(), NoiseSynthesizer::seeded(seed))
    }

    fn channel_means(frame: &Frame) -> [f64; 3] {
        let mut sums = [0.0f64; 3];
        for px in frame.data().chunks_exact(3) {
            for c in 0..3 {
                sums[c] += px[c] as f64;
            }
        }
        let n = (frame.width() * frame.height()) as f64;
        sums.map(|s| s / n)
    }

    #[test]
    fn test_weighted_blend_rounds_and_saturates() {
        assert_eq!(weighted_blend(255, 0.4, 128, 0.6), 179); // 102 + 76.8
        assert_eq!(weighted_blend(255, 1.0, 255, 1.0), 255);
        assert_eq!(weighted_blend(0, 0.5, 1, 0.5), 1); // 0.5 rounds away from zero
    }

    #[rstest]
    #[case::early(SeverityLevel::Early)]
    #[case::middle(SeverityLevel::Middle)]
    #[case::late(SeverityLevel::Late)]
    fn test_preserves_dimensions(#[case] level: SeverityLevel) {
        let region = Frame::filled(37, 23, [10, 200, 90], 4);
        let out = filter(1).apply(&region, level).unwrap();
        assert_eq!(out.dimensions(), region.dimensions());
        assert_eq!(out.channels(), 3);
    }

    #[rstest]
    #[case::early(SeverityLevel::Early)]
    #[case::middle(SeverityLevel::Middle)]
    #[case::late(SeverityLevel::Late)]
    fn test_uniform_region_lands_in_tint_band(#[case] level: SeverityLevel) {
        let color = [255u8, 0, 60];
        let region = Frame::filled(100, 100, color, 0);
        let mut f = filter(11);
        let opacity = f.profiles().lookup(level).unwrap().opacity;
        let out = f.apply(&region, level).unwrap();

        for (c, mean) in channel_means(&out).into_iter().enumerate() {
            let low = opacity * color[c] as f64 + (1.0 - opacity) * 125.0;
            let high = opacity * color[c] as f64 + (1.0 - opacity) * 131.0;
            assert!(
                (low - 0.5..=high + 0.5).contains(&mean),
                "channel {c} mean {mean} outside [{low}, {high}]"
            );
        }
    }

    #[test]
    fn test_healthy_is_rejected() {
        let region = Frame::filled(8, 8, [1, 2, 3], 0);
        assert!(matches!(
            filter(1).apply(&region, SeverityLevel::Healthy),
            Err(SimulationError::UnknownSeverity(_))
        ));
    }

    #[test]
    fn test_empty_region_is_noop() {
        let region = Frame::new(Vec::new(), 0, 480, 3, 2);
        let out = filter(1).apply(&region, SeverityLevel::Late).unwrap();
        assert_eq!(out, region);
    }

    #[test]
    fn test_rejects_non_bgr_region() {
        let region = Frame::new(vec![0u8; 16], 2, 2, 4, 0);
        assert!(matches!(
            filter(1).apply(&region, SeverityLevel::Early),
            Err(SimulationError::UnsupportedFrame { channels: 4 })
        ));
    }

    #[test]
    fn test_full_opacity_keeps_only_the_blur() {
        let opaque = SeverityProfile::new(1.0, 3, 3);
        let profiles = SeverityProfiles::new(EARLY_PROFILE, MIDDLE_PROFILE, opaque).unwrap();
        let mut f = DegradationFilter::new(profiles, NoiseSynthesizer::seeded(9));
        let region = Frame::filled(12, 12, [40, 80, 120], 0);
        let out = f.apply(&region, SeverityLevel::Late).unwrap();
        assert_eq!(out, region);
    }

    #[test]
    fn test_texture_varies_between_calls() {
        let region = Frame::filled(30, 30, [0, 0, 0], 0);
        let mut f = filter(5);
        let a = f.apply(&region, SeverityLevel::Late).unwrap();
        let b = f.apply(&region, SeverityLevel::Late).unwrap();
        assert_eq!(a.dimensions(), b.dimensions());
        assert_ne!(a, b);
    }

    #[test]
    fn test_input_region_not_modified() {
        let region = Frame::filled(20, 10, [255, 0, 0], 0);
        let before = region.clone();
        filter(2).apply(&region, SeverityLevel::Middle).unwrap();
        assert_eq!(region, before);
    }
}
