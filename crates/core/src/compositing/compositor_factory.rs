use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::degradation::domain::degradation_filter::DegradationFilter;
use crate::degradation::domain::noise_synthesizer::NoiseSynthesizer;
use crate::settings::simulator_config::SimulatorConfig;
use crate::shared::error::SimulationError;

use super::frame_compositor::FrameCompositor;

/// Builds a compositor from a config, validating the profiles up front.
///
/// With a `seed` the noise sequence is reproducible; otherwise it is seeded
/// from OS entropy.
pub fn create_compositor(
    config: &SimulatorConfig,
    seed: Option<u64>,
) -> Result<FrameCompositor, SimulationError> {
    let profiles = config.build_profiles()?;
    let rng = match seed {
        Some(seed) => {
            log::info!("Using deterministic noise (seed={seed})");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };
    let noise = NoiseSynthesizer::with_params(rng, config.noise.base, config.noise.intensity);
    Ok(FrameCompositor::new(
        DegradationFilter::new(profiles, noise),
        config.divider,
    ))
}
