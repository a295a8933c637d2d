use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use keratitis_core::compositing::compositor_factory::create_compositor;
use keratitis_core::pipeline::session_logger::AggregatingSessionLogger;
use keratitis_core::pipeline::simulation_session::SimulationSession;
use keratitis_core::settings::simulator_config::SimulatorConfig;
use keratitis_core::severity::severity_level::SeverityLevel;
use keratitis_core::shared::constants::IMAGE_EXTENSIONS;
use keratitis_core::video::domain::frame_source::FrameSource;
use keratitis_core::video::infrastructure::image_file_source::ImageFileSource;
use keratitis_core::video::infrastructure::image_sequence_sink::ImageSequenceSink;
use keratitis_core::video::infrastructure::synthetic_source::SyntheticSource;

/// Keratitis vision simulator: renders healthy and degraded sight side by side.
#[derive(Parser)]
#[command(name = "keratitis-sim")]
struct Cli {
    /// Input image frames, processed in the order given.
    inputs: Vec<PathBuf>,

    /// Directory that receives the composited frames.
    #[arg(long)]
    output_dir: PathBuf,

    /// Severity stage: healthy, early, middle or late (overrides the config file).
    #[arg(long)]
    severity: Option<String>,

    /// Split position as a percentage of frame width (0-100).
    #[arg(long)]
    split: Option<u32>,

    /// JSON config file with profiles, noise and divider settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use a generated colour-bar feed of this size (e.g. 640x480) instead of inputs.
    #[arg(long)]
    synthetic: Option<String>,

    /// Number of frames to generate with --synthetic.
    #[arg(long, default_value = "30")]
    frames: usize,

    /// Seed for the haze noise, for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Divider line thickness in pixels (0 hides it).
    #[arg(long)]
    divider_thickness: Option<u32>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    log::info!(
        "Simulating {} with split at {}%",
        config.severity,
        config.split_percent
    );

    let compositor = create_compositor(&config, cli.seed)?;
    let settings = Arc::new(config.live_settings()?);
    let source = build_source(&cli)?;
    let sink = Box::new(ImageSequenceSink::new(&cli.output_dir));

    let report = SimulationSession::new(compositor, settings)
        .with_logger(Box::new(AggregatingSessionLogger::default()))
        .run(source, sink)?;

    if report.frames_dropped > 0 {
        log::warn!("{} frames could not be processed", report.frames_dropped);
    }
    log::info!(
        "Output written to {} ({} frames)",
        cli.output_dir.display(),
        report.frames_processed
    );
    Ok(())
}

fn build_config(cli: &Cli) -> Result<SimulatorConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => SimulatorConfig::load(path)?,
        None => SimulatorConfig::default(),
    };
    if let Some(severity) = &cli.severity {
        config.severity = severity.parse::<SeverityLevel>()?;
    }
    if let Some(split) = cli.split {
        config.split_percent = split;
    }
    if let Some(thickness) = cli.divider_thickness {
        config.divider.thickness = thickness;
    }
    Ok(config)
}

fn build_source(cli: &Cli) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    match &cli.synthetic {
        Some(size) => {
            let (width, height) = parse_size(size)?;
            log::info!("Using synthetic {width}x{height} feed ({} frames)", cli.frames);
            Ok(Box::new(SyntheticSource::new(width, height, cli.frames)))
        }
        None => Ok(Box::new(ImageFileSource::new(cli.inputs.clone()))),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.synthetic.is_some() && !cli.inputs.is_empty() {
        return Err("Input files and --synthetic are mutually exclusive".into());
    }
    if cli.synthetic.is_none() && cli.inputs.is_empty() {
        return Err("Provide input image files or --synthetic WxH".into());
    }
    for input in &cli.inputs {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
        if !is_image(input) {
            return Err(format!("Unsupported input format: {}", input.display()).into());
        }
    }
    if let Some(split) = cli.split {
        if split > 100 {
            return Err(format!("Split must be between 0 and 100, got {split}").into());
        }
    }
    if let Some(severity) = &cli.severity {
        severity.parse::<SeverityLevel>()?;
    }
    if let Some(size) = &cli.synthetic {
        parse_size(size)?;
        if cli.frames == 0 {
            return Err("--frames must be at least 1".into());
        }
    }
    Ok(())
}

fn is_image(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn parse_size(size: &str) -> Result<(u32, u32), Box<dyn std::error::Error>> {
    let parsed = size
        .split_once(|c: char| c == 'x' || c == 'X')
        .and_then(|(w, h)| {
            let w = w.trim().parse::<u32>().ok()?;
            let h = h.trim().parse::<u32>().ok()?;
            Some((w, h))
        });
    match parsed {
        Some((w, h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(format!("Invalid frame size '{size}', expected WIDTHxHEIGHT").into()),
    }
}
