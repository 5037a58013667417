use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cardscan::debug::{prepare_output_dir, save_frame_diagnostics};
use cardscan::templates::DEFAULT_RANK_SIZE;
use cardscan::{CardPipeline, PipelineConfig, TemplateSet};

#[derive(Parser)]
#[command(name = "cardscan")]
#[command(about = "Detect playing cards in an image and read their rank and suit")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Directory holding one template image per rank and suit name
    #[arg(long, value_name = "DIR")]
    templates: PathBuf,

    /// Template file extension
    #[arg(long, default_value = "png")]
    ext: String,

    /// Width rank templates are resized to
    #[arg(long, default_value_t = DEFAULT_RANK_SIZE.0)]
    rank_width: u32,

    /// Height rank templates are resized to
    #[arg(long, default_value_t = DEFAULT_RANK_SIZE.1)]
    rank_height: u32,

    /// JSON pipeline configuration; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Gaussian kernel size (odd)
    #[arg(long)]
    kernel_size: Option<u32>,

    /// Gaussian sigma, zero derives it from the kernel size
    #[arg(long)]
    sigma: Option<f32>,

    /// Canny low threshold
    #[arg(long)]
    canny_low: Option<f32>,

    /// Canny high threshold
    #[arg(long)]
    canny_high: Option<f32>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

impl Cli {
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(k) = self.kernel_size {
            config.gaussian.kernel_size = k;
        }
        if let Some(s) = self.sigma {
            config.gaussian.sigma = s;
        }
        if let Some(low) = self.canny_low {
            config.canny.low_threshold = low;
        }
        if let Some(high) = self.canny_high {
            config.canny.high_threshold = high;
        }
        config.capture_diagnostics = self.debug_out.is_some();

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let templates = TemplateSet::from_dir(&args.templates, &args.ext, (args.rank_width, args.rank_height))?;
    let pipeline = CardPipeline::new(args.pipeline_config()?, Arc::new(templates))?;
    tracing::info!(
        dir = %args.templates.display(),
        ranks = pipeline.templates().ranks().len(),
        suits = pipeline.templates().suits().len(),
        "Templates loaded"
    );
    tracing::debug!(config = ?pipeline.config(), "Pipeline configured");

    // Fail before processing rather than after
    if let Some(debug_dir) = &args.debug_out {
        prepare_output_dir(debug_dir)?;
    }

    tracing::debug!(image = %args.image_path.display(), "Loading image");
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    tracing::debug!(width = img.width(), height = img.height(), "Image loaded");

    let result = pipeline.run(&img)?;

    if result.cards.is_empty() {
        println!("No cards detected.");
    }
    for (i, card) in result.cards.iter().enumerate() {
        println!(
            "Card {} at ({:.0}, {:.0}): {} of {} (rank score {}, suit score {})",
            i + 1,
            card.midpoint.x,
            card.midpoint.y,
            card.rank_guess(),
            card.suit_guess(),
            card.rank.score,
            card.suit.score
        );
    }

    if let Some(debug_dir) = &args.debug_out {
        save_frame_diagnostics(&result, debug_dir)?;
    }

    Ok(())
}
