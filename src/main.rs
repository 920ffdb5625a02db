use anyhow::{Context, Result};
use clap::Parser;
use image::{ImageReader, RgbaImage};
use std::path::{Path, PathBuf};

use fingercount::models::Radii;
use fingercount::{DetectorConfig, Mode, Pipeline};

#[derive(Parser)]
#[command(name = "fingercount")]
#[command(about = "Count raised fingers in a sequence of frames")]
struct Cli {
    /// Frame showing only the background, used for background sampling
    #[arg(long, value_name = "IMAGE")]
    background: PathBuf,

    /// Frame with the open hand over the sample squares
    #[arg(long, value_name = "IMAGE")]
    hand: PathBuf,

    /// Frames to track, in order
    #[arg(value_name = "FRAME", required = true)]
    frames: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Hand color radii as lowerL,upperL,lowerA,upperA,lowerB,upperB
    #[arg(long, value_name = "RADII", value_parser = parse_radii)]
    hand_radii: Option<Radii>,

    /// Background color radii, same layout as --hand-radii
    #[arg(long, value_name = "RADII", value_parser = parse_radii)]
    background_radii: Option<Radii>,
}

fn parse_radii(s: &str) -> Result<Radii, String> {
    let values: Vec<u8> = s
        .split(',')
        .map(|v| v.trim().parse::<u8>().map_err(|e| format!("invalid radius '{}': {}", v, e)))
        .collect::<Result<_, _>>()?;
    match values.as_slice() {
        &[l0, l1, a0, a1, b0, b1] => Ok(Radii::from_pairs((l0, l1), (a0, a1), (b0, b1))),
        _ => Err(format!("expected 6 comma-separated values, got {}", values.len())),
    }
}

fn load_frame(path: &Path) -> Result<RgbaImage> {
    let img = ImageReader::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .decode()
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(img.to_rgba8())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env().filter_level(level).init();

    let mut config = DetectorConfig::default();
    if let Some(radii) = args.hand_radii {
        config = config.with_hand_radii(radii);
    }
    if let Some(radii) = args.background_radii {
        config = config.with_background_radii(radii);
    }

    let mut pipeline = Pipeline::new(config).with_verbose(args.verbose);
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline
            .with_debug(debug_dir)
            .context("Failed to set up debug output")?;
    }

    let background = load_frame(&args.background)?;
    let (width, height) = background.dimensions();
    pipeline.start(width, height)?;

    pipeline
        .process_frame(&background)
        .context("Background sampling failed")?;
    pipeline.advance_mode();
    let hand = load_frame(&args.hand)?;
    pipeline.process_frame(&hand).context("Hand sampling failed")?;

    while pipeline.mode() != Mode::Track {
        pipeline.advance_mode();
    }

    println!("\n=== Finger Count Results ===");
    for path in &args.frames {
        let frame = load_frame(path)?;
        let result = pipeline
            .process_frame(&frame)
            .with_context(|| format!("Failed to process {}", path.display()))?;
        let accepted = result.hand.as_ref().is_some_and(|h| h.is_hand);
        match result.finger_count() {
            Some(count) => println!("  {}: {} (hand {})", path.display(), count, if accepted { "accepted" } else { "rejected" }),
            None => println!("  {}: no count", path.display()),
        }
    }

    pipeline.stop();
    Ok(())
}
