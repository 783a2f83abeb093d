use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skitter::config::PathKind;
use skitter::{GifCapture, PixelCanvas, Runner, SimConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file name (without the .ron extension)
    #[arg(long, default_value = "skitter")]
    config: String,

    /// Ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for gait jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Pointer path: orbit, waypoints, fixed
    #[arg(long)]
    path: Option<String>,

    /// Number of leg pairs
    #[arg(long)]
    legs: Option<usize>,

    /// Tail vertebrae
    #[arg(long)]
    tail: Option<usize>,

    /// Body size
    #[arg(long)]
    size: Option<f32>,

    /// Write an animated GIF of the run
    #[arg(long)]
    gif: Option<PathBuf>,

    /// Write a PNG of the final frame
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn apply_overrides(config: &mut SimConfig, args: &Args) -> Result<()> {
    if let Some(ticks) = args.ticks {
        config.run.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(path) = &args.path {
        config.run.path = path.parse::<PathKind>().map_err(anyhow::Error::msg)?;
    }
    if let Some(legs) = args.legs {
        config.lizard.legs = legs;
    }
    if let Some(tail) = args.tail {
        config.lizard.tail = tail;
    }
    if let Some(size) = args.size {
        anyhow::ensure!(size.is_finite() && size > 0.0, "Size must be positive, got {}", size);
        config.lizard.size = size;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = SimConfig::load_from(&args.config)?;
    apply_overrides(&mut config, &args)?;

    if args.print_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let mut runner = Runner::from_config(&config)?;
    let capture_cfg = &config.capture;
    let mut canvas = PixelCanvas::new(
        capture_cfg.width as usize,
        capture_cfg.height as usize,
        capture_cfg.scale,
    )
    .with_stroke(capture_cfg.color, capture_cfg.stroke);
    let mut gif = match &args.gif {
        Some(_) => Some(GifCapture::for_canvas(&canvas, capture_cfg.fps)?),
        None => None,
    };
    let every = capture_cfg.every.max(1);

    runner.run(config.run.ticks, |runner| {
        if let Some(gif) = gif.as_mut()
            && runner.tick() % every == 0
        {
            canvas.render(runner.creature(), runner.pointer());
            gif.capture_frame(&canvas);
        }
    });
    runner.log_summary();

    if let (Some(path), Some(gif)) = (&args.gif, &gif) {
        gif.save(path)
            .with_context(|| format!("Failed to save GIF to {}", path.display()))?;
    }

    if let Some(path) = &args.snapshot {
        canvas.render(runner.creature(), runner.pointer());
        canvas.save_png(path)?;
        log::info!("Saved snapshot to {}", path.display());
    }

    Ok(())
}
