//! Soundradar - three-microphone sound source locator
//!
//! Command line entry point. Localizes a capture frame read from a JSON file,
//! or a synthesized capture of a source at a given position.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use soundradar::{simulate_capture, CaptureFrame, Localizer, Point, RadarConfig};
use tracing::info;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("soundradar=info".parse()?)
                .add_directive("soundradar_core=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut write_config: Option<PathBuf> = None;
    let mut simulate: Option<Point> = None;
    let mut frame_path: Option<PathBuf> = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--version" | "-v" => {
                println!("soundradar {}", soundradar::VERSION);
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a path");
                    return Ok(());
                }
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
                continue;
            }
            "--write-config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --write-config requires a path");
                    return Ok(());
                }
                write_config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
                continue;
            }
            "--simulate" | "-s" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --simulate requires a position X,Y");
                    return Ok(());
                }
                simulate = parse_point(&args[i + 1]);
                if simulate.is_none() {
                    eprintln!("Error: Invalid position: {}", args[i + 1]);
                    return Ok(());
                }
                i += 2;
                continue;
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                return Ok(());
            }
            _ => {
                // Positional argument is the capture frame file
                if frame_path.is_none() {
                    frame_path = Some(PathBuf::from(&args[i]));
                }
            }
        }
        i += 1;
    }

    let config = match &config_path {
        Some(path) => RadarConfig::load_from(path),
        None => RadarConfig::load(),
    };

    if let Some(path) = write_config {
        config.validate()?;
        config.save(&path)?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let localizer = Localizer::new(config)?;
    println!(
        "Max delay: {} samples ({} samples per channel required)",
        localizer.max_delay(),
        localizer.required_samples()
    );

    let frame = match (simulate, frame_path) {
        (Some(source), _) => {
            info!(x = source.x, y = source.y, "Simulating capture");
            simulate_capture(source, localizer.config(), localizer.required_samples())
        }
        (None, Some(path)) => read_frame(&path)?,
        (None, None) => {
            print_help();
            return Ok(());
        }
    };

    info!(samples = frame.len(), "Localizing capture");
    let result = localizer.localize(&frame)?;
    println!("Result: {}", result);
    if let (Some(distance), Some(bearing)) = (result.distance(), result.bearing_degrees()) {
        println!("Distance: {:.1} cm, bearing: {:.1} deg", distance, bearing);
    }

    Ok(())
}

fn print_help() {
    println!("Usage: soundradar [OPTIONS] [FRAME.json]");
    println!();
    println!("Options:");
    println!("  -c, --config PATH       Load configuration from PATH");
    println!("  -s, --simulate X,Y      Localize a synthesized source at (X, Y) cm");
    println!("      --write-config PATH Write the active configuration to PATH");
    println!("  -v, --version           Show version");
    println!("  -h, --help              Show this help");
    println!();
    println!("Examples:");
    println!("  soundradar capture.json");
    println!("  soundradar -s 60,45 -c array.json");
    println!();
    println!("Without -c, the configuration is read from the user data directory.");
}

fn parse_point(text: &str) -> Option<Point> {
    let (x, y) = text.split_once(',')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn read_frame(path: &Path) -> Result<CaptureFrame> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read capture frame {}", path.display()))?;
    let frame = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse capture frame {}", path.display()))?;
    Ok(frame)
}
