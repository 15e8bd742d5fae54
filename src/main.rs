//! Command-line utilities for the vastumark engine.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use vastumark::brush;
use vastumark::config::AppConfig;
use vastumark::geometry::Point;
use vastumark::guidance;

#[derive(Parser)]
#[command(
    name = "vastumark",
    version,
    about = "Floor-plan compass annotation utilities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the geometric center of an image
    Center {
        /// Path to the input image
        #[arg(long)]
        image: PathBuf,

        /// Also save a copy of the image with a ringed dot at the center
        #[arg(long)]
        show_overlay: bool,

        /// Output path for the overlay image (required with --show-overlay)
        #[arg(long)]
        overlay_output: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load a local guidance data directory and summarize it
    Guidance {
        /// Directory of per-category JSON files
        dir: PathBuf,

        /// Print the full table as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let config = AppConfig::default_path()
        .map(|path| AppConfig::load_or_default(&path))
        .unwrap_or_default();
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(config.preferences.log_level.to_level_filter().as_str()),
    )
    .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Center {
            image,
            show_overlay,
            overlay_output,
            json,
        } => {
            let decoded = image::open(&image)?.to_rgba8();
            let (width, height) = decoded.dimensions();
            // Round to get the true midpoint for odd/even dimensions.
            let cx = (f64::from(width) / 2.0).round() as u32;
            let cy = (f64::from(height) / 2.0).round() as u32;

            if show_overlay {
                let Some(out_path) = overlay_output else {
                    return Err("--overlay-output is required when using --show-overlay".into());
                };
                let mut out = decoded;
                let center = Point::new(cx as f32, cy as f32);
                brush::stamp_disc(&mut out, center, 8.0, [255, 255, 255, 255]);
                brush::stamp_disc(&mut out, center, 6.0, [255, 0, 0, 255]);
                out.save(&out_path)?;
                log::info!("Saved center overlay to {out_path:?}");
            }

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "width": width,
                        "height": height,
                        "center": {"x": cx, "y": cy},
                    })
                );
            } else {
                println!("width={width} height={height} center=({cx},{cy})");
            }
        }
        Commands::Guidance { dir, json } => {
            let table = guidance::local::load_dir(&dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                println!(
                    "{} categories, {} entries",
                    table.len(),
                    table.entry_count()
                );
                for name in table.category_names() {
                    let directions = table.directions_for(name).map_or(0, |m| m.len());
                    println!("  {name}: {directions} directions");
                }
            }
        }
    }
    Ok(())
}
