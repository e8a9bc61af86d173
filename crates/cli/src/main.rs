#![deny(unsafe_code)]
//! CLI binary for huahua sketches.
//!
//! Subcommands:
//! - `render <sketch>`: draw a sketch offline until it finishes, write PNG
//! - `replay <seed.json>`: redraw a run recorded with `render --seed-out`
//! - `list`: print available sketches, speed levels and palettes

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use huahua_core::{FrameStatus, Palette, Seed, Sketch, SpeedLevel};
use huahua_sketches::{snapshot, FrameDriver, RasterSurface, SketchKind};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "huahua", about = "Progressive generative sketches, rendered offline")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log to stderr: -v for debug, -vv for trace.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draw a sketch until it finishes and write a PNG snapshot.
    Render {
        /// Sketch name ("mondrian" or "pebbles").
        sketch: String,

        /// Viewport width in pixels.
        #[arg(short = 'W', long, default_value_t = 800.0)]
        width: f64,

        /// Viewport height in pixels.
        #[arg(short = 'H', long, default_value_t = 600.0)]
        height: f64,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Speed level: 1, 2 or 4. Anything else means 1.
        #[arg(long, default_value_t = 1.0)]
        speed: f64,

        /// Stop after this many frames even if the sketch is unfinished.
        #[arg(long)]
        max_frames: Option<u64>,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Sketch parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Also write a seed record that `replay` can redraw.
        #[arg(long)]
        seed_out: Option<PathBuf>,
    },
    /// Redraw a run from a seed record.
    Replay {
        /// Seed JSON written by `render --seed-out`.
        seed_file: PathBuf,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// List available sketches, speed levels and palettes.
    List,
}

/// What a finished render produced.
struct Rendered {
    frames: u64,
    finished: bool,
    credits: Option<huahua_core::Credits>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Replays `seed` into a raster surface and writes it to `output`.
fn render_seed(seed: &Seed, output: &Path) -> Result<Rendered, CliError> {
    let viewport = seed.viewport()?;
    let sketch = SketchKind::from_seed(seed)?;
    let mut surface = RasterSurface::for_viewport(&viewport)?;

    let mut driver = FrameDriver::new(sketch, viewport, &mut surface);
    driver.set_speed(seed.speed);
    let frames = driver.run_until_finished(&mut surface, seed.frames);
    info!(sketch = %seed.sketch, frames, "render complete");

    snapshot::write_png(&mut surface, output).map_err(|e| CliError::snapshot(output, e))?;
    Ok(Rendered {
        frames,
        finished: driver.status() == FrameStatus::Finished,
        credits: driver.sketch().credits(),
    })
}

fn report(json: bool, seed: &Seed, output: &Path, rendered: &Rendered) -> Result<(), CliError> {
    if json {
        let info = serde_json::json!({
            "sketch": seed.sketch,
            "width": seed.width,
            "height": seed.height,
            "seed": seed.seed,
            "speed": seed.speed.label(),
            "frames": rendered.frames,
            "finished": rendered.finished,
            "credits": rendered.credits,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        let state = if rendered.finished { "finished" } else { "stopped" };
        eprintln!(
            "rendered {} ({}x{}, seed {}, {}, {} frames, {state}) -> {}",
            seed.sketch,
            seed.width,
            seed.height,
            seed.seed,
            seed.speed.label(),
            rendered.frames,
            output.display()
        );
        if let Some(c) = &rendered.credits {
            eprintln!("after \"{}\" by {} ({})", c.title, c.author, c.display_url(60));
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let sketches = SketchKind::list_sketches();
            let speeds: Vec<String> = SpeedLevel::ALL.iter().map(|s| s.label()).collect();
            let palettes = Palette::list_names();
            if cli.json {
                let info = serde_json::json!({
                    "sketches": sketches,
                    "speeds": speeds,
                    "palettes": palettes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Sketches:");
                for name in sketches {
                    println!("  {name}");
                }
                println!("Speeds:");
                println!("  {}", speeds.join(", "));
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Render {
            sketch,
            width,
            height,
            seed,
            speed,
            max_frames,
            output,
            params,
            seed_out,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params).map_err(CliError::Params)?;

            let mut record = Seed::new(&sketch, width, height, seed);
            record.params = params;
            record.speed = SpeedLevel::from_value(speed);
            record.frames = max_frames;

            let rendered = render_seed(&record, &output)?;

            if let Some(path) = seed_out {
                record.frames = Some(rendered.frames);
                std::fs::write(&path, serde_json::to_string_pretty(&record)?)
                    .map_err(|e| CliError::seed_write(&path, e))?;
                info!(path = %path.display(), "seed written");
            }
            report(cli.json, &record, &output, &rendered)?;
        }
        Command::Replay { seed_file, output } => {
            let text = std::fs::read_to_string(&seed_file).map_err(|e| CliError::seed_read(&seed_file, e))?;
            let record = Seed::from_json_str(&text)?;
            let rendered = render_seed(&record, &output)?;
            report(cli.json, &record, &output, &rendered)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
