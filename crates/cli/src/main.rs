#![deny(unsafe_code)]
//! CLI binary for the escape-time fractal renderer.
//!
//! Subcommands:
//! - `render [CONFIG]` renders a still image or an animation to PNG files
//! - `list` prints the available fractals, interpolations and color models
//! - `schema` prints every configuration key with its type and default

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use fractal_core::{config, ColorModel, Fractal, FractalParams, Interpolation, RenderConfig};
use fractal_render::snapshot::PngSink;
use fractal_render::AnimationDriver;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fractal", about = "Escape-time fractal renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a still image or an animation to PNG.
    Render {
        /// Path to a JSON configuration file (a flat object of keys).
        config: Option<PathBuf>,

        /// Extra keys as a JSON object, applied over the file.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Output directory (overrides `OutputPath`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render only this frame of an animation.
        #[arg(long)]
        frame: Option<usize>,
    },
    /// List available fractals, interpolations and color models.
    List,
    /// Print the configuration schema.
    Schema,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads the optional config file and merges the `--params` object over it.
fn load_params(path: Option<&Path>, overrides: &str) -> Result<Value, CliError> {
    let mut params = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .map_err(|e| CliError::Input(format!("cannot read '{}': {e}", p.display())))?;
            serde_json::from_str(&text)
                .map_err(|e| CliError::Input(format!("invalid JSON in '{}': {e}", p.display())))?
        }
        None => json!({}),
    };
    let overrides: Value = serde_json::from_str(overrides)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;

    let Value::Object(extra) = overrides else {
        return Err(CliError::Input("--params must be a JSON object".into()));
    };
    let Value::Object(base) = &mut params else {
        return Err(CliError::Input("configuration file must hold a JSON object".into()));
    };
    base.extend(extra);
    Ok(params)
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Renders the requested frames, returning the paths written.
fn render(config: &RenderConfig, frame: Option<usize>) -> Result<Vec<PathBuf>, CliError> {
    let driver = AnimationDriver::new(config);
    let total = driver.frame_count();
    if let Some(n) = frame.filter(|&n| n >= total) {
        return Err(CliError::Input(format!(
            "frame {n} out of range (sequence has {total} frames)"
        )));
    }
    let sink = PngSink::new(
        &config.output_dir,
        &config.file_prefix,
        unix_seconds(),
        config.animation.is_some(),
    )?;

    tracing::info!(
        fractal = %config.fractal.name(),
        width = config.width,
        height = config.height,
        frames = total,
        "starting render"
    );

    let mut written = Vec::new();
    match frame {
        Some(n) => {
            let plan = driver.plan(n);
            let raster = driver.render_plan(&plan)?;
            written.push(sink.write(&plan, raster)?);
        }
        None => {
            driver.run(|plan, raster| -> Result<(), CliError> {
                written.push(sink.write(plan, raster)?);
                Ok(())
            })?;
        }
    }
    Ok(written)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let fractals = FractalParams::list_names();
            let interpolations = Interpolation::list_names();
            let models = ColorModel::list_names();
            if cli.json {
                let info = json!({
                    "fractals": fractals,
                    "interpolations": interpolations,
                    "color_models": models,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Fractals:");
                for name in fractals {
                    println!("  {name}");
                }
                println!("Interpolations:");
                println!("  {}", interpolations.join(", "));
                println!("Color models:");
                println!("  {}", models.join(", "));
            }
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&config::schema())?);
        }
        Command::Render {
            config,
            params,
            output,
            frame,
        } => {
            let params = load_params(config.as_deref(), &params)?;
            let mut config = RenderConfig::from_json(&params)?;
            if let Some(dir) = output {
                config.output_dir = dir;
            }

            let written = render(&config, frame)?;

            if cli.json {
                let info = json!({
                    "fractal": config.fractal.name(),
                    "width": config.width,
                    "height": config.height,
                    "frames": written.len(),
                    "files": written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
                    "config": serde_json::to_value(&config)?,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} frame(s)) -> {}",
                    config.fractal.name(),
                    config.width,
                    config.height,
                    written.len(),
                    config.output_dir.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
