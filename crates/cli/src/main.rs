#![deny(unsafe_code)]
//! CLI binary for facet, the seeded tile-composition generator.
//!
//! Subcommands:
//! - `render`: generate a composition and write a PNG
//! - `svg`: generate a composition and write an SVG document
//! - `inspect`: print the composition (shapes and placement report) as JSON
//! - `token`: print the share token and export filename
//! - `list`: print palettes, components and policies, or the parameter schema

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use facet_core::{
    generate, parse_seed, BalancePolicy, ColorScheme, ComponentSelection, Composition, Params,
    Seed, DEFAULT_SEED,
};
use facet_render::raster::{render, RasterOptions, EXPORT_HEIGHT, EXPORT_WIDTH};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "facet", about = "Seeded tile-composition generator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Inputs shared by every generating subcommand.
#[derive(Args, Debug, Clone)]
struct GenArgs {
    /// Share token (URL query such as "s=42&cm=tc&a=50"); the base for all other flags.
    #[arg(short, long)]
    token: Option<String>,

    /// Seed; non-integers are floored, negative or unparsable values use the default seed.
    #[arg(short, long, conflicts_with = "random_seed")]
    seed: Option<String>,

    /// Pick a fresh seed instead of the default.
    #[arg(long)]
    random_seed: bool,

    /// Parameter overrides as a JSON object (see `list --schema`).
    #[arg(long)]
    params: Option<String>,

    /// Color scheme name.
    #[arg(short, long)]
    palette: Option<String>,

    /// Component code (tc, ls, lt, ss, st) or mx for a per-shape mix.
    #[arg(short, long)]
    component: Option<String>,

    /// Acceptance policy (color_overlap, centroid_feedback).
    #[arg(long)]
    policy: Option<String>,

    /// Halftone strength percentage; 0 disables the overlay.
    #[arg(long)]
    halftone: Option<f64>,

    /// Canvas width in pixels.
    #[arg(short = 'W', long, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(short = 'H', long, default_value_t = 450)]
    height: u32,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a composition and write a PNG.
    Render {
        #[command(flatten)]
        gen: GenArgs,

        /// Render at the 8000x4500 export resolution.
        #[arg(long, conflicts_with_all = ["out_width", "out_height"])]
        export: bool,

        /// Output width in pixels (letterboxed); defaults to the canvas width.
        #[arg(long, requires = "out_height")]
        out_width: Option<u32>,

        /// Output height in pixels (letterboxed); defaults to the canvas height.
        #[arg(long, requires = "out_width")]
        out_height: Option<u32>,

        /// Skip the halftone overlay even if its strength is set.
        #[arg(long)]
        no_halftone: bool,

        /// Output file path; defaults to the export filename in the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a composition and write an SVG document.
    Svg {
        #[command(flatten)]
        gen: GenArgs,

        /// Output file path; defaults to the export filename in the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the generated composition as JSON.
    Inspect {
        #[command(flatten)]
        gen: GenArgs,
    },
    /// Print the share token and export filename for the given inputs.
    Token {
        #[command(flatten)]
        gen: GenArgs,
    },
    /// List palettes, components and policies.
    List {
        /// Print the parameter schema instead.
        #[arg(long)]
        schema: bool,
    },
}

/// Seed in [0, 1e9) from the system clock.
fn fresh_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    (nanos % 1_000_000_000) as u64
}

/// Folds every generation flag into one seed and parameter set.
///
/// Precedence, lowest first: defaults, token, `--params`, named flags.
fn build_seed(gen: &GenArgs) -> Result<Seed, CliError> {
    let mut seed = gen
        .token
        .as_deref()
        .map(Seed::from_query)
        .unwrap_or_default();

    if let Some(raw) = &gen.seed {
        seed.seed = parse_seed(raw).unwrap_or_else(|| {
            log::warn!("unusable seed '{raw}', falling back to {DEFAULT_SEED}");
            DEFAULT_SEED
        });
    } else if gen.random_seed {
        seed.seed = fresh_seed();
    }

    if let Some(raw) = &gen.params {
        let overrides: Value = serde_json::from_str(raw)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        let Value::Object(overrides) = overrides else {
            return Err(CliError::Input("--params must be a JSON object".into()));
        };
        let mut merged = seed.params.to_json();
        if let Value::Object(base) = &mut merged {
            base.extend(overrides);
        }
        seed.params = Params::from_json(&merged);
    }

    let p = &mut seed.params;
    if let Some(name) = &gen.palette {
        p.palette = ColorScheme::from_name(name)?.name().to_string();
    }
    if let Some(code) = &gen.component {
        p.component = ComponentSelection::from_code(code)?;
    }
    if let Some(name) = &gen.policy {
        p.policy = BalancePolicy::from_name(name)?;
    }
    if let Some(strength) = gen.halftone {
        p.halftone_strength = strength;
    }
    seed.params = seed.params.clamped();
    Ok(seed)
}

fn compose(gen: &GenArgs) -> Result<(Seed, Composition), CliError> {
    let seed = build_seed(gen)?;
    let composition = generate(seed.seed, &seed.params, gen.width, gen.height)?;
    Ok((seed, composition))
}

fn output_path(output: Option<PathBuf>, seed: &Seed, extension: &str) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from(format!("{}.{extension}", seed.export_filename())))
}

fn report_written(
    json: bool,
    kind: &str,
    composition: &Composition,
    output: &Path,
    seed: &Seed,
) -> Result<(), CliError> {
    let report = composition.report();
    if json {
        let info = serde_json::json!({
            "kind": kind,
            "seed": seed.seed,
            "width": composition.width(),
            "height": composition.height(),
            "shapes": composition.shapes().len(),
            "attempts": report.attempts,
            "exhausted": report.exhausted,
            "token": seed.to_query(),
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {kind} (seed {}, {} of {} shapes, {} attempts) -> {}",
            seed.seed,
            composition.shapes().len(),
            report.target,
            report.attempts,
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List { schema } => {
            if schema {
                println!("{}", serde_json::to_string_pretty(&Params::schema())?);
                return Ok(());
            }
            let palettes = ColorScheme::list_names();
            let components = ComponentSelection::list_codes();
            let policies = BalancePolicy::list_names();
            if cli.json {
                let info = serde_json::json!({
                    "palettes": palettes,
                    "components": components,
                    "policies": policies,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
                println!("Components:");
                for code in components {
                    let label = ComponentSelection::from_code(code)
                        .map(|sel| match sel {
                            ComponentSelection::Single(c) => c.label(),
                            ComponentSelection::Mixed => "Mixed",
                        })
                        .unwrap_or_default();
                    println!("  {code}  {label}");
                }
                println!("Policies:");
                println!("  {}", policies.join(", "));
            }
        }
        Command::Render {
            gen,
            export,
            out_width,
            out_height,
            no_halftone,
            output,
        } => {
            let (seed, composition) = compose(&gen)?;
            let size = match (export, out_width.zip(out_height)) {
                (true, _) => Some((EXPORT_WIDTH, EXPORT_HEIGHT)),
                (false, size) => size,
            };
            let options = RasterOptions {
                size,
                halftone: !no_halftone,
            };
            let pixmap = render(&composition, &options)?.ok_or_else(|| {
                let (width, height) = size.unwrap_or((gen.width, gen.height));
                CliError::Surface { width, height }
            })?;
            let output = output_path(output, &seed, "png");
            facet_render::snapshot::write_png(&pixmap, &output)
                .map_err(|e| CliError::write(&output, e))?;
            report_written(cli.json, "png", &composition, &output, &seed)?;
        }
        Command::Svg { gen, output } => {
            let (seed, composition) = compose(&gen)?;
            let svg = facet_render::svg::to_svg(&composition)?;
            let output = output_path(output, &seed, "svg");
            std::fs::write(&output, svg).map_err(|e| CliError::write(&output, e))?;
            report_written(cli.json, "svg", &composition, &output, &seed)?;
        }
        Command::Inspect { gen } => {
            let (_, composition) = compose(&gen)?;
            println!("{}", serde_json::to_string_pretty(&composition)?);
        }
        Command::Token { gen } => {
            let seed = build_seed(&gen)?;
            if cli.json {
                let info = serde_json::json!({
                    "seed": seed.seed,
                    "token": seed.to_query(),
                    "filename": seed.export_filename(),
                    "params": seed.params.to_json(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", seed.to_query());
                println!("{}", seed.export_filename());
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
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
