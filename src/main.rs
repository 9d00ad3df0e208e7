use clap::{Parser, Subcommand};
use stitch_estimate::imaging::RustBackend;
use stitch_estimate::intake::{self, UploadPolicy};
use stitch_estimate::{config, estimate, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stitch-estimate")]
#[command(about = "Estimate embroidery stitches, time and price from a design image")]
#[command(long_about = "\
Estimate embroidery stitches, time and price from a design image

The design is trimmed to its artwork, measured using the image's DPI (72 when
absent), and scanned for ink coverage. Coverage picks a density tier:

  coverage < 20%   1500 stitches per in²
  coverage < 60%   2000 stitches per in²
  otherwise        2500 stitches per in²

Accepted uploads: JPEG, PNG, WebP, TIFF up to 5 MiB. Coverage assumes dark
artwork on a light background.

Run 'stitch-estimate gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults apply if it does not exist)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log each pipeline stage to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Per-job rates that override the config file.
#[derive(clap::Args, Clone)]
struct RateArgs {
    /// Machine speed in stitches per minute
    #[arg(long)]
    speed: Option<f64>,

    /// Price per 1000 stitches
    #[arg(long)]
    price_per_thousand: Option<f64>,

    /// Flat fee added to the job
    #[arg(long)]
    base_fee: Option<f64>,
}

impl RateArgs {
    /// The flags that were given, as a `[production]` TOML overlay.
    fn overlay(&self) -> Option<toml::Value> {
        let mut production = toml::Table::new();
        for (key, value) in [
            ("machine_speed", self.speed),
            ("price_per_thousand", self.price_per_thousand),
            ("base_fee", self.base_fee),
        ] {
            if let Some(v) = value {
                production.insert(key.to_string(), toml::Value::Float(v));
            }
        }
        if production.is_empty() {
            return None;
        }
        let mut root = toml::Table::new();
        root.insert("production".to_string(), toml::Value::Table(production));
        Some(toml::Value::Table(root))
    }
}

#[derive(clap::Args)]
struct EstimateArgs {
    /// Design image (JPEG, PNG, WebP or TIFF)
    file: PathBuf,

    #[command(flatten)]
    rates: RateArgs,

    /// Write the analysis preview (JPEG) to this path
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Include the preview as a data URI in the JSON output
    #[arg(long, requires = "json")]
    embed_preview: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate a design image
    Estimate(EstimateArgs),
    /// Validate the config file and print the resolved values
    CheckConfig,
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Estimate(args) => {
            let config = load_config(&cli.config, args.rates.overlay())?;
            let bytes = intake::read_upload(&args.file, &UploadPolicy::default())?;

            let backend = RustBackend::new();
            let result = match estimate::estimate_bytes(&backend, &bytes, &config) {
                Ok(result) => result,
                Err(err) => {
                    eprintln!("{}", output::error_hint(&err));
                    return Err(err.into());
                }
            };

            if let Some(path) = &args.preview {
                std::fs::write(path, &result.preview.bytes)?;
            }
            if args.json {
                output::print_json(&result, args.embed_preview)?;
            } else {
                output::print_estimate(&result, &args.file, args.preview.as_deref());
            }
        }
        Command::CheckConfig => {
            let config = load_config(&cli.config, None)?;
            if cli.config.exists() {
                println!("==> {} is valid", cli.config.display());
            } else {
                println!(
                    "==> {} not found, using stock defaults",
                    cli.config.display()
                );
            }
            print!("{}", toml::to_string(&config)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Stock defaults, then the config file if present, then CLI overrides.
fn load_config(
    path: &Path,
    cli_overlay: Option<toml::Value>,
) -> Result<config::EstimatorConfig, config::ConfigError> {
    let file = config::load_raw_config(path)?;
    config::resolve_config(
        config::stock_defaults_value(),
        file.into_iter().chain(cli_overlay),
    )
}

/// Logs go to stderr so reports on stdout stay machine-readable.
///
/// `-v` turns on debug output for this crate; otherwise `RUST_LOG` applies,
/// defaulting to warnings only.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("stitch_estimate=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
