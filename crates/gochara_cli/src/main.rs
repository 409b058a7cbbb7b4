mod logging;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gochara_config::{GocharaConfig, LogFormat};
use gochara_core::{HouseCuspSet, HouseSystem, sign_position};
use gochara_search::{NatalReference, ScanRequest, run_scan};
use tracing::info;

const DEFAULT_CONFIG: &str = "gochara.toml";

#[derive(Parser)]
#[command(name = "gochara", version, about = "Transit event scanner")]
struct Cli {
    /// Config file (defaults to ./gochara.toml when present)
    #[arg(long, global = true, env = "GOCHARA_CONFIG")]
    config: Option<PathBuf>,
    /// Log level when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Log format: pretty, compact or json
    #[arg(long, global = true)]
    log_format: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a date range and print the events as JSON
    Scan {
        /// First day (YYYY-MM-DD)
        #[arg(long, required_unless_present = "request")]
        start: Option<NaiveDate>,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long, required_unless_present = "request")]
        end: Option<NaiveDate>,
        /// Full scan request as a JSON file
        #[arg(long, conflicts_with_all = ["start", "end", "natal"])]
        request: Option<PathBuf>,
        /// Natal reference (points and houses) as a JSON file
        #[arg(long)]
        natal: Option<PathBuf>,
        /// Longitude table, overriding [ephemeris] table_path
        #[arg(long)]
        table: Option<PathBuf>,
        /// Skip aspects between moving bodies
        #[arg(long)]
        no_sky: bool,
        /// Leave the Moon out of the tracked bodies
        #[arg(long)]
        no_moon: bool,
        /// Also track Chiron and the lunar node
        #[arg(long)]
        optional_bodies: bool,
        /// Abort the scan after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Sign and degree for an ecliptic longitude
    Sign {
        /// Ecliptic longitude in degrees
        lon: f64,
    },
    /// House containing an ecliptic longitude
    House {
        /// Ecliptic longitude in degrees
        lon: f64,
        /// Twelve comma-separated cusp longitudes
        #[arg(long, value_delimiter = ',', required = true)]
        cusps: Vec<f64>,
        /// House system code (P, K, O, R, C, E, W)
        #[arg(long, default_value = "P")]
        system: char,
    },
    /// Check a config file and print the effective settings
    ValidateConfig {
        /// Config file to check
        path: PathBuf,
    },
}

fn load_config(explicit: Option<&Path>) -> Result<GocharaConfig> {
    match explicit {
        Some(path) => GocharaConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            GocharaConfig::load(Path::new(DEFAULT_CONFIG)).context("loading ./gochara.toml")
        }
        None => Ok(GocharaConfig::default()),
    }
}

fn parse_log_format(s: &str) -> Result<LogFormat> {
    match s.to_ascii_lowercase().as_str() {
        "pretty" => Ok(LogFormat::Pretty),
        "compact" => Ok(LogFormat::Compact),
        "json" => Ok(LogFormat::Json),
        other => bail!("unknown log format '{other}' (pretty, compact, json)"),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn validate_config(path: &Path) -> Result<()> {
    let config =
        GocharaConfig::load(path).with_context(|| format!("invalid config {}", path.display()))?;
    let settings = config.scan_settings()?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

/// Config for logging and scans. validate-config reads only its own file,
/// since the ambient one may be the broken one.
fn ambient_config(cli: &Cli) -> Result<GocharaConfig> {
    match &cli.command {
        Commands::ValidateConfig { .. } => Ok(GocharaConfig::default()),
        _ => load_config(cli.config.as_deref()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ambient_config(&cli)?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let format = match cli.log_format.as_deref() {
        Some(s) => parse_log_format(s)?,
        None => config.logging.format,
    };
    logging::init(level, format)?;

    match cli.command {
        Commands::Scan {
            start,
            end,
            request,
            natal,
            table,
            no_sky,
            no_moon,
            optional_bodies,
            timeout_secs,
            pretty,
        } => {
            let request = match request {
                Some(path) => read_json::<ScanRequest>(&path)?,
                None => {
                    let (Some(start), Some(end)) = (start, end) else {
                        bail!("--start and --end are required without --request");
                    };
                    let mut request = ScanRequest::new(start, end);
                    request.natal = natal
                        .as_deref()
                        .map(read_json::<NatalReference>)
                        .transpose()?;
                    request.include_sky = !no_sky;
                    request.include_moon = !no_moon;
                    request.include_optional_bodies =
                        optional_bodies || config.scan.include_optional_bodies;
                    request
                }
            };

            let ephem = config.ephemeris_config(table.as_deref())?;
            gochara_ephem::init(&ephem).context("loading ephemeris table")?;
            let provider = gochara_ephem::provider()?;

            let settings = config.scan_settings()?;
            let deadline = timeout_secs.map(|s| Instant::now() + Duration::from_secs(s));
            let response = run_scan(provider, &request, &settings, deadline)?;
            info!(timelines = response.timelines.len(), "writing response");

            let out = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{out}");
        }
        Commands::Sign { lon } => {
            if !lon.is_finite() {
                bail!("longitude must be finite");
            }
            let pos = sign_position(lon);
            println!(
                "{} {:.4}° (longitude {:.4}°)",
                pos.sign.name(),
                pos.degrees_in_sign,
                pos.longitude_deg
            );
        }
        Commands::House { lon, cusps, system } => {
            let Some(system) = HouseSystem::from_code(system.to_ascii_uppercase()) else {
                bail!("unknown house system code '{system}'");
            };
            let set = HouseCuspSet::from_slice(&cusps, system)?;
            println!("{}", set.house_of(lon));
        }
        Commands::ValidateConfig { path } => validate_config(&path)?,
    }

    Ok(())
}
