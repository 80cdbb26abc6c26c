use clap::Parser;
use photokml::{config::TimeField, version, Config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Place geotagged photos on a map: writes one KML marker per photo, in the order they were taken.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Directory holding the photos
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Trip name: document title, `Trip` field of every marker and output file name
    #[arg(short, long)]
    trip: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the KML file is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Exif field the capture time is read from
    #[arg(long, value_enum)]
    time_field: Option<TimeField>,

    /// More logging (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> photokml::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_path(path)?,
            None => Config::default(),
        };
        if let Some(trip) = &self.trip {
            config.trip_label = trip.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(field) = self.time_field {
            config.time_field = field;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    info!(
        "{} {}",
        version::name(),
        version::version().unwrap_or("unknown")
    );

    let result = args
        .config()
        .and_then(|config| photokml::run(&config, &args.dir));
    match result {
        Ok(summary) => {
            println!(
                "Placed {} markers in {}",
                summary.markers,
                summary.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
