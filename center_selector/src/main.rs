use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use center_selector::replay::replay;
use center_selector::{ChangeDetection, Coordinate, Reconciler, SelectorConfig};
use clap::Parser;
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Replay recorded map events through the center selector and print every
/// change it reports to the host
struct Cli {
    /// JSON Lines event file, `-` reads from stdin
    events: PathBuf,

    /// Controlled value supplied by the host, as `latitude,longitude`
    #[arg(long, allow_hyphen_values = true, action = clap::ArgAction::Set)]
    value: Option<Coordinate>,

    /// Initial coordinates supplied by the host, as `latitude,longitude`
    #[arg(long, allow_hyphen_values = true, action = clap::ArgAction::Set)]
    initial: Option<Coordinate>,

    /// Report a map movement when either latitude or longitude changes
    #[arg(long, action = clap::ArgAction::SetTrue)]
    either_axis: bool,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    debug: bool,
}

#[derive(Serialize)]
struct Emission {
    timestamp: chrono::DateTime<chrono::Utc>,
    latitude: f64,
    longitude: f64,
}

macro_rules! print_err_and_exit {
    () => {
        |e| {
            log::error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_log(cli.debug);

    let mut config = SelectorConfig::from_env();
    if cli.either_axis {
        config.change_detection = ChangeDetection::EitherAxis;
    }
    log::info!(
        "Default center {}, change detection {:?}",
        config.default_center,
        config.change_detection
    );

    let mut reconciler = Reconciler::new(cli.value, cli.initial, print_emission, &config);

    let reader: Box<dyn io::BufRead> = if cli.events.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&cli.events)
            .with_context(|| format!("Cannot open {}", cli.events.display()))
            .unwrap_or_else(print_err_and_exit!());
        Box::new(BufReader::new(file))
    };

    let summary = replay(reader, &mut reconciler)?;
    log::info!(
        "Replayed {} event(s): {} moved, {} synced, {} seeded, {} unchanged, {} line(s) skipped",
        summary.events,
        summary.moved,
        summary.synced,
        summary.seeded,
        summary.unchanged,
        summary.skipped_lines
    );
    if let Some(center) = summary.final_center {
        log::info!("Final center {center}");
    }

    Ok(())
}

fn print_emission(coordinate: Coordinate) {
    let emission = Emission {
        timestamp: chrono::Utc::now(),
        latitude: coordinate.latitude,
        longitude: coordinate.longitude,
    };

    match serde_json::to_string(&emission) {
        Ok(line) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{line}") {
                log::error!("Cannot write change to stdout: {e}");
            }
        }
        Err(e) => log::error!("Cannot encode change {coordinate}: {e}"),
    }
}

fn get_file_name(path_str: Option<&str>) -> String {
    path_str
        .map(std::path::Path::new)
        .and_then(|p| p.file_name())
        .and_then(|f| f.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn init_log(debug: bool) {
    use env_logger::fmt::style::{RgbColor, Style};

    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }

    builder
        .format(|buf, record| {
            let level_style = buf.default_level_style(record.level());
            let target_style = Style::new().fg_color(Some(RgbColor(140, 143, 145).into()));
            writeln!(
                buf,
                "{} [{level_style}{}{level_style:#}] {}{target_style}]{target_style:#} {}:{} - {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.target(),
                get_file_name(record.file()),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
