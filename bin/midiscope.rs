//! midiscope - print the messages a MIDI keyboard sends over its serial port.
//!
//! Usage: midiscope [DEVICE] [--json] [--show-clock] [--count N] [--file PATH]

use clap::Parser;
use midiscope::io::{CancelToken, DeviceConfig, DeviceStream, ReaderSource, DEFAULT_DEVICE};
use midiscope::wire::ByteSource;
use midiscope::{Monitor, MonitorReport, OutputFormat, Result, StatusFilter};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// MIDI device file to read from
    #[arg(default_value = DEFAULT_DEVICE)]
    device: PathBuf,

    /// Print one JSON object per line instead of text blocks
    #[arg(long)]
    json: bool,

    /// Also show timing clock (0xF8) and active sensing (0xFE) messages
    #[arg(long)]
    show_clock: bool,

    /// Stop after this many shown events
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Seconds between attempts to open the device
    #[arg(long, default_value = "2", value_parser = parse_secs)]
    retry_secs: Duration,

    /// Give up on the first open or read failure
    #[arg(long)]
    no_reconnect: bool,

    /// Replay a captured byte dump instead of reading a live device
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Log per-message detail
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_secs(s: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{e}"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(report) => {
            info!(
                messages = report.messages,
                shown = report.shown,
                decode_errors = report.decode_errors,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<MonitorReport> {
    let cancel = CancelToken::new();

    match &args.file {
        Some(path) => {
            let file = File::open(path).map_err(|source| midiscope::io::Error::DeviceOpen {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "replaying capture");
            monitor(ReaderSource::new(file), args, cancel)
        }
        None => {
            let config = DeviceConfig {
                path: args.device.clone(),
                retry_wait: args.retry_secs,
                reconnect: !args.no_reconnect,
                ..Default::default()
            };
            let stream = DeviceStream::spawn(config, cancel.clone())?;
            monitor(stream, args, cancel)
        }
    }
}

fn monitor<S: ByteSource>(source: S, args: &Args, cancel: CancelToken) -> Result<MonitorReport> {
    let filter = if args.show_clock {
        StatusFilter::show_all()
    } else {
        StatusFilter::default()
    };

    let mut builder = Monitor::builder()
        .source(source)
        .filter(filter)
        .cancel_token(cancel);
    if let Some(count) = args.count {
        builder = builder.max_events(count);
    }
    let mut monitor = builder.build()?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut sink = format.sink(std::io::stdout().lock());
    monitor.run(&mut sink)
}
