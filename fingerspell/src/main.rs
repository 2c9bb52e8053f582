//! fingerspell - replay hand frames through the letter classifier.
//!
//! Reads one s-expression message per line (stdin or `--input`), writes
//! responses and classifier events to stdout, logs to stderr.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use fingerspell::asl::{drain_events, ClassifierConfig, ClassifierEvent, ClassifierHandle};
use fingerspell::config::load_config;
use fingerspell::ipc::handle_message;

#[derive(Parser, Debug)]
#[command(name = "fingerspell", about = "Fingerspelling letter classifier")]
struct Cli {
    /// Message file to replay (default: stdin)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Classifier config file (s-expression plist)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the dwell duration in milliseconds
    #[arg(long)]
    dwell_ms: Option<f64>,

    /// Log every frame's lift vector and class
    #[arg(long)]
    trace: bool,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("fingerspell {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let default_filter = if cli.trace {
        "fingerspell=debug"
    } else {
        "fingerspell=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    info!("fingerspell v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => load_config(path).map_err(|e| {
            error!("configuration error: {:#}", e);
            e
        })?,
        None => ClassifierConfig::default(),
    };
    if let Some(ms) = cli.dwell_ms {
        config.dwell_ms = ms;
    }
    if cli.trace {
        config.debug_trace = true;
    }

    let handle = ClassifierHandle::new(config).map_err(|e| {
        error!("configuration error: {}", e);
        e
    })?;
    let events = handle.subscribe();

    let reader: Box<dyn BufRead + Send> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    // Read lines in background, classify in order on this thread.
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("input read error: {}", e);
                    break;
                }
            }
        }
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut messages = 0u64;

    while let Ok(line) = rx.recv() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        messages += 1;

        if let Some(response) = handle_message(&handle, line) {
            writeln!(out, "{}", response)?;
        }
        for event in drain_events(&events).unwrap_or_default() {
            write_event(&mut out, &event)?;
        }
        out.flush()?;
    }

    info!(
        "Replay finished: {} messages, {} frames, final letter {:?}",
        messages,
        handle.frames_processed(),
        handle.letter()
    );
    Ok(())
}

fn write_event(out: &mut impl Write, event: &ClassifierEvent) -> io::Result<()> {
    writeln!(out, "{}", event.to_sexp())
}
