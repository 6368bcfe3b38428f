use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use cardia_core::{EventPriority, HeartMonitor, MonitorConfig, MonitorEvent};
use cardia_journal::EventJournal;
use cardia_transport::{SampleReader, SourceMsg};
use clap::{Parser, Subcommand};
use crossbeam_channel::{bounded, RecvTimeoutError};

#[derive(Parser)]
#[command(name = "cardia", about = "Streaming heart-rate monitor")]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream readings from a file (or stdin) and print BPM updates.
    Run {
        /// Input with one reading per line; defaults to stdin.
        input: Option<PathBuf>,
        /// TOML monitor configuration (CARDIA_* env vars override it).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Journal file for lifecycle and alert events.
        #[arg(long)]
        journal: Option<PathBuf>,
        /// Seconds between relaxation reminders.
        #[arg(long, default_value_t = 1200)]
        reminder_interval_sec: u64,
        /// Link suggested when a high-heart-rate alert fires.
        #[arg(long)]
        relax_link: Option<String>,
    },
    /// Print the entries of a journal file.
    Replay { journal: PathBuf },
    /// Run a synthetic pulse train through the monitor.
    Demo {},
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Run {
            input,
            config,
            journal,
            reminder_interval_sec,
            relax_link,
        } => cmd_run(input, config, journal, reminder_interval_sec, relax_link),
        Commands::Replay { journal } => cmd_replay(journal),
        Commands::Demo {} => cmd_demo(),
    }
}

fn cmd_run(
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    journal: Option<PathBuf>,
    reminder_interval_sec: u64,
    relax_link: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => MonitorConfig::from_file_with_env(path)?,
        None => MonitorConfig::default(),
    };
    let mut monitor = HeartMonitor::with_config(config);
    let mut journal = match journal {
        Some(path) => Some(EventJournal::open(path)?),
        None => None,
    };

    let source: Box<dyn BufRead + Send> = match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let (tx, rx) = bounded(256);
    let reader = SampleReader::spawn(source, tx);

    let reminder_every = Duration::from_secs(reminder_interval_sec.max(1));
    let mut last_reminder = Instant::now();
    let mut last_printed_bpm = None;

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(SourceMsg::Connected) => {
                let event = monitor.on_connected();
                println!("status: {:?}", monitor.status());
                record(&mut journal, &event)?;
            }
            Ok(SourceMsg::Sample(sample)) => {
                for event in monitor.push(sample) {
                    match &event {
                        MonitorEvent::BpmUpdated { bpm } => {
                            if last_printed_bpm != Some(*bpm) {
                                println!("BPM: {}", bpm);
                                last_printed_bpm = Some(*bpm);
                            }
                        }
                        MonitorEvent::HighHeartRate { reason, .. } => {
                            eprintln!("ALERT: {}", reason);
                            if let Some(link) = &relax_link {
                                println!("Try a short relaxation break: {}", link);
                            }
                        }
                        _ => {}
                    }
                    record(&mut journal, &event)?;
                }
            }
            Ok(SourceMsg::Disconnected) => {
                let event = monitor.on_disconnected();
                println!("status: {:?}", monitor.status());
                record(&mut journal, &event)?;
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if last_reminder.elapsed() >= reminder_every {
            println!("Time for a short relaxation break.");
            last_reminder = Instant::now();
        }
    }

    let metrics = reader.metrics();
    reader.stop();

    match monitor.bpm() {
        Some(bpm) => println!("final BPM: {}", bpm),
        None => println!("final BPM: unknown"),
    }
    println!(
        "lines: {}, samples: {}, discarded: {}, dropped: {}",
        metrics.lines_read,
        metrics.samples_emitted,
        metrics.parse_failures,
        metrics.channel_full_drops
    );
    Ok(())
}

// Critical events only; per-peak telemetry stays out of the journal.
fn record(
    journal: &mut Option<EventJournal>,
    event: &MonitorEvent,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(journal) = journal {
        if event.priority() == EventPriority::Critical {
            journal.append(chrono::Utc::now().timestamp_micros(), event)?;
        }
    }
    Ok(())
}

fn cmd_replay(journal: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let entries = EventJournal::read_all(&journal)?;
    if entries.is_empty() {
        println!("journal is empty");
        return Ok(());
    }
    for entry in &entries {
        println!("{:>16} {:?}", entry.ts_us, entry.event);
    }
    println!("{} entries", entries.len());
    Ok(())
}

// Synthetic pulse train: flat baseline with a spike every 750 ms, i.e. a
// target rate of 80 BPM at the default config.
fn cmd_demo() -> Result<(), Box<dyn std::error::Error>> {
    let mut monitor = HeartMonitor::new();
    monitor.on_connected();

    let step_us: i64 = 10_000; // 100 Hz
    let spike_every = 75; // samples
    let total = 30 * 100; // 30 seconds

    let mut peaks = 0;
    for i in 0..total {
        let ts = i as i64 * step_us;
        let value = if i > 0 && i % spike_every == 0 {
            900
        } else {
            500 + (i % 7) as i32
        };
        for event in monitor.on_sample(value, ts) {
            if let MonitorEvent::PeakAccepted { .. } = event {
                peaks += 1;
            }
        }
    }

    println!("synthetic stream: {} samples, {} peaks", total, peaks);
    match monitor.bpm() {
        Some(bpm) => println!("BPM: {}", bpm),
        None => println!("BPM: unknown"),
    }
    Ok(())
}
