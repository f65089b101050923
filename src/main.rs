//! speech-history: host stand-in that records and reviews speech.
//!
//! Reads one JSON event per line from stdin, for example:
//!   {"speak": ["Hello", {"command": "break", "ms": 200}, "world"]}
//!   {"command": "previous"}
//!   {"command": "copy_current", "repeat": 1}
//!   {"list_key": "enter"}
//!   {"reconfigure": {"max_history_length": 50}, "save": true}
//! Spoken text is written to stdout; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use speech_history::clipboard::SystemClipboard;
use speech_history::feedback::{Feedback, SilentFeedback, ToneFeedback};
use speech_history::list::ListKey;
use speech_history::{
    Command, Config, Event, HistoryConfig, HistoryService, QueueScheduler, SpeakEntryPoint,
    Speaker, SpeechTap, Utterance,
};

#[derive(Parser, Debug)]
#[command(name = "speech-history", about = "Record, review and copy recent speech")]
struct Args {
    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable feedback tones
    #[arg(long)]
    no_sounds: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

/// One line of host input.
#[derive(Deserialize, Debug)]
struct HostEvent {
    speak: Option<Utterance>,
    command: Option<Command>,
    #[serde(default)]
    repeat: u32,
    list_key: Option<ListKey>,
    reconfigure: Option<HistoryConfig>,
    /// Persist a reconfiguration, like the settings panel's save.
    #[serde(default)]
    save: bool,
}

/// Speech output for the stand-in host: one line per utterance.
struct ConsoleSpeaker;

impl Speaker for ConsoleSpeaker {
    fn speak(&self, utterance: &Utterance) {
        println!("{}", utterance.display_text());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("speech-history starting");

    let mut config = Config::load(args.config.as_deref());
    let save_path = args.config.clone().or_else(Config::user_path);

    let feedback: Box<dyn Feedback> = if args.no_sounds || !config.feedback.sounds {
        Box::new(SilentFeedback)
    } else {
        Box::new(ToneFeedback::new(true))
    };

    let entry = SpeakEntryPoint::new(Arc::new(ConsoleSpeaker));
    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let tap = SpeechTap::install(&entry, Arc::new(QueueScheduler::new(tx.clone())))?;

    let service = HistoryService::new(
        config.history.clone(),
        tap.original(),
        Box::new(SystemClipboard),
        feedback,
    )?;
    let service_task = tokio::spawn(service.run(rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<HostEvent>(line) {
                            Ok(event) => dispatch(event, &entry, &tx, &mut config, save_path.as_deref()),
                            Err(e) => warn!("Skipping malformed event: {e}"),
                        }
                    }
                    Ok(None) => {
                        debug!("stdin closed");
                        break;
                    }
                    Err(e) => {
                        warn!("Failed to read stdin: {e}");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    tap.uninstall();
    // The queue may still hold deferred inserts; shutdown lands behind them.
    let _ = tx.send(Event::Shutdown);
    let service = service_task.await?;
    info!("speech-history stopped with {} entries", service.store().len());

    Ok(())
}

fn dispatch(
    event: HostEvent,
    entry: &SpeakEntryPoint,
    tx: &mpsc::UnboundedSender<Event>,
    config: &mut Config,
    save_path: Option<&std::path::Path>,
) {
    if let Some(utterance) = event.speak {
        entry.speak(&utterance);
    }

    if let Some(command) = event.command {
        let _ = tx.send(Event::Command {
            command,
            repeat: event.repeat,
        });
    }

    if let Some(key) = event.list_key {
        let _ = tx.send(Event::ListKey(key));
    }

    if let Some(history) = event.reconfigure {
        let candidate = Config {
            history,
            ..config.clone()
        };
        if let Err(e) = candidate.validate() {
            warn!("Rejected settings: {e}");
            return;
        }

        if event.save {
            match save_path {
                Some(path) => {
                    if let Err(e) = candidate.save(path) {
                        warn!("Failed to save settings: {e}");
                    }
                }
                None => warn!("No config location available, settings not saved"),
            }
        }

        let _ = tx.send(Event::Reconfigure(candidate.history.clone()));
        *config = candidate;
    }
}
