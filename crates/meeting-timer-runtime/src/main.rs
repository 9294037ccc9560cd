//! Meeting Timer
//!
//! Runs the countdown of a `meeting-timer` block from a markdown note in the
//! terminal, and edits the default settings the blocks fall back to.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meeting_timer_core::models::{ResolvedConfig, Settings};
use meeting_timer_core::storage::{SettingsStorage, init_config_dir};
use meeting_timer_runtime::host;
use meeting_timer_runtime::{TimerEvent, TimerEventType, TimerRegistry};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "meeting-timer")]
#[command(about = "Countdown timer for meeting-timer blocks in markdown notes", long_about = None)]
struct Args {
    /// Log level
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Directory holding the settings file
    #[arg(long, global = true)]
    settings_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the countdown of a timer block
    Run {
        /// Markdown file containing the block
        file: PathBuf,

        /// Which timer block of the file, counting from 0
        #[arg(short, long, default_value_t = 0)]
        block: usize,
    },
    /// Print the configuration a timer block resolves to
    Resolve {
        file: PathBuf,

        #[arg(short, long, default_value_t = 0)]
        block: usize,
    },
    /// Show or change the default settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    Show,
    Set {
        /// Default meeting duration, HH:MM
        #[arg(long)]
        duration: Option<String>,

        /// Minutes before the end to raise a notification
        #[arg(long)]
        notify: Option<String>,

        #[arg(long)]
        date_format: Option<String>,

        #[arg(long)]
        auto_log: Option<bool>,

        #[arg(long)]
        log_date_linking: Option<String>,
    },
}

fn setup_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(level)
        .init();
}

fn open_storage(settings_dir: Option<PathBuf>) -> Result<SettingsStorage> {
    let dir = match settings_dir {
        Some(dir) => dir,
        None => init_config_dir()?,
    };
    tracing::debug!("Settings directory: {}", dir.display());
    Ok(SettingsStorage::new(dir))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let storage = open_storage(args.settings_dir)?;

    match args.command {
        Command::Run { file, block } => {
            let settings = storage.load()?;
            run_timer(&file, block, &settings).await
        }
        Command::Resolve { file, block } => {
            let settings = storage.load()?;
            let config = resolve_file(&file, block, &settings).await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Settings { action } => run_settings(&storage, action),
    }
}

async fn resolve_file(file: &Path, block: usize, settings: &Settings) -> Result<ResolvedConfig> {
    let document = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(host::resolve_block(&document, block, &settings.timer))
}

async fn run_timer(file: &Path, block: usize, settings: &Settings) -> Result<()> {
    let config = resolve_file(file, block, settings).await?;

    let registry = TimerRegistry::new();
    let block_id = host::block_id(&file.display().to_string(), block);
    let engine = registry.mount(&block_id, config).await?;

    eprintln!("Enter: start/pause   r: reset   q: quit");
    let snapshot = engine.snapshot().await;
    render(&snapshot.display, snapshot.control_label)?;

    host::drive(&engine, BufReader::new(tokio::io::stdin()), |event| {
        handle_event(event, &config)
    })
    .await?;

    println!();
    registry.unmount_all().await;
    Ok(())
}

fn handle_event(event: &TimerEvent, config: &ResolvedConfig) -> std::io::Result<()> {
    if let Some(display) = event.display() {
        let label = match event.event_type {
            TimerEventType::Started { .. } | TimerEventType::Tick { .. } => "pause",
            _ => "start",
        };
        return render(display, label);
    }

    match &event.event_type {
        TimerEventType::NotifyThreshold { notify_minutes, .. } => {
            host::notify_desktop(
                "Meeting timer",
                &format!("{} minutes left", notify_minutes),
                false,
            );
        }
        TimerEventType::Expired => {
            println!();
            println!("Time is up ({} elapsed)", config.duration);
            host::notify_desktop("Meeting timer", "Time is up", true);
        }
        _ => {}
    }
    Ok(())
}

fn render(display: &str, control_label: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\r{}  [{}]   ", display, control_label)?;
    stdout.flush()
}

fn run_settings(storage: &SettingsStorage, action: SettingsAction) -> Result<()> {
    let mut settings = storage.load()?;

    if let SettingsAction::Set {
        duration,
        notify,
        date_format,
        auto_log,
        log_date_linking,
    } = action
    {
        if let Some(duration) = duration {
            settings.timer.duration = duration;
        }
        if let Some(notify) = notify {
            settings.timer.notify = notify;
        }
        if let Some(format) = date_format {
            settings.date_format = format;
        }
        if let Some(enabled) = auto_log {
            settings.auto_log = enabled;
        }
        if let Some(linking) = log_date_linking {
            settings.log_date_linking = linking;
        }

        settings.validate()?;
        storage.save(&settings)?;
        tracing::info!("Settings saved to {}", storage.path().display());
    }

    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
