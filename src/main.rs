use std::io::{IsTerminal, stdout};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};

use cpuwatch::alert::{AlertLogger, FileSink, LogFormat};
use cpuwatch::app::App;
use cpuwatch::config::{Config, ConfigError, load_config, load_config_from_path};
use cpuwatch::event::EventHandler;
use cpuwatch::monitor::{CycleRunner, CycleSettings};
use cpuwatch::system::collector::Collector;
use cpuwatch::system::platform;
use cpuwatch::{diagnostics, ui};

#[derive(Parser)]
#[command(
    name = "cpuwatch",
    about = "Ranks processes by CPU, logs the ones over a threshold and kills on request"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// CPU percentage at or above which a process is flagged HIGH
    #[arg(long)]
    threshold: Option<f32>,

    /// Sampling interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Number of processes shown in the table
    #[arg(long)]
    top: Option<usize>,

    /// Alert log file (append-only)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Alert log format: text, json
    #[arg(long)]
    log_format: Option<String>,

    /// Write internal diagnostics as JSON lines to this file
    #[arg(long)]
    trace_log: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let (config, config_error) = load_config_for_cli(&cli)?;

    if let Some(path) = &config.logging.trace_log {
        diagnostics::init_tracing_json(path, &config.logging.trace_level)?;
    }
    // Reported only now so the warning reaches the trace file too.
    let config_warning = config_error.map(|err| {
        tracing::warn!(error = %err, "falling back to default settings");
        format!("Warning: {err}; using defaults")
    });

    let collector = Collector::new().wrap_err("cannot read the host process table")?;
    run(config, config_warning, collector).await
}

async fn run(config: Config, config_warning: Option<String>, collector: Collector) -> Result<()> {
    let alerts = Arc::new(AlertLogger::new(
        Box::new(FileSink::new(&config.logging.alert_log)),
        config.logging.format,
        config.logging.alert_policy,
    ));
    let settings = CycleSettings {
        top_n: config.general.top_n,
        threshold: config.general.cpu_threshold,
    };
    tracing::info!(
        threshold = settings.threshold,
        top_n = settings.top_n,
        interval_ms = config.general.refresh_interval_ms,
        "monitor starting"
    );

    let runner = CycleRunner::new(collector, settings, Arc::clone(&alerts));
    let mut events = EventHandler::new(runner, config.refresh_interval());
    let mut app = App::new(
        settings.threshold,
        config.kill_signal(),
        alerts,
        events.sender(),
    );
    if let Some(warning) = config_warning {
        app.push_notice(warning);
    }
    if !platform::is_elevated() {
        app.push_notice(
            "Not running with administrator privileges: some processes show partial data",
        );
    }

    let interactive = stdout().is_terminal();
    let mut out = stdout();
    ui::draw(&mut out, &app, interactive)?;

    while app.is_running() {
        let Some(event) = events.next().await else {
            break;
        };
        if app.handle_event(event) {
            ui::draw(&mut out, &app, interactive)?;
        }
    }

    events.shutdown();
    println!();
    tracing::info!("monitor stopped");

    match app.failure {
        Some(reason) => Err(eyre!(reason)),
        None => Ok(()),
    }
}

/// The config error, if any, is returned rather than logged because no
/// subscriber is installed yet.
fn load_config_for_cli(cli: &Cli) -> Result<(Config, Option<ConfigError>)> {
    let loaded = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };
    let (mut config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };

    if let Some(threshold) = cli.threshold {
        config.general.cpu_threshold = threshold;
    }
    if let Some(interval) = cli.interval_ms {
        config.general.refresh_interval_ms = interval;
    }
    if let Some(top) = cli.top {
        config.general.top_n = top;
    }
    if let Some(ref path) = cli.log_file {
        config.logging.alert_log = path.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = match format.to_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => return Err(eyre!("unknown log format `{other}`; expected text or json")),
        };
    }
    if let Some(ref path) = cli.trace_log {
        config.logging.trace_log = Some(path.clone());
    }

    Ok((config.sanitized(), config_error))
}
