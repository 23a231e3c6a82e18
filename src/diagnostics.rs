use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use tracing::Level;

/// Routes `tracing` events to a JSON-lines file. Without this the monitor
/// emits no diagnostics, which keeps the terminal table clean.
pub fn init_tracing_json(output_path: &Path, level: &str) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_path)?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_max_level(parse_level(level))
        .with_writer(Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

pub fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
