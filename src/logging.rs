//! Tracing subscriber setup.
//!
//! The interactive browser owns the terminal, so it logs to a file. One-shot
//! commands log to stderr and stay quiet (warnings only) unless `-v` is given.
//! `RUST_LOG` always takes precedence over the defaults chosen here.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
    /// No subscriber at all
    Off,
}

/// Default filter directive for a verbosity level
pub fn default_directive(target: &LogTarget, verbose: u8) -> &'static str {
    match verbose {
        0 if *target == LogTarget::Stderr => "prompt_catalog=warn",
        0 => "prompt_catalog=info",
        1 => "prompt_catalog=debug",
        _ => "prompt_catalog=trace",
    }
}

pub fn init_logging(target: &LogTarget, verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(target, verbose)))
        .context("Failed to parse log filter")?;

    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false))
                .try_init()
                .context("Failed to set tracing subscriber")
        }
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .try_init()
                .context("Failed to set tracing subscriber")
        }
    }
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    // Logs may contain prompt text; keep them owner-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = file.metadata() {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            let _ = fs::set_permissions(path, perms);
        }
    }

    Ok(file)
}
