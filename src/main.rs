#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};
use traymenu::cli::Cli;
use traymenu::config::Config;
use traymenu::shell::{self, TrayShell};
use traymenu::utils::paths;

fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        // A bad CSV file (or config) aborts the whole app on purpose;
        // the dialog is the only surface a tray app has.
        error!("{err:#}");
        shell::show_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let base_dir = match cli.dir {
        Some(dir) => dir,
        None => paths::executable_dir()?,
    };
    info!("menu directory: {}", base_dir.display());

    let config = Config::load(&base_dir)?;

    TrayShell::new(base_dir, config).run()
}
