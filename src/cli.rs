use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "traymenu")]
#[command(
    about = "A system tray menu of copyable text snippets loaded from CSV files",
    long_about = None
)]
pub struct Cli {
    /// Directory to scan for CSV files (defaults to the executable's directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}
