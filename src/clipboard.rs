use anyhow::{Context, Result};
use arboard::Clipboard;

/// Copy text to the system clipboard.
///
/// A fresh handle is opened per call; the shell drives one dispatch at a
/// time and the OS clipboard is an exclusive resource anyway.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()
        .context("Failed to access system clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to write text to clipboard")?;
    Ok(())
}
