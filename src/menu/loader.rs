use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::entry::MenuEntry;

/// Fatal file-level failure. Row-level problems are silent skips, so any
/// error here aborts the whole reload.
#[derive(Debug, Error)]
#[error("Failed to load file '{}': {kind}", path.display())]
pub struct LoadError {
    pub path: PathBuf,
    pub kind: LoadErrorKind,
}

#[derive(Debug, Error)]
pub enum LoadErrorKind {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("unterminated quoted field on line {line}")]
    UnterminatedQuote { line: usize },
}

impl LoadError {
    fn new(path: &Path, kind: impl Into<LoadErrorKind>) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: kind.into(),
        }
    }
}

/// All `.csv` files under `root`, recursively, in a sorted (deterministic)
/// order. Extension matching is case-insensitive.
pub fn discover_csv_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    collect_csv_files(root, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_csv_files(dir: &Path, found: &mut Vec<PathBuf>) -> io::Result<()> {
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if path.is_dir() {
            collect_csv_files(&path, found)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            found.push(path);
        }
    }
    Ok(())
}

/// Parses one CSV file into validated menu entries.
///
/// Rows without exactly four fields, or with an empty main menu, label or
/// content, are skipped. An unreadable, non-UTF-8 or structurally
/// malformed file is a [`LoadError`].
pub fn load_file(path: &Path) -> Result<Vec<MenuEntry>, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::new(path, e))?;
    parse_entries(&content).map_err(|kind| LoadError::new(path, kind))
}

/// Discovers and loads every CSV file under `root`, concatenating the
/// entries. File order is irrelevant to callers; the tree builder sorts.
pub fn load_dir(root: &Path) -> Result<Vec<MenuEntry>, LoadError> {
    let files = discover_csv_files(root).map_err(|e| LoadError::new(root, e))?;

    let mut entries = Vec::new();
    for file in &files {
        entries.extend(load_file(file)?);
    }

    debug!(
        files = files.len(),
        entries = entries.len(),
        "loaded menu entries from {}",
        root.display()
    );

    Ok(entries)
}

fn parse_entries(content: &str) -> Result<Vec<MenuEntry>, LoadErrorKind> {
    let mut entries = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let fields = parse_record(line, line_no)?;

        if fields.len() != 4 {
            debug!(line = line_no, count = fields.len(), "skipping row: not 4 fields");
            continue;
        }

        match MenuEntry::from_record(&fields) {
            Some(entry) => entries.push(entry),
            None => debug!(line = line_no, "skipping row: empty required field"),
        }
    }

    Ok(entries)
}

/// Splits one line into comma-delimited fields, honoring optional double
/// quotes. A doubled quote inside a quoted field is a literal quote, and
/// every field is whitespace-trimmed.
fn parse_record(line: &str, line_no: usize) -> Result<Vec<String>, LoadErrorKind> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }

        let mut field = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return Err(LoadErrorKind::UnterminatedQuote { line: line_no }),
                }
            }
            // Anything between the closing quote and the delimiter is dropped.
            while chars.peek().is_some_and(|&c| c != ',') {
                chars.next();
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                field.push(c);
                chars.next();
            }
        }

        fields.push(field.trim().to_string());

        if chars.next().is_none() {
            break;
        }
    }

    Ok(fields)
}
