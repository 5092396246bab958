use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::{Path, PathBuf};

/// Directory the running executable lives in; the default root for CSV
/// discovery and the config file.
pub fn executable_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("Could not determine executable path")?;
    let dir = exe
        .parent()
        .ok_or_else(|| anyhow!("Executable has no parent directory"))?;
    Ok(dir.to_path_buf())
}

pub fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join("traymenu.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executable_dir_exists() {
        let dir = executable_dir().unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_config_path() {
        let path = config_path(Path::new("/tmp/menus"));
        assert!(path.to_string_lossy().ends_with("traymenu.toml"));
        assert!(path.starts_with("/tmp/menus"));
    }
}
