use crate::models::config::ConfigFile;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load the config file. A missing file yields defaults.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load(&dir.path().join("storage-lock.toml")).unwrap();
        assert!(config.storage.root.is_none());
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_parse_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage-lock.toml");
        fs::write(
            &path,
            "[storage]\nroot = \"/srv/data\"\napplication = \"billing\"\n\n[logging]\nlevel = \"info\"\n",
        )
        .unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.storage.root, Some(PathBuf::from("/srv/data")));
        assert_eq!(config.storage.application.as_deref(), Some("billing"));
        assert_eq!(config.logging.level.as_deref(), Some("info"));
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage-lock.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
        let config = load(&path).unwrap();
        assert!(config.storage.application.is_none());
    }

    #[test]
    fn test_invalid_toml_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage-lock.toml");
        fs::write(&path, "[storage\nroot = ").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().starts_with("parse config"));
    }
}
