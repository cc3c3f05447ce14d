//! Show the effective cache configuration.

use std::path::{Path, PathBuf};

use geocache::config::{default_config_path, CacheConfig};

use crate::error::CliError;

/// Print the configuration loaded from `file`, or the default location.
///
/// A missing file yields the built-in defaults.
pub fn run(file: Option<PathBuf>) -> Result<(), CliError> {
    let path = file.unwrap_or_else(default_config_path);
    let config = CacheConfig::load_or_default(&path)?;
    print!("{}", render(&config, &path));
    Ok(())
}

fn render(config: &CacheConfig, path: &Path) -> String {
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };

    format!(
        "Config file: {}\n\n[cache]\ndata_capacity = {}\nsummary_capacity = {}\nmax_age_secs = {}\ncleanup_interval_secs = {}\n",
        source,
        config.data_capacity,
        config.summary_capacity,
        config.max_age.as_secs(),
        config.cleanup_interval.as_secs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_render_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let text = render(&CacheConfig::default(), &path);

        assert!(text.contains("not found, using defaults"));
        assert!(text.contains("data_capacity = 100"));
        assert!(text.contains("cleanup_interval_secs = 300"));
    }

    #[test]
    fn test_run_with_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[cache]\ndata_capacity = 42\n").unwrap();

        assert!(run(Some(path)).is_ok());
    }

    #[test]
    fn test_run_with_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[cache]\nsummary_capacity = 0\n").unwrap();

        assert!(matches!(run(Some(path)), Err(CliError::Config(_))));
    }
}
