use std::path::{Path, PathBuf};

use ringlog::Level;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid log level: {0}")]
    LogLevel(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    log: Log,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.log.level()?;

        Ok(config)
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    pub fn log(&self) -> &Log {
        &self.log
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default = "output_dir")]
    output_dir: PathBuf,
}

impl Default for General {
    fn default() -> Self {
        Self {
            output_dir: output_dir(),
        }
    }
}

impl General {
    /// Directory the dashboard files are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

fn output_dir() -> PathBuf {
    PathBuf::from("dist")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Log {
    #[serde(default = "log_level")]
    level: String,
}

impl Default for Log {
    fn default() -> Self {
        Self { level: log_level() }
    }
}

impl Log {
    pub fn level(&self) -> Result<Level, ConfigError> {
        self.level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.level.clone()))
    }
}

fn log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.general().output_dir(), Path::new("dist"));
        assert_eq!(config.log().level().unwrap(), Level::Info);
    }

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[general]\noutput_dir = \"out/grafana\"\n\n[log]\nlevel = \"debug\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.general().output_dir(), Path::new("out/grafana"));
        assert_eq!(config.log().level().unwrap(), Level::Debug);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[log]\nlevel = \"warn\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.general().output_dir(), Path::new("dist"));
        assert_eq!(config.log().level().unwrap(), Level::Warn);
    }

    #[test]
    fn test_shipped_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/dashboards.toml");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.general().output_dir(), Path::new("dist"));
        assert_eq!(config.log().level().unwrap(), Level::Info);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut unknown = tempfile::NamedTempFile::new().unwrap();
        writeln!(unknown, "[general]\noutput = \"x\"").unwrap();
        assert!(matches!(
            Config::load(unknown.path()),
            Err(ConfigError::Parse { .. })
        ));

        let mut level = tempfile::NamedTempFile::new().unwrap();
        writeln!(level, "[log]\nlevel = \"loud\"").unwrap();
        assert!(matches!(
            Config::load(level.path()),
            Err(ConfigError::LogLevel(_))
        ));

        assert!(matches!(
            Config::load(Path::new("/nonexistent/dashboards.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
