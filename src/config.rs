use serde::{Deserialize, Serialize};

use std::{
    env, fmt, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

const CONFIG_PATH_VAR: &str = "NOTES_CONFIG";
const ENV_PREFIX: &str = "NOTES_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// SQLite database file, created on first start.
    pub database_path: PathBuf,
    /// Used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            database_path: PathBuf::from("notes.db"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                host: self.host.clone(),
                port: self.port,
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid NOTES_* environment variable: {0}")]
    Env(#[from] envy::Error),

    #[error("invalid listen address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file '{}'", path.display()),
            Self::Environment => write!(f, "NOTES_* environment variables"),
        }
    }
}

fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_yaml(&contents)
}

pub fn parse_yaml(contents: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(contents)?)
}

pub fn load_from_vars<I>(vars: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
}

/// Loads the config file named by `NOTES_CONFIG`, then `config.yaml`, and
/// otherwise falls back to `NOTES_*` environment variables over defaults.
///
/// Runs before logging is initialised, so the caller reports the source.
pub fn load_config() -> Result<(Config, ConfigSource), ConfigError> {
    let candidates = env::var(CONFIG_PATH_VAR)
        .ok()
        .into_iter()
        .chain(std::iter::once("config.yaml".to_string()))
        .map(PathBuf::from);

    for path in candidates {
        if path.exists() {
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }
    }

    let config = load_from_vars(env::vars())?;
    Ok((config, ConfigSource::Environment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_default_values() {
        let config = load_from_vars(Vec::new()).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.port, 8000);
        assert_eq!(config.database_path, PathBuf::from("notes.db"));
    }

    #[test]
    fn test_env_overrides() {
        let config = load_from_vars(vars(&[
            ("NOTES_PORT", "9000"),
            ("NOTES_DATABASE_PATH", "/tmp/other.db"),
            ("PORT", "1"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_env_port() {
        let err = load_from_vars(vars(&[("NOTES_PORT", "eighty")])).unwrap_err();

        assert!(matches!(err, ConfigError::Env(_)));
    }

    #[test]
    fn test_partial_yaml() {
        let config = parse_yaml("host: 0.0.0.0\nlog_level: debug\n").unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.yaml");
        fs::write(&path, "port: 8123\ndatabase_path: data/notes.db\n").unwrap();

        let config = load_from_file(&path).unwrap();

        assert_eq!(config.port, 8123);
        assert_eq!(config.database_path, PathBuf::from("data/notes.db"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_from_file(Path::new("/nonexistent/notes.yaml")).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/notes.yaml"));
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8000");

        let bad = Config {
            host: "not a host".to_string(),
            ..Config::default()
        };
        assert!(bad.socket_addr().is_err());
    }
}
