use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding meals.json and users.json
    pub data_dir: PathBuf,
    /// Address to bind the web server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// How long a login session lasts
    pub session_ttl_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fueltrack"),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5002,
            session_ttl_minutes: 7 * 24 * 60,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path
            .or_else(|| std::env::var("FUELTRACK_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(Self::default_config_path);

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::Read(path.clone(), e))?;
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(path.clone(), e))?
        } else {
            Self::default()
        };

        if let Ok(data_dir) = std::env::var("FUELTRACK_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(host) = env_override("FUELTRACK_HOST")? {
            config.host = host;
        }
        if let Some(port) = env_override("FUELTRACK_PORT")? {
            config.port = port;
        }
        if let Some(ttl) = env_override("FUELTRACK_SESSION_TTL_MINUTES")? {
            config.session_ttl_minutes = ttl;
        }

        Ok(config)
    }

    /// Default config file path: <config_dir>/fueltrack/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fueltrack")
            .join("config.yaml")
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_override<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    Read(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_yaml::Error),
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}
