use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigType {
    /// HTTP API server configuration
    Server,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_connections() -> u32 {
    5
}

/// Server configuration file structure (TOML)
///
/// ```toml
/// config_type = "server"
/// port = 8000
/// database_url = "sqlite://data/shorts.sqlite"
/// ```
#[derive(Debug, Deserialize)]
pub struct ServerConfigFile {
    /// Configuration type (must be "server")
    pub config_type: ConfigType,
    /// Address to bind (default: 0.0.0.0)
    pub host: Option<String>,
    /// Port to listen on (default: 8000)
    pub port: Option<u16>,
    /// `sqlite:` or `postgres://` URL of the document database
    pub database_url: Option<String>,
    /// Database to use on the server (PostgreSQL creates it if missing)
    pub database_name: Option<String>,
    /// Connection pool size (default: 5)
    pub max_connections: Option<u32>,
}

/// Values given on the command line or through environment variables.
/// These take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub max_connections: Option<u32>,
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            database_name: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Load and parse a server config file
pub fn load_config_file(path: &Path) -> Result<ServerConfigFile, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;
    let config: ServerConfigFile = toml::from_str(&content)
        .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;
    Ok(config)
}

/// Empty values count as unset
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ServerConfig {
    /// Merge overrides, the optional config file and defaults, in that order
    pub fn resolve(file: Option<ServerConfigFile>, overrides: ConfigOverrides) -> Result<Self, String> {
        let defaults = ServerConfig::default();
        let (file_host, file_port, file_url, file_name, file_max) = match file {
            Some(f) => (f.host, f.port, f.database_url, f.database_name, f.max_connections),
            None => (None, None, None, None, None),
        };

        let config = ServerConfig {
            host: non_empty(overrides.host)
                .or(non_empty(file_host))
                .unwrap_or(defaults.host),
            port: overrides.port.or(file_port).unwrap_or(defaults.port),
            database_url: non_empty(overrides.database_url).or(non_empty(file_url)),
            database_name: non_empty(overrides.database_name).or(non_empty(file_name)),
            max_connections: overrides
                .max_connections
                .or(file_max)
                .unwrap_or(defaults.max_connections),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("max_connections must be at least 1".to_string());
        }

        if let Some(url) = &self.database_url {
            let supported = url.starts_with("sqlite:")
                || url.starts_with("postgres://")
                || url.starts_with("postgresql://");
            if !supported {
                return Err(format!(
                    "database_url must start with sqlite:, postgres:// or postgresql://, got: {}",
                    url
                ));
            }
        }

        Ok(())
    }

    /// Socket address to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
