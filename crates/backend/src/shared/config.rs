use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[server]
port = 3000
"#;

/// Load configuration from config.toml
///
/// Search order:
/// 1. Next to the executable
/// 2. Embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Database file path; relative paths are resolved against the executable directory
pub fn get_database_path(config: &Config) -> PathBuf {
    let db_path = Path::new(&config.database.path);

    if db_path.is_absolute() {
        return db_path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(db_path);
        }
    }

    PathBuf::from(&config.database.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_server_section_is_optional() {
        let config = parse_config("[database]\npath = \"/var/lib/clinic/app.db\"\n").unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(
            get_database_path(&config),
            PathBuf::from("/var/lib/clinic/app.db")
        );
    }

    #[test]
    fn test_custom_port() {
        let config =
            parse_config("[database]\npath = \"app.db\"\n\n[server]\nport = 8081\n").unwrap();
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_missing_database_section_fails() {
        assert!(parse_config("[server]\nport = 1\n").is_err());
    }
}
