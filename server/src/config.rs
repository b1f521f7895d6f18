//! Server configuration.

use std::net::SocketAddr;

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// SQLite database URL. In-memory rates when unset.
    pub database_url: Option<String>,
    /// Bearer token guarding rate mutations.
    pub admin_token: Option<String>,
    /// Seed the default rate table into an empty store.
    pub seed: bool,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 3000,
            database_url: None,
            admin_token: None,
            seed: true,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("RATEDESK_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("RATEDESK_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = Some(url);
        }

        if let Some(token) = lookup("RATEDESK_ADMIN_TOKEN") {
            config.admin_token = Some(token);
        }

        if let Some(seed) = lookup("RATEDESK_SEED") {
            config.seed = !matches!(
                seed.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }

        if let Some(level) = lookup("RUST_LOG") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if matches!(&self.database_url, Some(url) if url.trim().is_empty()) {
            return Err("Database URL cannot be empty".to_string());
        }

        match &self.admin_token {
            None => return Err("RATEDESK_ADMIN_TOKEN must be set".to_string()),
            Some(token) if token.trim().is_empty() => {
                return Err("Admin token cannot be empty".to_string())
            }
            Some(_) => {}
        }

        self.socket_addr().map(|_| ())
    }

    /// Address to bind the HTTP listener to.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.listen_addr, self.listen_port)
            .parse()
            .map_err(|e| format!("Invalid listen address {}: {}", self.listen_addr, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config_needs_token() {
        let config = ServerConfig::default();
        assert!(config.validate().is_err());

        let config = ServerConfig {
            admin_token: Some("s3cret".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_from_lookup() {
        let config = from_map(&[
            ("RATEDESK_LISTEN_ADDR", "127.0.0.1"),
            ("RATEDESK_LISTEN_PORT", "8081"),
            ("DATABASE_URL", "sqlite://rates.db"),
            ("RATEDESK_ADMIN_TOKEN", "s3cret"),
            ("RATEDESK_SEED", "false"),
        ]);

        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8081");
        assert_eq!(config.database_url.as_deref(), Some("sqlite://rates.db"));
        assert!(!config.seed);
    }

    #[test]
    fn test_unparseable_port_keeps_default() {
        let config = from_map(&[("RATEDESK_LISTEN_PORT", "http")]);
        assert_eq!(config.listen_port, 3000);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = from_map(&[("RATEDESK_ADMIN_TOKEN", "s3cret")]);
        config.listen_port = 0;
        assert!(config.validate().is_err());

        let config = from_map(&[("RATEDESK_ADMIN_TOKEN", "  ")]);
        assert!(config.validate().is_err());

        let config = from_map(&[("RATEDESK_ADMIN_TOKEN", "s3cret"), ("DATABASE_URL", "")]);
        assert!(config.validate().is_err());

        let config = from_map(&[
            ("RATEDESK_ADMIN_TOKEN", "s3cret"),
            ("RATEDESK_LISTEN_ADDR", "not an address"),
        ]);
        assert!(config.validate().is_err());
    }
}
