//! Server configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// HS256 signing secret. A random one is generated when unset.
    pub jwt_secret: Option<String>,

    /// Token lifetime in hours
    pub token_ttl_hours: u64,

    /// JSON file backing the store; in-memory when unset
    pub data_file: Option<PathBuf>,

    /// Built SPA served for non-API paths
    pub static_dir: Option<PathBuf>,

    /// Delay form-data responses like a real backend would
    pub simulate_latency: bool,

    /// Create demo@example.com on startup
    pub seed_demo_user: bool,

    /// PBKDF2 work factor for new password hashes
    pub password_iterations: u32,

    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3100,
            jwt_secret: None,
            token_ttl_hours: 24,
            data_file: None,
            static_dir: None,
            simulate_latency: true,
            seed_demo_user: true,
            password_iterations: complex_forms_common::password::DEFAULT_ITERATIONS,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Per-IP rate limiting on `/api/*`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_secs: 15 * 60,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve `host:port` to a bind address. `host` may be an IP literal
    /// or a hostname such as `localhost`.
    pub async fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("cannot resolve bind host {:?}", self.host))?
            .next()
            .with_context(|| format!("bind host {:?} has no addresses", self.host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 3100);
        assert_eq!(cfg.token_ttl_hours, 24);
        assert!(cfg.simulate_latency);
        assert_eq!(cfg.rate_limit.max_requests, 100);
        assert_eq!(cfg.rate_limit.window_secs, 900);
        assert_eq!(cfg.listen_addr().await.unwrap().to_string(), "0.0.0.0:3100");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: ServerConfig = toml::from_str(
            r#"
            port = 4000
            simulate_latency = false

            [rate_limit]
            max_requests = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert!(!cfg.simulate_latency);
        assert_eq!(cfg.rate_limit.max_requests, 5);
        assert!(cfg.rate_limit.enabled);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        std::fs::write(&path, "host = \"127.0.0.1\"\ndata_file = \"data.json\"\n").unwrap();
        let cfg = ServerConfig::load(&path).unwrap();
        assert_eq!(cfg.listen_addr().await.unwrap().to_string(), "127.0.0.1:3100");
        assert_eq!(cfg.data_file, Some(PathBuf::from("data.json")));
    }

    #[tokio::test]
    async fn test_listen_addr_resolves_hostname() {
        let cfg = ServerConfig {
            host: "localhost".to_string(),
            port: 4100,
            ..Default::default()
        };
        let addr = cfg.listen_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 4100);
    }
}
