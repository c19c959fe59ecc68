use anyhow::anyhow;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Fixed-window limiter settings for the two public POST endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rl_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_rl_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { max_requests: default_rl_max_requests(), window_secs: default_rl_window_secs() }
    }
}

fn default_rl_max_requests() -> u32 { 5 }
fn default_rl_window_secs() -> u64 { 60 }

/// Source values for the generated `config.json` the frontend reads at boot.
#[derive(Debug, Clone, Deserialize)]
pub struct FrontendConfig {
    #[serde(default = "default_frontend_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_frontend_output")]
    pub output_path: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_url: default_frontend_api_url(),
            api_token: None,
            output_path: default_frontend_output(),
        }
    }
}

fn default_frontend_api_url() -> String { "http://127.0.0.1:8080/api".to_string() }
fn default_frontend_output() -> String { "data/config.json".to_string() }

/// Shape of the generated `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendBootConfig {
    pub api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl FrontendConfig {
    pub fn render_boot_config(&self) -> Result<String> {
        let boot = FrontendBootConfig {
            api_url: self.api_url.clone(),
            api_token: self.api_token.clone(),
        };
        Ok(serde_json::to_string_pretty(&boot)?)
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        // Database URL may come from the environment rather than the TOML file
        self.database.normalize_from_env();
        self.database.validate()?;
        self.rate_limit.validate()?;
        self.frontend.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_requests == 0 {
            return Err(anyhow!("rate_limit.max_requests must be >= 1"));
        }
        if self.window_secs == 0 {
            return Err(anyhow!("rate_limit.window_secs must be >= 1"));
        }
        Ok(())
    }
}

impl FrontendConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("FRONTEND_API_URL") {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        if self.api_token.is_none() {
            if let Ok(token) = std::env::var("FRONTEND_API_TOKEN") {
                if !token.trim().is_empty() {
                    self.api_token = Some(token);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.rate_limit.max_requests, 5);
        assert_eq!(cfg.rate_limit.window_secs, 60);
    }

    #[test]
    fn rate_limit_rejects_zero_window() {
        let rl = RateLimitConfig { max_requests: 5, window_secs: 0 };
        assert!(rl.validate().is_err());
    }

    #[test]
    fn boot_config_omits_absent_token() {
        let f = FrontendConfig::default();
        let json = f.render_boot_config().unwrap();
        assert!(json.contains("api_url"));
        assert!(!json.contains("api_token"));
    }

    #[test]
    fn boot_config_includes_token_when_set() {
        let f = FrontendConfig { api_token: Some("secret".into()), ..Default::default() };
        let json = f.render_boot_config().unwrap();
        assert!(json.contains("\"api_token\": \"secret\""));
    }

    #[test]
    fn parse_partial_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [rate_limit]
            max_requests = 3
            window_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.rate_limit.max_requests, 3);
        assert_eq!(cfg.database.max_connections, 10);
    }
}
