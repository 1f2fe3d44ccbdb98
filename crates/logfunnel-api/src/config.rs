//! Configuration management for the logfunnel collector.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use logfunnel_sink::SinkConfig;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// An empty signing secret is tolerated at load time — the verifier
/// rejects every request with a missing-key error until one is set — so
/// the service can boot in development without credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOSTNAME`
    #[serde(default = "default_hostname", alias = "HOSTNAME")]
    pub hostname: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Signing
    /// Shared secret for signed-request verification.
    ///
    /// Environment variable: `CONSUMER_SECRET`
    #[serde(default, alias = "CONSUMER_SECRET")]
    pub consumer_secret: String,

    // Sink
    /// Base URL of the aggregation sink.
    ///
    /// Environment variable: `SINK_BASE_URL`
    #[serde(default = "default_sink_base_url", alias = "SINK_BASE_URL")]
    pub sink_base_url: String,
    /// Customer token for the aggregation sink.
    ///
    /// Environment variable: `SINK_TOKEN`
    #[serde(default, alias = "SINK_TOKEN")]
    pub sink_token: String,
    /// Timeout for sink submissions in seconds.
    ///
    /// Environment variable: `SINK_TIMEOUT_SECONDS`
    #[serde(default = "default_sink_timeout", alias = "SINK_TIMEOUT_SECONDS")]
    pub sink_timeout_seconds: u64,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Converts to the sink crate's client configuration.
    pub fn to_sink_config(&self) -> SinkConfig {
        SinkConfig {
            base_url: self.sink_base_url.clone(),
            token: self.sink_token.clone(),
            timeout: Duration::from_secs(self.sink_timeout_seconds),
            user_agent: format!("Logfunnel/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.hostname, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Signing secret rendered for logs.
    pub fn consumer_secret_masked(&self) -> &'static str {
        if self.consumer_secret.is_empty() {
            "(unset)"
        } else {
            "***"
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.sink_timeout_seconds == 0 {
            anyhow::bail!("sink_timeout_seconds must be greater than 0");
        }

        if self.sink_base_url.is_empty() {
            anyhow::bail!("sink_base_url must not be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            consumer_secret: String::new(),
            sink_base_url: default_sink_base_url(),
            sink_token: String::new(),
            sink_timeout_seconds: default_sink_timeout(),
            rust_log: default_log_level(),
        }
    }
}

fn default_hostname() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    1080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_sink_base_url() -> String {
    "http://127.0.0.1:7080".to_string()
}

fn default_sink_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, env, sync::Mutex};

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct TestEnvGuard {
        _lock: std::sync::MutexGuard<'static, ()>,
        vars: Vec<String>,
        originals: HashMap<String, Option<String>>,
    }

    impl TestEnvGuard {
        fn new() -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Self { _lock: lock, vars: Vec::new(), originals: HashMap::new() }
        }

        fn set_var(&mut self, key: &str, value: &str) {
            if !self.vars.contains(&key.to_string()) {
                self.originals.insert(key.to_string(), env::var(key).ok());
                self.vars.push(key.to_string());
            }
            env::set_var(key, value);
        }
    }

    impl Drop for TestEnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                match self.originals.get(var) {
                    Some(Some(value)) => env::set_var(var, value),
                    Some(None) => env::remove_var(var),
                    None => {},
                }
            }
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.hostname, "127.0.0.1");
        assert_eq!(config.port, 1080);
        assert!(config.consumer_secret.is_empty());
    }

    #[test]
    fn env_overrides_are_applied() {
        let mut guard = TestEnvGuard::new();
        guard.set_var("HOSTNAME", "0.0.0.0");
        guard.set_var("PORT", "9090");
        guard.set_var("CONSUMER_SECRET", "s3cret");
        guard.set_var("SINK_BASE_URL", "https://sink.example.com");
        guard.set_var("SINK_TOKEN", "tok-1");
        guard.set_var("SINK_TIMEOUT_SECONDS", "12");

        let config = Config::load().expect("Config should load with env overrides");

        assert_eq!(config.hostname, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.consumer_secret, "s3cret");

        let sink = config.to_sink_config();
        assert_eq!(sink.base_url, "https://sink.example.com");
        assert_eq!(sink.token, "tok-1");
        assert_eq!(sink.timeout, Duration::from_secs(12));
    }

    #[test]
    fn invalid_config_validation_fails() {
        let mut config = Config::default();
        config.port = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.request_timeout = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.sink_base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn secret_masking_never_prints_the_value() {
        let mut config = Config::default();
        assert_eq!(config.consumer_secret_masked(), "(unset)");

        config.consumer_secret = "s3cret".into();
        assert_eq!(config.consumer_secret_masked(), "***");
    }

    #[test]
    fn socket_address_parsing() {
        let mut config = Config::default();
        config.hostname = "127.0.0.1".to_string();
        config.port = 9000;

        let addr = config.parse_server_addr().expect("Should parse socket address");

        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 9000);
    }
}
