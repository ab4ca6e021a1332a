use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Missing provider credential: {0}")]
    MissingCredential(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub credentials: ProviderCredentials,
    pub sightengine: SightengineConfig,
    pub hive: HiveConfig,
    pub polling: PollingConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Credentials handed to the provider clients at construction.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderCredentials {
    pub api_user: String,
    pub api_secret: String,
    pub api_key: String,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_user", &self.api_user)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SightengineConfig {
    pub base_url: String,
    pub models: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HiveConfig {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_secs: u64,
    pub max_wait_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for SightengineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.sightengine.com/1.0".to_string(),
            models: "genai".to_string(),
        }
    }
}

impl Default for HiveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.thehive.ai/api/v2".to_string(),
            model: "audio_deepfake".to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 2,
            max_wait_secs: 60,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl RelayConfig {
    /// Loads defaults, then the YAML file named by `RELAY_CONFIG`, then
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("RELAY_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_number("PORT", &port)?;
        }
        if let Some(user) = lookup("SIGHTENGINE_API_USER") {
            self.credentials.api_user = user;
        }
        if let Some(secret) = lookup("SIGHTENGINE_API_SECRET") {
            self.credentials.api_secret = secret;
        }
        if let Some(key) = lookup("HIVE_API_KEY") {
            self.credentials.api_key = key;
        }
        if let Some(interval) = lookup("VIDEO_POLL_INTERVAL_SECS") {
            self.polling.interval_secs = parse_number("VIDEO_POLL_INTERVAL_SECS", &interval)?;
        }
        if let Some(max_wait) = lookup("VIDEO_MAX_WAIT_SECS") {
            self.polling.max_wait_secs = parse_number("VIDEO_MAX_WAIT_SECS", &max_wait)?;
        }
        if let Some(timeout) = lookup("PROVIDER_REQUEST_TIMEOUT_SECS") {
            self.http.request_timeout_secs =
                parse_number("PROVIDER_REQUEST_TIMEOUT_SECS", &timeout)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials.api_user.trim().is_empty() {
            return Err(ConfigError::MissingCredential("api_user"));
        }
        if self.credentials.api_secret.trim().is_empty() {
            return Err(ConfigError::MissingCredential("api_secret"));
        }
        if self.credentials.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential("api_key"));
        }
        if self.polling.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "polling.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.polling.max_wait_secs < self.polling.interval_secs {
            return Err(ConfigError::Invalid(format!(
                "polling.max_wait_secs ({}) is shorter than polling.interval_secs ({})",
                self.polling.max_wait_secs, self.polling.interval_secs
            )));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "http.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        for (name, base) in [
            ("sightengine.base_url", &self.sightengine.base_url),
            ("hive.base_url", &self.hive.base_url),
        ] {
            url::Url::parse(base)
                .map_err(|e| ConfigError::Invalid(format!("{} '{}': {}", name, base, e)))?;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} is not a valid number: '{}'", key, value)))
}
