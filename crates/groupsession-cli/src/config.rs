//! Configuration loading for the sample runner

use std::fmt;
use std::path::{Path, PathBuf};

use eyre::WrapErr;
use groupsession_client::{ClientConfig, DEFAULT_TIMEOUT_MS, GroupSessionClient, LoginCredentials};
use serde::{Deserialize, Serialize};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "GROUPSESSION_CONFIG";

const DEFAULT_BASE_URL: &str = "http://localhost:8080/gsession";

/// Top-level configuration for the samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server connection settings
    #[serde(default = "default_client")]
    pub client: ClientConfig,
    /// Account the samples log in with
    #[serde(default)]
    pub credentials: Credentials,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: default_client(),
            credentials: Credentials::default(),
        }
    }
}

fn default_client() -> ClientConfig {
    ClientConfig::new(DEFAULT_BASE_URL).with_timeout_ms(DEFAULT_TIMEOUT_MS)
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default = "default_account")]
    pub user_id: String,
    #[serde(default = "default_account")]
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            user_id: default_account(),
            password: default_account(),
        }
    }
}

fn default_account() -> String {
    "admin".to_string()
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    #[must_use]
    pub fn login(&self) -> LoginCredentials {
        LoginCredentials::new(&self.user_id, &self.password)
    }
}

/// Values given on the command line, applied over the loaded file
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load from an explicit path, the environment, or default locations
    ///
    /// # Errors
    /// Returns error if a config file is found but cannot be loaded
    pub fn resolve(explicit: Option<&Path>) -> eyre::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        let mut paths = vec![PathBuf::from("groupsession.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("groupsession/groupsession.toml"));
        }

        for path in paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(&path);
            }
        }

        tracing::info!("no config file found, using defaults");
        Ok(Config::default())
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.client.base_url = base_url;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.client.timeout_ms = Some(timeout_ms);
        }
        if let Some(user) = overrides.user {
            self.credentials.user_id = user;
        }
        if let Some(password) = overrides.password {
            self.credentials.password = password;
        }
        self
    }

    /// Build a client from the connection settings
    ///
    /// # Errors
    /// Returns error if the connection settings are malformed
    pub fn connect(&self) -> eyre::Result<GroupSessionClient> {
        GroupSessionClient::new(self.client.clone()).wrap_err("invalid client configuration")
    }
}
