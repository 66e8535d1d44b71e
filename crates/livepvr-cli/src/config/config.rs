//! `AppConfig` struct and TOML loading.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use livepvr_api::{Endpoint, LivePvrClient};
use serde::Deserialize;
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Service connection settings.
    #[serde(default)]
    pub client: ClientConfig,
    /// Request signing credentials.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Service connection settings.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the service (default: production).
    pub base_url: Option<String>,
    /// User-Agent sent with every request.
    pub user_agent: Option<String>,
    /// Path of the status endpoint, for older deployments.
    pub status_path: Option<String>,
    /// Path of the events endpoint, for older deployments.
    pub events_path: Option<String>,
    /// Path of the override endpoint, for older deployments.
    pub override_path: Option<String>,
}

/// Request signing credentials.
#[derive(Deserialize, Default, PartialEq, Eq)]
pub struct AuthConfig {
    /// Account e-mail address.
    pub email: Option<String>,
    /// API secret issued for the e-mail address.
    pub secret: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("email", &self.email)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Builds an API client from these settings.
    ///
    /// Requests are signed only when both `auth.email` and `auth.secret`
    /// are set.
    ///
    /// # Errors
    ///
    /// Returns an error if `client.base_url` is not a valid URL or the
    /// HTTP client cannot be built.
    pub fn build_client(&self) -> Result<LivePvrClient> {
        let mut builder = LivePvrClient::builder();

        if let Some(ref base_url) = self.client.base_url {
            let url = Url::parse(base_url)
                .with_context(|| format!("invalid client.base_url: {base_url}"))?;
            builder = builder.base_url(url);
        }
        if let Some(ref ua) = self.client.user_agent {
            builder = builder.user_agent(ua.as_str());
        }

        let paths = [
            (Endpoint::Status, &self.client.status_path),
            (Endpoint::Events, &self.client.events_path),
            (Endpoint::Override, &self.client.override_path),
        ];
        for (endpoint, path) in paths {
            if let Some(path) = path {
                builder = builder.endpoint_path(endpoint, path.as_str());
            }
        }

        if let (Some(email), Some(secret)) = (&self.auth.email, &self.auth.secret) {
            builder = builder.credentials(email.as_str(), secret.as_str());
        }

        builder.build()
    }
}
