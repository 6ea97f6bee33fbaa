use crate::{Error, Result};

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use simplelock_core::ServerConfig;
use simplelock_users_memory::MemoryUserDirectory;
use url::Url;

/// Contents of the TOML config file.
///
/// ```toml
/// site_url = "http://localhost:8065"
///
/// [users]
/// console = "alice"
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Public base URL of the host.
    pub site_url: Url,

    /// User ids mapped to usernames.
    #[serde(default)]
    pub users: BTreeMap<String, String>,
}

impl Config {
    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Io("failed to read config file", e))?;

        Self::parse(&text)
    }

    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not a valid config.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Host configuration handed to the plugin.
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.site_url.clone())
    }

    /// Directory of the configured users.
    #[must_use]
    pub fn user_directory(&self) -> MemoryUserDirectory {
        MemoryUserDirectory::new(self.users.clone())
    }
}
