//! Configuration file support for the deckhand CLI.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. Environment variables (prefixed with `DECKHAND_`, e.g. `DECKHAND_API_URL`)
//! 2. Local config file (./deckhand.toml)
//! 3. XDG config file (~/.config/deckhand/config.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [api]
//! url = "https://api.smart-flashcards.com"  # optional, this is the default
//!
//! [auth]
//! token = "..."      # written by `deckhand login`
//! username = "ada"
//! ```

use std::io;
use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Default service endpoint when nothing is configured.
pub const DEFAULT_API_URL: &str = "https://api.smart-flashcards.com";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service base URL. Can also be set via DECKHAND_API_URL.
    pub url: Option<String>,
}

/// Stored credential from the last login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token. Can also be set via DECKHAND_AUTH_TOKEN.
    pub token: Option<String>,
    pub username: Option<String>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                tracing::debug!("loading config from {:?}", path);
                builder =
                    builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
            }
        }

        let local = PathBuf::from("deckhand.toml");
        if local.exists() {
            tracing::debug!("loading config from ./deckhand.toml");
            builder =
                builder.add_source(File::from(local).format(FileFormat::Toml).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("DECKHAND")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to build config: {}", e);
                Config::default()
            }
        }
    }

    pub fn api_url(&self) -> String {
        self.api
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn token(&self) -> Option<String> {
        self.auth.token.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.auth.username.clone()
    }

    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "deckhand").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Persist the credential from a successful login.
    ///
    /// Creates the config file and parent directories if they don't exist.
    /// An existing file is edited in place, touching only the `[auth]`
    /// section and preserving formatting and comments elsewhere.
    pub fn save_credentials(token: &str, username: &str) -> io::Result<PathBuf> {
        Self::edit_auth_section(|auth| {
            auth["token"] = toml_edit::value(token);
            auth["username"] = toml_edit::value(username);
        })
    }

    /// Drop the stored credential (logout).
    pub fn clear_credentials() -> io::Result<PathBuf> {
        Self::edit_auth_section(|auth| {
            auth.remove("token");
            auth.remove("username");
        })
    }

    fn edit_auth_section(
        edit: impl FnOnce(&mut toml_edit::Table),
    ) -> io::Result<PathBuf> {
        use toml_edit::{DocumentMut, Item, Table};

        let path = Self::default_config_path().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no home directory available")
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut doc: DocumentMut = match std::fs::read_to_string(&path) {
            Ok(existing) => existing
                .parse()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => DocumentMut::new(),
            Err(e) => return Err(e),
        };

        if !doc.contains_key("auth") {
            doc["auth"] = Item::Table(Table::new());
        }
        let auth = doc["auth"]
            .as_table_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "[auth] is not a table"))?;
        edit(auth);

        std::fs::write(&path, doc.to_string())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_falls_back_to_the_service_default() {
        let config = Config::default();
        assert_eq!(config.api_url(), DEFAULT_API_URL);

        let config = Config {
            api: ApiConfig {
                url: Some("https://staging.test".to_string()),
            },
            ..Config::default()
        };
        assert_eq!(config.api_url(), "https://staging.test");
    }

    #[test]
    fn missing_auth_section_means_no_token() {
        let config = Config::default();
        assert!(config.token().is_none());
        assert!(config.username().is_none());
    }
}
