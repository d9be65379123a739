//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from the environment (after `.env` is loaded) and optional
//! configuration files. Unset values fall back to local-development
//! defaults.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_PASSWORD: &str = "password";
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_NAME: &str = "todo";
const DEFAULT_API_PREFIX: &str = "/api";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Settings that could not be turned into usable values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid database URL: {message}")]
    DatabaseUrl { message: String },
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
}

/// PostgreSQL connection settings (`POSTGRES_*`).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POSTGRES")]
pub struct DatabaseSettings {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Database name.
    pub db: Option<String>,
    /// Full connection URL; overrides the individual parts when set.
    pub url: Option<String>,
    /// Upper bound on pooled connections.
    #[ortho_config(default = 10)]
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// Connection URL, either the configured override or one assembled from
    /// the parts with credentials percent-encoded.
    ///
    /// # Examples
    /// ```
    /// use todo_backend::settings::DatabaseSettings;
    ///
    /// let settings = DatabaseSettings {
    ///     user: Some("app".into()),
    ///     password: Some("p@ss".into()),
    ///     host: Some("db".into()),
    ///     port: None,
    ///     db: None,
    ///     url: None,
    ///     max_connections: 10,
    /// };
    /// assert_eq!(
    ///     settings.database_url().expect("valid URL"),
    ///     "postgres://app:p%40ss@db:5432/todo"
    /// );
    /// ```
    pub fn database_url(&self) -> Result<String, SettingsError> {
        if let Some(url) = &self.url {
            let parsed = Url::parse(url).map_err(|err| SettingsError::DatabaseUrl {
                message: err.to_string(),
            })?;
            return Ok(parsed.into());
        }

        let invalid = |what: &str| SettingsError::DatabaseUrl {
            message: format!("invalid {what}"),
        };
        let host = self.host.as_deref().unwrap_or(DEFAULT_DB_HOST);
        let mut url = Url::parse(&format!("postgres://{host}")).map_err(|err| {
            SettingsError::DatabaseUrl {
                message: err.to_string(),
            }
        })?;
        url.set_port(Some(self.port.unwrap_or(DEFAULT_DB_PORT)))
            .map_err(|()| invalid("port"))?;
        url.set_username(self.user.as_deref().unwrap_or(DEFAULT_DB_USER))
            .map_err(|()| invalid("user"))?;
        url.set_password(Some(
            self.password.as_deref().unwrap_or(DEFAULT_DB_PASSWORD),
        ))
        .map_err(|()| invalid("password"))?;
        url.set_path(self.db.as_deref().unwrap_or(DEFAULT_DB_NAME));
        Ok(url.into())
    }

    /// Pool size, never below one connection.
    pub fn max_connections(&self) -> u32 {
        self.max_connections.max(1)
    }
}

/// HTTP server settings (`TODO_*`).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TODO")]
pub struct ServerSettings {
    /// Path prefix for the Todo routes.
    pub api_prefix: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Serve from the in-memory store instead of PostgreSQL.
    #[ortho_config(default = false)]
    pub in_memory: bool,
    /// Skip applying embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl ServerSettings {
    /// Route prefix with a single leading slash and no trailing slash.
    ///
    /// An empty or `/` prefix mounts the routes at the root.
    pub fn api_prefix(&self) -> String {
        let raw = self.api_prefix.as_deref().unwrap_or(DEFAULT_API_PREFIX);
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }
}
