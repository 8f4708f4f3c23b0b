//! Store connection settings.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PersistenceError, Result};

/// Environment variable consulted for the store password.
pub const PASSWORD_ENV: &str = "RETAIL_ETL_DB_PASSWORD";

const REDACTED: &str = "***";

/// Relational store flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreDriver {
    #[default]
    Mysql,
    Postgres,
    Sqlite,
}

impl StoreDriver {
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    pub const fn default_port(self) -> Option<u16> {
        match self {
            Self::Mysql => Some(3306),
            Self::Postgres => Some(5432),
            Self::Sqlite => None,
        }
    }
}

impl StoreDriver {
    /// Driver named by a connection URL's scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split_once(':').map(|(scheme, _)| scheme)?;
        match scheme.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::Mysql),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

impl fmt::Display for StoreDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Where persisted tables go.
///
/// For `sqlite`, `database` is the path of the database file. `url`, when
/// set, replaces the URL assembled from the other fields; `driver` must
/// still match its scheme.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub driver: StoreDriver,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub connect_timeout_secs: u64,
    pub url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            driver: StoreDriver::Mysql,
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "ecommerce_analytics".to_string(),
            connect_timeout_secs: 5,
            url: None,
        }
    }
}

impl StoreConfig {
    /// Settings for an SQLite database file.
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            driver: StoreDriver::Sqlite,
            database: path.into(),
            ..Self::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Take the password from `value` when present.
    pub fn apply_password_override(&mut self, value: Option<String>) {
        if let Some(password) = value {
            self.password = password;
        }
    }

    /// Take the password from [`PASSWORD_ENV`] when it is set.
    pub fn apply_env(&mut self) {
        self.apply_password_override(std::env::var(PASSWORD_ENV).ok());
    }

    /// The driver actually used; an override URL's scheme takes precedence.
    pub fn effective_driver(&self) -> StoreDriver {
        self.url
            .as_deref()
            .and_then(StoreDriver::from_url)
            .unwrap_or(self.driver)
    }

    /// Full connection URL, including credentials.
    pub fn connection_url(&self) -> Result<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        if self.driver == StoreDriver::Sqlite {
            return Ok(format!("sqlite://{}?mode=rwc", self.database));
        }

        let invalid = |what: &str| PersistenceError::InvalidConfig(format!("invalid {what}"));
        let mut url = Url::parse(&format!("{}://localhost/", self.driver.scheme()))
            .map_err(|e| PersistenceError::InvalidConfig(e.to_string()))?;
        url.set_host(Some(&self.host)).map_err(|_| invalid("host"))?;
        url.set_port(Some(self.port)).map_err(|()| invalid("port"))?;
        url.set_username(&self.user).map_err(|()| invalid("user"))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|()| invalid("password"))?;
        }
        url.set_path(&self.database);
        Ok(url.into())
    }

    /// Connection URL safe for logs and error messages.
    pub fn redacted_url(&self) -> String {
        match self.connection_url() {
            Ok(url) => redact_url(&url),
            Err(_) => format!("{}://{}", self.driver, self.host),
        }
    }
}

/// Mask the password component of a connection URL.
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() && url.set_password(Some(REDACTED)).is_err() {
                return format!("{}://{REDACTED}", url.scheme());
            }
            url.into()
        }
        Err(_) => REDACTED.to_string(),
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { REDACTED };
        f.debug_struct("StoreConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &password)
            .field("database", &self.database)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("url", &self.url.as_deref().map(redact_url))
            .finish()
    }
}
