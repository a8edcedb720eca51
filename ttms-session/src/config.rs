//! Configuration for the [`SessionController`](crate::SessionController) and its guard.
mod file;

pub use self::file::FileStore;
use crate::api::DEFAULT_DATA_ENDPOINT;
use crate::cache::{CacheConfig, DEFAULT_COOKIE_NAME, DEFAULT_COOKIE_TTL_SECS, DEFAULT_STORAGE_KEY};
use crate::error::{Error, Result};
use crate::routes::{RouteTable, DEFAULT_LANDING_PATH, DEFAULT_LOGIN_PATH};
use crate::validator::{DEFAULT_VALIDATION_ENDPOINT, DEFAULT_VALIDATION_TIMEOUT};
use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Endpoints, storage names and guard paths for a [`SessionController`](crate::SessionController).
///
/// Missing fields take their default values when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The session-check endpoint.
    pub validation_endpoint: String,
    /// The entity data endpoint.
    pub data_endpoint: String,
    /// Persistent store key holding the session record.
    pub storage_key: String,
    /// Name of the session cookie.
    pub cookie_name: String,
    /// Lifetime of the session cookie.
    pub cookie_ttl_secs: i64,
    /// Deadline for one session check.
    pub validation_timeout_ms: u64,
    /// Where unauthenticated navigations are sent.
    pub login_path: String,
    /// Where authenticated visits to the login path are sent.
    pub landing_path: String,
}

impl Config {
    /// Read a configuration from `loader`.
    pub async fn load(loader: &impl Loader) -> Result<Self> {
        loader.load().await.map_err(Error::ConfigLoad)
    }
    /// Write this configuration to `saver`.
    pub async fn save(&self, saver: &impl Saver) -> Result<()> {
        saver.save(self).await.map_err(Error::ConfigSave)
    }
    /// The cache settings, rejecting a cookie TTL that is not positive or is out of range.
    pub fn cache_config(&self) -> Result<CacheConfig> {
        let cookie_ttl = TimeDelta::try_seconds(self.cookie_ttl_secs).ok_or_else(|| {
            Error::InvalidConfig(format!("cookie_ttl_secs {} is out of range", self.cookie_ttl_secs))
        })?;
        let config = CacheConfig {
            storage_key: self.storage_key.clone(),
            cookie_name: self.cookie_name.clone(),
            cookie_ttl,
        };
        config.cookie_expiry(Utc::now())?;
        Ok(config)
    }
    pub fn validation_timeout(&self) -> Duration {
        Duration::from_millis(self.validation_timeout_ms)
    }
    /// The default route table, with this configuration's login and landing paths.
    pub fn route_table(&self) -> RouteTable {
        let default = RouteTable::default();
        default.routes().iter().fold(
            RouteTable::new(self.login_path.as_str(), self.landing_path.as_str()),
            |table, route| {
                let mut route = route.clone();
                if route.path == DEFAULT_LOGIN_PATH {
                    route.path.clone_from(&self.login_path);
                }
                if route.path == DEFAULT_LANDING_PATH {
                    route.path.clone_from(&self.landing_path);
                }
                if route.redirect.as_deref() == Some(DEFAULT_LOGIN_PATH) {
                    route.redirect = Some(self.login_path.clone());
                }
                table.route(route)
            },
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validation_endpoint: String::from(DEFAULT_VALIDATION_ENDPOINT),
            data_endpoint: String::from(DEFAULT_DATA_ENDPOINT),
            storage_key: String::from(DEFAULT_STORAGE_KEY),
            cookie_name: String::from(DEFAULT_COOKIE_NAME),
            cookie_ttl_secs: DEFAULT_COOKIE_TTL_SECS,
            validation_timeout_ms: DEFAULT_VALIDATION_TIMEOUT.as_millis() as u64,
            login_path: String::from(DEFAULT_LOGIN_PATH),
            landing_path: String::from(DEFAULT_LANDING_PATH),
        }
    }
}

/// A source a [`Config`] can be read from.
pub trait Loader {
    /// Read the configuration.
    fn load(
        &self,
    ) -> impl Future<
        Output = core::result::Result<Config, Box<dyn std::error::Error + Send + Sync + 'static>>,
    > + Send;
}

/// A destination a [`Config`] can be written to.
pub trait Saver {
    /// Write the configuration.
    fn save(
        &self,
        config: &Config,
    ) -> impl Future<
        Output = core::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>,
    > + Send;
}
