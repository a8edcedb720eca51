//! Session record cache kept in two places: a persistent store and an ambient cookie.
use crate::cookie::{Cookie, CookieJar};
use crate::error::{Error, Result};
use crate::record::SessionRecord;
use chrono::{DateTime, TimeDelta, Utc};
use ttms_common::store::Store;

/// Persistent store key holding the serialized session record.
pub const DEFAULT_STORAGE_KEY: &str = "web.fc.utm.my_usersession";
/// Cookie holding the raw session identifier.
pub const DEFAULT_COOKIE_NAME: &str = "session_id";
/// Lifetime of the session cookie, in seconds.
pub const DEFAULT_COOKIE_TTL_SECS: i64 = 60 * 60;
/// The session cookie is scoped to the whole application.
pub const COOKIE_PATH: &str = "/";

/// A way of reading a candidate session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    /// Parse the record in the persistent store and take its `session_id`.
    PersistentRecord,
    /// Take the value of the session cookie.
    AmbientCookie,
}

/// Read strategies in the order they are tried. The first hit wins; results are never merged.
pub const READ_ORDER: [ReadStrategy; 2] = [ReadStrategy::PersistentRecord, ReadStrategy::AmbientCookie];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub storage_key: String,
    pub cookie_name: String,
    pub cookie_ttl: TimeDelta,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            storage_key: String::from(DEFAULT_STORAGE_KEY),
            cookie_name: String::from(DEFAULT_COOKIE_NAME),
            cookie_ttl: TimeDelta::seconds(DEFAULT_COOKIE_TTL_SECS),
        }
    }
}

impl CacheConfig {
    /// Absolute expiry of a session cookie set at `now`.
    ///
    /// The TTL must be positive and the expiry representable.
    pub fn cookie_expiry(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if self.cookie_ttl <= TimeDelta::zero() {
            return Err(Error::InvalidConfig(format!(
                "cookie ttl must be positive, got {}",
                self.cookie_ttl
            )));
        }
        now.checked_add_signed(self.cookie_ttl).ok_or_else(|| {
            Error::InvalidConfig(format!("cookie ttl {} is out of range", self.cookie_ttl))
        })
    }
}

/// Reads and writes the session record in a persistent [`Store`] and a [`CookieJar`].
pub struct SessionCache<S, C> {
    store: S,
    cookies: C,
    config: CacheConfig,
}

impl<S, C> SessionCache<S, C>
where
    S: Store<String, String> + Send + Sync,
    C: CookieJar + Send + Sync,
{
    pub fn new(store: S, cookies: C) -> Self {
        Self::with_config(store, cookies, CacheConfig::default())
    }
    pub fn with_config(store: S, cookies: C, config: CacheConfig) -> Self {
        Self { store, cookies, config }
    }
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
    /// Best-effort candidate identifier.
    ///
    /// Tries each of [`READ_ORDER`] in turn. Read and parse failures count as misses
    /// and are never returned.
    pub async fn read_raw_id(&self) -> Option<String> {
        for strategy in READ_ORDER {
            if let Some(session_id) = self.read_with(strategy).await {
                tracing::debug!(?strategy, "found candidate session id");
                return Some(session_id);
            }
        }
        None
    }
    /// Read a candidate identifier with a single strategy.
    pub async fn read_with(&self, strategy: ReadStrategy) -> Option<String> {
        match strategy {
            ReadStrategy::PersistentRecord => {
                self.read_record().await.map(|record| record.session_id)
            }
            ReadStrategy::AmbientCookie => {
                match self.cookies.get(&self.config.cookie_name).await {
                    Ok(value) => value.filter(|v| !v.is_empty()),
                    Err(e) => {
                        tracing::debug!(error = %e, "failed to read session cookie");
                        None
                    }
                }
            }
        }
    }
    /// The full record from the persistent store, if present and well-formed.
    pub async fn read_record(&self) -> Option<SessionRecord> {
        let raw = match self.store.get(&self.config.storage_key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::debug!(error = %e, "failed to read persistent session entry");
                return None;
            }
        };
        let record = SessionRecord::from_json(&raw);
        if record.is_none() {
            tracing::debug!(key = %self.config.storage_key, "ignoring malformed session entry");
        }
        record
    }
    /// Write the record to the persistent store and its identifier to the cookie.
    ///
    /// A record without a usable identifier, or an unusable cookie TTL, is rejected before
    /// anything is written. If the cookie cannot be set, the persistent entry is put back
    /// the way it was.
    pub async fn save(&self, record: &SessionRecord) -> Result<()> {
        record.ensure_valid()?;
        let expires = self.config.cookie_expiry(Utc::now())?;
        let serialized =
            serde_json::to_string(record).map_err(|e| Error::InvalidRecord(e.to_string()))?;
        let key = &self.config.storage_key;
        let previous = match self.store.get(key).await {
            Ok(previous) => previous,
            Err(e) => {
                tracing::debug!(error = %e, "failed to read persistent session entry before save");
                None
            }
        };
        self.store
            .set(key.clone(), serialized)
            .await
            .map_err(|e| Error::SessionStore(Box::new(e)))?;
        let cookie = Cookie::new(
            self.config.cookie_name.clone(),
            record.session_id.clone(),
            COOKIE_PATH,
            expires,
        );
        if let Err(e) = self.cookies.set(cookie).await {
            let restored = match previous {
                Some(previous) => self.store.set(key.clone(), previous).await,
                None => self.store.del(key).await,
            };
            if let Err(restore) = restored {
                tracing::warn!(error = %restore, "failed to restore persistent session entry");
            }
            return Err(Error::CookieStore(Box::new(e)));
        }
        Ok(())
    }
    /// Remove the persistent entry and expire the cookie. Clearing an empty cache is a no-op.
    pub async fn clear(&self) -> Result<()> {
        let stored = self
            .store
            .del(&self.config.storage_key)
            .await
            .map_err(|e| Error::SessionStore(Box::new(e)));
        let cookie = self
            .cookies
            .expire(&self.config.cookie_name, COOKIE_PATH)
            .await
            .map_err(|e| Error::CookieStore(Box::new(e)));
        stored.and(cookie)
    }
}
