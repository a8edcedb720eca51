use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use ttms_session::cookie::{Cookie, CookieJar};

#[derive(Error, Debug)]
pub enum Error {
    #[error("cookie file io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cookie file serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    path: String,
    expires: DateTime<Utc>,
}

/// A [`CookieJar`] persisted as a JSON file, standing in for the browser's cookie store.
///
/// Expired cookies are dropped from the file on the next write.
pub struct FileCookieJar {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCookieJar {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), lock: Mutex::new(()) }
    }
    fn load(&self) -> Result<BTreeMap<String, StoredCookie>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl CookieJar for FileCookieJar {
    type Error = Error;

    async fn get(&self, name: &str) -> Result<Option<String>, Self::Error> {
        let _guard = self.lock.lock().unwrap();
        let now = Utc::now();
        Ok(self
            .load()?
            .remove(name)
            .filter(|cookie| cookie.expires > now && !cookie.value.is_empty())
            .map(|cookie| cookie.value))
    }
    async fn set(&self, cookie: Cookie) -> Result<(), Self::Error> {
        let _guard = self.lock.lock().unwrap();
        let now = Utc::now();
        let mut cookies = match self.load() {
            Err(Error::SerdeJson(_)) => BTreeMap::new(),
            loaded => loaded?,
        };
        cookies.retain(|_, stored| stored.expires > now);
        if cookie.is_expired_at(now) {
            cookies.remove(&cookie.name);
        } else {
            cookies.insert(
                cookie.name,
                StoredCookie { value: cookie.value, path: cookie.path, expires: cookie.expires },
            );
        }
        Ok(std::fs::write(&self.path, serde_json::to_string_pretty(&cookies)?)?)
    }
}
