use super::{Cookie, CookieJar};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("memory cookie jar error")]
pub struct Error;

/// A [`CookieJar`] kept in process memory.
///
/// Clones share the same cookies.
#[derive(Clone, Default)]
pub struct MemoryCookieJar {
    cookies: Arc<Mutex<HashMap<(String, String), Cookie>>>,
}

impl MemoryCookieJar {
    /// All live cookies, for inspection.
    pub fn cookies(&self) -> Vec<Cookie> {
        let now = Utc::now();
        self.cookies
            .lock()
            .unwrap()
            .values()
            .filter(|cookie| !cookie.is_expired_at(now))
            .cloned()
            .collect()
    }
}

impl CookieJar for MemoryCookieJar {
    type Error = Error;

    async fn get(&self, name: &str) -> Result<Option<String>, Self::Error> {
        let now = Utc::now();
        Ok(self
            .cookies
            .lock()
            .unwrap()
            .values()
            .find(|cookie| cookie.name == name && !cookie.is_expired_at(now))
            .map(|cookie| cookie.value.clone())
            .filter(|value| !value.is_empty()))
    }
    async fn set(&self, cookie: Cookie) -> Result<(), Self::Error> {
        let mut cookies = self.cookies.lock().unwrap();
        let key = (cookie.name.clone(), cookie.path.clone());
        if cookie.is_expired_at(Utc::now()) {
            cookies.remove(&key);
        } else {
            cookies.insert(key, cookie);
        }
        Ok(())
    }
}
