//! The ambient cookie half of the session cache.
mod memory;

use chrono::{DateTime, Utc};
use std::error::Error;
use std::future::Future;

pub use self::memory::MemoryCookieJar;

/// A name/value cookie with a path scope and an absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub expires: DateTime<Utc>,
}

impl Cookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        path: impl Into<String>,
        expires: DateTime<Utc>,
    ) -> Self {
        Self { name: name.into(), value: value.into(), path: path.into(), expires }
    }
    /// A cookie whose expiry is already in the past, which removes it from the jar.
    pub fn expired(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, "", path, DateTime::<Utc>::UNIX_EPOCH)
    }
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
    /// Serialize in the `document.cookie` assignment format.
    pub fn to_header_value(&self) -> String {
        format!(
            "{}={}; expires={}; path={}",
            self.name,
            self.value,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.path
        )
    }
}

/// Find the value of the named cookie in a `name=value; name2=value2` string.
///
/// Empty values are treated as absent.
pub fn find_cookie<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim_start().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// A cookie jar that hides expired cookies.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait CookieJar {
    type Error: Error + Send + Sync + 'static;

    /// Get the value of a live cookie.
    fn get(&self, name: &str) -> impl Future<Output = Result<Option<String>, Self::Error>>;
    /// Set a cookie, replacing any cookie with the same name and path.
    fn set(&self, cookie: Cookie) -> impl Future<Output = Result<(), Self::Error>>;
    /// Expire a cookie immediately.
    fn expire(&self, name: &str, path: &str) -> impl Future<Output = Result<(), Self::Error>> {
        self.set(Cookie::expired(name, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn header_value() {
        let expires = Utc.with_ymd_and_hms(2025, 6, 21, 15, 44, 18).unwrap();
        assert_eq!(
            Cookie::new("session_id", "abc123", "/", expires).to_header_value(),
            "session_id=abc123; expires=Sat, 21 Jun 2025 15:44:18 GMT; path=/"
        );
        assert_eq!(
            Cookie::expired("session_id", "/").to_header_value(),
            "session_id=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/"
        );
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn find() {
        let cookies = "theme=dark; session_id=abc123; my_session_id=zzz";
        assert_eq!(find_cookie(cookies, "session_id"), Some("abc123"));
        assert_eq!(find_cookie(cookies, "theme"), Some("dark"));
        assert_eq!(find_cookie(cookies, "session"), None);
        assert_eq!(find_cookie("session_id=", "session_id"), None);
        assert_eq!(find_cookie("", "session_id"), None);
    }
}
