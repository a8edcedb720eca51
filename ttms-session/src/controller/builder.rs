use super::SessionController;
use crate::cache::SessionCache;
use crate::config::Config;
use crate::error::Result;
use crate::cookie::{CookieJar, MemoryCookieJar};
use crate::validator::SessionValidator;
use std::sync::Arc;
use ttms_common::store::memory::MemoryStore;
use ttms_common::store::Store;
use ttms_http::HttpClient;
#[cfg(feature = "default-client")]
use ttms_http_client::reqwest::ReqwestClient;

/// A builder for creating a [`SessionController`].
pub struct SessionControllerBuilder<T, S = MemoryStore<String, String>, C = MemoryCookieJar> {
    config: Config,
    store: S,
    cookies: C,
    client: T,
}

impl<T> SessionControllerBuilder<T>
where
    T: HttpClient + Send + Sync,
{
    /// Create a new builder with the given HTTP client and in-memory storage.
    pub fn new(client: T) -> Self {
        Self {
            config: Config::default(),
            store: MemoryStore::default(),
            cookies: MemoryCookieJar::default(),
            client,
        }
    }
}

impl<T, S, C> SessionControllerBuilder<T, S, C>
where
    T: HttpClient + Send + Sync,
    S: Store<String, String> + Send + Sync,
    C: CookieJar + Send + Sync,
{
    /// Set the configuration for the controller.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
    /// Set the persistent store for the session record.
    ///
    /// Returns a new builder with the store set.
    pub fn store<S0>(self, store: S0) -> SessionControllerBuilder<T, S0, C>
    where
        S0: Store<String, String> + Send + Sync,
    {
        SessionControllerBuilder { config: self.config, store, cookies: self.cookies, client: self.client }
    }
    /// Set the cookie jar for the session identifier.
    ///
    /// Returns a new builder with the cookie jar set.
    pub fn cookies<C0>(self, cookies: C0) -> SessionControllerBuilder<T, S, C0>
    where
        C0: CookieJar + Send + Sync,
    {
        SessionControllerBuilder { config: self.config, store: self.store, cookies, client: self.client }
    }
    /// Set the HTTP client for the controller.
    ///
    /// Returns a new builder with the HTTP client set.
    pub fn client<T0>(self, client: T0) -> SessionControllerBuilder<T0, S, C>
    where
        T0: HttpClient + Send + Sync,
    {
        SessionControllerBuilder { config: self.config, store: self.store, cookies: self.cookies, client }
    }
    /// Build the controller, checking the configuration first.
    pub fn build(self) -> Result<SessionController<S, C, T>> {
        let cache = SessionCache::with_config(self.store, self.cookies, self.config.cache_config()?);
        let validator =
            SessionValidator::new(Arc::new(self.client), self.config.validation_endpoint.as_str())
                .with_timeout(self.config.validation_timeout());
        Ok(SessionController::new(cache, validator).with_data_endpoint(self.config.data_endpoint))
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "default-client")))]
#[cfg(feature = "default-client")]
impl Default for SessionControllerBuilder<ReqwestClient> {
    /// Create a new builder with the default client and in-memory storage.
    ///
    /// Default client is [`ReqwestClient`].
    fn default() -> Self {
        Self::new(ReqwestClient::new())
    }
}
