//! Orchestration of the session cache and the validator.
mod builder;

pub use self::builder::SessionControllerBuilder;
use crate::api::{DataApi, DEFAULT_DATA_ENDPOINT};
use crate::cache::SessionCache;
use crate::cookie::CookieJar;
use crate::error::{Error, Result};
use crate::record::SessionRecord;
use crate::validator::SessionValidator;
use std::sync::Arc;
use ttms_common::store::Store;
use ttms_http::HttpClient;

/// Owns the session cache and validator, and derives a fresh verdict on every request.
///
/// Holds no verdict of its own: every [`get_current_validated`](Self::get_current_validated)
/// re-reads storage and asks the remote service again.
pub struct SessionController<S, C, T> {
    cache: SessionCache<S, C>,
    validator: SessionValidator<T>,
    data_endpoint: String,
}

impl<S, C, T> SessionController<S, C, T>
where
    S: Store<String, String> + Send + Sync,
    C: CookieJar + Send + Sync,
    T: HttpClient + Send + Sync,
{
    pub fn new(cache: SessionCache<S, C>, validator: SessionValidator<T>) -> Self {
        Self { cache, validator, data_endpoint: String::from(DEFAULT_DATA_ENDPOINT) }
    }
    /// Set the endpoint used by [`data_api`](Self::data_api).
    pub fn with_data_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.data_endpoint = endpoint.into();
        self
    }
    pub fn cache(&self) -> &SessionCache<S, C> {
        &self.cache
    }
    pub fn validator(&self) -> &SessionValidator<T> {
        &self.validator
    }
    /// Store a freshly issued session.
    pub async fn login(&self, record: &SessionRecord) -> Result<()> {
        self.cache.save(record).await?;
        tracing::info!("session saved");
        Ok(())
    }
    /// Forget the current session everywhere.
    pub async fn logout(&self) -> Result<()> {
        self.cache.clear().await?;
        tracing::info!("session cleared");
        Ok(())
    }
    /// The stored candidate identifier, without asking the remote service.
    pub async fn current_session_id(&self) -> Option<String> {
        self.cache.read_raw_id().await
    }
    /// Ask the remote service about a specific identifier.
    pub async fn validate(&self, raw_id: Option<&str>) -> Option<SessionRecord> {
        self.validator.validate(raw_id).await
    }
    /// The current session as confirmed by the remote service.
    ///
    /// A negative verdict leaves the stored record in place.
    pub async fn get_current_validated(&self) -> Option<SessionRecord> {
        let raw_id = self.cache.read_raw_id().await;
        self.validator.validate(raw_id.as_deref()).await
    }
    /// A data-access client bound to the currently validated session.
    pub async fn data_api(&self) -> Result<DataApi<T>> {
        let session = self.get_current_validated().await.ok_or(Error::Unauthenticated)?;
        Ok(DataApi::new(Arc::clone(self.validator.http()), self.data_endpoint.clone(), session.session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::MemoryCookieJar;
    use crate::mock::{MockClient, MockResponse, DATA_ENDPOINT, VALIDATION_ENDPOINT};
    use serde_json::json;
    use ttms_common::store::memory::MemoryStore;
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    const PATH: &str = "/ttms/auth-admin.php";

    type Controller = SessionController<MemoryStore<String, String>, MemoryCookieJar, MockClient>;

    fn controller(http: MockClient) -> Controller {
        SessionController::new(
            SessionCache::new(MemoryStore::default(), MemoryCookieJar::default()),
            SessionValidator::new(Arc::new(http), VALIDATION_ENDPOINT),
        )
        .with_data_endpoint(DATA_ENDPOINT)
    }

    fn requests(controller: &Controller) -> Vec<String> {
        controller.validator().http().requests()
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn no_session_makes_no_request() {
        let controller = controller(MockClient::with(PATH, MockResponse::Json(json!([]))));
        assert_eq!(controller.current_session_id().await, None);
        assert_eq!(controller.get_current_validated().await, None);
        assert!(requests(&controller).is_empty());
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn login_then_validate() {
        let controller = controller(MockClient::with(
            PATH,
            MockResponse::Json(json!([{"session_id": "abc123", "nama": "Ahmad"}])),
        ));
        controller.login(&SessionRecord::new("abc123")).await.expect("login should be succeeded");
        assert_eq!(controller.current_session_id().await, Some(String::from("abc123")));
        // the server copy is authoritative
        assert_eq!(
            controller.get_current_validated().await,
            Some(SessionRecord::new("abc123").with_field("nama", "Ahmad"))
        );
        // no verdict is cached
        controller.get_current_validated().await;
        assert_eq!(requests(&controller).len(), 2);
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn remote_verdict_overrides_local_record() {
        let controller = controller(MockClient::with(PATH, MockResponse::Json(json!([]))));
        controller.login(&SessionRecord::new("abc123")).await.expect("login");
        assert_eq!(controller.get_current_validated().await, None);
        // storage is left untouched by a negative verdict
        assert_eq!(controller.current_session_id().await, Some(String::from("abc123")));
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn logout_clears_session() {
        let controller = controller(MockClient::with(
            PATH,
            MockResponse::Json(json!([{"session_id": "abc123"}])),
        ));
        controller.login(&SessionRecord::new("abc123")).await.expect("login");
        controller.logout().await.expect("logout");
        assert_eq!(controller.current_session_id().await, None);
        assert_eq!(controller.get_current_validated().await, None);
        assert!(requests(&controller).is_empty());
        controller.logout().await.expect("logout twice");
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn login_rejects_invalid_record() {
        let controller = controller(MockClient::default());
        let err = controller.login(&SessionRecord::new("")).await.expect_err("must be rejected");
        assert!(matches!(err, Error::InvalidRecord(_)));
        assert_eq!(controller.current_session_id().await, None);
    }

    #[tokio::test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    async fn data_api_requires_validated_session() {
        let controller = controller(MockClient::with(PATH, MockResponse::Json(json!([]))));
        controller.login(&SessionRecord::new("abc123")).await.expect("login");
        assert!(matches!(controller.data_api().await, Err(Error::Unauthenticated)));

        controller
            .validator()
            .http()
            .respond(PATH, MockResponse::Json(json!([{"session_id": "abc123"}])));
        let api = controller.data_api().await.expect("validated session");
        assert_eq!(api.session_id(), "abc123");
        assert_eq!(api.endpoint(), DATA_ENDPOINT);
    }
}
