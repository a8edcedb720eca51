//! Asks the remote service whether a session identifier is live.
use crate::record::SessionRecord;
use crate::utils::{timeout, Elapsed};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use ttms_http::{send_query, HttpClient, QueryRequest};

pub const DEFAULT_VALIDATION_ENDPOINT: &str = "http://web.fc.utm.my/ttms/auth-admin.php";
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct Parameters<'a> {
    session_id: &'a str,
}

/// Validates session identifiers against the session-check endpoint.
///
/// Fails closed: transport errors, timeouts, non-2xx statuses and unexpected bodies
/// all produce a negative verdict, never an error.
pub struct SessionValidator<T> {
    http: Arc<T>,
    endpoint: String,
    timeout: Duration,
}

impl<T> SessionValidator<T>
where
    T: HttpClient + Send + Sync,
{
    pub fn new(http: Arc<T>, endpoint: impl Into<String>) -> Self {
        Self { http, endpoint: endpoint.into(), timeout: DEFAULT_VALIDATION_TIMEOUT }
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
    pub(crate) fn http(&self) -> &Arc<T> {
        &self.http
    }
    /// Get the authoritative record for `raw_id`, or `None` if there is no live session.
    ///
    /// An absent identifier short-circuits without any request.
    pub async fn validate(&self, raw_id: Option<&str>) -> Option<SessionRecord> {
        let session_id = raw_id.filter(|id| !id.is_empty())?;
        let request = QueryRequest::new(self.endpoint.as_str(), Parameters { session_id });
        match timeout(self.timeout, send_query::<_, _, Value>(self.http.as_ref(), &request)).await {
            Ok(Ok(body)) => {
                let verdict = interpret(body);
                if verdict.is_none() {
                    tracing::debug!("session check returned no session");
                }
                verdict
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "session check failed");
                None
            }
            Err(Elapsed) => {
                tracing::warn!(timeout = ?self.timeout, "session check timed out");
                None
            }
        }
    }
}

/// Interpret a session-check response body.
///
/// Only an array whose first element carries a non-empty `session_id` is a live session.
pub fn interpret(body: Value) -> Option<SessionRecord> {
    match body {
        Value::Array(mut items) if !items.is_empty() => SessionRecord::from_value(items.swap_remove(0)),
        _ => None,
    }
}
