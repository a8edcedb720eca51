//! A scripted [`HttpClient`] for tests.
use http::{Request, Response, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use ttms_http::HttpClient;

pub(crate) const VALIDATION_ENDPOINT: &str = "http://localhost:8080/ttms/auth-admin.php";
pub(crate) const DATA_ENDPOINT: &str = "http://localhost:8080/ttms/api.php";

#[derive(Debug, Clone)]
pub(crate) enum MockResponse {
    Json(Value),
    Body(StatusCode, &'static str),
    Unreachable,
    Hang,
}

#[derive(Default)]
pub(crate) struct MockClient {
    responses: Mutex<HashMap<String, MockResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockClient {
    pub(crate) fn with(path: &str, response: MockResponse) -> Self {
        let client = Self::default();
        client.respond(path, response);
        client
    }
    pub(crate) fn respond(&self, path: &str, response: MockResponse) {
        self.responses.lock().unwrap().insert(path.into(), response);
    }
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn send_http(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<Response<Vec<u8>>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        self.requests.lock().unwrap().push(request.uri().to_string());
        let response = self.responses.lock().unwrap().get(request.uri().path()).cloned();
        let builder = Response::builder().header(http::header::CONTENT_TYPE, "application/json");
        match response {
            Some(MockResponse::Json(value)) => {
                Ok(builder.status(StatusCode::OK).body(serde_json::to_vec(&value)?)?)
            }
            Some(MockResponse::Body(status, body)) => {
                Ok(builder.status(status).body(body.as_bytes().to_vec())?)
            }
            Some(MockResponse::Unreachable) => Err("connection refused".into()),
            Some(MockResponse::Hang) => futures::future::pending().await,
            None => Ok(builder.status(StatusCode::NOT_FOUND).body(Vec::new())?),
        }
    }
}
