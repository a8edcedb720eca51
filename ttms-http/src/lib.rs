#![doc = include_str!("../README.md")]
pub mod error;
mod traits;

pub use crate::error::{Error, Result};
pub use crate::traits::{send_query, HttpClient};
pub use http;

/// A `GET` request against a full endpoint URL with form-encoded query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest<P> {
    pub endpoint: String,
    pub parameters: Option<P>,
}

impl<P> QueryRequest<P> {
    pub fn new(endpoint: impl Into<String>, parameters: P) -> Self {
        Self { endpoint: endpoint.into(), parameters: Some(parameters) }
    }
}
