use crate::error::{Error, Result};
use crate::QueryRequest;
use http::{Method, Request, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;

/// An abstract HTTP client.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait HttpClient {
    /// Send an HTTP request and return the response.
    fn send_http(
        &self,
        request: Request<Vec<u8>>,
    ) -> impl Future<
        Output = core::result::Result<
            Response<Vec<u8>>,
            Box<dyn std::error::Error + Send + Sync + 'static>,
        >,
    >;
}

/// Build the full URI of a query request.
pub(crate) fn query_uri<P>(request: &QueryRequest<P>) -> Result<String>
where
    P: Serialize,
{
    let mut uri = request.endpoint.clone();
    if let Some(p) = &request.parameters {
        let qs = serde_html_form::to_string(p)?;
        if !qs.is_empty() {
            uri.push(if uri.contains('?') { '&' } else { '?' });
            uri += &qs;
        }
    }
    Ok(uri)
}

/// Send a `GET` query and decode the JSON body of a successful response.
///
/// Any non-2xx status is reported as [`Error::UnexpectedStatus`], regardless of the body.
pub async fn send_query<T, P, O>(client: &T, request: &QueryRequest<P>) -> Result<O>
where
    T: HttpClient + Sync,
    P: Serialize + Send + Sync,
    O: DeserializeOwned,
{
    let uri = query_uri(request)?;
    let request = Request::builder()
        .method(Method::GET)
        .uri(&uri)
        .header(http::header::ACCEPT, "application/json")
        .body(Vec::new())?;
    let (parts, body) = client.send_http(request).await.map_err(Error::HttpClient)?.into_parts();
    if !parts.status.is_success() {
        return Err(Error::UnexpectedStatus(parts.status));
    }
    Ok(serde_json::from_slice(&body)?)
}
