//! Browser backends: `window.localStorage` for the record and `document.cookie` for the identifier.
//!
//! Handles are looked up on every call, so these types hold no JavaScript values.
use crate::cookie::{find_cookie, Cookie, CookieJar};
use thiserror::Error;
use ttms_common::store::Store;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, Storage};

#[derive(Error, Debug)]
pub enum Error {
    #[error("no browser window")]
    NoWindow,
    #[error("{0} is unavailable")]
    Unavailable(&'static str),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

fn local_storage() -> Result<Storage, Error> {
    web_sys::window()
        .ok_or(Error::NoWindow)?
        .local_storage()?
        .ok_or(Error::Unavailable("localStorage"))
}

fn html_document() -> Result<HtmlDocument, Error> {
    web_sys::window()
        .ok_or(Error::NoWindow)?
        .document()
        .ok_or(Error::Unavailable("document"))?
        .dyn_into::<HtmlDocument>()
        .map_err(|_| Error::Unavailable("document.cookie"))
}

/// A [`Store`] over `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl Store<String, String> for LocalStorageStore {
    type Error = Error;

    async fn get(&self, key: &String) -> Result<Option<String>, Self::Error> {
        Ok(local_storage()?.get_item(key)?)
    }
    async fn set(&self, key: String, value: String) -> Result<(), Self::Error> {
        Ok(local_storage()?.set_item(&key, &value)?)
    }
    async fn del(&self, key: &String) -> Result<(), Self::Error> {
        Ok(local_storage()?.remove_item(key)?)
    }
    async fn clear(&self) -> Result<(), Self::Error> {
        Ok(local_storage()?.clear()?)
    }
}

/// A [`CookieJar`] over `document.cookie`. Expiry is enforced by the browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookieJar;

impl CookieJar for DocumentCookieJar {
    type Error = Error;

    async fn get(&self, name: &str) -> Result<Option<String>, Self::Error> {
        let cookies = html_document()?.cookie()?;
        Ok(find_cookie(&cookies, name).map(String::from))
    }
    async fn set(&self, cookie: Cookie) -> Result<(), Self::Error> {
        Ok(html_document()?.set_cookie(&cookie.to_header_value())?)
    }
}
