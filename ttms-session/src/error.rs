use thiserror::Error;

/// Error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid session record: {0}")]
    InvalidRecord(String),
    #[error("session store error: {0}")]
    SessionStore(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("cookie store error: {0}")]
    CookieStore(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("no validated session")]
    Unauthenticated,
    #[error(transparent)]
    Http(#[from] ttms_http::Error),
    #[error("loading config error: {0}")]
    ConfigLoad(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("saving config error: {0}")]
    ConfigSave(Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Type alias to use this crate's [`Error`](enum@crate::Error) type in a [`Result`](core::result::Result).
pub type Result<T> = core::result::Result<T, Error>;
