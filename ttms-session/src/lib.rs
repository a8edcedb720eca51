#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
pub mod api;
pub mod cache;
pub mod config;
mod controller;
pub mod cookie;
mod error;
pub mod guard;
mod record;
pub mod routes;
mod utils;
pub mod validator;
#[cfg_attr(docsrs, doc(cfg(feature = "web")))]
#[cfg(feature = "web")]
pub mod web;

pub use cache::SessionCache;
pub use controller::{SessionController, SessionControllerBuilder};
pub use error::{Error, Result};
pub use guard::{Navigation, NavigationGuard};
pub use record::SessionRecord;
pub use routes::{Route, RouteTable};
pub use ttms_common as common;
pub use validator::SessionValidator;

#[cfg(test)]
mod mock;
