#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
#[cfg(any(feature = "reqwest", target_arch = "wasm32"))]
pub mod reqwest;
