//! Tile server provider abstraction
//!
//! This module provides traits and implementations for downloading map
//! tiles from remote tile servers. The [`AsyncHttpClient`] trait isolates
//! the HTTP layer so providers can be tested with mock clients.

mod amap;
mod http;
mod types;

pub use amap::AmapProvider;
pub use http::{AsyncHttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::{Provider, ProviderError};

#[cfg(test)]
pub use http::tests::MockHttpClient;
