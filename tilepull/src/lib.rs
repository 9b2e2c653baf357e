//! Tilepull - bulk map tile downloader
//!
//! This library downloads slippy-map tile images covering a geographic
//! bounding box across a range of zoom levels, storing them in a
//! `{save_dir}/{z}/{x}/{y}.png` hierarchy.
//!
//! The pipeline has three layers:
//! - [`coord`] enumerates the tile coordinates covering a region
//! - [`fetch`] downloads a single tile with retries and persists it
//! - [`session`] bounds concurrency, paces submissions, and reports progress

pub mod config;
pub mod coord;
pub mod fetch;
pub mod provider;
pub mod session;

pub use config::DownloadConfig;
pub use coord::{BoundingBox, RegionTiles, TileCoord};
pub use fetch::{FetchOutcome, FetchResult, TileFetcher};
pub use provider::{AmapProvider, Provider, ReqwestClient};
pub use session::{DownloadSession, RunStatistics};
