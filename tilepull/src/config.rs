//! Download run configuration.
//!
//! [`DownloadConfig`] is built once by the caller (normally the CLI),
//! then shared read-only by the session and fetcher for the duration of
//! a run.

use crate::coord::BoundingBox;
use std::path::PathBuf;
use std::time::Duration;

/// Default number of concurrent fetch tasks.
pub const DEFAULT_MAX_CONCURRENCY: usize = 6;

/// Default pause between task submissions.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(200);

/// Default `User-Agent` header; tile servers reject anonymous clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Default `Referer` header for the AMap tile servers.
pub const DEFAULT_REFERER: &str = "https://www.amap.com/";

/// Configuration for one download run.
///
/// Immutable for the run's duration. Use the `with_*` builders to adjust
/// individual settings.
#[derive(Clone, Debug)]
pub struct DownloadConfig {
    /// Geographic region to cover.
    pub bounds: BoundingBox,

    /// First zoom level (inclusive).
    pub zoom_start: u8,

    /// Last zoom level (inclusive).
    pub zoom_end: u8,

    /// Root directory of the tile store.
    pub save_dir: PathBuf,

    /// Maximum number of fetches in flight at once. Must be at least 1.
    pub max_concurrency: usize,

    /// Pause between successive task submissions, throttling burst rate
    /// independently of the concurrency limit.
    pub request_interval: Duration,

    /// Re-download tiles that already exist on disk.
    pub overwrite: bool,

    /// Headers sent with every tile request.
    pub headers: Vec<(String, String)>,
}

impl DownloadConfig {
    /// Creates a config with the default concurrency, pacing, and headers.
    pub fn new(bounds: BoundingBox, zoom_start: u8, zoom_end: u8, save_dir: PathBuf) -> Self {
        Self {
            bounds,
            zoom_start,
            zoom_end,
            save_dir,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_interval: DEFAULT_REQUEST_INTERVAL,
            overwrite: false,
            headers: vec![
                ("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string()),
                ("Referer".to_string(), DEFAULT_REFERER.to_string()),
            ],
        }
    }

    /// Sets the maximum number of concurrent fetches.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Sets the pause between task submissions.
    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }

    /// Enables or disables re-downloading of existing tiles.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Replaces the request headers.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }
}
