//! Download session: schedules fetches and aggregates progress.
//!
//! The session enumerates the region's tiles, submits each one as a tokio
//! task bounded by a semaphore of `max_concurrency` permits, paces
//! submissions by `request_interval`, and tallies results in submission
//! order. Per-tile failures are already contained by the fetcher, so the
//! session always runs to completion once started.

mod stats;

pub use stats::{RunStatistics, PROGRESS_EVERY};

use crate::config::DownloadConfig;
use crate::coord::{CoordError, RegionTiles};
use crate::fetch::{FetchResult, TileFetcher};
use crate::provider::Provider;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// One bulk download run over a configured region.
pub struct DownloadSession<P: Provider + 'static> {
    config: DownloadConfig,
    fetcher: Arc<TileFetcher<P>>,
}

impl<P: Provider + 'static> DownloadSession<P> {
    /// Creates a session for the given provider and configuration.
    pub fn new(provider: P, config: DownloadConfig) -> Self {
        let fetcher = Arc::new(TileFetcher::new(provider, &config));
        Self { config, fetcher }
    }

    /// Runs the session to completion and returns the final statistics.
    ///
    /// # Errors
    ///
    /// Fails only if the configured region itself is invalid (bounding box
    /// outside the Web Mercator band, or zoom beyond the maximum).
    /// Individual tile failures are tallied, never propagated.
    pub async fn run(&self) -> Result<RunStatistics, CoordError> {
        let region = RegionTiles::new(
            &self.config.bounds,
            self.config.zoom_start,
            self.config.zoom_end,
        )?;

        let total = region.total();
        for &(zoom, range) in region.ranges() {
            info!(
                zoom = zoom,
                min_col = range.min_col,
                max_col = range.max_col,
                min_row = range.min_row,
                max_row = range.max_row,
                tiles = range.count(),
                "zoom level range"
            );
        }
        info!(total_tiles = total, "starting download run");

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut handles = Vec::with_capacity(total as usize);

        for tile in region {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);

            handles.push((
                tile,
                tokio::spawn(async move {
                    // The semaphore is never closed, so acquisition only
                    // fails if the runtime is torn down mid-run.
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return FetchResult::failed(tile);
                    };
                    fetcher.fetch(&tile).await
                }),
            ));

            if !self.config.request_interval.is_zero() {
                tokio::time::sleep(self.config.request_interval).await;
            }
        }

        // Collect in submission order. A slow early tile delays reporting
        // for later tiles, but the count-based cadence is unaffected.
        let mut stats = RunStatistics::new(total);
        for (tile, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(tile = %tile, error = %err, "fetch task aborted");
                    FetchResult::failed(tile)
                }
            };

            stats.record(&result);
            if stats.at_report_point() {
                info!(
                    completed = stats.completed,
                    total = stats.total_tiles,
                    success_rate = stats.success_rate(),
                    tiles_per_sec = stats.tiles_per_second(),
                    "progress"
                );
            }
        }

        info!(
            completed = stats.completed,
            succeeded = stats.succeeded,
            total = stats.total_tiles,
            success_rate = stats.success_rate(),
            tiles_per_sec = stats.tiles_per_second(),
            "download run finished"
        );

        Ok(stats)
    }
}
