//! Tile fetcher: downloads one tile with retries and persists it.
//!
//! The fetcher owns the per-tile pipeline: existence check, directory
//! creation, HTTP download with the retry schedules from [`policy`], and
//! an atomic-enough write (temp file then rename) so a partial body is
//! never readable under the final name.
//!
//! Every failure is contained here: [`TileFetcher::fetch`] always returns
//! a [`FetchResult`], never an error, so one bad tile cannot abort the
//! surrounding download session.

mod policy;

pub use policy::{RetryPolicy, MAX_ATTEMPTS, STATUS_RETRY_DELAY, TRANSPORT_INITIAL_DELAY};

use crate::config::DownloadConfig;
use crate::coord::TileCoord;
use crate::provider::{Provider, ProviderError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// What happened to a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Tile downloaded and written to disk.
    Success,
    /// Target file already existed and overwrite is disabled; no network call.
    SkippedExisting,
    /// All attempts exhausted, or the file could not be written.
    Failed,
}

/// Per-tile result consumed by the session's progress aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchResult {
    /// The tile this result is for.
    pub coord: TileCoord,
    /// Final outcome after retries.
    pub outcome: FetchOutcome,
    /// Bytes written to disk (zero unless `Success`).
    pub bytes_written: u64,
}

impl FetchResult {
    fn success(coord: TileCoord, bytes_written: u64) -> Self {
        Self {
            coord,
            outcome: FetchOutcome::Success,
            bytes_written,
        }
    }

    fn skipped(coord: TileCoord) -> Self {
        Self {
            coord,
            outcome: FetchOutcome::SkippedExisting,
            bytes_written: 0,
        }
    }

    /// A failed result, also used by the session when a fetch task dies.
    pub fn failed(coord: TileCoord) -> Self {
        Self {
            coord,
            outcome: FetchOutcome::Failed,
            bytes_written: 0,
        }
    }

    /// True unless the outcome is `Failed`. A skipped tile counts as a
    /// success for the reported rate, matching the overwrite-skip
    /// semantics: the tile is on disk either way.
    pub fn is_success(&self) -> bool {
        self.outcome != FetchOutcome::Failed
    }
}

/// Error internal to a single fetch; logged and converted to `Failed`.
#[derive(Debug, Error)]
enum FetchError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads tiles from a provider into a hierarchical file store.
///
/// Tiles land at `{save_dir}/{zoom}/{x}/{y}.png`. The fetcher is shared
/// across concurrent tasks; it keeps no per-fetch mutable state.
pub struct TileFetcher<P: Provider> {
    provider: P,
    save_dir: PathBuf,
    overwrite: bool,
    status_policy: RetryPolicy,
    transport_policy: RetryPolicy,
}

impl<P: Provider> TileFetcher<P> {
    /// Creates a fetcher for the given provider and download configuration.
    pub fn new(provider: P, config: &DownloadConfig) -> Self {
        Self {
            provider,
            save_dir: config.save_dir.clone(),
            overwrite: config.overwrite,
            status_policy: RetryPolicy::for_status_errors(),
            transport_policy: RetryPolicy::for_transport_errors(),
        }
    }

    /// Returns the target path for a tile: `{save_dir}/{zoom}/{x}/{y}.png`.
    pub fn tile_path(&self, tile: &TileCoord) -> PathBuf {
        self.save_dir
            .join(tile.zoom.to_string())
            .join(tile.col.to_string())
            .join(format!("{}.png", tile.row))
    }

    /// Fetches one tile.
    ///
    /// Never returns an error; all failures are logged and folded into the
    /// returned [`FetchResult`].
    pub async fn fetch(&self, tile: &TileCoord) -> FetchResult {
        let path = self.tile_path(tile);

        if !self.overwrite && tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(tile = %tile, "tile already on disk, skipping");
            return FetchResult::skipped(*tile);
        }

        match self.download_and_store(tile, &path).await {
            Ok(bytes_written) => {
                debug!(tile = %tile, bytes = bytes_written, "tile stored");
                FetchResult::success(*tile, bytes_written)
            }
            Err(err) => {
                warn!(
                    tile = %tile,
                    provider = self.provider.name(),
                    error = %err,
                    "tile fetch failed"
                );
                FetchResult::failed(*tile)
            }
        }
    }

    async fn download_and_store(&self, tile: &TileCoord, path: &Path) -> Result<u64, FetchError> {
        if let Some(parent) = path.parent() {
            // create_dir_all is idempotent, so concurrent fetchers racing
            // on the same zoom/column directory are fine.
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = self.download_with_retry(tile).await?;

        // Write to a temp name in the same directory, then rename into
        // place, so a crash mid-write never leaves a partial tile readable
        // under the final name.
        let tmp = path.with_extension("png.part");
        tokio::fs::write(&tmp, &body).await?;
        if let Err(err) = tokio::fs::rename(&tmp, path).await {
            // Don't leave the partial file behind when the rename fails.
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }

        Ok(body.len() as u64)
    }

    async fn download_with_retry(&self, tile: &TileCoord) -> Result<Vec<u8>, ProviderError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let err = match self.provider.download_tile(tile).await {
                Ok(body) => return Ok(body),
                Err(err) => err,
            };

            let policy = if err.is_transport() {
                &self.transport_policy
            } else {
                &self.status_policy
            };

            match policy.delay_for_attempt(attempt) {
                Some(delay) => {
                    warn!(
                        tile = %tile,
                        attempt = attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %err,
                        "tile download attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    warn!(
                        tile = %tile,
                        attempt = attempt,
                        error = %err,
                        "tile download attempts exhausted"
                    );
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DownloadConfig;
    use crate::coord::BoundingBox;
    use crate::provider::{AmapProvider, MockHttpClient};
    use std::time::Duration;

    fn fetcher_with(
        dir: &Path,
        overwrite: bool,
        client: MockHttpClient,
    ) -> TileFetcher<AmapProvider<MockHttpClient>> {
        let config = DownloadConfig::new(BoundingBox::SHANGHAI, 13, 13, dir.to_path_buf())
            .with_overwrite(overwrite);
        TileFetcher::new(AmapProvider::new(client), &config)
    }

    #[test]
    fn test_tile_path_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = fetcher_with(tmp.path(), false, MockHttpClient::always(Ok(vec![])));

        let path = fetcher.tile_path(&TileCoord::new(6846, 3329, 13));
        assert_eq!(path, tmp.path().join("13").join("6846").join("3329.png"));
    }

    #[tokio::test]
    async fn test_fetch_success_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let body = vec![0x89, b'P', b'N', b'G', 1, 2, 3];
        let fetcher = fetcher_with(tmp.path(), false, MockHttpClient::always(Ok(body.clone())));

        let tile = TileCoord::new(6846, 3329, 13);
        let result = fetcher.fetch(&tile).await;

        assert_eq!(result.outcome, FetchOutcome::Success);
        assert_eq!(result.bytes_written, body.len() as u64);
        assert_eq!(std::fs::read(fetcher.tile_path(&tile)).unwrap(), body);
    }

    #[tokio::test]
    async fn test_fetch_skips_existing_without_network_call() {
        let tmp = tempfile::tempdir().unwrap();
        let tile = TileCoord::new(1, 2, 5);

        let client = MockHttpClient::always(Err(ProviderError::Transport("unreachable".into())));
        let fetcher = fetcher_with(tmp.path(), false, client);

        // Pre-create the target file.
        let path = fetcher.tile_path(&tile);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"old").unwrap();

        for _ in 0..2 {
            let result = fetcher.fetch(&tile).await;
            assert_eq!(result.outcome, FetchOutcome::SkippedExisting);
            assert_eq!(result.bytes_written, 0);
        }
        // Idempotent: no network activity on either call.
        assert_eq!(fetcher.provider.http_client().calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_overwrites_when_enabled() {
        let tmp = tempfile::tempdir().unwrap();
        let tile = TileCoord::new(1, 2, 5);

        let fetcher = fetcher_with(tmp.path(), true, MockHttpClient::always(Ok(vec![9, 9])));

        let path = fetcher.tile_path(&tile);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"old").unwrap();

        let result = fetcher.fetch(&tile).await;
        assert_eq!(result.outcome, FetchOutcome::Success);
        assert_eq!(std::fs::read(&path).unwrap(), vec![9, 9]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_error_retried_three_times_then_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let tile = TileCoord::new(10, 20, 8);

        let client = MockHttpClient::always(Err(ProviderError::Status(500)));
        let fetcher = fetcher_with(tmp.path(), false, client);

        let result = fetcher.fetch(&tile).await;

        assert_eq!(result.outcome, FetchOutcome::Failed);
        assert_eq!(fetcher.provider.http_client().calls(), MAX_ATTEMPTS as usize);
        // No file, partial or otherwise, is left at the target path.
        assert!(!fetcher.tile_path(&tile).exists());
        assert!(!fetcher.tile_path(&tile).with_extension("png.part").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_retried_with_backoff() {
        let tmp = tempfile::tempdir().unwrap();
        let tile = TileCoord::new(10, 20, 8);

        let client = MockHttpClient::always(Err(ProviderError::Transport("timed out".into())));
        let fetcher = fetcher_with(tmp.path(), false, client);

        let start = tokio::time::Instant::now();
        let result = fetcher.fetch(&tile).await;

        assert_eq!(result.outcome, FetchOutcome::Failed);
        assert_eq!(fetcher.provider.http_client().calls(), MAX_ATTEMPTS as usize);
        // Backoff slept 1s + 2s between the three attempts.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_later_attempt() {
        let tmp = tempfile::tempdir().unwrap();
        let tile = TileCoord::new(10, 20, 8);

        let client = MockHttpClient::scripted(
            vec![
                Err(ProviderError::Status(503)),
                Err(ProviderError::Transport("reset".into())),
            ],
            Ok(vec![42]),
        );
        let fetcher = fetcher_with(tmp.path(), false, client);

        let result = fetcher.fetch(&tile).await;

        assert_eq!(result.outcome, FetchOutcome::Success);
        assert_eq!(fetcher.provider.http_client().calls(), 3);
        assert!(fetcher.tile_path(&tile).exists());
    }

    #[tokio::test]
    async fn test_rename_failure_cleans_up_temp_file() {
        let tmp = tempfile::tempdir().unwrap();
        let tile = TileCoord::new(3, 4, 6);
        let fetcher = fetcher_with(tmp.path(), true, MockHttpClient::always(Ok(vec![1])));

        // A directory squatting on the target path makes the final rename fail.
        let path = fetcher.tile_path(&tile);
        std::fs::create_dir_all(&path).unwrap();

        let result = fetcher.fetch(&tile).await;

        assert_eq!(result.outcome, FetchOutcome::Failed);
        assert!(!path.with_extension("png.part").exists());
    }

    #[tokio::test]
    async fn test_result_is_success_semantics() {
        let tile = TileCoord::new(0, 0, 0);
        assert!(FetchResult::success(tile, 10).is_success());
        assert!(FetchResult::skipped(tile).is_success());
        assert!(!FetchResult::failed(tile).is_success());
    }
}
