//! Provider trait and error types.

use crate::coord::TileCoord;
use std::future::Future;
use thiserror::Error;

/// Errors from a tile provider.
///
/// The two variants drive different retry schedules in the fetcher:
/// a non-success status is retried with a fixed delay, a transport
/// failure with exponential backoff.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The server answered with a non-success HTTP status.
    #[error("HTTP status {0} from tile server")]
    Status(u16),

    /// The request never produced a response (timeout, connection
    /// failure, DNS failure).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Returns true for transport-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// A remote tile server.
///
/// Implementations know how to build the URL for a tile and download its
/// image bytes. They must be thread-safe (`Send + Sync`) so the download
/// session can share one provider across concurrent fetch tasks.
pub trait Provider: Send + Sync {
    /// Returns a human-readable provider name for logging.
    fn name(&self) -> &str;

    /// Builds the request URL for the given tile.
    fn tile_url(&self, tile: &TileCoord) -> String;

    /// Downloads one tile image.
    ///
    /// # Returns
    ///
    /// The raw image bytes, or a [`ProviderError`] classifying the failure.
    fn download_tile(
        &self,
        tile: &TileCoord,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_transport() {
        assert!(ProviderError::Transport("timed out".into()).is_transport());
        assert!(!ProviderError::Status(500).is_transport());
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Status(404);
        assert_eq!(err.to_string(), "HTTP status 404 from tile server");

        let err = ProviderError::Transport("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }
}
