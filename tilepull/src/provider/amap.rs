//! AMap (Gaode) road-map tile provider.
//!
//! Downloads raster road-map tiles from the AMap `webrd` tile servers.
//! AMap uses standard Web Mercator XYZ tile coordinates:
//! - X: Column (0 to 2^zoom - 1, west to east)
//! - Y: Row (0 to 2^zoom - 1, north to south)
//! - Z: Zoom level
//!
//! The servers reject anonymous requests, so callers normally supply a
//! browser `User-Agent` and an `https://www.amap.com/` `Referer` header.

use crate::coord::TileCoord;
use crate::provider::{AsyncHttpClient, Provider, ProviderError};

/// Tile server host. AMap load-balances across webrd01-04; a single
/// host is sufficient for paced bulk downloads.
const AMAP_HOST: &str = "https://webrd04.is.autonavi.com";

/// Map style identifier for the road map layer.
const AMAP_ROAD_STYLE: u8 = 7;

/// AMap road-map tile provider.
///
/// # Example
///
/// ```no_run
/// use tilepull::provider::{AmapProvider, ReqwestClient};
///
/// let client = ReqwestClient::new().unwrap();
/// let provider = AmapProvider::new(client)
///     .with_headers(vec![("Referer".into(), "https://www.amap.com/".into())]);
/// ```
pub struct AmapProvider<C: AsyncHttpClient> {
    http_client: C,
    headers: Vec<(String, String)>,
}

impl<C: AsyncHttpClient> AmapProvider<C> {
    /// Creates a new AMap provider with the road-map style.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            headers: Vec::new(),
        }
    }

    /// Sets the headers sent with every tile request.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    /// Test access to the underlying HTTP client.
    #[cfg(test)]
    pub(crate) fn http_client(&self) -> &C {
        &self.http_client
    }

    /// Builds the tile URL for the given coordinates.
    fn build_url(&self, tile: &TileCoord) -> String {
        format!(
            "{}/appmaptile?lang=zh_cn&size=1&scale=1&style={}&x={}&y={}&z={}",
            AMAP_HOST, AMAP_ROAD_STYLE, tile.col, tile.row, tile.zoom
        )
    }
}

impl<C: AsyncHttpClient> Provider for AmapProvider<C> {
    fn name(&self) -> &str {
        "AMap"
    }

    fn tile_url(&self, tile: &TileCoord) -> String {
        self.build_url(tile)
    }

    async fn download_tile(&self, tile: &TileCoord) -> Result<Vec<u8>, ProviderError> {
        let url = self.build_url(tile);
        self.http_client.get_with_headers(&url, &self.headers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    #[test]
    fn test_provider_name() {
        let provider = AmapProvider::new(MockHttpClient::always(Ok(vec![])));
        assert_eq!(provider.name(), "AMap");
    }

    #[test]
    fn test_url_construction() {
        let provider = AmapProvider::new(MockHttpClient::always(Ok(vec![])));
        let tile = TileCoord::new(6846, 3329, 13);

        assert_eq!(
            provider.tile_url(&tile),
            "https://webrd04.is.autonavi.com/appmaptile?lang=zh_cn&size=1&scale=1&style=7&x=6846&y=3329&z=13"
        );
    }

    #[tokio::test]
    async fn test_download_tile_success() {
        let body = vec![0x89, b'P', b'N', b'G'];
        let provider = AmapProvider::new(MockHttpClient::always(Ok(body.clone())));

        let result = provider.download_tile(&TileCoord::new(1, 2, 3)).await;
        assert_eq!(result.unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_tile_propagates_status() {
        let provider = AmapProvider::new(MockHttpClient::always(Err(ProviderError::Status(403))));

        let result = provider.download_tile(&TileCoord::new(1, 2, 3)).await;
        assert_eq!(result.unwrap_err(), ProviderError::Status(403));
    }
}
