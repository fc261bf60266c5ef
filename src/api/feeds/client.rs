use std::time::Duration;

use reqwest::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use super::models::{FeatureCollection, FeedError};
use tracing::{debug, warn};

/// HTTP client for the two GeoJSON feeds the map is built from
#[derive(Clone)]
pub struct FeedClient {
    http_client: HttpClient,
    earthquakes_url: String,
    plates_url: String,
}

impl FeedClient {
    pub const DEFAULT_EARTHQUAKES_URL: &'static str =
        "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";
    pub const DEFAULT_PLATES_URL: &'static str =
        "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

    /// Create a client pointed at the public USGS and plate-boundary feeds
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        Self::with_urls(
            Self::DEFAULT_EARTHQUAKES_URL.to_string(),
            Self::DEFAULT_PLATES_URL.to_string(),
            timeout,
        )
    }

    /// Create a client with custom feed URLs (mirrors, local fixtures, tests)
    pub fn with_urls(
        earthquakes_url: String,
        plates_url: String,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .default_headers(Self::create_headers())
            .build()
            .map_err(|e| FeedError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            earthquakes_url,
            plates_url,
        })
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/geo+json, application/json;q=0.9, */*;q=0.1"),
        );
        headers
    }

    /// Map a non-success response onto a [`FeedError`]
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> FeedError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        if status.is_server_error() {
            warn!("Feed server error {}: {}", status_code, body_text);
        }
        FeedError::Http(status_code, body_text)
    }

    async fn get_collection(&self, url: &str) -> Result<FeatureCollection, FeedError> {
        debug!("GET {}", url);

        let response = self.http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Request(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let collection = response
            .json::<FeatureCollection>()
            .await
            .map_err(|e| FeedError::Deserialization(format!("Failed to parse response: {}", e)))?;

        debug!("{} returned {} features", url, collection.features.len());
        Ok(collection)
    }

    /// GET the weekly earthquake summary
    pub async fn get_earthquakes(&self) -> Result<FeatureCollection, FeedError> {
        self.get_collection(&self.earthquakes_url).await
    }

    /// GET the PB2002 plate boundary set
    pub async fn get_plate_boundaries(&self) -> Result<FeatureCollection, FeedError> {
        self.get_collection(&self.plates_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::feeds::test_support::serve_once;
    use tokio::net::TcpListener;

    fn client_for(quakes: String, plates: String) -> FeedClient {
        FeedClient::with_urls(quakes, plates, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_earthquakes_parses_collection() {
        let url = serve_once(
            "200 OK",
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"mag":4.5,"place":"Offshore","time":0},"geometry":{"type":"Point","coordinates":[142.1,38.3,10.0]}}]}"#,
        )
        .await;

        let client = client_for(url, "http://127.0.0.1:9/unused".to_string());
        let collection = client.get_earthquakes().await.unwrap();
        assert_eq!(collection.features.len(), 1);
    }

    #[tokio::test]
    async fn test_non_success_status_maps_to_http_error() {
        let url = serve_once("503 Service Unavailable", "try later").await;

        let client = client_for("http://127.0.0.1:9/unused".to_string(), url);
        match client.get_plate_boundaries().await {
            Err(FeedError::Http(503, body)) => assert_eq!(body, "try later"),
            other => panic!("expected HTTP 503, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_body_maps_to_deserialization_error() {
        let url = serve_once("200 OK", "<html>not json</html>").await;

        let client = client_for(url, "http://127.0.0.1:9/unused".to_string());
        assert!(matches!(
            client.get_earthquakes().await,
            Err(FeedError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_request_error() {
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/feed", addr), String::new());
        assert!(matches!(
            client.get_earthquakes().await,
            Err(FeedError::Request(_))
        ));
    }
}
