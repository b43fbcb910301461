use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{Coordinate, GatewayError, GeocodingGateway, NearbySearch, PlacesGateway, Provider};
use crate::config::MapsConfig;

/// Google Geocoding and Places Nearby Search over plain HTTPS.
pub struct GoogleMapsClient {
    http: Client,
    config: MapsConfig,
}

impl std::fmt::Debug for GoogleMapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GoogleMapsClient {
    pub fn new(config: MapsConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| GatewayError::Client(err.to_string()))?;
        Ok(Self { http, config })
    }

    fn api_key(&self) -> Result<&str, GatewayError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingCredentials)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))
    }
}

#[async_trait]
impl GeocodingGateway for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, GatewayError> {
        let key = self.api_key()?;
        debug!(url = %self.config.geocode_url, "geocoding postal code");
        let params = [("address", address.to_string()), ("key", key.to_string())];
        let body: GeocodeResponse = self.get_json(&self.config.geocode_url, &params).await?;
        body.into_coordinate()
    }
}

#[async_trait]
impl PlacesGateway for GoogleMapsClient {
    async fn nearby(&self, search: &NearbySearch) -> Result<Vec<Provider>, GatewayError> {
        let key = self.api_key()?;
        debug!(
            url = %self.config.places_url,
            keyword = %search.keyword,
            radius_m = search.radius_m,
            "searching nearby places"
        );
        let mut params = vec![
            (
                "location",
                format!("{},{}", search.location.latitude, search.location.longitude),
            ),
            ("radius", search.radius_m.to_string()),
            ("keyword", search.keyword.clone()),
            ("key", key.to_string()),
        ];
        if let Some(place_type) = &search.place_type {
            params.push(("type", place_type.clone()));
        }

        let body: PlacesResponse = self.get_json(&self.config.places_url, &params).await?;
        body.into_providers()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GeocodeResponse {
    pub(crate) fn into_coordinate(self) -> Result<Option<Coordinate>, GatewayError> {
        if let Some(first) = self.results.into_iter().next() {
            return Ok(Some(Coordinate {
                latitude: first.geometry.location.lat,
                longitude: first.geometry.location.lng,
            }));
        }

        if status_is_success(&self.status) {
            Ok(None)
        } else {
            Err(upstream(self.status, self.error_message))
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlacesResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: Option<String>,
    vicinity: Option<String>,
    rating: Option<f32>,
}

impl PlacesResponse {
    pub(crate) fn into_providers(self) -> Result<Vec<Provider>, GatewayError> {
        if !status_is_success(&self.status) {
            return Err(upstream(self.status, self.error_message));
        }

        Ok(self
            .results
            .into_iter()
            .map(|place| Provider {
                name: place.name,
                address: place.vicinity,
                rating: place.rating,
            })
            .collect())
    }
}

// ZERO_RESULTS is an empty success; every other non-OK status is an error.
fn status_is_success(status: &str) -> bool {
    matches!(status, "" | "OK" | "ZERO_RESULTS")
}

fn upstream(status: String, message: Option<String>) -> GatewayError {
    GatewayError::Upstream {
        status,
        message: message.unwrap_or_else(|| "no error message".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn geocode_takes_first_result() {
        let body: GeocodeResponse = serde_json::from_value(json!({
            "status": "OK",
            "results": [
                { "geometry": { "location": { "lat": 41.5868, "lng": -93.625 } } },
                { "geometry": { "location": { "lat": 0.0, "lng": 0.0 } } }
            ]
        }))
        .expect("fixture parses");

        let coordinate = body.into_coordinate().expect("ok").expect("resolved");
        assert_eq!(coordinate.latitude, 41.5868);
        assert_eq!(coordinate.longitude, -93.625);
    }

    #[test]
    fn geocode_zero_results_is_not_an_error() {
        let body: GeocodeResponse =
            serde_json::from_value(json!({ "status": "ZERO_RESULTS", "results": [] }))
                .expect("fixture parses");
        assert!(body.into_coordinate().expect("ok").is_none());
    }

    #[test]
    fn geocode_denied_request_is_an_upstream_error() {
        let body: GeocodeResponse = serde_json::from_value(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        }))
        .expect("fixture parses");

        match body.into_coordinate() {
            Err(GatewayError::Upstream { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert!(message.contains("API key"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn places_results_pass_through_in_order() {
        let body: PlacesResponse = serde_json::from_value(json!({
            "status": "OK",
            "results": [
                { "name": "Mercy Breast Center", "vicinity": "1111 6th Ave, Des Moines", "rating": 4.6 },
                { "name": "Mercy Breast Center", "vicinity": "1111 6th Ave, Des Moines", "rating": 4.6 },
                { "vicinity": "411 Laurel St" }
            ]
        }))
        .expect("fixture parses");

        let providers = body.into_providers().expect("ok");
        assert_eq!(providers.len(), 3, "duplicates are not removed");
        assert_eq!(providers[0].name.as_deref(), Some("Mercy Breast Center"));
        assert_eq!(providers[0].rating, Some(4.6));
        assert!(providers[2].name.is_none());
        assert!(providers[2].rating.is_none());
    }

    #[test]
    fn places_zero_results_is_an_empty_success() {
        let body: PlacesResponse =
            serde_json::from_value(json!({ "status": "ZERO_RESULTS", "results": [] }))
                .expect("fixture parses");
        assert_eq!(body.into_providers().expect("ok"), Vec::<Provider>::new());
    }

    #[test]
    fn places_quota_errors_are_upstream_errors() {
        let body: PlacesResponse = serde_json::from_value(json!({
            "status": "OVER_QUERY_LIMIT",
            "error_message": "You have exceeded your daily request quota for this API."
        }))
        .expect("fixture parses");

        match body.into_providers() {
            Err(GatewayError::Upstream { status, message }) => {
                assert_eq!(status, "OVER_QUERY_LIMIT");
                assert!(message.contains("quota"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let client = GoogleMapsClient::new(MapsConfig::default()).expect("client builds");
        match client.geocode("50309").await {
            Err(GatewayError::MissingCredentials) => {}
            other => panic!("expected missing credentials, got {other:?}"),
        }
    }
}
